//! The rendering engine boundary.
//!
//! Everything the adapter needs from the substitute map renderer is expressed
//! here as trait objects: a factory ([`RenderingEngine`]), the map, marker and
//! popup primitives, and the low-level element a marker is drawn with.
//!
//! ### A note on Coordinate Order
//! The engine speaks `[Longitude, Latitude]` (`x, y`), the opposite of the
//! `{lat, lng}` convention exposed to client code. [`LngLat`] is a plain
//! [`geo_types::Coord`] so the order is carried by the type: `x` is always the
//! longitude. Every crossing of this boundary goes through
//! [`LatLng::to_lng_lat`](crate::LatLng::to_lng_lat) or
//! [`LatLng::from_lng_lat`](crate::LatLng::from_lng_lat).
use serde_json::Value;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub use geo_types::Coord;

/// An engine-native coordinate pair, `x` = longitude, `y` = latitude
pub type LngLat = Coord<f64>;

/// Build an engine coordinate pair in `[Longitude, Latitude]` order
pub fn lng_lat(lng: f64, lat: f64) -> LngLat {
    Coord { x: lng, y: lat }
}

/// An engine-native bounding box stored as west, south, east, north scalars.
///
/// A box whose west edge lies east of its east edge wraps across the
/// antimeridian. The empty box (`south > north`) contains nothing and is the
/// neutral element of [`extend`](LngLatBounds::extend) and
/// [`extend_bounds`](LngLatBounds::extend_bounds).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLatBounds {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl LngLatBounds {
    /// Create a box from its south-west and north-east corners.
    ///
    /// The corners are taken as given, so `sw.x > ne.x` describes a box
    /// crossing the antimeridian.
    pub fn new(sw: LngLat, ne: LngLat) -> LngLatBounds {
        LngLatBounds {
            west: sw.x,
            south: sw.y,
            east: ne.x,
            north: ne.y,
        }
    }

    /// Create a box from `[west, south, east, north]`
    pub fn from_array(bbox: [f64; 4]) -> LngLatBounds {
        LngLatBounds {
            west: bbox[0],
            south: bbox[1],
            east: bbox[2],
            north: bbox[3],
        }
    }

    pub fn empty() -> LngLatBounds {
        LngLatBounds {
            west: 180.0,
            south: 1.0,
            east: -180.0,
            north: -1.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.south <= self.north)
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south_west(&self) -> LngLat {
        lng_lat(self.west, self.south)
    }

    pub fn north_east(&self) -> LngLat {
        lng_lat(self.east, self.north)
    }

    /// `[west, south, east, north]`, the shape the location service expects
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitudinal extent in degrees, in `[0, 360]`
    pub fn lng_span(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else if self.crosses_antimeridian() {
            self.east - self.west + 360.0
        } else {
            self.east - self.west
        }
    }

    fn contains_lng(&self, lng: f64) -> bool {
        if self.crosses_antimeridian() {
            lng >= self.west || lng <= self.east
        } else {
            self.west <= lng && lng <= self.east
        }
    }

    pub fn contains(&self, point: LngLat) -> bool {
        !self.is_empty()
            && self.south <= point.y
            && point.y <= self.north
            && self.contains_lng(point.x)
    }

    /// Grow the box to include `point`, taking the shorter way around the
    /// globe when the longitude lies outside the current extent.
    pub fn extend(&mut self, point: LngLat) -> &mut Self {
        if !point.x.is_finite() || !point.y.is_finite() {
            return self;
        }
        if self.is_empty() {
            *self = LngLatBounds::new(point, point);
            return self;
        }
        self.south = self.south.min(point.y);
        self.north = self.north.max(point.y);
        if !self.contains_lng(point.x) {
            let grow_west = (self.west - point.x).rem_euclid(360.0);
            let grow_east = (point.x - self.east).rem_euclid(360.0);
            if grow_west < grow_east {
                self.west = point.x;
            } else {
                self.east = point.x;
            }
        }
        self
    }

    /// Grow the box to include every point of `other`
    pub fn extend_bounds(&mut self, other: &LngLatBounds) -> &mut Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            *self = *other;
            return self;
        }
        self.south = self.south.min(other.south);
        self.north = self.north.max(other.north);
        let covers_other = self.contains_lng(other.west)
            && self.contains_lng(other.east)
            && other.lng_span() <= self.lng_span();
        let covered_by_other = other.contains_lng(self.west)
            && other.contains_lng(self.east)
            && self.lng_span() <= other.lng_span();
        if covered_by_other {
            self.west = other.west;
            self.east = other.east;
        } else if !covers_other {
            let (south, north) = (self.south, self.north);
            self.extend(lng_lat(other.west, south));
            self.extend(lng_lat(other.east, north));
        }
        self
    }

    pub fn center(&self) -> LngLat {
        let lng = if self.crosses_antimeridian() {
            (self.west + self.east + 360.0) / 2.0
        } else {
            (self.west + self.east) / 2.0
        };
        lng_lat(lng, (self.south + self.north) / 2.0)
    }
}

impl Default for LngLatBounds {
    fn default() -> Self {
        Self::empty()
    }
}

/// A raw, low-level input event as delivered to a [`DomElement`] listener.
///
/// Propagation and default-action state is interior-mutable so a listener
/// holding a shared reference can still stop the event.
#[derive(Debug, Default)]
pub struct DomEvent {
    kind: String,
    client_x: f64,
    client_y: f64,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    pub fn new(kind: &str) -> DomEvent {
        DomEvent {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    /// Set the pointer position in viewport pixels
    pub fn with_client_position(mut self, x: f64, y: f64) -> DomEvent {
        self.client_x = x;
        self.client_y = y;
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn client_position(&self) -> (f64, f64) {
        (self.client_x, self.client_y)
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// An event emitted through the engine's native `on`/`once` API
#[derive(Clone, Debug)]
pub struct EngineEvent {
    pub kind: String,
    /// Geographic position of the pointer, for pointer events
    pub lng_lat: Option<LngLat>,
    /// The low-level event that caused this one, if any
    pub original_event: Option<Rc<DomEvent>>,
}

impl EngineEvent {
    pub fn new(kind: &str) -> EngineEvent {
        EngineEvent {
            kind: kind.to_string(),
            lng_lat: None,
            original_event: None,
        }
    }

    pub fn pointer(kind: &str, lng_lat: LngLat, original_event: Rc<DomEvent>) -> EngineEvent {
        EngineEvent {
            kind: kind.to_string(),
            lng_lat: Some(lng_lat),
            original_event: Some(original_event),
        }
    }
}

/// A listener registered through an engine object's `on`/`once`.
///
/// Removal compares listeners by pointer, so the exact `Rc` that was
/// registered must be passed back to `off`.
pub type EngineListener = Rc<dyn Fn(&EngineEvent)>;

/// A listener registered directly on a [`DomElement`]
pub type DomListener = Rc<dyn Fn(&Rc<DomEvent>)>;

/// The visual element a marker is drawn with
pub trait DomElement {
    fn add_event_listener(&self, kind: &str, listener: DomListener, once: bool);
    fn remove_event_listener(&self, kind: &str, listener: &DomListener);
}

/// The engine's native subscription API, shared by maps, markers and popups
pub trait Evented {
    fn on(&self, event: &str, listener: EngineListener);
    fn once(&self, event: &str, listener: EngineListener);
    fn off(&self, event: &str, listener: &EngineListener);
}

/// UI controls the engine can place on a map
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EngineControl {
    Navigation,
    Fullscreen,
    Scale,
}

/// Construction options for an engine map
#[derive(Clone, Debug, PartialEq)]
pub struct EngineMapOptions {
    pub container: String,
    pub style: String,
    pub center: LngLat,
    pub zoom: f64,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub bearing: f64,
    pub pitch: f64,
    /// Controls and the engine position token each one is placed at
    pub controls: Vec<(EngineControl, &'static str)>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineMarkerOptions {
    pub lng_lat: Option<LngLat>,
    pub draggable: bool,
    pub opacity: Option<f64>,
    pub title: Option<String>,
    /// Image URL used as the marker element's content
    pub image: Option<String>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnginePopupOptions {
    pub html: Option<String>,
    pub lng_lat: Option<LngLat>,
    pub min_width: Option<String>,
    pub max_width: Option<String>,
}

pub trait MapEngine: Evented {
    fn get_center(&self) -> LngLat;
    fn set_center(&self, center: LngLat);
    fn get_zoom(&self) -> f64;
    fn set_zoom(&self, zoom: f64);
    fn get_bearing(&self) -> f64;
    fn set_bearing(&self, bearing: f64);
    fn get_pitch(&self) -> f64;
    fn set_pitch(&self, pitch: f64);
    fn get_bounds(&self) -> LngLatBounds;
    fn fit_bounds(&self, bounds: &LngLatBounds, padding: f64);
    fn pan_to(&self, center: LngLat);
    fn add_control(&self, control: EngineControl, position: &'static str);
    fn add_source(&self, id: &str, source: Value);
    fn remove_source(&self, id: &str);
    fn has_source(&self, id: &str) -> bool;
    fn add_layer(&self, layer: Value);
    fn remove_layer(&self, id: &str);
    fn has_layer(&self, id: &str) -> bool;
}

pub trait MarkerEngine: Evented {
    fn get_lng_lat(&self) -> LngLat;
    fn set_lng_lat(&self, lng_lat: LngLat);
    fn is_draggable(&self) -> bool;
    fn set_draggable(&self, draggable: bool);
    fn set_opacity(&self, opacity: f64);
    fn element(&self) -> Rc<dyn DomElement>;
    fn add_to(&self, map: &Rc<dyn MapEngine>);
    fn remove(&self);
}

pub trait PopupEngine: Evented {
    fn set_html(&self, html: &str);
    fn get_lng_lat(&self) -> Option<LngLat>;
    fn set_lng_lat(&self, lng_lat: LngLat);
    fn set_max_width(&self, max_width: &str);
    fn add_to(&self, map: &Rc<dyn MapEngine>);
    fn remove(&self);
    fn is_open(&self) -> bool;
}

/// Factory for the engine's primitives
pub trait RenderingEngine {
    fn create_map(&self, options: &EngineMapOptions) -> Rc<dyn MapEngine>;
    fn create_marker(&self, options: &EngineMarkerOptions) -> Rc<dyn MarkerEngine>;
    fn create_popup(&self, options: &EnginePopupOptions) -> Rc<dyn PopupEngine>;
}

impl fmt::Debug for dyn MapEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapEngine")
            .field("center", &self.get_center())
            .field("zoom", &self.get_zoom())
            .finish()
    }
}

impl fmt::Debug for dyn MarkerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerEngine")
            .field("lng_lat", &self.get_lng_lat())
            .finish()
    }
}

impl fmt::Debug for dyn PopupEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupEngine")
            .field("open", &self.is_open())
            .finish()
    }
}
