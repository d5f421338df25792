//! Geographic value types exposed to client code.
//!
//! [`LatLng`] and [`LatLngBounds`] reproduce the source API's `{lat, lng}`
//! convention. Bounds are stored as an engine-native [`LngLatBounds`] so the
//! antimeridian-aware extend, contains and union rules live in one place.
use crate::engine::{lng_lat, LngLat, LngLatBounds};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default number of decimals used by the `to_url_value` serializations
pub const DEFAULT_PRECISION: usize = 6;

/// A plain `{lat, lng}` record
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLngLiteral {
    pub lat: f64,
    pub lng: f64,
}

/// A plain `{east, north, south, west}` record
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLngBoundsLiteral {
    pub east: f64,
    pub north: f64,
    pub south: f64,
    pub west: f64,
}

/// A point in geographic coordinates.
///
/// With the default constructor the latitude is clamped into `[-90, 90]` and
/// the longitude is wrapped into `[-180, 180)`. [`LatLng::new_no_wrap`] keeps
/// both components as given and remembers that it did so.
///
/// Two points are equal when their components are equal, regardless of how
/// they were constructed.
#[derive(Copy, Clone, Debug)]
pub struct LatLng {
    lat: f64,
    lng: f64,
    no_wrap: bool,
}

fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..180.0).contains(&lng) {
        return lng;
    }
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

impl LatLng {
    /// Create a normalized point
    pub fn new(lat: f64, lng: f64) -> LatLng {
        LatLng {
            lat: clamp_lat(lat),
            lng: wrap_lng(lng),
            no_wrap: false,
        }
    }

    /// Create a point without clamping or wrapping its components
    pub fn new_no_wrap(lat: f64, lng: f64) -> LatLng {
        LatLng {
            lat,
            lng,
            no_wrap: true,
        }
    }

    /// The point every unrecognised input degrades to
    pub fn nan() -> LatLng {
        LatLng::new(f64::NAN, f64::NAN)
    }

    /// Build a point from an arbitrary JSON value.
    ///
    /// Accepts a `{lat, lng}` record whose members are numbers. Any other shape
    /// gives a point whose components are NaN; this never fails.
    pub fn from_value(value: &Value) -> LatLng {
        match (
            value.get("lat").and_then(Value::as_f64),
            value.get("lng").and_then(Value::as_f64),
        ) {
            (Some(lat), Some(lng)) => LatLng::new(lat, lng),
            _ => LatLng::nan(),
        }
    }

    /// Convert an engine `[Longitude, Latitude]` pair
    pub fn from_lng_lat(lng_lat: LngLat) -> LatLng {
        LatLng::new(lng_lat.y, lng_lat.x)
    }

    /// Convert a location-service `[Longitude, Latitude]` position
    pub fn from_position(position: [f64; 2]) -> LatLng {
        LatLng::new(position[1], position[0])
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Whether this point was constructed without normalization
    pub fn is_no_wrap(&self) -> bool {
        self.no_wrap
    }

    /// Both components are usable as a query coordinate
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    pub fn equals(&self, other: &LatLng) -> bool {
        self == other
    }

    pub fn to_lng_lat(&self) -> LngLat {
        lng_lat(self.lng, self.lat)
    }

    /// `[Longitude, Latitude]`, the location service's position shape
    pub fn to_position(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn to_json(&self) -> LatLngLiteral {
        LatLngLiteral {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// `"lat,lng"` rounded to `precision` decimals with trailing zeros trimmed
    pub fn to_url_value(&self, precision: usize) -> String {
        format!(
            "{},{}",
            round_to(self.lat, precision),
            round_to(self.lng, precision)
        )
    }
}

impl PartialEq for LatLng {
    fn eq(&self, other: &LatLng) -> bool {
        self.lat == other.lat && self.lng == other.lng
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

impl From<LatLngLiteral> for LatLng {
    fn from(literal: LatLngLiteral) -> LatLng {
        LatLng::new(literal.lat, literal.lng)
    }
}

impl From<(f64, f64)> for LatLng {
    /// `(lat, lng)` order
    fn from(pair: (f64, f64)) -> LatLng {
        LatLng::new(pair.0, pair.1)
    }
}

impl From<LatLng> for LatLngLiteral {
    fn from(point: LatLng) -> LatLngLiteral {
        point.to_json()
    }
}

impl Serialize for LatLng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LatLng {
    fn deserialize<D>(deserializer: D) -> Result<LatLng, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        LatLngLiteral::deserialize(deserializer).map(LatLng::from)
    }
}

/// Round for URL serialization: fixed decimals, then trailing zeros trimmed
pub(crate) fn round_to(value: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// An axis-aligned rectangle in geographic coordinates.
///
/// `south <= north` always holds for a non-empty box; a west edge east of the
/// east edge means the box crosses the antimeridian. [`extend`] and [`union`]
/// mutate in place and return `&mut Self` so calls can be chained.
///
/// [`extend`]: LatLngBounds::extend
/// [`union`]: LatLngBounds::union
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LatLngBounds {
    inner: LngLatBounds,
}

impl LatLngBounds {
    /// Create a box from its south-west and north-east corners
    pub fn new(south_west: LatLng, north_east: LatLng) -> LatLngBounds {
        let mut inner = LngLatBounds::new(south_west.to_lng_lat(), north_east.to_lng_lat());
        if inner.south() > inner.north() {
            inner = LngLatBounds::new(
                lng_lat(south_west.lng(), north_east.lat()),
                lng_lat(north_east.lng(), south_west.lat()),
            );
        }
        LatLngBounds { inner }
    }

    pub fn empty() -> LatLngBounds {
        LatLngBounds {
            inner: LngLatBounds::empty(),
        }
    }

    /// Wrap an engine-native box
    pub fn from_engine(inner: LngLatBounds) -> LatLngBounds {
        LatLngBounds { inner }
    }

    /// Create a box from a location-service `[west, south, east, north]` array
    pub fn from_bbox(bbox: [f64; 4]) -> LatLngBounds {
        LatLngBounds::new(
            LatLng::new(bbox[1], bbox[0]),
            LatLng::new(bbox[3], bbox[2]),
        )
    }

    pub fn to_engine(&self) -> LngLatBounds {
        self.inner
    }

    /// `[west, south, east, north]`, the location service's box shape
    pub fn to_bbox(&self) -> [f64; 4] {
        self.inner.to_array()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, point: &LatLng) -> bool {
        self.inner.contains(point.to_lng_lat())
    }

    pub fn extend(&mut self, point: &LatLng) -> &mut Self {
        self.inner.extend(point.to_lng_lat());
        self
    }

    pub fn union(&mut self, other: &LatLngBounds) -> &mut Self {
        self.inner.extend_bounds(&other.inner);
        self
    }

    pub fn equals(&self, other: &LatLngBounds) -> bool {
        (self.is_empty() && other.is_empty()) || self.inner == other.inner
    }

    pub fn get_center(&self) -> LatLng {
        if self.is_empty() {
            return LatLng::new(0.0, 0.0);
        }
        LatLng::from_lng_lat(self.inner.center())
    }

    pub fn get_south_west(&self) -> LatLng {
        LatLng::new_no_wrap(self.inner.south(), self.inner.west())
    }

    pub fn get_north_east(&self) -> LatLng {
        LatLng::new_no_wrap(self.inner.north(), self.inner.east())
    }

    /// Latitude and longitude extent as a point-shaped pair
    pub fn to_span(&self) -> LatLng {
        if self.is_empty() {
            return LatLng::new_no_wrap(0.0, 0.0);
        }
        LatLng::new_no_wrap(self.inner.north() - self.inner.south(), self.inner.lng_span())
    }

    pub fn to_json(&self) -> LatLngBoundsLiteral {
        LatLngBoundsLiteral {
            east: self.inner.east(),
            north: self.inner.north(),
            south: self.inner.south(),
            west: self.inner.west(),
        }
    }

    /// `"south,west,north,east"` rounded to `precision` decimals
    pub fn to_url_value(&self, precision: usize) -> String {
        format!(
            "{},{}",
            self.get_south_west().to_url_value(precision),
            self.get_north_east().to_url_value(precision)
        )
    }
}

impl fmt::Display for LatLngBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.get_south_west(), self.get_north_east())
    }
}

impl From<LatLngBoundsLiteral> for LatLngBounds {
    fn from(literal: LatLngBoundsLiteral) -> LatLngBounds {
        LatLngBounds::new(
            LatLng::new(literal.south, literal.west),
            LatLng::new(literal.north, literal.east),
        )
    }
}

impl Serialize for LatLngBounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LatLngBounds {
    fn deserialize<D>(deserializer: D) -> Result<LatLngBounds, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        LatLngBoundsLiteral::deserialize(deserializer).map(LatLngBounds::from)
    }
}
