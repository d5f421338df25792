//! The `Map` wrapper over an engine map.
use crate::engine::{EngineControl, EngineMapOptions, MapEngine, RenderingEngine};
use crate::events::{engine_listener, EngineTarget, EventSource, Handler, Subscription};
use crate::geometry::{LatLng, LatLngBounds};
use crate::vocabulary::{ControlPosition, EventBinding, InstanceKind};
use std::rc::Rc;

/// Style descriptor used when the options don't name one
pub const DEFAULT_STYLE: &str = "https://demotiles.maplibre.org/style.json";

const DEFAULT_ZOOM: f64 = 2.0;

/// Placement of a UI control
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlOptions {
    pub position: Option<ControlPosition>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapOptions {
    pub center: Option<LatLng>,
    pub zoom: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    /// Rotation in degrees clockwise from north
    pub heading: Option<f64>,
    /// Camera angle in degrees from the vertical
    pub tilt: Option<f64>,
    pub map_style: Option<String>,
    pub zoom_control: Option<bool>,
    pub zoom_control_options: Option<ControlOptions>,
    pub fullscreen_control: Option<bool>,
    pub fullscreen_control_options: Option<ControlOptions>,
    pub scale_control: Option<bool>,
    pub scale_control_options: Option<ControlOptions>,
}

/// Resolve one control: enabled flag with its default, then the position.
/// Centered positions fall back to the control's default corner.
fn control(
    control: EngineControl,
    enabled: Option<bool>,
    enabled_by_default: bool,
    options: Option<ControlOptions>,
    default_position: ControlPosition,
) -> Option<(EngineControl, &'static str)> {
    if !enabled.unwrap_or(enabled_by_default) {
        return None;
    }
    let position = options
        .and_then(|options| options.position)
        .and_then(ControlPosition::to_engine)
        .or_else(|| default_position.to_engine())?;
    Some((control, position))
}

impl MapOptions {
    fn to_engine(&self, container: &str) -> EngineMapOptions {
        let center = self
            .center
            .filter(LatLng::is_finite)
            .unwrap_or_else(|| LatLng::new(0.0, 0.0));
        let controls = [
            control(
                EngineControl::Navigation,
                self.zoom_control,
                true,
                self.zoom_control_options,
                ControlPosition::BottomRight,
            ),
            control(
                EngineControl::Fullscreen,
                self.fullscreen_control,
                true,
                self.fullscreen_control_options,
                ControlPosition::TopRight,
            ),
            control(
                EngineControl::Scale,
                self.scale_control,
                false,
                self.scale_control_options,
                ControlPosition::BottomLeft,
            ),
        ]
        .into_iter()
        .flatten()
        .collect();
        EngineMapOptions {
            container: container.to_string(),
            style: self
                .map_style
                .clone()
                .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            center: center.to_lng_lat(),
            zoom: self.zoom.unwrap_or(DEFAULT_ZOOM),
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            bearing: self.heading.unwrap_or(0.0),
            pitch: self.tilt.unwrap_or(0.0),
            controls,
        }
    }
}

/// A map drawn by the rendering engine, addressed in `{lat, lng}` terms.
///
/// Clones share the same engine map; equality is identity of that map.
#[derive(Clone, Debug)]
pub struct Map {
    engine: Rc<dyn MapEngine>,
}

impl Map {
    pub fn new(engine: &dyn RenderingEngine, container: &str, options: MapOptions) -> Map {
        Map {
            engine: engine.create_map(&options.to_engine(container)),
        }
    }

    /// Wrap an existing engine map
    pub fn from_engine(engine: Rc<dyn MapEngine>) -> Map {
        Map { engine }
    }

    pub fn engine(&self) -> &Rc<dyn MapEngine> {
        &self.engine
    }

    pub fn get_center(&self) -> LatLng {
        LatLng::from_lng_lat(self.engine.get_center())
    }

    pub fn set_center(&self, center: &LatLng) {
        if !center.is_finite() {
            log::warn!("ignoring non-finite map center {}", center);
            return;
        }
        self.engine.set_center(center.to_lng_lat());
    }

    pub fn get_zoom(&self) -> f64 {
        self.engine.get_zoom()
    }

    pub fn set_zoom(&self, zoom: f64) {
        self.engine.set_zoom(zoom);
    }

    pub fn get_heading(&self) -> f64 {
        self.engine.get_bearing()
    }

    pub fn set_heading(&self, heading: f64) {
        self.engine.set_bearing(heading);
    }

    pub fn get_tilt(&self) -> f64 {
        self.engine.get_pitch()
    }

    pub fn set_tilt(&self, tilt: f64) {
        self.engine.set_pitch(tilt);
    }

    pub fn get_bounds(&self) -> LatLngBounds {
        LatLngBounds::from_engine(self.engine.get_bounds())
    }

    /// Move the camera so `bounds` is visible. Empty bounds are ignored.
    pub fn fit_bounds(&self, bounds: &LatLngBounds, padding: Option<f64>) {
        if bounds.is_empty() {
            return;
        }
        self.engine.fit_bounds(&bounds.to_engine(), padding.unwrap_or(0.0));
    }

    pub fn pan_to(&self, center: &LatLng) {
        if center.is_finite() {
            self.engine.pan_to(center.to_lng_lat());
        }
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Map) -> bool {
        Rc::as_ptr(&self.engine) as *const u8 == Rc::as_ptr(&other.engine) as *const u8
    }
}

impl EventSource for Map {
    fn kind(&self) -> InstanceKind {
        InstanceKind::Map
    }

    fn subscribe(
        &self,
        binding: &'static EventBinding,
        handler: Handler,
        once: bool,
    ) -> Subscription {
        Subscription::engine(
            EngineTarget::Map(self.engine.clone()),
            binding.target,
            engine_listener(binding, handler),
            once,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::lng_lat;
    use crate::testing::HeadlessEngine;
    use crate::vocabulary::{BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};

    #[test]
    fn options_cross_into_engine_order() {
        let engine = HeadlessEngine::default();
        let map = Map::new(
            &engine,
            "map",
            MapOptions {
                center: Some(LatLng::new(47.6, -122.3)),
                zoom: Some(11.0),
                heading: Some(30.0),
                tilt: Some(45.0),
                ..Default::default()
            },
        );
        let headless = engine.map(0);
        assert_eq!(headless.options.container, "map");
        assert_eq!(headless.options.style, DEFAULT_STYLE);
        assert_eq!(headless.options.center, lng_lat(-122.3, 47.6));
        assert_eq!(headless.options.bearing, 30.0);
        assert_eq!(headless.options.pitch, 45.0);
        assert_eq!(map.get_center(), LatLng::new(47.6, -122.3));
        assert_eq!(map.get_heading(), 30.0);
        assert_eq!(map.get_tilt(), 45.0);
        assert_eq!(map.get_zoom(), 11.0);
    }

    #[test]
    fn default_controls() {
        let engine = HeadlessEngine::default();
        Map::new(&engine, "map", MapOptions::default());
        assert_eq!(
            engine.map(0).options.controls,
            vec![
                (EngineControl::Navigation, BOTTOM_RIGHT),
                (EngineControl::Fullscreen, TOP_RIGHT),
            ]
        );
    }

    #[test]
    fn control_positions_are_translated() {
        let engine = HeadlessEngine::default();
        Map::new(
            &engine,
            "map",
            MapOptions {
                zoom_control_options: Some(ControlOptions {
                    position: Some(ControlPosition::LeftTop),
                }),
                fullscreen_control: Some(false),
                scale_control: Some(true),
                scale_control_options: Some(ControlOptions {
                    position: Some(ControlPosition::BottomCenter),
                }),
                ..Default::default()
            },
        );
        assert_eq!(
            engine.map(0).options.controls,
            vec![
                (EngineControl::Navigation, TOP_LEFT),
                (EngineControl::Scale, BOTTOM_LEFT),
            ]
        );
    }

    #[test]
    fn camera_setters() {
        let engine = HeadlessEngine::default();
        let map = Map::new(&engine, "map", MapOptions::default());
        map.set_center(&LatLng::new(10.0, 20.0));
        map.set_zoom(5.0);
        map.set_center(&LatLng::nan());
        assert_eq!(engine.map(0).center.get(), lng_lat(20.0, 10.0));
        assert_eq!(map.get_zoom(), 5.0);
        map.pan_to(&LatLng::new(-1.0, -2.0));
        assert_eq!(map.get_center(), LatLng::new(-1.0, -2.0));
    }

    #[test]
    fn fit_bounds_skips_empty() {
        let engine = HeadlessEngine::default();
        let map = Map::new(&engine, "map", MapOptions::default());
        map.fit_bounds(&LatLngBounds::empty(), None);
        assert!(engine.map(0).fitted.borrow().is_empty());

        let bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(2.0, 4.0));
        map.fit_bounds(&bounds, Some(20.0));
        assert_eq!(engine.map(0).fitted.borrow().len(), 1);
        assert!(map.get_bounds().equals(&bounds));
    }

    #[test]
    fn clones_are_the_same_map() {
        let engine = HeadlessEngine::default();
        let map = Map::new(&engine, "map", MapOptions::default());
        let other = Map::new(&engine, "other", MapOptions::default());
        assert_eq!(map.clone(), map);
        assert_ne!(map, other);
    }
}
