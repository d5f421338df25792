//! Drawing a directions result onto a map.
//!
//! The route line is a single GeoJSON source and line layer with fixed ids,
//! so a renderer owns at most one of each per map. Replacing the directions
//! removes the previous line and markers before drawing the new ones.
use crate::directions::{DirectionsResult, DirectionsRoute};
use crate::engine::RenderingEngine;
use crate::map::Map;
use crate::marker::{Marker, MarkerOptions};
use serde_json::{json, Value};
use std::rc::Rc;

pub const ROUTE_SOURCE_ID: &str = "directions-route";
pub const ROUTE_LAYER_ID: &str = "directions-route-line";

#[derive(Clone, Debug, PartialEq)]
pub struct PolylineOptions {
    pub stroke_color: String,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
}

impl Default for PolylineOptions {
    fn default() -> Self {
        PolylineOptions {
            stroke_color: "#3f7fdf".to_string(),
            stroke_opacity: 0.8,
            stroke_weight: 6.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DirectionsRendererOptions {
    pub map: Option<Map>,
    pub directions: Option<DirectionsResult>,
    /// Don't place start and end markers
    pub suppress_markers: bool,
    /// Leave the camera where it is when directions are set
    pub preserve_viewport: bool,
    pub polyline_options: Option<PolylineOptions>,
}

pub struct DirectionsRenderer {
    engine: Rc<dyn RenderingEngine>,
    map: Option<Map>,
    directions: Option<DirectionsResult>,
    markers: Vec<Marker>,
    suppress_markers: bool,
    preserve_viewport: bool,
    polyline: PolylineOptions,
}

fn route_source(route: &DirectionsRoute) -> Value {
    let coordinates: Vec<[f64; 2]> = route
        .overview_path
        .iter()
        .map(|point| point.to_position())
        .collect();
    json!({
        "type": "geojson",
        "data": {
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
        },
    })
}

impl DirectionsRenderer {
    pub fn new(
        engine: Rc<dyn RenderingEngine>,
        options: DirectionsRendererOptions,
    ) -> DirectionsRenderer {
        let mut renderer = DirectionsRenderer {
            engine,
            map: options.map,
            directions: None,
            markers: Vec::new(),
            suppress_markers: options.suppress_markers,
            preserve_viewport: options.preserve_viewport,
            polyline: options.polyline_options.unwrap_or_default(),
        };
        if let Some(directions) = options.directions {
            renderer.set_directions(directions);
        }
        renderer
    }

    pub fn get_map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    /// Move the rendering to `map`, or take it off the current map with `None`
    pub fn set_map(&mut self, map: Option<&Map>) {
        self.clear();
        self.map = map.cloned();
        self.draw();
    }

    pub fn get_directions(&self) -> Option<&DirectionsResult> {
        self.directions.as_ref()
    }

    /// Replace the rendered directions.
    ///
    /// Only single-route results are drawn; anything else leaves the current
    /// rendering untouched and returns `false`.
    pub fn set_directions(&mut self, directions: DirectionsResult) -> bool {
        if directions.routes.len() != 1 {
            log::debug!(
                "not rendering a directions result with {} routes",
                directions.routes.len()
            );
            return false;
        }
        self.clear();
        self.directions = Some(directions);
        self.draw();
        true
    }

    /// Start, waypoint and end markers currently on the map
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    fn clear(&mut self) {
        for marker in self.markers.drain(..) {
            marker.set_map(None);
        }
        if let Some(map) = &self.map {
            let engine = map.engine();
            if engine.has_layer(ROUTE_LAYER_ID) {
                engine.remove_layer(ROUTE_LAYER_ID);
            }
            if engine.has_source(ROUTE_SOURCE_ID) {
                engine.remove_source(ROUTE_SOURCE_ID);
            }
        }
    }

    fn draw(&mut self) {
        let (map, route) = match (&self.map, &self.directions) {
            (Some(map), Some(directions)) => match directions.routes.first() {
                Some(route) => (map, route),
                None => return,
            },
            _ => return,
        };

        let engine = map.engine();
        engine.add_source(ROUTE_SOURCE_ID, route_source(route));
        engine.add_layer(json!({
            "id": ROUTE_LAYER_ID,
            "type": "line",
            "source": ROUTE_SOURCE_ID,
            "layout": {
                "line-join": "round",
                "line-cap": "round",
            },
            "paint": {
                "line-color": self.polyline.stroke_color,
                "line-opacity": self.polyline.stroke_opacity,
                "line-width": self.polyline.stroke_weight,
            },
        }));

        if !self.suppress_markers {
            let mut stops: Vec<_> = route
                .legs
                .iter()
                .map(|leg| (leg.start_location, leg.start_address.clone()))
                .collect();
            if let Some(last) = route.legs.last() {
                stops.push((last.end_location, last.end_address.clone()));
            }
            self.markers = stops
                .into_iter()
                .map(|(position, address)| {
                    Marker::new(
                        self.engine.as_ref(),
                        MarkerOptions {
                            position: Some(position),
                            map: Some(map.clone()),
                            title: Some(address).filter(|title| !title.is_empty()),
                            ..Default::default()
                        },
                    )
                })
                .collect();
        }

        if !self.preserve_viewport {
            map.fit_bounds(&route.bounds, None);
        }
    }
}
