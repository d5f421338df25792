//! Directions requests and route translation.
//!
//! A calculated route is translated leg by leg. Per-step paths come from the
//! step's own geometry or are sliced out of the leg line by the step offsets;
//! each leg's path is then rebuilt by joining its step paths, and the route
//! bounds are the union of the leg bounds.
use crate::geometry::{round_to, LatLng, LatLngBounds};
use crate::shared::location::{CalculateRouteResponse, Leg, LineGeometry};
use chrono::{DateTime, Utc};
use geo_types::LineString;
use serde::Serialize;

/// Most intermediate waypoints a single request may carry
pub const MAX_WAYPOINTS: usize = 23;

const METERS_PER_KILOMETER: f64 = 1000.0;
const METERS_PER_MILE: f64 = 1609.344;
const FEET_PER_METER: f64 = 3.28084;
/// Largest distance or duration a calculated route may report
const MAX_MEASURE: f64 = 1.0e12;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// The calculator's travel mode; `None` for modes it can't route
    pub fn to_backend(self) -> Option<&'static str> {
        match self {
            TravelMode::Driving => Some("Car"),
            TravelMode::Walking => Some("Walking"),
            TravelMode::Bicycling => Some("Bicycle"),
            TravelMode::Transit => None,
        }
    }
}

impl Default for TravelMode {
    fn default() -> Self {
        TravelMode::Driving
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn to_backend(self) -> &'static str {
        match self {
            UnitSystem::Metric => "Kilometers",
            UnitSystem::Imperial => "Miles",
        }
    }
}

impl Default for UnitSystem {
    fn default() -> Self {
        UnitSystem::Metric
    }
}

/// The forms an origin, destination or waypoint may take
#[derive(Clone, Debug, PartialEq)]
pub enum DirectionsEndpoint {
    LatLng(LatLng),
    /// A `{location}` wrapper around a coordinate
    Location(LatLng),
    /// Free text, resolved through a place search
    Query(String),
    /// A place identifier, resolved through a place lookup
    PlaceId(String),
}

impl DirectionsEndpoint {
    /// The coordinate, if no backend round trip is needed to get one
    pub fn coordinate(&self) -> Option<LatLng> {
        match self {
            DirectionsEndpoint::LatLng(point) | DirectionsEndpoint::Location(point) => Some(*point),
            DirectionsEndpoint::Query(_) | DirectionsEndpoint::PlaceId(_) => None,
        }
    }
}

impl From<LatLng> for DirectionsEndpoint {
    fn from(point: LatLng) -> Self {
        DirectionsEndpoint::LatLng(point)
    }
}

impl From<(f64, f64)> for DirectionsEndpoint {
    fn from(lat_lng: (f64, f64)) -> Self {
        DirectionsEndpoint::LatLng(LatLng::from(lat_lng))
    }
}

impl From<&str> for DirectionsEndpoint {
    fn from(query: &str) -> Self {
        DirectionsEndpoint::Query(query.to_string())
    }
}

impl From<String> for DirectionsEndpoint {
    fn from(query: String) -> Self {
        DirectionsEndpoint::Query(query)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionsWaypoint {
    pub location: DirectionsEndpoint,
    pub stopover: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionsRequest {
    pub origin: DirectionsEndpoint,
    pub destination: DirectionsEndpoint,
    pub travel_mode: TravelMode,
    pub waypoints: Vec<DirectionsWaypoint>,
    pub avoid_ferries: bool,
    pub avoid_tolls: bool,
    /// Accepted for compatibility; the calculator has no such option
    pub avoid_highways: bool,
    pub departure_time: Option<DateTime<Utc>>,
    pub unit_system: UnitSystem,
}

impl DirectionsRequest {
    pub fn new<O, D>(origin: O, destination: D) -> DirectionsRequest
    where
        O: Into<DirectionsEndpoint>,
        D: Into<DirectionsEndpoint>,
    {
        DirectionsRequest {
            origin: origin.into(),
            destination: destination.into(),
            travel_mode: TravelMode::default(),
            waypoints: Vec::new(),
            avoid_ferries: false,
            avoid_tolls: false,
            avoid_highways: false,
            departure_time: None,
            unit_system: UnitSystem::default(),
        }
    }
}

/// A distance in meters and its display text
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Distance {
    pub text: String,
    pub value: u64,
}

/// A duration in seconds and its display text
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Duration {
    pub text: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectionsStep {
    pub start_location: LatLng,
    pub end_location: LatLng,
    pub distance: Distance,
    pub duration: Duration,
    pub path: Vec<LatLng>,
    pub travel_mode: TravelMode,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectionsLeg {
    pub start_location: LatLng,
    pub end_location: LatLng,
    pub start_address: String,
    pub end_address: String,
    pub distance: Distance,
    pub duration: Duration,
    pub steps: Vec<DirectionsStep>,
    /// The leg's line, joined from its step paths
    pub path: Vec<LatLng>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectionsRoute {
    pub bounds: LatLngBounds,
    pub legs: Vec<DirectionsLeg>,
    pub overview_path: Vec<LatLng>,
    pub summary: String,
    pub warnings: Vec<String>,
    pub waypoint_order: Vec<usize>,
    pub copyrights: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectionsResult {
    #[serde(skip)]
    pub request: Option<DirectionsRequest>,
    pub routes: Vec<DirectionsRoute>,
}

fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Display text for a distance in meters
pub fn format_distance(meters: f64, unit_system: UnitSystem) -> String {
    match unit_system {
        UnitSystem::Metric if meters < METERS_PER_KILOMETER => {
            format!("{} m", meters.round())
        }
        UnitSystem::Metric => format!("{} km", round_to(meters / METERS_PER_KILOMETER, 1)),
        UnitSystem::Imperial => {
            let miles = meters / METERS_PER_MILE;
            if miles < 0.1 {
                format!("{} ft", (meters * FEET_PER_METER).round())
            } else {
                format!("{} mi", round_to(miles, 1))
            }
        }
    }
}

/// Display text for a duration, rounded to whole minutes
pub fn format_duration(seconds: f64) -> String {
    let minutes = if seconds.is_finite() {
        (seconds / 60.0).round().clamp(1.0, i64::MAX as f64) as i64
    } else {
        1
    };
    let duration = chrono::Duration::try_minutes(minutes).unwrap_or(chrono::Duration::MAX);
    let days = duration.num_days();
    let hours = duration.num_hours() % 24;
    let mins = duration.num_minutes() % 60;
    if days > 0 {
        if hours > 0 {
            format!("{} {}", pluralize(days, "day"), pluralize(hours, "hour"))
        } else {
            pluralize(days, "day")
        }
    } else if hours > 0 {
        if mins > 0 {
            format!("{} {}", pluralize(hours, "hour"), pluralize(mins, "min"))
        } else {
            pluralize(hours, "hour")
        }
    } else {
        pluralize(mins, "min")
    }
}

fn measurable(value: f64) -> bool {
    value.is_finite() && (0.0..=MAX_MEASURE).contains(&value)
}

/// Whether every leg and step reports a usable distance and duration
pub fn is_measurable(response: &CalculateRouteResponse) -> bool {
    response.legs.iter().all(|leg| {
        measurable(leg.distance)
            && measurable(leg.duration_seconds)
            && leg
                .steps
                .iter()
                .all(|step| measurable(step.distance) && measurable(step.duration_seconds))
    })
}

fn to_meters(distance: f64, distance_unit: Option<&str>) -> f64 {
    match distance_unit {
        Some("Miles") => distance * METERS_PER_MILE,
        _ => distance * METERS_PER_KILOMETER,
    }
}

fn distance(value: f64, distance_unit: Option<&str>, unit_system: UnitSystem) -> Distance {
    let meters = to_meters(value, distance_unit);
    Distance {
        text: format_distance(meters, unit_system),
        value: meters.round().max(0.0) as u64,
    }
}

fn duration(seconds: f64) -> Duration {
    Duration {
        text: format_duration(seconds),
        value: seconds.round().max(0.0) as u64,
    }
}

fn line_string(geometry: &LineGeometry) -> LineString<f64> {
    LineString::from(geometry.line_string.clone())
}

fn to_path(line: &LineString<f64>) -> Vec<LatLng> {
    line.0.iter().map(|coord| LatLng::from_lng_lat(*coord)).collect()
}

/// Append `path` to `joined`, skipping a point shared with the previous tail
fn join_path(joined: &mut Vec<LatLng>, path: &[LatLng]) {
    for point in path {
        if joined.last() != Some(point) {
            joined.push(*point);
        }
    }
}

/// Per-step paths of a leg
fn step_paths(leg: &Leg) -> Vec<Vec<LatLng>> {
    let leg_line = leg.geometry.as_ref().map(line_string);
    leg.steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            if let Some(own) = &step.geometry {
                return to_path(&line_string(own));
            }
            let sliced = match (&leg_line, step.geometry_offset) {
                (Some(line), Some(start)) if start < line.0.len() => {
                    let last = line.0.len() - 1;
                    let end = leg
                        .steps
                        .get(i + 1)
                        .and_then(|next| next.geometry_offset)
                        .unwrap_or(last)
                        .min(last)
                        .max(start);
                    Some(
                        line.0[start..=end]
                            .iter()
                            .map(|coord| LatLng::from_lng_lat(*coord))
                            .collect(),
                    )
                }
                _ => None,
            };
            sliced.unwrap_or_else(|| {
                vec![
                    LatLng::from_position(step.start_position),
                    LatLng::from_position(step.end_position),
                ]
            })
        })
        .collect()
}

fn translate_leg(
    leg: &Leg,
    distance_unit: Option<&str>,
    travel_mode: TravelMode,
    unit_system: UnitSystem,
) -> (DirectionsLeg, LatLngBounds) {
    let paths = step_paths(leg);
    let start_location = LatLng::from_position(leg.start_position);
    let end_location = LatLng::from_position(leg.end_position);

    let mut path = Vec::new();
    if paths.is_empty() {
        match &leg.geometry {
            Some(geometry) => path = to_path(&line_string(geometry)),
            None => join_path(&mut path, &[start_location, end_location]),
        }
    } else {
        for step_path in &paths {
            join_path(&mut path, step_path);
        }
    }

    let steps = leg
        .steps
        .iter()
        .zip(paths)
        .map(|(step, step_path)| DirectionsStep {
            start_location: LatLng::from_position(step.start_position),
            end_location: LatLng::from_position(step.end_position),
            distance: distance(step.distance, distance_unit, unit_system),
            duration: duration(step.duration_seconds),
            path: step_path,
            travel_mode,
        })
        .collect();

    let mut bounds = LatLngBounds::empty();
    bounds.extend(&start_location).extend(&end_location);
    for point in &path {
        bounds.extend(point);
    }

    let leg = DirectionsLeg {
        start_location,
        end_location,
        start_address: String::new(),
        end_address: String::new(),
        distance: distance(leg.distance, distance_unit, unit_system),
        duration: duration(leg.duration_seconds),
        steps,
        path,
    };
    (leg, bounds)
}

/// Translate a calculated route
pub fn translate_route(
    response: &CalculateRouteResponse,
    travel_mode: TravelMode,
    unit_system: UnitSystem,
) -> DirectionsRoute {
    let distance_unit = response.summary.distance_unit.as_deref();
    let mut bounds = LatLngBounds::empty();
    let mut overview_path = Vec::new();
    let legs = response
        .legs
        .iter()
        .map(|leg| {
            let (leg, leg_bounds) = translate_leg(leg, distance_unit, travel_mode, unit_system);
            bounds.union(&leg_bounds);
            join_path(&mut overview_path, &leg.path);
            leg
        })
        .collect::<Vec<_>>();
    DirectionsRoute {
        bounds,
        waypoint_order: (0..legs.len().saturating_sub(1)).collect(),
        legs,
        overview_path,
        summary: String::new(),
        warnings: Vec::new(),
        copyrights: response.summary.data_source.clone().unwrap_or_default(),
    }
}
