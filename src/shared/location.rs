//! Wire types of the location service: place search and route calculation.
//!
//! Field names are PascalCase on the wire. Positions are always
//! `[Longitude, Latitude]` and boxes `[west, south, east, north]`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Search the place index for records near a position
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchPlaceIndexForPositionRequest {
    #[serde(skip)]
    pub index_name: String,
    pub position: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

/// Search the place index by free text.
///
/// At most one of `bias_position` and `filter_bbox` may be set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchPlaceIndexForTextRequest {
    #[serde(skip)]
    pub index_name: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_position: Option<[f64; 2]>,
    #[serde(rename = "FilterBBox", skip_serializing_if = "Option::is_none")]
    pub filter_bbox: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

/// Ask the place index for completions of partial text
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchPlaceIndexForSuggestionsRequest {
    #[serde(skip)]
    pub index_name: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_position: Option<[f64; 2]>,
    #[serde(rename = "FilterBBox", skip_serializing_if = "Option::is_none")]
    pub filter_bbox: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

/// Fetch a single record by identifier. Sent as path and query parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetPlaceRequest {
    pub index_name: String,
    pub place_id: String,
    pub language: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarModeOptions {
    pub avoid_ferries: bool,
    pub avoid_tolls: bool,
}

/// Compute a route between two or more positions
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalculateRouteRequest {
    #[serde(skip)]
    pub calculator_name: String,
    pub departure_position: [f64; 2],
    pub destination_position: [f64; 2],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub waypoint_positions: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_mode: Option<String>,
    pub include_leg_geometry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_mode_options: Option<CarModeOptions>,
}

/// The response of the position and text searches
///
///```json
/// {
///   "Results": [
///     {
///       "Distance": 12.4,
///       "Place": {
///         "AddressNumber": "1800",
///         "Country": "USA",
///         "Geometry": { "Point": [-123.1141, 49.2637] },
///         "Label": "1800 Main St, Vancouver, BC, CAN",
///         "Municipality": "Vancouver",
///         "Street": "Main St",
///         "TimeZone": { "Name": "America/Vancouver", "Offset": -25200 }
///       },
///       "PlaceId": "AQAAAHAA..."
///     }
///   ],
///   "Summary": { "Text": "1800 Main St", "DataSource": "Esri" }
/// }
///```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchPlaceIndexResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One place search hit
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    pub place: Place,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub relevance: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchPlaceIndexForSuggestionsResponse {
    #[serde(default)]
    pub results: Vec<SuggestionResult>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SuggestionResult {
    pub text: String,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPlaceResponse {
    pub place: Place,
}

/// A place record and its address components
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Place {
    pub label: Option<String>,
    pub geometry: PlaceGeometry,
    pub address_number: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub municipality: Option<String>,
    pub sub_region: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub unit_number: Option<String>,
    pub time_zone: Option<TimeZone>,
    pub categories: Vec<String>,
    pub interpolated: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PlaceGeometry {
    pub point: Option<[f64; 2]>,
    pub bounding_box: Option<[f64; 4]>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeZone {
    pub name: String,
    /// Offset from UTC in seconds
    #[serde(default)]
    pub offset: Option<i32>,
}

/// The response of a route calculation
///
///```json
/// {
///   "Legs": [
///     {
///       "Distance": 0.05,
///       "DurationSeconds": 10.88,
///       "EndPosition": [123.0, 12.0],
///       "Geometry": { "LineString": [[123.0, 11.0], [123.0, 12.0]] },
///       "StartPosition": [123.0, 11.0],
///       "Steps": [
///         {
///           "Distance": 0.05,
///           "DurationSeconds": 10.88,
///           "EndPosition": [123.0, 12.0],
///           "GeometryOffset": 0,
///           "StartPosition": [123.0, 11.0]
///         }
///       ]
///     }
///   ],
///   "Summary": {
///     "DataSource": "Esri",
///     "Distance": 0.05,
///     "DistanceUnit": "Kilometers",
///     "DurationSeconds": 10.88,
///     "RouteBBox": [123.0, 11.0, 123.0, 12.0]
///   }
/// }
///```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalculateRouteResponse {
    #[serde(default)]
    pub legs: Vec<Leg>,
    pub summary: RouteSummary,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Leg {
    pub start_position: [f64; 2],
    pub end_position: [f64; 2],
    pub distance: f64,
    pub duration_seconds: f64,
    #[serde(default)]
    pub geometry: Option<LineGeometry>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Step {
    pub start_position: [f64; 2],
    pub end_position: [f64; 2],
    pub distance: f64,
    pub duration_seconds: f64,
    /// Index into the leg's line string where this step starts
    #[serde(default)]
    pub geometry_offset: Option<usize>,
    #[serde(default)]
    pub geometry: Option<LineGeometry>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineGeometry {
    pub line_string: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteSummary {
    #[serde(rename = "RouteBBox", default)]
    pub route_bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub data_source: Option<String>,
    pub distance: f64,
    #[serde(default)]
    pub distance_unit: Option<String>,
    pub duration_seconds: f64,
}
