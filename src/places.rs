//! Place result projection and location-bias resolution.
//!
//! Backend [`Place`] records are projected into [`PlaceResult`]s under a
//! [`FieldSelection`]. Every output field is gated on its own; the detail tier
//! (`utc_offset`, `utc_offset_minutes`, `vicinity`) is only ever computed for
//! detail lookups.
//!
//! [`LocationQuery`] turns the overlapping bias parameters of a request into
//! at most one backend query parameter.
use crate::geometry::{LatLng, LatLngBounds};
use crate::shared::location::{Place, SuggestionResult};
use serde::{Deserialize, Serialize};

pub const ALL: &str = "ALL";
pub const FORMATTED_ADDRESS: &str = "formatted_address";
pub const GEOMETRY: &str = "geometry";
pub const GEOMETRY_LOCATION: &str = "geometry.location";
pub const GEOMETRY_VIEWPORT: &str = "geometry.viewport";
pub const NAME: &str = "name";
pub const PLACE_ID: &str = "place_id";
pub const REFERENCE: &str = "reference";
pub const UTC_OFFSET: &str = "utc_offset";
pub const UTC_OFFSET_MINUTES: &str = "utc_offset_minutes";
pub const VICINITY: &str = "vicinity";

/// Which fields a request asked for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldSelection {
    All,
    Fields(Vec<String>),
}

impl FieldSelection {
    /// Build a selection from a request's field list; a list naming
    /// [`ALL`] selects everything.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> FieldSelection {
        if fields.iter().any(|field| field.as_ref() == ALL) {
            FieldSelection::All
        } else {
            FieldSelection::Fields(fields.iter().map(|f| f.as_ref().to_string()).collect())
        }
    }

    pub fn includes(&self, field: &str) -> bool {
        match self {
            FieldSelection::All => true,
            FieldSelection::Fields(fields) => fields.iter().any(|f| f == field),
        }
    }

    fn includes_any(&self, fields: &[&str]) -> bool {
        fields.iter().any(|field| self.includes(field))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaceGeometry {
    pub location: LatLng,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<LatLngBounds>,
}

/// A projected place record. Unrequested fields stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlaceResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PlaceGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
}

/// First comma-delimited segment of a label
pub fn place_name(label: &str) -> &str {
    label.split(',').next().unwrap_or(label)
}

/// `"{number} {street}, {municipality}"`, leaving out whatever is missing.
///
/// A street number without a street is dropped along with it.
pub fn vicinity(place: &Place) -> Option<String> {
    let street = match (&place.address_number, &place.street) {
        (Some(number), Some(street)) => Some(format!("{} {}", number, street)),
        (None, Some(street)) => Some(street.clone()),
        _ => None,
    };
    let parts: Vec<String> = street
        .into_iter()
        .chain(place.municipality.clone())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Project one backend record.
///
/// `include_detail_fields` enables the second tier of fields; even then each
/// of them still has to be selected.
pub fn project_place(
    place_id: Option<&str>,
    place: &Place,
    fields: &FieldSelection,
    include_detail_fields: bool,
) -> PlaceResult {
    let mut result = PlaceResult::default();

    if fields.includes(FORMATTED_ADDRESS) {
        result.formatted_address = place.label.clone();
    }
    if fields.includes_any(&[GEOMETRY, GEOMETRY_LOCATION, GEOMETRY_VIEWPORT]) {
        if let Some(point) = place.geometry.point {
            let viewport = if fields.includes_any(&[GEOMETRY, GEOMETRY_VIEWPORT]) {
                place.geometry.bounding_box.map(LatLngBounds::from_bbox)
            } else {
                None
            };
            result.geometry = Some(PlaceGeometry {
                location: LatLng::from_position(point),
                viewport,
            });
        }
    }
    if fields.includes(NAME) {
        result.name = place.label.as_deref().map(|label| place_name(label).to_string());
    }
    if fields.includes(PLACE_ID) {
        result.place_id = place_id.map(str::to_string);
    }
    if fields.includes(REFERENCE) {
        result.reference = place_id.map(str::to_string);
    }

    if include_detail_fields {
        if fields.includes_any(&[UTC_OFFSET, UTC_OFFSET_MINUTES]) {
            let minutes = place
                .time_zone
                .as_ref()
                .and_then(|tz| tz.offset)
                .map(|seconds| seconds / 60);
            result.utc_offset = minutes;
            result.utc_offset_minutes = minutes;
        }
        if fields.includes(VICINITY) {
            result.vicinity = vicinity(place);
        }
    }

    result
}

/// A bias parameter as a request may give it
#[derive(Clone, Debug, PartialEq)]
pub enum LocationBias {
    Point(LatLng),
    Bounds(LatLngBounds),
    Circle { center: LatLng, radius: f64 },
    /// Bias by the caller's IP; the backend has no equivalent
    IpBias,
}

/// The single location parameter sent to the backend
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum QueryLocation {
    BiasPosition([f64; 2]),
    FilterBBox([f64; 4]),
}

impl QueryLocation {
    pub fn bias_position(&self) -> Option<[f64; 2]> {
        match self {
            QueryLocation::BiasPosition(position) => Some(*position),
            QueryLocation::FilterBBox(_) => None,
        }
    }

    pub fn filter_bbox(&self) -> Option<[f64; 4]> {
        match self {
            QueryLocation::FilterBBox(bbox) => Some(*bbox),
            QueryLocation::BiasPosition(_) => None,
        }
    }
}

fn position_param(point: &LatLng) -> Option<QueryLocation> {
    if point.is_finite() {
        Some(QueryLocation::BiasPosition(point.to_position()))
    } else {
        log::warn!("dropping non-finite bias position {}", point);
        None
    }
}

fn bbox_param(bounds: &LatLngBounds) -> Option<QueryLocation> {
    let bbox = bounds.to_bbox();
    if bounds.is_empty() || !bbox.iter().all(|v| v.is_finite()) {
        log::warn!("dropping unusable bounds {}", bounds);
        None
    } else {
        Some(QueryLocation::FilterBBox(bbox))
    }
}

/// The location-related options of a search request.
///
/// Resolution order: `location_bias`, then `bounds`, then `location`. The
/// first usable value wins and the rest are ignored, so a box always
/// suppresses a plain `location`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationQuery {
    pub location_bias: Option<LocationBias>,
    /// A bias or restriction box
    pub bounds: Option<LatLngBounds>,
    pub location: Option<LatLng>,
}

impl LocationQuery {
    pub fn resolve(&self) -> Option<QueryLocation> {
        let from_bias = self.location_bias.as_ref().and_then(|bias| match bias {
            LocationBias::Point(point) => position_param(point),
            LocationBias::Circle { center, .. } => position_param(center),
            LocationBias::Bounds(bounds) => bbox_param(bounds),
            LocationBias::IpBias => None,
        });
        from_bias
            .or_else(|| self.bounds.as_ref().and_then(bbox_param))
            .or_else(|| self.location.as_ref().and_then(position_param))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FindPlaceFromQueryRequest {
    pub query: String,
    pub fields: Vec<String>,
    pub location_bias: Option<LocationBias>,
    pub language: Option<String>,
}

impl FindPlaceFromQueryRequest {
    pub fn location_query(&self) -> LocationQuery {
        LocationQuery {
            location_bias: self.location_bias.clone(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaceDetailsRequest {
    pub place_id: String,
    /// `None` selects every field
    pub fields: Option<Vec<String>>,
    pub language: Option<String>,
}

impl PlaceDetailsRequest {
    pub fn field_selection(&self) -> FieldSelection {
        match &self.fields {
            Some(fields) => FieldSelection::from_fields(fields.as_slice()),
            None => FieldSelection::All,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextSearchRequest {
    pub query: String,
    pub location: Option<LatLng>,
    pub radius: Option<f64>,
    pub bounds: Option<LatLngBounds>,
    pub location_bias: Option<LocationBias>,
    pub language: Option<String>,
    pub region: Option<String>,
}

impl TextSearchRequest {
    pub fn location_query(&self) -> LocationQuery {
        LocationQuery {
            location_bias: self.location_bias.clone(),
            bounds: self.bounds,
            location: self.location,
        }
    }
}

/// Options for place predictions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutocompletionRequest {
    pub input: String,
    pub location_bias: Option<LocationBias>,
    pub location_restriction: Option<LatLngBounds>,
    /// Superseded by `location_bias`, still honoured
    pub bounds: Option<LatLngBounds>,
    /// Superseded by `location_bias`, still honoured
    pub location: Option<LatLng>,
    pub radius: Option<f64>,
    pub language: Option<String>,
}

impl AutocompletionRequest {
    pub fn location_query(&self) -> LocationQuery {
        LocationQuery {
            location_bias: self.location_bias.clone(),
            bounds: self.location_restriction.or(self.bounds),
            location: self.location,
        }
    }
}

/// Options for query predictions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryAutocompletionRequest {
    pub input: String,
    pub bounds: Option<LatLngBounds>,
    pub location: Option<LatLng>,
    pub radius: Option<f64>,
    pub language: Option<String>,
}

impl QueryAutocompletionRequest {
    pub fn location_query(&self) -> LocationQuery {
        LocationQuery {
            location_bias: None,
            bounds: self.bounds,
            location: self.location,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionTerm {
    pub offset: usize,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFormatting {
    pub main_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompletePrediction {
    pub description: String,
    pub place_id: String,
    pub terms: Vec<PredictionTerm>,
    pub structured_formatting: StructuredFormatting,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAutocompletePrediction {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub terms: Vec<PredictionTerm>,
}

/// Split a label into comma-separated terms with their byte offsets
fn terms(description: &str) -> Vec<PredictionTerm> {
    let mut offset = 0;
    let mut terms = Vec::new();
    for segment in description.split(',') {
        let trimmed = segment.trim_start();
        let start = offset + (segment.len() - trimmed.len());
        if !trimmed.is_empty() {
            terms.push(PredictionTerm {
                offset: start,
                value: trimmed.trim_end().to_string(),
            });
        }
        offset += segment.len() + 1;
    }
    terms
}

/// Translate a suggestion into a place prediction. Suggestions without an
/// identifier can't be turned into one.
pub fn place_prediction(suggestion: &SuggestionResult) -> Option<AutocompletePrediction> {
    let place_id = suggestion.place_id.clone()?;
    let description = suggestion.text.clone();
    let main_text = place_name(&description).trim().to_string();
    let secondary_text = description
        .split_once(',')
        .map(|(_, rest)| rest.trim().to_string())
        .filter(|rest| !rest.is_empty());
    Some(AutocompletePrediction {
        terms: terms(&description),
        structured_formatting: StructuredFormatting {
            main_text,
            secondary_text,
        },
        types: suggestion.categories.clone(),
        place_id,
        description,
    })
}

pub fn query_prediction(suggestion: &SuggestionResult) -> QueryAutocompletePrediction {
    QueryAutocompletePrediction {
        description: suggestion.text.clone(),
        place_id: suggestion.place_id.clone(),
        terms: terms(&suggestion.text),
    }
}
