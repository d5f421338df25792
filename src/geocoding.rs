//! Geocoder request resolution and result translation.
use crate::geometry::{LatLng, LatLngBounds};
use crate::shared::location::Place;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeocoderRequest {
    pub address: Option<String>,
    pub location: Option<LatLng>,
    pub place_id: Option<String>,
    /// Only used as a bias for `address` lookups
    pub bounds: Option<LatLngBounds>,
    pub language: Option<String>,
    pub region: Option<String>,
}

/// What a geocoder request resolves to, and therefore which backend call it
/// turns into
#[derive(Clone, Debug, PartialEq)]
pub enum GeocodeTarget {
    Location(LatLng),
    PlaceId(String),
    Address {
        text: String,
        bias_position: Option<[f64; 2]>,
    },
}

impl GeocoderRequest {
    /// Pick the lookup: coordinate, then place identifier, then address.
    ///
    /// A non-finite coordinate counts as absent. Bounds given with an address
    /// degrade to a bias on their center.
    pub fn target(&self) -> Option<GeocodeTarget> {
        if let Some(location) = self.location.filter(LatLng::is_finite) {
            return Some(GeocodeTarget::Location(location));
        }
        if let Some(place_id) = self.place_id.as_ref().filter(|id| !id.is_empty()) {
            return Some(GeocodeTarget::PlaceId(place_id.clone()));
        }
        let text = self.address.as_ref().filter(|text| !text.trim().is_empty())?;
        let bias_position = self
            .bounds
            .filter(|bounds| !bounds.is_empty())
            .map(|bounds| bounds.get_center())
            .filter(LatLng::is_finite)
            .map(|center| center.to_position());
        Some(GeocodeTarget::Address {
            text: text.clone(),
            bias_position,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Rooftop,
    RangeInterpolated,
    GeometricCenter,
    Approximate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeocoderGeometry {
    pub location: LatLng,
    pub location_type: LocationType,
    pub viewport: LatLngBounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<LatLngBounds>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeocoderResult {
    pub formatted_address: String,
    pub geometry: GeocoderGeometry,
    pub place_id: String,
    pub types: Vec<String>,
    pub address_components: Vec<AddressComponent>,
    pub partial_match: bool,
}

/// The resolved value of a successful geocode
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeocoderResponse {
    pub results: Vec<GeocoderResult>,
}

fn component(value: &Option<String>, types: &[&str]) -> Option<AddressComponent> {
    value.as_ref().map(|value| AddressComponent {
        long_name: value.clone(),
        short_name: value.clone(),
        types: types.iter().map(|t| t.to_string()).collect(),
    })
}

/// Address parts of a record, most specific first
pub fn address_components(place: &Place) -> Vec<AddressComponent> {
    [
        component(&place.address_number, &["street_number"]),
        component(&place.street, &["route"]),
        component(&place.neighborhood, &["neighborhood", "political"]),
        component(&place.municipality, &["locality", "political"]),
        component(
            &place.sub_region,
            &["administrative_area_level_2", "political"],
        ),
        component(&place.region, &["administrative_area_level_1", "political"]),
        component(&place.country, &["country", "political"]),
        component(&place.postal_code, &["postal_code"]),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn location_type(place: &Place) -> LocationType {
    match (&place.address_number, &place.street, place.interpolated) {
        (Some(_), _, Some(true)) => LocationType::RangeInterpolated,
        (Some(_), _, _) => LocationType::Rooftop,
        (None, Some(_), _) => LocationType::GeometricCenter,
        _ => LocationType::Approximate,
    }
}

/// Translate one backend record. Records without a point can't be
/// geocoder results.
pub fn translate_place(place_id: Option<&str>, place: &Place) -> Option<GeocoderResult> {
    let location = LatLng::from_position(place.geometry.point?);
    let bounds = place.geometry.bounding_box.map(LatLngBounds::from_bbox);
    let viewport = bounds.unwrap_or_else(|| LatLngBounds::new(location, location));
    let label = place.label.clone().unwrap_or_default();
    let mut types = place.categories.clone();
    if types.is_empty() && place.address_number.is_some() {
        types.push("street_address".to_string());
    }
    Some(GeocoderResult {
        formatted_address: label,
        geometry: GeocoderGeometry {
            location,
            location_type: location_type(place),
            viewport,
            bounds,
        },
        place_id: place_id.unwrap_or_default().to_string(),
        types,
        address_components: address_components(place),
        partial_match: false,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::location::PlaceGeometry;

    #[test]
    fn coordinate_wins_over_place_id_and_address() {
        let request = GeocoderRequest {
            address: Some("Main St".to_string()),
            location: Some(LatLng::new(1.0, 2.0)),
            place_id: Some("id".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.target(),
            Some(GeocodeTarget::Location(LatLng::new(1.0, 2.0)))
        );
    }

    #[test]
    fn nan_coordinate_falls_through() {
        let request = GeocoderRequest {
            location: Some(LatLng::nan()),
            place_id: Some("id".to_string()),
            ..Default::default()
        };
        assert_eq!(request.target(), Some(GeocodeTarget::PlaceId("id".to_string())));
    }

    #[test]
    fn bounds_degrade_to_center_bias() {
        let request = GeocoderRequest {
            address: Some("Main St".to_string()),
            bounds: Some(LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(2.0, 4.0))),
            ..Default::default()
        };
        assert_eq!(
            request.target(),
            Some(GeocodeTarget::Address {
                text: "Main St".to_string(),
                bias_position: Some([2.0, 1.0]),
            })
        );
    }

    #[test]
    fn empty_request_has_no_target() {
        assert_eq!(GeocoderRequest::default().target(), None);
        let blank = GeocoderRequest {
            address: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.target(), None);
    }

    #[test]
    fn translates_record() {
        let place = Place {
            label: Some("85 Pike St, Seattle, WA, USA".to_string()),
            geometry: PlaceGeometry {
                point: Some([-122.34, 47.61]),
                bounding_box: None,
            },
            address_number: Some("85".to_string()),
            street: Some("Pike St".to_string()),
            municipality: Some("Seattle".to_string()),
            country: Some("USA".to_string()),
            ..Default::default()
        };
        let result = translate_place(Some("pid"), &place).unwrap();
        assert_eq!(result.formatted_address, "85 Pike St, Seattle, WA, USA");
        assert_eq!(result.place_id, "pid");
        assert_eq!(result.geometry.location, LatLng::new(47.61, -122.34));
        assert_eq!(result.geometry.location_type, LocationType::Rooftop);
        assert!(result.geometry.viewport.contains(&LatLng::new(47.61, -122.34)));
        assert_eq!(result.types, vec!["street_address".to_string()]);
        let kinds: Vec<&str> = result
            .address_components
            .iter()
            .map(|c| c.types[0].as_str())
            .collect();
        assert_eq!(kinds, vec!["street_number", "route", "locality", "country"]);
    }

    #[test]
    fn record_without_point_is_skipped() {
        assert!(translate_place(Some("pid"), &Place::default()).is_none());
    }
}
