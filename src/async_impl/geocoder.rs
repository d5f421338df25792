use crate::async_impl::{deliver_list, rejected, Callback, EmptyResults, ServiceContext};
use crate::error::ServiceError;
use crate::geocoding::{
    translate_place, GeocodeTarget, GeocoderRequest, GeocoderResponse, GeocoderResult,
};
use crate::shared::location::{
    GetPlaceRequest, SearchPlaceIndexForPositionRequest, SearchPlaceIndexForTextRequest,
};
use crate::status::GeocoderStatus;

/// Forward, reverse and identifier geocoding
#[derive(Clone, Debug)]
pub struct Geocoder {
    context: ServiceContext,
}

impl Geocoder {
    pub fn new(context: ServiceContext) -> Geocoder {
        Geocoder { context }
    }

    /// Geocode by coordinate, place identifier or address, in that order of
    /// precedence.
    ///
    /// An empty result is `ZERO_RESULTS`; a request with none of the three is
    /// `INVALID_REQUEST`.
    pub async fn geocode(
        &self,
        request: &GeocoderRequest,
        callback: Option<Callback<Vec<GeocoderResult>, GeocoderStatus>>,
    ) -> Result<GeocoderResponse, ServiceError<GeocoderStatus>> {
        let outcome = self.lookup(request).await;
        deliver_list(callback, outcome).map(|results| GeocoderResponse { results })
    }

    async fn lookup(
        &self,
        request: &GeocoderRequest,
    ) -> Result<Vec<GeocoderResult>, GeocoderStatus> {
        let target = request.target().ok_or(GeocoderStatus::InvalidRequest)?;
        let backend = self.context.backend();
        let index_name = self.context.place_index().to_string();
        let language = self.context.language(&request.language);

        let results: Vec<GeocoderResult> = match target {
            GeocodeTarget::Location(location) => {
                let response = backend
                    .search_place_index_for_position(&SearchPlaceIndexForPositionRequest {
                        index_name,
                        position: location.to_position(),
                        language,
                        max_results: None,
                    })
                    .await
                    .map_err(|e| rejected::<GeocoderStatus>("SearchPlaceIndexForPosition", e))?;
                response
                    .results
                    .iter()
                    .filter_map(|result| translate_place(result.place_id.as_deref(), &result.place))
                    .collect()
            }
            GeocodeTarget::PlaceId(place_id) => {
                let response = backend
                    .get_place(&GetPlaceRequest {
                        index_name,
                        place_id: place_id.clone(),
                        language,
                    })
                    .await
                    .map_err(|e| rejected::<GeocoderStatus>("GetPlace", e))?;
                translate_place(Some(place_id.as_str()), &response.place)
                    .into_iter()
                    .collect()
            }
            GeocodeTarget::Address {
                text,
                bias_position,
            } => {
                let response = backend
                    .search_place_index_for_text(&SearchPlaceIndexForTextRequest {
                        index_name,
                        text,
                        bias_position,
                        language,
                        ..Default::default()
                    })
                    .await
                    .map_err(|e| rejected::<GeocoderStatus>("SearchPlaceIndexForText", e))?;
                response
                    .results
                    .iter()
                    .filter_map(|result| translate_place(result.place_id.as_deref(), &result.place))
                    .collect()
            }
        };
        EmptyResults::ZeroResults.apply(results)
    }
}
