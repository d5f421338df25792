use crate::async_impl::{deliver_one, rejected, Callback, ServiceContext};
use crate::directions::{
    is_measurable, translate_route, DirectionsEndpoint, DirectionsRequest, DirectionsResult,
    TravelMode, MAX_WAYPOINTS,
};
use crate::error::ServiceError;
use crate::geometry::DEFAULT_PRECISION;
use crate::shared::location::{
    CalculateRouteRequest, CarModeOptions, GetPlaceRequest, SearchPlaceIndexForTextRequest,
};
use crate::status::DirectionsStatus;

/// An endpoint resolved to a backend position
struct Stop {
    position: [f64; 2],
    address: String,
}

/// Route calculation between two or more endpoints
#[derive(Clone, Debug)]
pub struct DirectionsService {
    context: ServiceContext,
}

impl DirectionsService {
    pub fn new(context: ServiceContext) -> DirectionsService {
        DirectionsService { context }
    }

    /// Calculate a route.
    ///
    /// Query and place-identifier endpoints are resolved with one lookup each
    /// before the route itself is calculated.
    pub async fn route(
        &self,
        request: &DirectionsRequest,
        callback: Option<Callback<Option<DirectionsResult>, DirectionsStatus>>,
    ) -> Result<DirectionsResult, ServiceError<DirectionsStatus>> {
        let outcome = self.calculate(request).await;
        deliver_one(callback, outcome)
    }

    async fn resolve(&self, endpoint: &DirectionsEndpoint) -> Result<Stop, DirectionsStatus> {
        let backend = self.context.backend();
        match endpoint {
            DirectionsEndpoint::LatLng(point) | DirectionsEndpoint::Location(point) => {
                if !point.is_finite() {
                    log::warn!("directions endpoint {} is not a usable coordinate", point);
                    return Err(DirectionsStatus::InvalidRequest);
                }
                Ok(Stop {
                    position: point.to_position(),
                    address: point.to_url_value(DEFAULT_PRECISION),
                })
            }
            DirectionsEndpoint::Query(text) => {
                let response = backend
                    .search_place_index_for_text(&SearchPlaceIndexForTextRequest {
                        index_name: self.context.place_index().to_string(),
                        text: text.clone(),
                        language: self.context.language(&None),
                        max_results: Some(1),
                        ..Default::default()
                    })
                    .await
                    .map_err(|e| rejected::<DirectionsStatus>("SearchPlaceIndexForText", e))?;
                let place = response
                    .results
                    .into_iter()
                    .next()
                    .map(|result| result.place)
                    .ok_or(DirectionsStatus::NotFound)?;
                let position = place.geometry.point.ok_or(DirectionsStatus::NotFound)?;
                Ok(Stop {
                    position,
                    address: place.label.unwrap_or_else(|| text.clone()),
                })
            }
            DirectionsEndpoint::PlaceId(place_id) => {
                let response = backend
                    .get_place(&GetPlaceRequest {
                        index_name: self.context.place_index().to_string(),
                        place_id: place_id.clone(),
                        language: self.context.language(&None),
                    })
                    .await
                    .map_err(|e| rejected::<DirectionsStatus>("GetPlace", e))?;
                let position = response.place.geometry.point.ok_or(DirectionsStatus::NotFound)?;
                Ok(Stop {
                    position,
                    address: response.place.label.unwrap_or_default(),
                })
            }
        }
    }

    async fn calculate(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResult, DirectionsStatus> {
        if request.waypoints.len() > MAX_WAYPOINTS {
            return Err(DirectionsStatus::MaxWaypointsExceeded);
        }
        let travel_mode = request.travel_mode.to_backend().ok_or_else(|| {
            log::debug!("travel mode {:?} can't be routed", request.travel_mode);
            DirectionsStatus::InvalidRequest
        })?;

        let mut stops = Vec::with_capacity(request.waypoints.len() + 2);
        stops.push(self.resolve(&request.origin).await?);
        for waypoint in &request.waypoints {
            stops.push(self.resolve(&waypoint.location).await?);
        }
        stops.push(self.resolve(&request.destination).await?);

        let car_mode_options = match request.travel_mode {
            TravelMode::Driving if request.avoid_ferries || request.avoid_tolls => {
                Some(CarModeOptions {
                    avoid_ferries: request.avoid_ferries,
                    avoid_tolls: request.avoid_tolls,
                })
            }
            _ => None,
        };
        let last = stops.len() - 1;
        let response = self
            .context
            .backend()
            .calculate_route(&CalculateRouteRequest {
                calculator_name: self.context.route_calculator().to_string(),
                departure_position: stops[0].position,
                destination_position: stops[last].position,
                waypoint_positions: stops[1..last].iter().map(|stop| stop.position).collect(),
                travel_mode: Some(travel_mode.to_string()),
                include_leg_geometry: true,
                distance_unit: Some(request.unit_system.to_backend().to_string()),
                departure_time: request.departure_time,
                car_mode_options,
            })
            .await
            .map_err(|e| rejected::<DirectionsStatus>("CalculateRoute", e))?;
        if response.legs.is_empty() {
            return Err(DirectionsStatus::ZeroResults);
        }
        if !is_measurable(&response) {
            log::warn!("CalculateRoute returned an unusable distance or duration");
            return Err(DirectionsStatus::UnknownError);
        }

        let mut route = translate_route(&response, request.travel_mode, request.unit_system);
        if route.legs.len() == last {
            for (leg, pair) in route.legs.iter_mut().zip(stops.windows(2)) {
                leg.start_address = pair[0].address.clone();
                leg.end_address = pair[1].address.clone();
            }
        }
        Ok(DirectionsResult {
            request: Some(request.clone()),
            routes: vec![route],
        })
    }
}
