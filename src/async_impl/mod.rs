//! Asynchronous service facades and the backend they talk to.
//!
//! Every facade operation delivers its outcome twice: through an optional
//! callback receiving `(results, status)`, and through the returned future,
//! which resolves to the results or fails with a [`ServiceError`] carrying the
//! status. The callback always runs before the future completes.
use crate::config::ServiceConfig;
use crate::error::{LocationError, ServiceError};
use crate::shared::location::{
    CalculateRouteRequest, CalculateRouteResponse, GetPlaceRequest, GetPlaceResponse,
    SearchPlaceIndexForPositionRequest, SearchPlaceIndexForSuggestionsRequest,
    SearchPlaceIndexForSuggestionsResponse, SearchPlaceIndexForTextRequest,
    SearchPlaceIndexResponse,
};
use crate::status::ServiceStatus;
use async_trait::async_trait;
use std::fmt;
use std::rc::Rc;

pub mod client;
pub mod directions;
pub mod geocoder;
pub mod places;

/// The geospatial query service behind the facades
#[async_trait(?Send)]
pub trait LocationBackend {
    async fn search_place_index_for_position(
        &self,
        request: &SearchPlaceIndexForPositionRequest,
    ) -> Result<SearchPlaceIndexResponse, LocationError>;

    async fn search_place_index_for_text(
        &self,
        request: &SearchPlaceIndexForTextRequest,
    ) -> Result<SearchPlaceIndexResponse, LocationError>;

    async fn search_place_index_for_suggestions(
        &self,
        request: &SearchPlaceIndexForSuggestionsRequest,
    ) -> Result<SearchPlaceIndexForSuggestionsResponse, LocationError>;

    async fn get_place(&self, request: &GetPlaceRequest) -> Result<GetPlaceResponse, LocationError>;

    async fn calculate_route(
        &self,
        request: &CalculateRouteRequest,
    ) -> Result<CalculateRouteResponse, LocationError>;
}

/// A backend plus the resource names the facades query
#[derive(Clone)]
pub struct ServiceContext {
    backend: Rc<dyn LocationBackend>,
    place_index: String,
    route_calculator: String,
    language: Option<String>,
}

impl ServiceContext {
    pub fn new(
        backend: Rc<dyn LocationBackend>,
        place_index: &str,
        route_calculator: &str,
    ) -> ServiceContext {
        ServiceContext {
            backend,
            place_index: place_index.to_string(),
            route_calculator: route_calculator.to_string(),
            language: None,
        }
    }

    /// A context backed by the HTTP client
    pub fn from_config(config: &ServiceConfig) -> Result<ServiceContext, LocationError> {
        let client = client::LocationClient::new(config)?;
        let mut context = ServiceContext::new(
            Rc::new(client),
            &config.place_index,
            &config.route_calculator,
        );
        context.language = config.language.clone();
        Ok(context)
    }

    /// Language applied to requests that don't name one
    pub fn with_language(mut self, language: &str) -> ServiceContext {
        self.language = Some(language.to_string());
        self
    }

    pub fn backend(&self) -> &dyn LocationBackend {
        self.backend.as_ref()
    }

    pub fn place_index(&self) -> &str {
        &self.place_index
    }

    pub fn route_calculator(&self) -> &str {
        &self.route_calculator
    }

    pub(crate) fn language(&self, requested: &Option<String>) -> Option<String> {
        requested.clone().or_else(|| self.language.clone())
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("place_index", &self.place_index)
            .field("route_calculator", &self.route_calculator)
            .field("language", &self.language)
            .finish()
    }
}

/// The callback half of dual delivery
pub type Callback<T, S> = Box<dyn FnOnce(T, S)>;

/// What an operation reports when the backend succeeds with nothing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EmptyResults {
    /// Success with an empty list
    Ok,
    /// `ZERO_RESULTS`
    ZeroResults,
}

impl EmptyResults {
    pub(crate) fn apply<T, S: ServiceStatus>(self, results: Vec<T>) -> Result<Vec<T>, S> {
        if results.is_empty() && self == EmptyResults::ZeroResults {
            Err(S::ZERO_RESULTS)
        } else {
            Ok(results)
        }
    }
}

/// Log a backend failure and map it to `UNKNOWN_ERROR`
pub(crate) fn rejected<S: ServiceStatus>(operation: &str, error: LocationError) -> S {
    log::error!("{} failed: {}", operation, error);
    S::UNKNOWN_ERROR
}

/// Settle a list-valued operation
pub(crate) fn deliver_list<T, S>(
    callback: Option<Callback<Vec<T>, S>>,
    outcome: Result<Vec<T>, S>,
) -> Result<Vec<T>, ServiceError<S>>
where
    T: Clone,
    S: ServiceStatus,
{
    match outcome {
        Ok(results) => {
            if let Some(callback) = callback {
                callback(results.clone(), S::OK);
            }
            Ok(results)
        }
        Err(status) => {
            if let Some(callback) = callback {
                callback(Vec::new(), status);
            }
            Err(ServiceError::new(status))
        }
    }
}

/// Settle a single-valued operation
pub(crate) fn deliver_one<T, S>(
    callback: Option<Callback<Option<T>, S>>,
    outcome: Result<T, S>,
) -> Result<T, ServiceError<S>>
where
    T: Clone,
    S: ServiceStatus,
{
    match outcome {
        Ok(result) => {
            if let Some(callback) = callback {
                callback(Some(result.clone()), S::OK);
            }
            Ok(result)
        }
        Err(status) => {
            if let Some(callback) = callback {
                callback(None, status);
            }
            Err(ServiceError::new(status))
        }
    }
}
