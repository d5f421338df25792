use crate::async_impl::LocationBackend;
use crate::config::ServiceConfig;
use crate::error::LocationError;
use crate::shared::location::{
    CalculateRouteRequest, CalculateRouteResponse, GetPlaceRequest, GetPlaceResponse,
    SearchPlaceIndexForPositionRequest, SearchPlaceIndexForSuggestionsRequest,
    SearchPlaceIndexForSuggestionsResponse, SearchPlaceIndexForTextRequest,
    SearchPlaceIndexResponse,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

static UA_STRING: &str = "Rust-Location-Compat";

/// The location service over HTTPS
pub struct LocationClient {
    client: reqwest::Client,
    places_endpoint: Url,
    routes_endpoint: Url,
    api_key: Option<String>,
}

fn parse_endpoint(endpoint: &str) -> Result<Url, LocationError> {
    let url = Url::parse(endpoint).map_err(|_| LocationError::Endpoint(endpoint.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(LocationError::Endpoint(endpoint.to_string()));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one
fn join(base: &Url, segments: &[&str]) -> Result<Url, LocationError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| LocationError::Endpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn decode<R: DeserializeOwned>(operation: &'static str, body: &[u8]) -> Result<R, LocationError> {
    if body.is_empty() {
        return Err(LocationError::EmptyResponse { operation });
    }
    Ok(serde_json::from_slice(body)?)
}

/// Turn an error-status response into a rejection carrying the service message
fn rejection(operation: &'static str, status: StatusCode, body: &[u8]) -> LocationError {
    let from_json = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("Message"))
                .and_then(|message| message.as_str().map(str::to_string))
        });
    let message = from_json.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body).trim().to_string();
        if text.is_empty() {
            status.to_string()
        } else {
            text
        }
    });
    LocationError::Rejected { operation, message }
}

impl LocationClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, LocationError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(UA_STRING));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(LocationClient {
            client,
            places_endpoint: parse_endpoint(&config.places_endpoint())?,
            routes_endpoint: parse_endpoint(&config.routes_endpoint())?,
            api_key: config.api_key.clone(),
        })
    }

    fn place_index_url(&self, index: &str, tail: &[&str]) -> Result<Url, LocationError> {
        let mut segments = vec!["places", "v0", "indexes", index];
        segments.extend_from_slice(tail);
        join(&self.places_endpoint, &segments)
    }

    fn calculator_url(&self, calculator: &str) -> Result<Url, LocationError> {
        join(
            &self.routes_endpoint,
            &["routes", "v0", "calculators", calculator, "calculate", "route"],
        )
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn send<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<R, LocationError> {
        let resp = self.with_key(request).send().await?;
        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let body = resp.bytes().await?;
            return Err(rejection(operation, status, &body));
        }
        let body = resp.bytes().await?;
        decode(operation, &body)
    }

    async fn post<B, R>(
        &self,
        operation: &'static str,
        url: Url,
        body: &B,
    ) -> Result<R, LocationError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(operation, self.client.post(url).json(body)).await
    }
}

#[async_trait(?Send)]
impl LocationBackend for LocationClient {
    async fn search_place_index_for_position(
        &self,
        request: &SearchPlaceIndexForPositionRequest,
    ) -> Result<SearchPlaceIndexResponse, LocationError> {
        let url = self.place_index_url(&request.index_name, &["search", "position"])?;
        self.post("SearchPlaceIndexForPosition", url, request).await
    }

    async fn search_place_index_for_text(
        &self,
        request: &SearchPlaceIndexForTextRequest,
    ) -> Result<SearchPlaceIndexResponse, LocationError> {
        let url = self.place_index_url(&request.index_name, &["search", "text"])?;
        self.post("SearchPlaceIndexForText", url, request).await
    }

    async fn search_place_index_for_suggestions(
        &self,
        request: &SearchPlaceIndexForSuggestionsRequest,
    ) -> Result<SearchPlaceIndexForSuggestionsResponse, LocationError> {
        let url = self.place_index_url(&request.index_name, &["search", "suggestions"])?;
        self.post("SearchPlaceIndexForSuggestions", url, request).await
    }

    async fn get_place(
        &self,
        request: &GetPlaceRequest,
    ) -> Result<GetPlaceResponse, LocationError> {
        let url = self.place_index_url(&request.index_name, &["places", &request.place_id])?;
        let mut get = self.client.get(url);
        if let Some(language) = &request.language {
            get = get.query(&[("language", language)]);
        }
        self.send("GetPlace", get).await
    }

    async fn calculate_route(
        &self,
        request: &CalculateRouteRequest,
    ) -> Result<CalculateRouteResponse, LocationError> {
        let url = self.calculator_url(&request.calculator_name)?;
        self.post("CalculateRoute", url, request).await
    }
}
