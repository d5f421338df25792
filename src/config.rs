use serde::{Deserialize, Serialize};

static DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for the location service
///
/// # Example:
///
/// ```
/// use location_compat::ServiceConfig;
///
/// let config = ServiceConfig::new("explore.place", "explore.route-calculator")
///     .with_region("eu-west-1")
///     .with_api_key("v1.public.key")
///     .build();
/// assert_eq!(config.places_endpoint(), "https://places.geo.eu-west-1.amazonaws.com");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    pub place_index: String,
    pub route_calculator: String,
    pub region: Option<String>,
    pub api_key: Option<String>,
    pub places_endpoint: Option<String>,
    pub routes_endpoint: Option<String>,
    /// Language applied to requests that don't name one
    pub language: Option<String>,
}

impl ServiceConfig {
    pub fn new(place_index: &str, route_calculator: &str) -> ServiceConfig {
        ServiceConfig {
            place_index: place_index.to_string(),
            route_calculator: route_calculator.to_string(),
            ..Default::default()
        }
    }

    /// Read a configuration from its JSON form
    pub fn from_json(json: &str) -> Result<ServiceConfig, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the `region` property
    pub fn with_region(&mut self, region: &str) -> &mut Self {
        self.region = Some(region.to_string());
        self
    }

    /// Set the `api_key` property
    pub fn with_api_key(&mut self, api_key: &str) -> &mut Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Override the place search endpoint (no trailing slash)
    pub fn with_places_endpoint(&mut self, endpoint: &str) -> &mut Self {
        self.places_endpoint = Some(endpoint.to_string());
        self
    }

    /// Override the route calculation endpoint (no trailing slash)
    pub fn with_routes_endpoint(&mut self, endpoint: &str) -> &mut Self {
        self.routes_endpoint = Some(endpoint.to_string());
        self
    }

    /// Set the `language` property
    pub fn with_language(&mut self, language: &str) -> &mut Self {
        self.language = Some(language.to_string());
        self
    }

    /// Build and return an instance of ServiceConfig
    pub fn build(&self) -> ServiceConfig {
        self.clone()
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn places_endpoint(&self) -> String {
        match &self.places_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://places.geo.{}.amazonaws.com", self.region()),
        }
    }

    pub fn routes_endpoint(&self) -> String {
        match &self.routes_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://routes.geo.{}.amazonaws.com", self.region()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_to_regional_endpoints() {
        let config = ServiceConfig::new("index", "calculator");
        assert_eq!(config.region(), "us-east-1");
        assert_eq!(
            config.routes_endpoint(),
            "https://routes.geo.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn overrides_drop_trailing_slash() {
        let config = ServiceConfig::new("index", "calculator")
            .with_places_endpoint("http://localhost:8080/")
            .build();
        assert_eq!(config.places_endpoint(), "http://localhost:8080");
    }

    #[test]
    fn loads_from_json() {
        let config = ServiceConfig::from_json(
            r#"{ "placeIndex": "index", "routeCalculator": "calc", "apiKey": "k", "language": "fr" }"#,
        )
        .unwrap();
        assert_eq!(config.place_index, "index");
        assert_eq!(config.route_calculator, "calc");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.language.as_deref(), Some("fr"));
        assert!(config.region.is_none());
    }
}
