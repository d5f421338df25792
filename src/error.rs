use std::fmt;
use thiserror::Error;

/// Errors that can occur while talking to the location service
#[derive(Error, Debug)]
pub enum LocationError {
    #[error("HTTP request error")]
    Request(#[from] reqwest::Error),
    #[error("Malformed response")]
    Json(#[from] serde_json::Error),
    #[error("Invalid service endpoint `{0}`")]
    Endpoint(String),
    #[error("{operation} returned an empty body")]
    EmptyResponse { operation: &'static str },
    #[error("{operation} was rejected: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
}

/// The rejection value of a service facade: the source API status code.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("request failed with status {status}")]
pub struct ServiceError<S>
where
    S: fmt::Debug + fmt::Display,
{
    pub status: S,
}

impl<S> ServiceError<S>
where
    S: fmt::Debug + fmt::Display,
{
    pub fn new(status: S) -> Self {
        ServiceError { status }
    }
}
