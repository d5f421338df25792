//! Status vocabularies surfaced through callbacks and rejected futures.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Members every status vocabulary shares
pub trait ServiceStatus: Copy + fmt::Debug + fmt::Display {
    const OK: Self;
    const UNKNOWN_ERROR: Self;
    const INVALID_REQUEST: Self;
    const ZERO_RESULTS: Self;
    const NOT_FOUND: Self;

    fn as_str(&self) -> &'static str;
}

macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl ServiceStatus for $name {
            const OK: Self = $name::Ok;
            const UNKNOWN_ERROR: Self = $name::UnknownError;
            const INVALID_REQUEST: Self = $name::InvalidRequest;
            const ZERO_RESULTS: Self = $name::ZeroResults;
            const NOT_FOUND: Self = $name::NotFound;

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_enum! {
    /// Status of a geocoding request
    GeocoderStatus {
        Ok => "OK",
        UnknownError => "UNKNOWN_ERROR",
        OverQueryLimit => "OVER_QUERY_LIMIT",
        RequestDenied => "REQUEST_DENIED",
        InvalidRequest => "INVALID_REQUEST",
        ZeroResults => "ZERO_RESULTS",
        NotFound => "NOT_FOUND",
        Error => "ERROR",
    }
}

status_enum! {
    /// Status of a places or autocomplete request
    PlacesServiceStatus {
        Ok => "OK",
        UnknownError => "UNKNOWN_ERROR",
        OverQueryLimit => "OVER_QUERY_LIMIT",
        RequestDenied => "REQUEST_DENIED",
        InvalidRequest => "INVALID_REQUEST",
        ZeroResults => "ZERO_RESULTS",
        NotFound => "NOT_FOUND",
    }
}

status_enum! {
    /// Status of a directions request
    DirectionsStatus {
        Ok => "OK",
        UnknownError => "UNKNOWN_ERROR",
        OverQueryLimit => "OVER_QUERY_LIMIT",
        RequestDenied => "REQUEST_DENIED",
        InvalidRequest => "INVALID_REQUEST",
        ZeroResults => "ZERO_RESULTS",
        NotFound => "NOT_FOUND",
        MaxWaypointsExceeded => "MAX_WAYPOINTS_EXCEEDED",
    }
}
