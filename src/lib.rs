//! This crate provides a maps, places, geocoding and directions surface shaped like the
//! familiar web mapping API, implemented over a substitute map rendering engine and a
//! substitute location service.
//!
//! The surface has two halves. Map objects ([`Map`], [`Marker`], [`InfoWindow`] and the
//! [`DirectionsRenderer`]) wrap handles of a [`RenderingEngine`](engine::RenderingEngine)
//! and translate state, options and events in both directions. Services ([`Geocoder`],
//! [`PlacesService`], [`AutocompleteService`] and [`DirectionsService`]) translate requests
//! into calls on a [`LocationBackend`](async_impl::LocationBackend) and translate the
//! responses back, delivering each outcome through an optional callback and through the
//! returned future.
//!
//! ### A note on Coordinate Order
//! The public surface speaks `(lat, lng)` through [`LatLng`]. The engine and the location
//! service both expect `[Longitude, Latitude]` (`x, y`); the conversion happens at the
//! boundary and nowhere else.
//!
//! ### Usage of rustls
//!
//! If you like to use [rustls](https://github.com/ctz/rustls) instead of OpenSSL
//! you can enable the `rustls-tls` feature in your `Cargo.toml`:
//!
//!```toml
//![dependencies]
//!location-compat = { version = "*", default-features = false, features = ["rustls-tls"] }
//!```

// Coordinates, bounds and their literal forms
pub mod geometry;
pub use crate::geometry::{LatLng, LatLngBounds, LatLngBoundsLiteral, LatLngLiteral};

// Status vocabularies of the services
pub mod status;
pub use crate::status::{DirectionsStatus, GeocoderStatus, PlacesServiceStatus, ServiceStatus};

pub mod config;
pub use crate::config::ServiceConfig;

pub mod error;
pub use crate::error::{LocationError, ServiceError};

// The rendering engine boundary and the event bridge over it
pub mod engine;
pub mod events;
pub mod vocabulary;
pub use crate::events::{
    add_listener, add_listener_once, remove_listener, EventArgs, MapMouseEvent,
    MapsEventListener,
};
pub use crate::vocabulary::ControlPosition;

pub mod info_window;
pub mod map;
pub mod marker;
pub mod renderer;
pub use crate::info_window::{InfoWindow, InfoWindowOptions};
pub use crate::map::{ControlOptions, Map, MapOptions};
pub use crate::marker::{Marker, MarkerOptions};
pub use crate::renderer::{DirectionsRenderer, DirectionsRendererOptions, PolylineOptions};

// Request and result types of the services
pub mod directions;
pub mod geocoding;
pub mod places;
pub mod shared;

pub mod async_impl;
pub use crate::async_impl::client::LocationClient;
pub use crate::async_impl::directions::DirectionsService;
pub use crate::async_impl::geocoder::Geocoder;
pub use crate::async_impl::places::{AutocompleteService, PlacesService};
pub use crate::async_impl::{Callback, LocationBackend, ServiceContext};

#[cfg(test)]
mod testing;
