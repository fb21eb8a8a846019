//! Core library for the `wxlookup` weather tool.
//!
//! This crate defines:
//! - The lookup pipeline: IP location, geocoding, hourly forecast, current-hour selection
//! - Weather-code classification
//! - Configuration handling
//! - Shared domain models (queries, snapshots) and the error taxonomy
//!
//! It is used by `wxlookup-cli`, but any frontend can call [`WeatherLookup::resolve`] and
//! render the returned [`WeatherSnapshot`] however it likes.

pub mod condition;
pub mod config;
pub mod error;
pub mod hourly;
pub mod model;
pub mod provider;

pub use condition::Condition;
pub use config::{Config, Endpoints};
pub use error::LookupError;
pub use hourly::{HourFallback, HourlySeries};
pub use model::{GeocodeResult, LocationQuery, WeatherSnapshot};
pub use provider::{WeatherLookup, lookup_from_config, openmeteo::OpenMeteoLookup};
