//! Core library for the `weatherdash` client.
//!
//! This crate defines:
//! - Configuration, unit helpers and the condition-code table
//! - A time-boxed cache of weather records
//! - The provider seam and its OpenWeather implementation
//! - The fetch pipeline (`WeatherService`) and an optional retry wrapper
//!
//! It is used by `weatherdash-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod conditions;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod retry;
pub mod service;
pub mod units;

pub use cache::CacheStore;
pub use config::{Config, Messages};
pub use error::{ErrorKind, FetchError};
pub use model::{Condition, FetchOutcome, Query, WeatherRecord};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use retry::{RetryPolicy, fetch_with_retry};
pub use service::WeatherService;
pub use units::Units;
