use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::TransportError,
    model::{Query, WeatherRecord},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Raw HTTP outcome handed back to the pipeline for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport seam between the fetch pipeline and a weather API.
///
/// `current` performs exactly one round trip and must not interpret the
/// status; `normalize` turns a success body into a validated record.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &Query) -> Result<RawResponse, TransportError>;

    /// Parse and validate a success body. The error is a diagnostic detail.
    fn normalize(&self, body: &str) -> Result<WeatherRecord, String>;
}
