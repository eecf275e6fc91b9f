//! Fetch pipeline: validate, consult the cache, race the provider against the
//! request timeout, classify, validate the payload, and populate the cache.

use anyhow::Result;
use std::{sync::Arc, time::Duration};

use crate::{
    cache::CacheStore,
    config::{Config, Messages},
    error::{ErrorKind, FetchError},
    model::{FetchOutcome, Query},
    provider::{OpenWeatherProvider, WeatherProvider},
};

#[derive(Debug)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    cache: CacheStore,
    timeout: Duration,
    messages: Messages,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, config: &Config) -> Self {
        Self {
            provider,
            cache: CacheStore::new(config.cache_duration(), config.features.cache),
            timeout: config.request_timeout(),
            messages: config.messages.clone(),
        }
    }

    /// Service backed by the OpenWeather provider described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = OpenWeatherProvider::from_config(config)?;
        Ok(Self::new(Arc::new(provider), config))
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Look up the weather for `query`, making at most one network round trip.
    ///
    /// The cache is written only on the success path, after the timeout race
    /// has been decided, so an abandoned request can never populate it.
    pub async fn fetch_weather(&self, query: &Query) -> FetchOutcome {
        if let Err(reason) = query.validate() {
            tracing::debug!(%query, %reason, "rejecting query");
            return Err(self.fail(ErrorKind::InvalidInput));
        }

        let key = query.cache_key();

        if let Some(key) = key.as_deref() {
            if let Some(record) = self.cache.get(key) {
                tracing::debug!(key, "cache hit");
                return Ok(record);
            }
            if self.cache.is_enabled() {
                tracing::debug!(key, "cache miss");
            }
        }

        let response = match tokio::time::timeout(self.timeout, self.provider.current(query)).await
        {
            Err(_elapsed) => {
                tracing::warn!(%query, timeout = ?self.timeout, "request timed out");
                return Err(self.fail(ErrorKind::Timeout));
            }
            Ok(Err(err)) => {
                tracing::warn!(%query, error = %err, "transport failure");
                return Err(self.fail(ErrorKind::NetworkUnavailable));
            }
            Ok(Ok(response)) => response,
        };

        if !response.is_success() {
            let kind = ErrorKind::from_status(response.status);
            tracing::warn!(%query, status = response.status, %kind, "upstream rejected request");
            return Err(self.fail(kind));
        }

        let record = match self.provider.normalize(&response.body) {
            Ok(record) => record,
            Err(detail) => {
                tracing::warn!(%query, %detail, "invalid weather payload");
                return Err(self.fail(ErrorKind::MalformedResponse));
            }
        };

        if let Some(key) = key {
            self.cache.put(key, record.clone());
        }

        tracing::info!(location = %record.display_name(), "weather fetched");
        Ok(record)
    }

    /// Drop any cached record for `place` and fetch it again.
    pub async fn refresh(&self, place: &str) -> FetchOutcome {
        let query = Query::place(place);
        if let Some(key) = query.cache_key() {
            self.cache.invalidate(&key);
        }
        self.fetch_weather(&query).await
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("cache cleared");
    }

    fn fail(&self, kind: ErrorKind) -> FetchError {
        FetchError::new(kind, self.messages.for_kind(kind))
    }
}
