use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, header};
use serde::Deserialize;

use crate::{
    config::Config,
    error::TransportError,
    model::{Condition, Query, WeatherRecord},
    units::Units,
};

use super::{RawResponse, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: Units,
    language: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::Metric,
            language: "en".to_string(),
            http: Client::new(),
        }
    }

    /// Build from configuration; fails when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;

        Ok(Self::new(api_key)
            .with_base_url(&config.api.base_url)
            .with_units(config.api.units)
            .with_language(&config.api.language))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    fn query_params(&self, query: &Query) -> Vec<(&'static str, String)> {
        let mut params = match query {
            Query::Place(name) => vec![("q", name.trim().to_string())],
            Query::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };

        params.push(("units", self.units.as_str().to_string()));
        params.push(("lang", self.language.clone()));
        params
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &Query) -> Result<RawResponse, TransportError> {
        let params = self.query_params(query);
        tracing::debug!(url = %self.base_url, ?params, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .header(header::ACCEPT, "application/json")
            .query(&params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok(RawResponse { status, body })
    }

    fn normalize(&self, body: &str) -> Result<WeatherRecord, String> {
        parse_current(body, self.units)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: Option<u16>,
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
    visibility: Option<f64>,
    clouds: Option<OwClouds>,
}

/// Parse a current-weather body and enforce the record invariants.
pub fn parse_current(body: &str, units: Units) -> Result<WeatherRecord, String> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid JSON: {e}"))?;

    let mut missing = Vec::new();
    let name = parsed.name.filter(|n| !n.trim().is_empty());
    if name.is_none() {
        missing.push("name");
    }
    if parsed.main.is_none() {
        missing.push("main");
    }
    if parsed.weather.as_ref().is_none_or(|w| w.is_empty()) {
        missing.push("weather");
    }
    if parsed.wind.is_none() {
        missing.push("wind");
    }
    if parsed.sys.is_none() {
        missing.push("sys");
    }

    let (Some(name), Some(main), Some(weather), Some(wind), Some(sys)) =
        (name, parsed.main, parsed.weather, parsed.wind, parsed.sys)
    else {
        return Err(format!("missing {}", missing.join(", ")));
    };

    let primary = weather.into_iter().next().ok_or("missing weather")?;
    let description = primary
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or("missing weather[0].description")?;

    let temperature = main.temp.ok_or("missing main.temp")?;
    let feels_like = main.feels_like.ok_or("missing main.feels_like")?;
    let humidity = main.humidity.ok_or("missing main.humidity")?;
    let pressure = main.pressure.ok_or("missing main.pressure")?;
    let wind_speed = wind.speed.ok_or("missing wind.speed")?;

    Ok(WeatherRecord {
        location_name: name,
        country: sys.country.filter(|c| !c.is_empty()),
        condition: Condition {
            id: primary.id.unwrap_or_default(),
            description,
            icon: primary.icon.unwrap_or_default(),
        },
        temperature,
        feels_like,
        humidity_pct: percent(humidity),
        pressure_hpa: pressure,
        wind_speed,
        visibility_m: parsed.visibility.map(|v| v.max(0.0).round() as u32),
        cloudiness_pct: parsed.clouds.and_then(|c| c.all).map(percent).unwrap_or(0),
        sunrise: sys.sunrise.and_then(unix_to_utc),
        sunset: sys.sunset.and_then(unix_to_utc),
        units,
    })
}

fn percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
