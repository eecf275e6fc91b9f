use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system requested from the provider (`units=` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    /// Kelvin and m/s, the provider's raw defaults.
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        match self {
            Units::Metric => TemperatureUnit::Celsius,
            Units::Imperial => TemperatureUnit::Fahrenheit,
            Units::Standard => TemperatureUnit::Kelvin,
        }
    }

    pub fn speed_unit(&self) -> SpeedUnit {
        match self {
            Units::Imperial => SpeedUnit::MilesPerHour,
            Units::Metric | Units::Standard => SpeedUnit::MetersPerSecond,
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" | "kelvin" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial, standard."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    MetersPerSecond,
    MilesPerHour,
    KilometersPerHour,
}

impl SpeedUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::MilesPerHour => "mph",
            SpeedUnit::KilometersPerHour => "km/h",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressureUnit {
    #[default]
    Hectopascal,
    InchesOfMercury,
    MillimetersOfMercury,
}

impl PressureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PressureUnit::Hectopascal => "hPa",
            PressureUnit::InchesOfMercury => "inHg",
            PressureUnit::MillimetersOfMercury => "mmHg",
        }
    }
}

const MPS_PER_MPH: f64 = 0.44704;

pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    if from == to {
        return value;
    }

    let celsius = match from {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        TemperatureUnit::Kelvin => value - 273.15,
    };

    match to {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        TemperatureUnit::Kelvin => celsius + 273.15,
    }
}

pub fn convert_wind_speed(value: f64, from: SpeedUnit, to: SpeedUnit) -> f64 {
    if from == to {
        return value;
    }

    let mps = match from {
        SpeedUnit::MetersPerSecond => value,
        SpeedUnit::MilesPerHour => value * MPS_PER_MPH,
        SpeedUnit::KilometersPerHour => value / 3.6,
    };

    match to {
        SpeedUnit::MetersPerSecond => mps,
        SpeedUnit::MilesPerHour => mps / MPS_PER_MPH,
        SpeedUnit::KilometersPerHour => mps * 3.6,
    }
}

/// Convert a pressure reading given in hPa.
pub fn convert_pressure(hpa: f64, to: PressureUnit) -> f64 {
    match to {
        PressureUnit::Hectopascal => hpa,
        PressureUnit::InchesOfMercury => hpa * 0.02953,
        PressureUnit::MillimetersOfMercury => hpa * 0.75006,
    }
}

pub fn format_temperature(value: f64, unit: TemperatureUnit, decimals: usize) -> String {
    format!("{value:.decimals$}{}", unit.symbol())
}

pub fn format_wind_speed(value: f64, unit: SpeedUnit, decimals: usize) -> String {
    format!("{value:.decimals$} {}", unit.symbol())
}

/// inHg readings are always shown with two decimals.
pub fn format_pressure(hpa: f64, unit: PressureUnit, decimals: usize) -> String {
    let decimals = match unit {
        PressureUnit::InchesOfMercury => 2,
        _ => decimals,
    };
    let value = convert_pressure(hpa, unit);
    format!("{value:.decimals$} {}", unit.symbol())
}
