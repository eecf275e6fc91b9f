//! OpenWeather condition codes.
//!
//! See <https://openweathermap.org/weather-conditions>.

/// Friendly description for a condition code, if the code is known.
pub fn describe(code: u16) -> Option<&'static str> {
    let text = match code {
        200 => "Thunderstorm with light rain",
        201 => "Thunderstorm with rain",
        202 => "Thunderstorm with heavy rain",
        210 => "Light thunderstorm",
        211 => "Thunderstorm",
        212 => "Heavy thunderstorm",
        221 => "Ragged thunderstorm",
        230 => "Thunderstorm with light drizzle",
        231 => "Thunderstorm with drizzle",
        232 => "Thunderstorm with heavy drizzle",
        300 => "Light intensity drizzle",
        301 => "Drizzle",
        302 => "Heavy intensity drizzle",
        310 => "Light intensity drizzle rain",
        311 => "Drizzle rain",
        312 => "Heavy intensity drizzle rain",
        313 => "Shower rain and drizzle",
        314 => "Heavy shower rain and drizzle",
        321 => "Shower drizzle",
        500 => "Light rain",
        501 => "Moderate rain",
        502 => "Heavy intensity rain",
        503 => "Very heavy rain",
        504 => "Extreme rain",
        511 => "Freezing rain",
        520 => "Light intensity shower rain",
        521 => "Shower rain",
        522 => "Heavy intensity shower rain",
        531 => "Ragged shower rain",
        600 => "Light snow",
        601 => "Snow",
        602 => "Heavy snow",
        611 => "Sleet",
        612 => "Light shower sleet",
        613 => "Shower sleet",
        615 => "Light rain and snow",
        616 => "Rain and snow",
        620 => "Light shower snow",
        621 => "Shower snow",
        622 => "Heavy shower snow",
        701 => "Mist",
        711 => "Smoke",
        721 => "Haze",
        731 => "Sand/dust whirls",
        741 => "Fog",
        751 => "Sand",
        761 => "Dust",
        762 => "Volcanic ash",
        771 => "Squalls",
        781 => "Tornado",
        800 => "Clear sky",
        801 => "Few clouds",
        802 => "Scattered clouds",
        803 => "Broken clouds",
        804 => "Overcast clouds",
        _ => return None,
    };
    Some(text)
}

/// Broad condition group derived from the first digit of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionGroup {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
    Unknown,
}

impl ConditionGroup {
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Atmosphere,
            800 => Self::Clear,
            801..=899 => Self::Clouds,
            _ => Self::Unknown,
        }
    }

    /// Fallback glyph used when the icon image cannot be shown.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "⛈",
            Self::Drizzle | Self::Rain => "🌧",
            Self::Snow => "🌨",
            Self::Atmosphere => "🌫",
            Self::Clear => "☀",
            Self::Clouds => "☁",
            Self::Unknown => "🌤",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_descriptions() {
        assert_eq!(describe(800), Some("Clear sky"));
        assert_eq!(describe(211), Some("Thunderstorm"));
        assert_eq!(describe(762), Some("Volcanic ash"));
        assert_eq!(describe(804), Some("Overcast clouds"));
    }

    #[test]
    fn unknown_code_has_no_description() {
        assert_eq!(describe(0), None);
        assert_eq!(describe(999), None);
    }

    #[test]
    fn groups_follow_code_ranges() {
        assert_eq!(ConditionGroup::from_code(232), ConditionGroup::Thunderstorm);
        assert_eq!(ConditionGroup::from_code(321), ConditionGroup::Drizzle);
        assert_eq!(ConditionGroup::from_code(511), ConditionGroup::Rain);
        assert_eq!(ConditionGroup::from_code(622), ConditionGroup::Snow);
        assert_eq!(ConditionGroup::from_code(741), ConditionGroup::Atmosphere);
        assert_eq!(ConditionGroup::from_code(800), ConditionGroup::Clear);
        assert_eq!(ConditionGroup::from_code(803), ConditionGroup::Clouds);
        assert_eq!(ConditionGroup::from_code(42), ConditionGroup::Unknown);
    }
}
