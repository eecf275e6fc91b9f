use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

use weatherdash_core::{
    Config, WeatherRecord,
    conditions::{self, ConditionGroup},
    units::{PressureUnit, format_pressure, format_temperature, format_wind_speed},
};

/// Render a record for the terminal using the local time zone.
pub fn render_record(record: &WeatherRecord, config: &Config) -> String {
    render_in_zone(record, config, &Local)
}

pub fn render_in_zone<Tz>(record: &WeatherRecord, config: &Config, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let temp_unit = record.units.temperature_unit();
    let speed_unit = record.units.speed_unit();
    let group = ConditionGroup::from_code(record.condition.id);

    let mut lines = vec![format!(
        "{} {}  {}",
        group.glyph(),
        record.display_name(),
        capitalize_words(&record.condition.description)
    )];

    if let Some(friendly) = conditions::describe(record.condition.id) {
        if !friendly.eq_ignore_ascii_case(&record.condition.description) {
            lines.push(format!("  ({friendly})"));
        }
    }

    let mut rows = vec![
        (
            "Temperature",
            format!(
                "{} (feels like {})",
                format_temperature(record.temperature, temp_unit, 0),
                format_temperature(record.feels_like, temp_unit, 0)
            ),
        ),
        ("Humidity", format!("{}%", record.humidity_pct)),
        ("Wind", format_wind_speed(record.wind_speed, speed_unit, 1)),
        ("Pressure", format_pressure(record.pressure_hpa, PressureUnit::Hectopascal, 0)),
        ("Visibility", format_visibility(record.visibility_m)),
        ("Cloudiness", format!("{}%", record.cloudiness_pct)),
        ("Sunrise", format_time(record.sunrise, tz)),
        ("Sunset", format_time(record.sunset, tz)),
    ];

    if !record.condition.icon.is_empty() {
        rows.push(("Icon", config.icon_url(&record.condition.icon, "2x")));
    }

    lines.extend(rows.into_iter().map(|(label, value)| format!("  {label:<12}{value}")));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Upper-case the first letter of every word.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }

    out
}

fn format_visibility(meters: Option<u32>) -> String {
    match meters {
        Some(m) => format!("{:.1} km", f64::from(m) / 1000.0),
        None => "N/A".to_string(),
    }
}

fn format_time<Tz>(ts: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match ts {
        Some(ts) => ts.with_timezone(tz).format("%I:%M %p").to_string(),
        None => "N/A".to_string(),
    }
}
