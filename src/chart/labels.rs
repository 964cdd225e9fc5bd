use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::domain::weather::{Cadence, PrecipitationMode};

/// Time axis label, one entry per line.
#[must_use]
pub fn tick_label(
    at: DateTime<Utc>,
    offset: FixedOffset,
    cadence: Cadence,
    use_12hour_format: bool,
) -> Vec<String> {
    let local = at.with_timezone(&offset);
    match cadence {
        Cadence::Daily => vec![local.format("%a").to_string().to_uppercase()],
        Cadence::Hourly => {
            let time = if use_12hour_format {
                local.format("%-I %p").to_string()
            } else {
                local.format("%H:%M").to_string()
            };
            if local.hour() == 0 && local.minute() == 0 {
                vec![local.format("%b %-d").to_string(), time]
            } else {
                vec![time]
            }
        }
    }
}

#[must_use]
pub fn tooltip_title(at: DateTime<Utc>, offset: FixedOffset, use_12hour_format: bool) -> String {
    let local = at.with_timezone(&offset);
    if use_12hour_format {
        local.format("%a, %b %-d, %-I:%M %p").to_string()
    } else {
        local.format("%a, %b %-d, %H:%M").to_string()
    }
}

#[must_use]
pub fn tooltip_line(label: &str, value: f64, unit: &str, probability: Option<f64>) -> String {
    match probability.filter(|p| *p != 0.0) {
        Some(p) => format!("{label}: {value} {unit} / {}%", p.round()),
        None => format!("{label}: {value} {unit}"),
    }
}

#[must_use]
pub fn temperature_label(value: f64) -> String {
    format!("{value}°")
}

/// Precipitation amounts above 9 lose their decimals.
#[must_use]
pub fn precipitation_amount(value: f64) -> String {
    if value > 9.0 {
        format!("{}", value.round())
    } else {
        format!("{value:.1}")
    }
}

/// Bar label, hidden for dry entries. Rainfall bars may carry the
/// probability on a second line.
#[must_use]
pub fn precipitation_label(
    value: f64,
    unit: &str,
    mode: PrecipitationMode,
    show_probability: bool,
    probability: Option<f64>,
) -> Option<String> {
    if value <= 0.0 {
        return None;
    }
    let amount = precipitation_amount(value);
    let probability = probability
        .filter(|p| *p != 0.0)
        .filter(|_| show_probability && mode == PrecipitationMode::Rainfall);
    Some(match probability {
        Some(p) => format!("{amount} {unit}\n\n{}%", p.round()),
        None => format!("{amount} {unit}"),
    })
}
