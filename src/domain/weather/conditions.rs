use chrono::{DateTime, FixedOffset, NaiveTime, Utc};

use super::{Cadence, SunAttributes};

pub const ICON_BASE_STYLE1: &str =
    "https://cdn.jsdelivr.net/gh/mlamberts78/weather-chart-card/dist/icons/";
pub const ICON_BASE_STYLE2: &str =
    "https://cdn.jsdelivr.net/gh/mlamberts78/weather-chart-card/dist/icons2/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSet {
    /// `hass:`/`mdi:` icon names.
    Material,
    /// SVG files under a base path, with separate day and night artwork.
    Svg { base: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionIcon {
    Material(String),
    Image(String),
}

#[must_use]
pub fn material_icon(condition: &str) -> Option<&'static str> {
    Some(match condition {
        "clear-night" => "hass:weather-night",
        "cloudy" => "hass:weather-cloudy",
        "exceptional" => "mdi:alert-circle-outline",
        "fog" => "hass:weather-fog",
        "hail" => "hass:weather-hail",
        "lightning" => "hass:weather-lightning",
        "lightning-rainy" => "hass:weather-lightning-rainy",
        "partlycloudy" => "hass:weather-partly-cloudy",
        "pouring" => "hass:weather-pouring",
        "rainy" => "hass:weather-rainy",
        "snowy" => "hass:weather-snowy",
        "snowy-rainy" => "hass:weather-snowy-rainy",
        "sunny" => "hass:weather-sunny",
        "windy" => "hass:weather-windy",
        "windy-variant" => "hass:weather-windy-variant",
        _ => return None,
    })
}

#[must_use]
pub fn svg_icon_stem(condition: &str, is_day: bool) -> Option<&'static str> {
    if !is_day {
        match condition {
            "sunny" => return Some("clear-night"),
            "partlycloudy" => return Some("partlycloudy-night"),
            _ => {}
        }
    }
    Some(match condition {
        "clear-night" => "clear-night",
        "cloudy" => "cloudy",
        "exceptional" => "exceptional",
        "fog" => "fog",
        "hail" => "hail",
        "lightning" => "lightning",
        "lightning-rainy" => "lightning-rain",
        "partlycloudy" => "partlycloudy-day",
        "pouring" => "pouring",
        "rainy" => "rain",
        "snowy" => "snow",
        "snowy-rainy" => "sleet",
        "sunny" => "clear-day",
        "windy" | "windy-variant" => "wind",
        _ => return None,
    })
}

#[must_use]
pub fn condition_icon(condition: &str, is_day: bool, icons: &IconSet) -> Option<ConditionIcon> {
    match icons {
        IconSet::Material => material_icon(condition).map(|icon| ConditionIcon::Material(icon.to_string())),
        IconSet::Svg { base } => svg_icon_stem(condition, is_day)
            .map(|stem| ConditionIcon::Image(format!("{base}{stem}.svg"))),
    }
}

/// Daily samples always count as day. Hourly samples compare their local
/// time of day against the sun entity's next rising and setting.
#[must_use]
pub fn is_daytime(
    cadence: Cadence,
    at: DateTime<Utc>,
    sun: Option<&SunAttributes>,
    offset: FixedOffset,
) -> bool {
    if cadence == Cadence::Daily {
        return true;
    }
    let Some((rising, setting)) = sun.and_then(|s| s.next_rising.zip(s.next_setting)) else {
        return true;
    };
    let local_time = |t: DateTime<Utc>| -> NaiveTime { t.with_timezone(&offset).time() };
    let now = local_time(at);
    now >= local_time(rising) && now <= local_time(setting)
}
