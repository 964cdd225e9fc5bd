use crate::{app::view_model::AttributeKind, domain::weather::ConditionIcon};

/// Terminal stand-in for a condition icon name or image path.
#[must_use]
pub fn condition_glyph(icon: &ConditionIcon) -> &'static str {
    let name = match icon {
        ConditionIcon::Material(name) => name.as_str(),
        ConditionIcon::Image(path) => path.rsplit('/').next().unwrap_or(path),
    };
    let name = name.trim_start_matches("hass:weather-").trim_start_matches("mdi:");
    if name.contains("lightning") {
        "⚡"
    } else if name.contains("night") {
        "☾"
    } else if name.contains("partly") {
        "⛅"
    } else if name.contains("snow") || name.contains("sleet") {
        "❄"
    } else if name.contains("hail") {
        "⁂"
    } else if name.contains("rain") || name.contains("pouring") {
        "☂"
    } else if name.contains("fog") {
        "≡"
    } else if name.contains("wind") {
        "≋"
    } else if name.contains("cloud") {
        "☁"
    } else if name.contains("sunny") || name.contains("clear-day") {
        "☀"
    } else {
        "!"
    }
}

/// Arrow for `hass:arrow-*` wind icons.
#[must_use]
pub fn arrow_glyph(icon: &str) -> &'static str {
    match icon.trim_start_matches("hass:") {
        "arrow-up" => "↑",
        "arrow-top-right" => "↗",
        "arrow-right" => "→",
        "arrow-bottom-right" => "↘",
        "arrow-down" => "↓",
        "arrow-bottom-left" => "↙",
        "arrow-left" => "←",
        "arrow-top-left" => "↖",
        _ => "·",
    }
}

#[must_use]
pub fn attribute_glyph(kind: AttributeKind, icon: &str) -> &'static str {
    match kind {
        AttributeKind::Humidity => "≈",
        AttributeKind::Pressure => "◎",
        AttributeKind::DewPoint => "•",
        AttributeKind::Visibility => "◌",
        AttributeKind::Uv => "☼",
        AttributeKind::Sunrise => "↥",
        AttributeKind::Sunset => "↧",
        AttributeKind::WindDirection => arrow_glyph(icon),
        AttributeKind::WindSpeed | AttributeKind::WindGust => "≋",
    }
}
