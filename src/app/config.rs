use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::weather::{
        Cadence, DisplayUnits, ICON_BASE_STYLE1, ICON_BASE_STYLE2, IconSet, PrecipitationMode,
    },
    error::CardError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Style1,
    Style2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    #[default]
    Style1,
    Style2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub precipitation_type: PrecipitationMode,
    pub show_probability: bool,
    pub labels_font_size: f64,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub precip_bar_size: f64,
    pub style: ChartStyle,
    pub show_wind_forecast: bool,
    pub condition_icons: bool,
    pub round_temp: bool,
    #[serde(rename = "type")]
    pub cadence: Cadence,
    pub number_of_forecasts: usize,
    pub disable_animation: bool,
    pub chart_height: u32,
    pub temperature1_color: String,
    pub temperature2_color: String,
    pub precipitation_color: String,
    pub chart_text_color: String,
    pub chart_datetime_color: Option<String>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            precipitation_type: PrecipitationMode::Rainfall,
            show_probability: false,
            labels_font_size: 11.0,
            precip_bar_size: 100.0,
            style: ChartStyle::Style1,
            show_wind_forecast: true,
            condition_icons: true,
            round_temp: false,
            cadence: Cadence::Daily,
            number_of_forecasts: 0,
            disable_animation: false,
            chart_height: 180,
            temperature1_color: "rgba(255, 152, 0, 1.0)".to_string(),
            temperature2_color: "rgba(68, 115, 158, 1.0)".to_string(),
            precipitation_color: "rgba(132, 209, 253, 1.0)".to_string(),
            chart_text_color: "auto".to_string(),
            chart_datetime_color: None,
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub entity: String,
    pub title: Option<String>,
    pub show_main: bool,
    pub show_temperature: bool,
    pub show_current_condition: bool,
    pub show_attributes: bool,
    pub show_time: bool,
    pub show_time_seconds: bool,
    pub show_day: bool,
    pub show_date: bool,
    pub show_humidity: bool,
    pub show_pressure: bool,
    pub show_wind_direction: bool,
    pub show_wind_speed: bool,
    pub show_sun: bool,
    pub show_feels_like: bool,
    pub show_dew_point: bool,
    pub show_wind_gust_speed: bool,
    pub show_visibility: bool,
    pub show_last_changed: bool,
    pub show_description: bool,
    pub use_12hour_format: bool,
    pub icons_size: u32,
    pub animated_icons: bool,
    pub icon_style: IconStyle,
    /// Base path of a custom SVG icon set.
    pub icons: Option<String>,
    pub autoscroll: bool,
    pub locale: Option<String>,
    pub forecast: ForecastConfig,
    pub units: DisplayUnits,

    // Alternative sensors replacing weather attributes.
    pub temp: Option<String>,
    pub feels_like: Option<String>,
    pub description: Option<String>,
    pub press: Option<String>,
    pub humid: Option<String>,
    pub uv: Option<String>,
    pub winddir: Option<String>,
    pub windspeed: Option<String>,
    pub dew_point: Option<String>,
    pub wind_gust_speed: Option<String>,
    pub visibility: Option<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            entity: String::new(),
            title: None,
            show_main: true,
            show_temperature: true,
            show_current_condition: true,
            show_attributes: true,
            show_time: false,
            show_time_seconds: false,
            show_day: false,
            show_date: false,
            show_humidity: true,
            show_pressure: true,
            show_wind_direction: true,
            show_wind_speed: true,
            show_sun: true,
            show_feels_like: false,
            show_dew_point: false,
            show_wind_gust_speed: false,
            show_visibility: false,
            show_last_changed: false,
            show_description: false,
            use_12hour_format: false,
            icons_size: 25,
            animated_icons: false,
            icon_style: IconStyle::Style1,
            icons: None,
            autoscroll: false,
            locale: None,
            forecast: ForecastConfig::default(),
            units: DisplayUnits::default(),
            temp: None,
            feels_like: None,
            description: None,
            press: None,
            humid: None,
            uv: None,
            winddir: None,
            windspeed: None,
            dew_point: None,
            wind_gust_speed: None,
            visibility: None,
        }
    }
}

impl CardConfig {
    /// Parses and validates a configuration blob.
    pub fn from_json(source: &str) -> Result<Self, CardError> {
        let config: Self = serde_json::from_str(source)
            .map_err(|err| CardError::Configuration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.entity.trim().is_empty() {
            return Err(CardError::Configuration(
                "an `entity` must be defined".to_string(),
            ));
        }
        Ok(())
    }

    /// Starter configuration bound to the first weather entity, preferring
    /// entities no other card uses yet.
    #[must_use]
    pub fn stub(unused_entities: &[String], all_entities: &[String]) -> Self {
        let is_weather = |id: &&String| id.split('.').next() == Some("weather");
        let entity = unused_entities
            .iter()
            .find(is_weather)
            .or_else(|| all_entities.iter().find(is_weather))
            .cloned()
            .unwrap_or_default();
        Self {
            entity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn icon_set(&self) -> IconSet {
        if self.animated_icons {
            let base = match self.icon_style {
                IconStyle::Style1 => ICON_BASE_STYLE1,
                IconStyle::Style2 => ICON_BASE_STYLE2,
            };
            IconSet::Svg {
                base: base.to_string(),
            }
        } else if let Some(base) = &self.icons {
            IconSet::Svg { base: base.clone() }
        } else {
            IconSet::Material
        }
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<CardConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading card config {} failed", path.display()))?;
    CardConfig::from_json(&content).context("card config is invalid")
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got `{text}`"))),
    }
}
