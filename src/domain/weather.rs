use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

mod conditions;
mod conversions;
mod freshness;
mod wind;

pub use conditions::{
    ConditionIcon, ICON_BASE_STYLE1, ICON_BASE_STYLE2, IconSet, condition_icon, is_daytime,
    material_icon, svg_icon_stem,
};
pub use conversions::{
    DisplayUnits, PressureUnit, SpeedUnit, beaufort_scale, convert_pressure, convert_speed,
    display_pressure, display_speed,
};
pub use freshness::{RelativeAge, relative_age};
pub use wind::{wind_direction_icon, wind_direction_label, wind_direction_sector};

/// `WeatherEntityFeature` bits exposed through `supported_features`.
pub const FORECAST_DAILY: u32 = 1;
pub const FORECAST_HOURLY: u32 = 2;
pub const FORECAST_TWICE_DAILY: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    #[default]
    Daily,
    Hourly,
}

impl Cadence {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Hourly => "hourly",
        }
    }

    /// Capability bit the entity must advertise to serve this cadence.
    #[must_use]
    pub fn feature(self) -> u32 {
        match self {
            Self::Daily => FORECAST_DAILY,
            Self::Hourly => FORECAST_HOURLY,
        }
    }

    /// Samples older than `now` by more than this are outdated.
    #[must_use]
    pub fn unit(self) -> chrono::Duration {
        match self {
            Self::Daily => chrono::Duration::hours(24),
            Self::Hourly => chrono::Duration::hours(1),
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationMode {
    #[default]
    Rainfall,
    Probability,
}

/// Degrees clockwise from north, or a compass point such as `"NNE"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindBearing {
    Degrees(f64),
    Compass(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    #[serde(deserialize_with = "deserialize_forecast_time")]
    pub datetime: DateTime<Utc>,
    pub temperature: f64,
    #[serde(default)]
    pub templow: Option<f64>,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub wind_bearing: Option<WindBearing>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
}

impl ForecastSample {
    #[must_use]
    pub fn new(datetime: DateTime<Utc>, temperature: f64) -> Self {
        Self {
            datetime,
            temperature,
            templow: None,
            precipitation: None,
            precipitation_probability: None,
            condition: None,
            wind_bearing: None,
            wind_speed: None,
        }
    }
}

/// One push of the forecast subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEvent {
    pub forecast: Vec<ForecastSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EntityState {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub last_changed: Option<DateTime<Utc>>,
}

impl EntityState {
    #[must_use]
    pub fn numeric_state(&self) -> Option<f64> {
        self.state.trim().parse::<f64>().ok()
    }

    #[must_use]
    pub fn weather_attributes(&self) -> WeatherAttributes {
        typed_attributes(&self.entity_id, &self.attributes)
    }

    #[must_use]
    pub fn sun_attributes(&self) -> SunAttributes {
        typed_attributes(&self.entity_id, &self.attributes)
    }
}

fn typed_attributes<T>(entity_id: &str, attributes: &Map<String, Value>) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    match serde_json::from_value(Value::Object(attributes.clone())) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(entity_id, error = %err, "entity attributes did not match the expected shape");
            T::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeatherAttributes {
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_bearing: Option<WindBearing>,
    pub wind_gust_speed: Option<f64>,
    pub visibility: Option<f64>,
    pub dew_point: Option<f64>,
    pub uv_index: Option<f64>,
    pub description: Option<String>,
    pub temperature_unit: Option<String>,
    pub pressure_unit: Option<String>,
    pub wind_speed_unit: Option<String>,
    pub visibility_unit: Option<String>,
    pub precipitation_unit: Option<String>,
    pub supported_features: u32,
}

impl WeatherAttributes {
    #[must_use]
    pub fn supports(&self, feature: u32) -> bool {
        self.supported_features & feature != 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SunAttributes {
    pub next_rising: Option<DateTime<Utc>>,
    pub next_setting: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSystem {
    pub temperature: String,
    pub length: String,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            temperature: "°C".to_string(),
            length: "km".to_string(),
        }
    }
}

impl UnitSystem {
    #[must_use]
    pub fn is_metric_length(&self) -> bool {
        self.length == "km"
    }
}

/// Accepts RFC 3339 timestamps as well as the offset-less forms forecast
/// providers emit. Offset-less values are taken as UTC.
#[must_use]
pub fn parse_forecast_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = parse_datetime(value) {
        return Some(naive.and_utc());
    }
    parse_date(value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[must_use]
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn deserialize_forecast_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_forecast_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid forecast datetime `{raw}`")))
}
