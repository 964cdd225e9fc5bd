use chrono::{DateTime, FixedOffset, Utc};
use tracing::debug;

use crate::{
    app::config::CardConfig,
    data::host::HostSnapshot,
    domain::weather::{
        ConditionIcon, EntityState, ForecastSample, IconSet, SunAttributes, WeatherAttributes,
        WindBearing, condition_icon, display_pressure, display_speed, is_daytime, relative_age,
        wind_direction_icon, wind_direction_label,
    },
    error::UnsupportedUnitError,
    i18n::Translator,
};

pub struct ViewInputs<'a> {
    pub config: Option<&'a CardConfig>,
    pub host: Option<&'a HostSnapshot>,
    pub window: &'a [ForecastSample],
    pub translator: &'a dyn Translator,
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    /// No configuration or host state yet.
    Unconfigured,
    MissingEntity { title: Option<String> },
    Ready(CardView),
}

pub const MISSING_ENTITY_TEXT: &str = "Please, check your weather entity";

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub title: Option<String>,
    pub main: Option<MainPanel>,
    pub attributes: Vec<Attribute>,
    pub condition_icons: Vec<Option<ConditionIcon>>,
    pub wind_forecast: Vec<WindForecastItem>,
    pub last_changed: Option<String>,
    pub chart_height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainPanel {
    pub icon: Option<ConditionIcon>,
    pub temperature: Option<String>,
    pub feels_like: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub clock: Option<Clock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    pub time: String,
    pub day: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Humidity,
    Pressure,
    DewPoint,
    Visibility,
    Uv,
    Sunrise,
    Sunset,
    WindDirection,
    WindSpeed,
    WindGust,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub icon: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindForecastItem {
    pub icon: Option<String>,
    pub speed: Option<f64>,
    pub unit: String,
}

#[must_use]
pub fn derive_view_model(inputs: &ViewInputs<'_>) -> ViewModel {
    let (Some(config), Some(host)) = (inputs.config, inputs.host) else {
        return ViewModel::Unconfigured;
    };
    let Some(weather) = host.entity(&config.entity) else {
        return ViewModel::MissingEntity {
            title: config.title.clone(),
        };
    };

    let ctx = ViewContext {
        config,
        host,
        weather,
        attributes: weather.weather_attributes(),
        sun: host.sun(),
        translator: inputs.translator,
        now: inputs.now,
        offset: inputs.offset,
    };

    ViewModel::Ready(CardView {
        title: config.title.clone(),
        main: config.show_main.then(|| ctx.main_panel()),
        attributes: if config.show_attributes {
            ctx.attributes()
        } else {
            Vec::new()
        },
        condition_icons: if config.forecast.condition_icons {
            ctx.condition_icons(inputs.window)
        } else {
            Vec::new()
        },
        wind_forecast: if config.forecast.show_wind_forecast {
            ctx.wind_forecast(inputs.window)
        } else {
            Vec::new()
        },
        last_changed: config
            .show_last_changed
            .then_some(weather.last_changed)
            .flatten()
            .map(|changed| relative_age(changed, inputs.now).to_string()),
        chart_height: config.forecast.chart_height,
    })
}

struct ViewContext<'a> {
    config: &'a CardConfig,
    host: &'a HostSnapshot,
    weather: &'a EntityState,
    attributes: WeatherAttributes,
    sun: Option<&'a EntityState>,
    translator: &'a dyn Translator,
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl ViewContext<'_> {
    /// Alternative sensor state when one is configured, else the attribute.
    fn sensor_or(&self, sensor: Option<&str>, attribute: Option<f64>) -> Option<f64> {
        match sensor {
            Some(id) => self.host.numeric_state(Some(id)),
            None => attribute,
        }
    }

    fn unit_label(&self, unit: &str) -> String {
        self.translator
            .translate(&format!("units.{unit}"))
            .unwrap_or_else(|| unit.to_string())
    }

    fn temperature_unit(&self) -> &str {
        &self.host.unit_system.temperature
    }

    fn icon_set(&self) -> IconSet {
        self.config.icon_set()
    }

    fn sun_attributes(&self) -> Option<SunAttributes> {
        self.sun.map(EntityState::sun_attributes)
    }

    fn main_panel(&self) -> MainPanel {
        let config = self.config;
        let unit = self.temperature_unit();

        let temperature = config
            .show_temperature
            .then(|| self.sensor_or(config.temp.as_deref(), self.attributes.temperature))
            .flatten()
            .map(|value| format!("{}{unit}", round_tenth(value)));

        let feels_like = config
            .show_feels_like
            .then(|| match config.feels_like.as_deref() {
                Some(id) => self.host.raw_state(Some(id)).map(str::to_string),
                None => self.attributes.apparent_temperature.map(|v| v.to_string()),
            })
            .flatten()
            .and_then(|raw| {
                let text = match raw.trim().parse::<f64>() {
                    Ok(value) if value == 0.0 => return None,
                    Ok(value) => round_tenth(value).to_string(),
                    Err(_) if raw.trim().is_empty() => return None,
                    Err(_) => raw,
                };
                Some(format!("{} {text}{unit}", self.translator.text("feelsLike")))
            });

        let description = config
            .show_description
            .then(|| match config.description.as_deref() {
                Some(id) => self.host.raw_state(Some(id)).map(str::to_string),
                None => self.attributes.description.clone(),
            })
            .flatten();

        let is_day = self.sun.is_none_or(|sun| sun.state != "below_horizon");

        MainPanel {
            icon: condition_icon(&self.weather.state, is_day, &self.icon_set()),
            temperature,
            feels_like,
            condition: config
                .show_current_condition
                .then(|| self.translator.text(&self.weather.state)),
            description,
            clock: config.show_time.then(|| self.clock()),
        }
    }

    fn clock(&self) -> Clock {
        let local = self.now.with_timezone(&self.offset);
        let pattern = match (self.config.use_12hour_format, self.config.show_time_seconds) {
            (true, true) => "%-I:%M:%S %p",
            (true, false) => "%-I:%M %p",
            (false, true) => "%H:%M:%S",
            (false, false) => "%H:%M",
        };
        Clock {
            time: local.format(pattern).to_string(),
            day: self
                .config
                .show_day
                .then(|| local.format("%A").to_string().to_uppercase()),
            date: self
                .config
                .show_date
                .then(|| local.format("%B %-d").to_string()),
        }
    }

    fn attributes(&self) -> Vec<Attribute> {
        let config = self.config;
        let attrs = &self.attributes;
        let units = config.units.resolve(attrs);
        let mut items = Vec::new();
        let mut push = |kind, icon: &str, text: String| {
            items.push(Attribute {
                kind,
                icon: icon.to_string(),
                text,
            });
        };

        if config.show_humidity
            && let Some(humidity) = nonzero(self.sensor_or(config.humid.as_deref(), attrs.humidity))
        {
            push(AttributeKind::Humidity, "hass:water-percent", format!("{humidity} %"));
        }

        if config.show_pressure
            && let Some(pressure) = nonzero(self.sensor_or(config.press.as_deref(), attrs.pressure))
            && let Some(target) = units.pressure.as_deref()
            && let Some(value) = omit_unsupported(
                "pressure",
                display_pressure(pressure, attrs.pressure_unit.as_deref(), target),
            )
            && value != 0.0
        {
            push(
                AttributeKind::Pressure,
                "hass:gauge",
                format!("{} {}", trim_decimals(value, 2), self.unit_label(target)),
            );
        }

        if config.show_dew_point
            && let Some(dew_point) =
                nonzero(self.sensor_or(config.dew_point.as_deref(), attrs.dew_point))
        {
            let unit = attrs.temperature_unit.as_deref().unwrap_or(self.temperature_unit());
            push(
                AttributeKind::DewPoint,
                "hass:thermometer-water",
                format!("{dew_point} {unit}"),
            );
        }

        if config.show_visibility
            && let Some(visibility) =
                nonzero(self.sensor_or(config.visibility.as_deref(), attrs.visibility))
        {
            let unit = attrs.visibility_unit.as_deref().unwrap_or_default();
            push(
                AttributeKind::Visibility,
                "hass:eye",
                format!("{visibility} {unit}").trim_end().to_string(),
            );
        }

        if let Some(uv) = nonzero(self.sensor_or(config.uv.as_deref(), attrs.uv_index)) {
            push(
                AttributeKind::Uv,
                "hass:white-balance-sunny",
                format!("UV: {}", round_tenth(uv)),
            );
        }

        if config.show_sun
            && let Some(sun) = self.sun_attributes()
        {
            if let Some(rising) = sun.next_rising {
                push(AttributeKind::Sunrise, "mdi:weather-sunset-up", self.time_of_day(rising));
            }
            if let Some(setting) = sun.next_setting {
                push(AttributeKind::Sunset, "mdi:weather-sunset-down", self.time_of_day(setting));
            }
        }

        if config.show_wind_direction
            && let Some(bearing) = self.wind_direction()
            && let Some(label) = wind_direction_label(&bearing, |key| self.translator.translate(key))
        {
            let icon = wind_direction_icon(&bearing).unwrap_or("arrow-down");
            push(AttributeKind::WindDirection, &format!("hass:{icon}"), label);
        }

        if let Some(target) = units.speed.as_deref() {
            let native = attrs.wind_speed_unit.as_deref();
            let wind = config
                .show_wind_speed
                .then(|| nonzero(self.sensor_or(config.windspeed.as_deref(), attrs.wind_speed)))
                .flatten()
                .and_then(|speed| omit_unsupported("wind speed", display_speed(speed, native, target)))
                .and_then(|speed| nonzero(Some(speed)));
            if let Some(speed) = wind {
                push(
                    AttributeKind::WindSpeed,
                    "hass:weather-windy",
                    format!("{speed} {}", self.unit_label(target)),
                );
            }

            let gust = config
                .show_wind_gust_speed
                .then(|| {
                    nonzero(self.sensor_or(config.wind_gust_speed.as_deref(), attrs.wind_gust_speed))
                })
                .flatten()
                .and_then(|gust| omit_unsupported("wind gust", display_speed(gust, native, target)))
                .and_then(|gust| nonzero(Some(gust)));
            if let Some(gust) = gust {
                push(
                    AttributeKind::WindGust,
                    "hass:weather-windy-variant",
                    format!("{gust} {}", self.unit_label(target)),
                );
            }
        }

        items
    }

    fn wind_direction(&self) -> Option<WindBearing> {
        match self.config.winddir.as_deref() {
            Some(id) => self.host.numeric_state(Some(id)).map(WindBearing::Degrees),
            None => self.attributes.wind_bearing.clone(),
        }
    }

    fn time_of_day(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.offset);
        if self.config.use_12hour_format {
            local.format("%-I:%M %p").to_string()
        } else {
            local.format("%H:%M").to_string()
        }
    }

    fn condition_icons(&self, window: &[ForecastSample]) -> Vec<Option<ConditionIcon>> {
        let sun = self.sun_attributes();
        let icons = self.icon_set();
        window
            .iter()
            .map(|sample| {
                let condition = sample.condition.as_deref()?;
                let is_day = is_daytime(
                    self.config.forecast.cadence,
                    sample.datetime,
                    sun.as_ref(),
                    self.offset,
                );
                condition_icon(condition, is_day, &icons)
            })
            .collect()
    }

    fn wind_forecast(&self, window: &[ForecastSample]) -> Vec<WindForecastItem> {
        let units = self.config.units.resolve(&self.attributes);
        let native = self.attributes.wind_speed_unit.as_deref();
        let target = units.speed.as_deref();
        let unit = target.map(|u| self.unit_label(u)).unwrap_or_default();
        window
            .iter()
            .map(|sample| WindForecastItem {
                icon: sample
                    .wind_bearing
                    .as_ref()
                    .and_then(wind_direction_icon)
                    .map(|icon| format!("hass:{icon}")),
                speed: sample.wind_speed.and_then(|speed| match target {
                    Some(target) if speed != 0.0 => {
                        omit_unsupported("forecast wind speed", display_speed(speed, native, target))
                    }
                    _ => Some(speed),
                }),
                unit: unit.clone(),
            })
            .collect()
    }
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to at most `places` decimals.
fn trim_decimals(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn omit_unsupported(value: &str, result: Result<f64, UnsupportedUnitError>) -> Option<f64> {
    match result {
        Ok(converted) => Some(converted),
        Err(err) => {
            debug!(value, error = %err, "display value omitted");
            None
        }
    }
}
