use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use crate::{
    app::config::CardConfig,
    data::host::HostSnapshot,
    domain::weather::{EntityState, ForecastEvent, ForecastSample},
};

pub(crate) fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("valid time fixture")
        .with_timezone(&Utc)
}

pub(crate) fn card_config() -> CardConfig {
    CardConfig {
        entity: "weather.home".to_string(),
        ..CardConfig::default()
    }
}

pub(crate) fn weather_entity() -> EntityState {
    serde_json::from_value(json!({
        "entity_id": "weather.home",
        "state": "rainy",
        "attributes": {
            "temperature": 7.25,
            "apparent_temperature": 5.8,
            "humidity": 73,
            "pressure": 1013,
            "pressure_unit": "hPa",
            "wind_speed": 14.4,
            "wind_speed_unit": "km/h",
            "wind_bearing": 225,
            "wind_gust_speed": 30,
            "visibility": 10,
            "visibility_unit": "km",
            "dew_point": 2.5,
            "uv_index": 1.26,
            "temperature_unit": "°C",
            "supported_features": 3
        },
        "last_changed": "2024-01-01T04:50:00+00:00"
    }))
    .expect("weather fixture")
}

pub(crate) fn sun_entity() -> EntityState {
    serde_json::from_value(json!({
        "entity_id": "sun.sun",
        "state": "below_horizon",
        "attributes": {
            "next_rising": "2024-01-01T07:30:00+00:00",
            "next_setting": "2024-01-01T16:15:00+00:00"
        }
    }))
    .expect("sun fixture")
}

pub(crate) fn host() -> HostSnapshot {
    let mut host = HostSnapshot::default();
    host.insert(weather_entity());
    host.insert(sun_entity());
    host
}

pub(crate) fn hourly_samples(start: DateTime<Utc>, count: i64) -> Vec<ForecastSample> {
    (0..count)
        .map(|idx| {
            let mut sample = ForecastSample::new(start + Duration::hours(idx), 5.0 + idx as f64);
            sample.precipitation = Some(if idx % 2 == 0 { 0.0 } else { 0.6 });
            sample.condition = Some("sunny".to_string());
            sample.wind_speed = Some(18.0);
            sample.wind_bearing = Some(crate::domain::weather::WindBearing::Degrees(90.0));
            sample
        })
        .collect()
}

pub(crate) fn daily_samples() -> Vec<ForecastSample> {
    [(10.0, 2.0, 0.0), (12.0, 4.0, 5.0), (8.0, 1.0, 0.0)]
        .into_iter()
        .enumerate()
        .map(|(idx, (high, low, precip))| {
            let day = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(idx as i64);
            let mut sample = ForecastSample::new(day, high);
            sample.templow = Some(low);
            sample.precipitation = Some(precip);
            sample.condition = Some("cloudy".to_string());
            sample
        })
        .collect()
}

pub(crate) fn event(forecast: Vec<ForecastSample>) -> ForecastEvent {
    ForecastEvent { forecast }
}
