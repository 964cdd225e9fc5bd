#![allow(dead_code)]

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde_json::json;
use weather_chart::{
    app::{
        config::CardConfig,
        state::{CardOptions, CardState},
    },
    chart::{ChartRenderer, ChartTheme},
    cli::Cli,
    data::{
        host::HostSnapshot,
        subscription::{ForecastSink, ForecastSource, SubscribeRequest, SubscriptionHandle},
    },
    domain::weather::{ForecastEvent, ForecastSample},
    error::CardError,
};

pub fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("valid time fixture")
        .with_timezone(&Utc)
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("utc offset")
}

pub fn card_json() -> serde_json::Value {
    json!({
        "entity": "weather.home",
        "title": "Home",
        "show_time": false,
        "forecast": {
            "type": "daily",
            "number_of_forecasts": 3
        }
    })
}

pub fn card_config() -> CardConfig {
    CardConfig::from_json(&card_json().to_string()).expect("card fixture")
}

pub fn host_json() -> serde_json::Value {
    json!({
        "language": "en",
        "unit_system": {"temperature": "°C", "length": "km"},
        "states": {
            "weather.home": {
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
                    "temperature_unit": "°C",
                    "supported_features": 3
                },
                "last_changed": "2024-01-01T04:50:00+00:00"
            },
            "sun.sun": {
                "state": "above_horizon",
                "attributes": {
                    "next_rising": "2024-01-01T07:30:00+00:00",
                    "next_setting": "2024-01-01T16:15:00+00:00"
                }
            }
        }
    })
}

pub fn host() -> HostSnapshot {
    HostSnapshot::from_json(&host_json().to_string()).expect("host fixture")
}

/// The three-day rainfall window used across the scenario tests.
pub fn forecast_json() -> serde_json::Value {
    json!({
        "daily": [{
            "forecast": [
                {"datetime": "2024-01-01T00:00", "temperature": 10, "templow": 2, "precipitation": 0, "condition": "cloudy"},
                {"datetime": "2024-01-02T00:00", "temperature": 12, "templow": 4, "precipitation": 5, "condition": "rainy"},
                {"datetime": "2024-01-03T00:00", "temperature": 8, "templow": 1, "precipitation": 0, "condition": "sunny"}
            ]
        }],
        "hourly": []
    })
}

pub fn daily_event() -> ForecastEvent {
    let mut value = forecast_json();
    serde_json::from_value(value["daily"][0].take()).expect("daily event")
}

pub fn hourly_samples(start: DateTime<Utc>, count: i64) -> Vec<ForecastSample> {
    (0..count)
        .map(|idx| {
            let mut sample = ForecastSample::new(start + Duration::hours(idx), 3.0 + idx as f64);
            sample.precipitation = Some(0.4);
            sample
        })
        .collect()
}

pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("fixture day")
        + Duration::days(offset)
}

/// Writes card, host and forecast files and returns a CLI pointing at them.
pub fn write_inputs(dir: &Path) -> Cli {
    let config = dir.join("card.json");
    let states = dir.join("states.json");
    let forecast = dir.join("forecast.json");
    std::fs::write(&config, card_json().to_string()).expect("write card");
    std::fs::write(&states, host_json().to_string()).expect("write states");
    std::fs::write(&forecast, forecast_json().to_string()).expect("write forecast");
    Cli {
        config,
        states,
        forecast,
        locale: None,
        translations: None,
        width: 60,
        utc_offset: Some(utc()),
        rtl: false,
        frame_ms: 5,
        replay_interval_ms: None,
        one_shot: true,
        log_file: None,
    }
}

/// Source that records requests and pushes nothing on its own.
#[derive(Default)]
pub struct ManualSource {
    requests: Mutex<Vec<SubscribeRequest>>,
    sinks: Mutex<Vec<ForecastSink>>,
}

impl ManualSource {
    pub fn requests(&self) -> Vec<SubscribeRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn last_sink(&self) -> ForecastSink {
        self.sinks
            .lock()
            .expect("sinks lock")
            .last()
            .cloned()
            .expect("subscribed")
    }
}

impl ForecastSource for ManualSource {
    fn subscribe(
        &self,
        request: &SubscribeRequest,
        sink: ForecastSink,
    ) -> Result<SubscriptionHandle, CardError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let generation = sink.generation();
        self.sinks.lock().expect("sinks lock").push(sink);
        Ok(SubscriptionHandle::detached(generation))
    }
}

pub fn card_state<R: ChartRenderer>(renderer: R, source: Arc<ManualSource>) -> CardState<R> {
    let options = CardOptions {
        offset: utc(),
        theme: ChartTheme::default(),
        frame_ms: 5,
    };
    CardState::new(renderer, source, options)
}
