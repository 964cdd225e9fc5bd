mod common;

use chrono::Duration;
use proptest::prelude::*;
use weather_chart::{
    chart::{SeriesOptions, build_series},
    data::forecast::ForecastStore,
    domain::weather::{Cadence, ForecastSample, SpeedUnit, convert_speed},
};

fn kmh(unit: SpeedUnit) -> f64 {
    match unit {
        SpeedUnit::KilometersPerHour => 1.0,
        SpeedUnit::MetersPerSecond => 3.6,
        SpeedUnit::MilesPerHour => 1.60934,
        SpeedUnit::Beaufort => f64::NAN,
    }
}

fn physical_unit() -> impl Strategy<Value = SpeedUnit> {
    prop_oneof![
        Just(SpeedUnit::KilometersPerHour),
        Just(SpeedUnit::MetersPerSecond),
        Just(SpeedUnit::MilesPerHour),
    ]
}

fn samples() -> impl Strategy<Value = Vec<ForecastSample>> {
    prop::collection::vec((-30.0f64..40.0, prop::option::of(-40.0f64..30.0)), 0..24).prop_map(
        |values| {
            values
                .into_iter()
                .enumerate()
                .map(|(idx, (high, low))| {
                    let mut sample =
                        ForecastSample::new(common::day(0) + Duration::hours(idx as i64), high);
                    sample.templow = low;
                    sample
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn speed_round_trip_stays_within_rounding(
        value in 0.0f64..300.0,
        from in physical_unit(),
        to in physical_unit(),
    ) {
        let there = convert_speed(value, from, to).expect("physical units");
        let back = convert_speed(there, to, from).expect("physical units");
        let tolerance = 0.5 * kmh(to) / kmh(from) + 0.5 + 0.01;
        prop_assert!((back - value).abs() <= tolerance, "{value} -> {there} -> {back}");
    }

    #[test]
    fn beaufort_is_monotonic_and_saturates(a in 0.0f64..200.0, b in 0.0f64..200.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let force = |speed| convert_speed(speed, SpeedUnit::KilometersPerHour, SpeedUnit::Beaufort)
            .expect("km/h converts to Bft");
        prop_assert!(force(lo) <= force(hi));
        if hi >= 118.0 {
            prop_assert_eq!(force(hi), 12.0);
        }
    }

    #[test]
    fn pruning_twice_equals_pruning_once(window in samples(), hours in 0i64..30) {
        let now = common::day(0) + Duration::hours(hours);
        let mut store = ForecastStore::new(Cadence::Hourly);
        store.replace(window);
        store.prune_outdated(now);
        let once = store.samples().to_vec();
        prop_assert_eq!(store.prune_outdated(now), 0);
        prop_assert_eq!(store.samples(), once.as_slice());
    }

    #[test]
    fn series_lengths_stay_aligned(window in samples(), round_temp in any::<bool>()) {
        let series = build_series(&window, SeriesOptions { round_temp, ..SeriesOptions::default() });
        prop_assert_eq!(series.date_time.len(), window.len());
        prop_assert_eq!(series.temp_high.len(), series.date_time.len());
        prop_assert_eq!(series.precip.len(), series.date_time.len());
        prop_assert!(series.temp_low.len() <= series.temp_high.len());
        if round_temp {
            prop_assert!(series.temp_high.iter().chain(&series.temp_low).all(|v| v.fract() == 0.0));
        } else {
            let highs = window.iter().map(|sample| sample.temperature).collect::<Vec<_>>();
            prop_assert_eq!(&series.temp_high, &highs);
        }
    }
}
