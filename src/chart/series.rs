use chrono::{DateTime, Utc};

use crate::domain::weather::{ForecastSample, PrecipitationMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeriesOptions {
    pub round_temp: bool,
    pub precipitation_mode: PrecipitationMode,
}

/// Parallel arrays for charting, index-aligned with `window`.
///
/// `temp_low` only holds the samples that carry a low value, so it can be
/// shorter than the other arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries<'a> {
    pub window: &'a [ForecastSample],
    pub date_time: Vec<DateTime<Utc>>,
    pub temp_high: Vec<f64>,
    pub temp_low: Vec<f64>,
    pub precip: Vec<f64>,
}

impl ForecastSeries<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.date_time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date_time.is_empty()
    }

    #[must_use]
    pub fn probability(&self, idx: usize) -> Option<f64> {
        self.window
            .get(idx)
            .and_then(|sample| sample.precipitation_probability)
    }

    /// Bounds over both temperature arrays.
    #[must_use]
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.temp_high
            .iter()
            .chain(&self.temp_low)
            .copied()
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
    }
}

#[must_use]
pub fn build_series(window: &[ForecastSample], options: SeriesOptions) -> ForecastSeries<'_> {
    let mut date_time = Vec::with_capacity(window.len());
    let mut temp_high = Vec::with_capacity(window.len());
    let mut temp_low = Vec::with_capacity(window.len());
    let mut precip = Vec::with_capacity(window.len());

    let round = |value: f64| {
        if options.round_temp {
            value.round()
        } else {
            value
        }
    };

    for sample in window {
        date_time.push(sample.datetime);
        temp_high.push(round(sample.temperature));
        if let Some(low) = sample.templow {
            temp_low.push(round(low));
        }
        precip.push(match options.precipitation_mode {
            PrecipitationMode::Probability => sample.precipitation_probability.unwrap_or(0.0),
            PrecipitationMode::Rainfall => sample.precipitation.unwrap_or(0.0),
        });
    }

    ForecastSeries {
        window,
        date_time,
        temp_high,
        temp_low,
        precip,
    }
}
