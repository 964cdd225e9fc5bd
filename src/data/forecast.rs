use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::weather::{Cadence, ForecastSample};

/// Samples of the current subscription, in push order.
#[derive(Debug, Clone, Default)]
pub struct ForecastStore {
    samples: Vec<ForecastSample>,
    cadence: Cadence,
}

impl ForecastStore {
    #[must_use]
    pub fn new(cadence: Cadence) -> Self {
        Self {
            samples: Vec::new(),
            cadence,
        }
    }

    #[must_use]
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Drops every sample when the cadence changes; they belong to the old
    /// subscription.
    pub fn set_cadence(&mut self, cadence: Cadence) {
        if self.cadence != cadence {
            self.cadence = cadence;
            self.samples.clear();
        }
    }

    pub fn replace(&mut self, samples: Vec<ForecastSample>) {
        self.samples = samples;
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Removes samples older than `now` by more than one cadence unit and
    /// returns how many were removed.
    pub fn prune_outdated(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = self.cadence.unit();
        let before = self.samples.len();
        self.samples.retain(|sample| now - sample.datetime <= cutoff);
        let removed = before - self.samples.len();
        if removed > 0 {
            debug!(removed, cadence = %self.cadence, "pruned outdated forecast samples");
        }
        removed
    }

    /// Leading `size` samples.
    #[must_use]
    pub fn window(&self, size: usize) -> &[ForecastSample] {
        &self.samples[..size.min(self.samples.len())]
    }

    #[must_use]
    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Number of samples the chart shows: the configured count when positive,
/// otherwise as many labels as fit in `container_width`.
#[must_use]
pub fn window_size(number_of_forecasts: usize, container_width: f64, font_size: f64) -> usize {
    if number_of_forecasts > 0 {
        return number_of_forecasts;
    }
    let per_label = font_size.max(1.0) * 6.0;
    let fit = (container_width.max(0.0) / per_label).round();
    if fit.is_finite() { fit as usize } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn hourly_from(start: DateTime<Utc>, count: i64) -> Vec<ForecastSample> {
        (0..count)
            .map(|idx| ForecastSample::new(start + Duration::hours(idx), 10.0 + idx as f64))
            .collect()
    }

    #[test]
    fn hourly_prune_keeps_the_current_hour() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 5, 30, 0).unwrap();
        let mut store = ForecastStore::new(Cadence::Hourly);
        store.replace(hourly_from(Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap(), 6));

        assert_eq!(store.prune_outdated(now), 3);
        let remaining: Vec<_> = store.samples().iter().map(|s| s.datetime).collect();
        assert_eq!(
            remaining.first().copied(),
            Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).single()
        );
        assert!(remaining.iter().all(|t| *t >= now - Duration::hours(1)));
    }

    #[test]
    fn prune_boundary_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 5, 30, 0).unwrap();
        let mut store = ForecastStore::new(Cadence::Hourly);
        store.replace(vec![
            ForecastSample::new(now - Duration::hours(1), 1.0),
            ForecastSample::new(now - Duration::hours(1) - Duration::seconds(1), 2.0),
        ]);
        store.prune_outdated(now);
        assert_eq!(store.len(), 1);
        assert_eq!(store.samples()[0].temperature, 1.0);
    }

    #[test]
    fn daily_prune_uses_a_day_and_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let mut store = ForecastStore::new(Cadence::Daily);
        store.replace(
            (0..5)
                .map(|day| {
                    ForecastSample::new(
                        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
                        5.0,
                    )
                })
                .collect(),
        );

        assert_eq!(store.prune_outdated(now), 2);
        let after_first = store.samples().to_vec();
        assert_eq!(store.prune_outdated(now), 0);
        assert_eq!(store.samples(), after_first.as_slice());
    }

    #[test]
    fn window_is_a_prefix_and_never_mutates() {
        let mut store = ForecastStore::new(Cadence::Hourly);
        assert!(store.window(5).is_empty());
        store.replace(hourly_from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 4));
        assert_eq!(store.window(2).len(), 2);
        assert_eq!(store.window(2)[1].temperature, 11.0);
        assert_eq!(store.window(10).len(), 4);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn cadence_change_discards_samples() {
        let mut store = ForecastStore::new(Cadence::Daily);
        store.replace(hourly_from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 2));
        store.set_cadence(Cadence::Daily);
        assert_eq!(store.len(), 2);
        store.set_cadence(Cadence::Hourly);
        assert!(store.is_empty());
    }

    #[test]
    fn window_size_prefers_configured_count() {
        assert_eq!(window_size(7, 400.0, 11.0), 7);
        assert_eq!(window_size(0, 400.0, 11.0), 6);
        assert_eq!(window_size(0, 500.0, 11.0), 8);
        assert_eq!(window_size(0, 0.0, 11.0), 0);
        assert_eq!(window_size(0, 60.0, 0.0), 10);
    }
}
