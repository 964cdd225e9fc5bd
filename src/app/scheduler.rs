use std::time::Duration;

use chrono::{DateTime, DurationRound, TimeDelta, TimeZone};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::debug;

use crate::app::events::AppEvent;

/// Single-slot hourly timer. At most one tick is pending at a time and each
/// tick carries the token of the timer that sent it.
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    pending: Option<(u64, JoinHandle<()>)>,
    next_token: u64,
}

impl RefreshScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a tick for the next top of the hour. No-op while one is pending.
    ///
    /// A timer stays pending until its tick is consumed by `fired` or it is
    /// cancelled, even after the tick has been sent.
    pub fn enable<Tz: TimeZone>(&mut self, tx: &mpsc::Sender<AppEvent>, now: &DateTime<Tz>) {
        if self.pending.is_some() {
            return;
        }
        self.next_token += 1;
        let token = self.next_token;
        let delay = delay_until_next_hour(now);
        debug!(token, delay_secs = delay.as_secs(), "autoscroll tick scheduled");
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(AppEvent::AutoscrollTick { token }).await;
        });
        self.pending = Some((token, handle));
    }

    /// Consumes a delivered tick. Returns false for a tick from a timer that
    /// was cancelled or replaced, which leaves the current slot untouched.
    pub fn fired(&mut self, token: u64) -> bool {
        match &self.pending {
            Some((current, _)) if *current == token => {
                self.pending = None;
                true
            }
            _ => {
                debug!(token, "ignoring stale autoscroll tick");
                false
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some((token, handle)) = self.pending.take() {
            handle.abort();
            debug!(token, "autoscroll tick cancelled");
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Wall-clock time left until the next top of the hour in `now`'s zone.
#[must_use]
pub fn delay_until_next_hour<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let hour = TimeDelta::hours(1);
    let next = now
        .clone()
        .duration_trunc(hour)
        .ok()
        .map(|start| start + hour);
    next.and_then(|next| (next - now.clone()).to_std().ok())
        .filter(|delay| !delay.is_zero())
        .unwrap_or(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn delay_runs_to_the_next_full_hour() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 5, 30, 0).unwrap();
        assert_eq!(delay_until_next_hour(&now), Duration::from_secs(1800));
        let on_the_hour = Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        assert_eq!(delay_until_next_hour(&on_the_hour), Duration::from_secs(3600));
        let half_hour_zone = FixedOffset::east_opt(5 * 3600 + 1800).expect("offset");
        let local = half_hour_zone.with_ymd_and_hms(2024, 1, 1, 10, 45, 0).unwrap();
        assert_eq!(delay_until_next_hour(&local), Duration::from_secs(900));
    }

    #[tokio::test(start_paused = true)]
    async fn enable_is_idempotent_and_fires_once() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = RefreshScheduler::new();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 5, 59, 0).unwrap();

        scheduler.enable(&tx, &now);
        scheduler.enable(&tx, &now);
        assert!(scheduler.is_pending());

        tokio::time::sleep(Duration::from_secs(61)).await;
        let Ok(AppEvent::AutoscrollTick { token }) = rx.try_recv() else {
            panic!("expected one tick");
        };
        assert!(rx.try_recv().is_err());
        assert!(scheduler.is_pending(), "slot stays taken until the tick is consumed");
        assert!(scheduler.fired(token));
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn delivered_tick_blocks_rearming_until_consumed() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = RefreshScheduler::new();
        scheduler.enable(&tx, &Utc.with_ymd_and_hms(2024, 1, 1, 10, 59, 0).unwrap());

        tokio::time::sleep(Duration::from_secs(61)).await;
        let Ok(AppEvent::AutoscrollTick { token }) = rx.try_recv() else {
            panic!("expected the first tick");
        };
        scheduler.enable(&tx, &Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 1).unwrap());
        assert!(scheduler.fired(token));
        scheduler.enable(&tx, &Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 2).unwrap());

        tokio::time::sleep(Duration::from_secs(3601)).await;
        let mut ticks = 0;
        while let Ok(AppEvent::AutoscrollTick { .. }) = rx.try_recv() {
            ticks += 1;
        }
        assert_eq!(ticks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_from_a_replaced_timer_is_ignored() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = RefreshScheduler::new();
        scheduler.enable(&tx, &Utc.with_ymd_and_hms(2024, 1, 1, 5, 59, 0).unwrap());
        tokio::time::sleep(Duration::from_secs(61)).await;
        let Ok(AppEvent::AutoscrollTick { token: stale }) = rx.try_recv() else {
            panic!("expected a tick");
        };

        scheduler.cancel();
        scheduler.enable(&tx, &Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 1).unwrap());
        assert!(!scheduler.fired(stale));
        assert!(scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_pending_tick() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = RefreshScheduler::new();
        scheduler.enable(&tx, &Utc.with_ymd_and_hms(2024, 1, 1, 5, 59, 0).unwrap());
        scheduler.cancel();
        assert!(!scheduler.is_pending());

        tokio::time::sleep(Duration::from_secs(7200)).await;
        assert!(rx.try_recv().is_err());
    }
}
