use std::{path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::{
    app::events::AppEvent,
    domain::weather::{Cadence, ForecastEvent},
    error::CardError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeRequest {
    pub entity_id: String,
    pub cadence: Cadence,
}

/// Delivery end of a subscription. Every push carries the generation the
/// subscription was opened with so late pushes can be told apart.
#[derive(Debug, Clone)]
pub struct ForecastSink {
    tx: mpsc::Sender<AppEvent>,
    generation: u64,
}

impl ForecastSink {
    #[must_use]
    pub fn new(tx: mpsc::Sender<AppEvent>, generation: u64) -> Self {
        Self { tx, generation }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `false` once the receiving side is gone.
    pub async fn push(&self, event: ForecastEvent) -> bool {
        self.tx
            .send(AppEvent::ForecastPushed {
                generation: self.generation,
                event,
            })
            .await
            .is_ok()
    }
}

#[derive(Debug)]
pub struct SubscriptionHandle {
    generation: u64,
    cancel: Option<oneshot::Sender<()>>,
}

impl SubscriptionHandle {
    #[must_use]
    pub fn new(generation: u64, cancel: oneshot::Sender<()>) -> Self {
        Self {
            generation,
            cancel: Some(cancel),
        }
    }

    /// Handle for a source that pushes nothing after `subscribe` returns.
    #[must_use]
    pub fn detached(generation: u64) -> Self {
        Self {
            generation,
            cancel: None,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fire-and-forget: the source may still be winding down when this returns.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        debug!(generation = self.generation, "forecast subscription released");
    }
}

pub trait ForecastSource: Send + Sync {
    fn subscribe(
        &self,
        request: &SubscribeRequest,
        sink: ForecastSink,
    ) -> Result<SubscriptionHandle, CardError>;
}

/// Replays recorded forecast pushes from a JSON capture.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplaySource {
    pub daily: Vec<ForecastEvent>,
    pub hourly: Vec<ForecastEvent>,
    #[serde(skip)]
    pub interval: Option<Duration>,
}

impl ReplaySource {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading forecast capture {} failed", path.display()))?;
        let source: Self = serde_json::from_str(&content)
            .with_context(|| format!("forecast capture {} is invalid", path.display()))?;
        info!(
            path = %path.display(),
            daily = source.daily.len(),
            hourly = source.hourly.len(),
            "loaded forecast capture"
        );
        Ok(source)
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Option<Duration>) -> Self {
        self.interval = interval;
        self
    }

    fn events(&self, cadence: Cadence) -> &[ForecastEvent] {
        match cadence {
            Cadence::Daily => &self.daily,
            Cadence::Hourly => &self.hourly,
        }
    }
}

impl ForecastSource for ReplaySource {
    fn subscribe(
        &self,
        request: &SubscribeRequest,
        sink: ForecastSink,
    ) -> Result<SubscriptionHandle, CardError> {
        let events = self.events(request.cadence).to_vec();
        if events.is_empty() {
            return Err(CardError::Subscription(format!(
                "no {} forecast recorded for {}",
                request.cadence, request.entity_id
            )));
        }

        let generation = sink.generation();
        let interval = self.interval;
        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        tokio::spawn(async move {
            for (idx, event) in events.into_iter().enumerate() {
                if let Some(gap) = interval.filter(|_| idx > 0) {
                    tokio::select! {
                        _ = &mut cancel_rx => return,
                        () = tokio::time::sleep(gap) => {}
                    }
                }
                tokio::select! {
                    _ = &mut cancel_rx => return,
                    delivered = sink.push(event) => {
                        if !delivered {
                            return;
                        }
                    }
                }
            }
            debug!(generation, "forecast replay finished");
        });

        Ok(SubscriptionHandle::new(generation, cancel_tx))
    }
}
