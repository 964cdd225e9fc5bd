use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::{sync::mpsc, time::sleep};

use crate::{data::host::HostSnapshot, domain::weather::ForecastEvent};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    HostUpdated(HostSnapshot),
    ForecastPushed {
        generation: u64,
        event: ForecastEvent,
    },
    /// Top of the hour while autoscroll is on, tagged with the sending timer.
    AutoscrollTick {
        token: u64,
    },
    AnimationFrame,
    Resize {
        width_px: f64,
    },
    Input(Event),
    Detach,
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

pub fn schedule_animation_frame(tx: mpsc::Sender<AppEvent>, frame_ms: u64) {
    tokio::spawn(async move {
        sleep(Duration::from_millis(frame_ms.max(1))).await;
        let _ = tx.send(AppEvent::AnimationFrame).await;
    });
}
