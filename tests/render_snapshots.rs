mod common;

use std::sync::Arc;

use common::{ManualSource, at, card_config, card_state, daily_event, host};
use ratatui::{Terminal, backend::TestBackend};
use tokio::sync::mpsc;
use weather_chart::{
    app::{events::AppEvent, state::CardState},
    ui::{self, chart::TerminalChart},
};

fn render_to_string(width: u16, height: u16, state: &CardState<TerminalChart>) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, state, at("2024-01-01T05:30:00Z")))
        .expect("draw");

    let buffer = terminal.backend().buffer().clone();
    let mut lines = Vec::new();
    for y in 0..height {
        let mut line = String::new();
        for x in 0..width {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

async fn ready_card(tx: &mpsc::Sender<AppEvent>) -> CardState<TerminalChart> {
    let mut state = card_state(TerminalChart::new(), Arc::new(ManualSource::default()));
    let now = at("2024-01-01T00:30:00Z");
    state.set_config(card_config()).expect("config");
    state
        .handle_event(AppEvent::HostUpdated(host()), tx, now)
        .await
        .expect("host");
    state
        .handle_event(AppEvent::Bootstrap, tx, now)
        .await
        .expect("bootstrap");
    let generation = state.generation();
    state
        .handle_event(
            AppEvent::ForecastPushed {
                generation,
                event: daily_event(),
            },
            tx,
            now,
        )
        .await
        .expect("push");
    state
}

#[tokio::test]
async fn first_push_waits_for_layout_then_draws_chart() {
    let (tx, _rx) = mpsc::channel(16);
    let mut state = ready_card(&tx).await;
    assert!(state.chart().is_deferred());

    let before = render_to_string(80, 30, &state);
    assert!(before.contains("Loading forecast"), "{before}");

    state
        .handle_event(AppEvent::AnimationFrame, &tx, at("2024-01-01T00:30:00Z"))
        .await
        .expect("frame");
    assert!(!state.chart().is_deferred());
    assert!(state.chart().chart_id().is_some());

    let after = render_to_string(80, 30, &state);
    assert!(!after.contains("Loading forecast"), "{after}");
    for day in ["MON", "TUE", "WED"] {
        assert!(after.contains(day), "{day} missing:\n{after}");
    }
    assert!(after.contains("Home"), "{after}");
    assert!(after.contains("7.3°C"), "{after}");
    assert!(after.contains("73 %"), "{after}");
    assert!(after.contains("q quit"), "{after}");
}

#[tokio::test]
async fn tiny_terminal_shows_resize_hint() {
    let (tx, _rx) = mpsc::channel(16);
    let state = ready_card(&tx).await;
    let rendered = render_to_string(24, 8, &state);
    assert!(rendered.contains("Terminal too"), "{rendered}");
}

#[test]
fn unconfigured_card_waits_for_inputs() {
    let state = card_state(TerminalChart::new(), Arc::new(ManualSource::default()));
    let rendered = render_to_string(60, 14, &state);
    assert!(rendered.contains("Waiting for card configuration"), "{rendered}");
}

#[tokio::test]
async fn missing_entity_is_reported_in_card() {
    let mut state = card_state(TerminalChart::new(), Arc::new(ManualSource::default()));
    let mut config = card_config();
    config.entity = "weather.elsewhere".to_string();
    state.set_config(config).expect("config");
    state.set_host(host());
    let rendered = render_to_string(60, 14, &state);
    assert!(rendered.contains("Please, check your weather entity"), "{rendered}");
    assert!(rendered.contains("Home"), "{rendered}");
}
