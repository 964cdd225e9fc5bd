pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::{
    fs::File,
    io::{self, Stdout},
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use app::{
    config::{CardConfig, load_config},
    events::{AppEvent, spawn_input_task},
    state::{CardOptions, CardState, container_width_px},
};
use chart::{ChartRenderer, ChartTheme, HeadlessRenderer};
use chrono::Utc;
use cli::Cli;
use crossterm::{
    event::DisableMouseCapture,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use data::{
    host::{HostSnapshot, load_host_snapshot},
    subscription::ReplaySource,
};
use futures::StreamExt;
use i18n::Catalog;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::chart::TerminalChart;

/// How long one-shot mode waits for another push before printing.
const ONE_SHOT_IDLE: Duration = Duration::from_millis(300);

/// Card inputs read from disk.
pub struct CardInputs {
    pub config: CardConfig,
    pub host: HostSnapshot,
    pub source: ReplaySource,
    pub catalog: Catalog,
}

pub fn load_inputs(cli: &Cli) -> Result<CardInputs> {
    let mut config = load_config(&cli.config)?;
    if let Some(locale) = &cli.locale {
        config.locale = Some(locale.clone());
    }
    let host = load_host_snapshot(&cli.states)?;
    let source = ReplaySource::from_path(&cli.forecast)?.with_interval(cli.replay_interval());
    let mut catalog = Catalog::builtin();
    if let Some(path) = &cli.translations {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading translations {} failed", path.display()))?;
        catalog
            .merge_json(&content)
            .with_context(|| format!("translations {} are invalid", path.display()))?;
    }
    Ok(CardInputs {
        config,
        host,
        source,
        catalog,
    })
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(&cli)?;
    let inputs = load_inputs(&cli)?;
    if cli.one_shot {
        let report = run_one_shot(&cli, inputs).await?;
        print!("{report}");
        return Ok(());
    }

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, &cli, inputs).await;
    restore_terminal(&mut terminal)?;
    result
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if cli.one_shot {
        builder.with_writer(io::stderr).try_init()
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {} failed", path.display()))?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        return Ok(());
    };
    installed.map_err(|err| anyhow::anyhow!("installing log subscriber failed: {err}"))
}

fn card<R: ChartRenderer>(renderer: R, cli: &Cli, inputs: CardInputs) -> Result<CardState<R>> {
    let options = CardOptions {
        offset: cli.offset(),
        theme: ChartTheme {
            rtl: cli.rtl,
            ..ChartTheme::default()
        },
        frame_ms: cli.frame_ms,
    };
    let mut state =
        CardState::new(renderer, Arc::new(inputs.source), options).with_catalog(inputs.catalog);
    state.set_config(inputs.config)?;
    Ok(state)
}

async fn start_card(
    tx: &mpsc::Sender<AppEvent>,
    host: HostSnapshot,
    columns: u16,
) -> Result<()> {
    tx.send(AppEvent::HostUpdated(host)).await?;
    tx.send(AppEvent::Bootstrap).await?;
    tx.send(AppEvent::Resize {
        width_px: container_width_px(columns),
    })
    .await?;
    Ok(())
}

/// Runs the card against the headless renderer until the feed goes quiet and
/// returns the text report.
pub async fn run_one_shot(cli: &Cli, mut inputs: CardInputs) -> Result<String> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let host = std::mem::take(&mut inputs.host);
    let mut state = card(HeadlessRenderer::new(), cli, inputs)?;
    start_card(&tx, host, cli.width).await?;

    let idle = ONE_SHOT_IDLE + cli.replay_interval().unwrap_or_default();
    while let Ok(Some(event)) = tokio::time::timeout(idle, rx.recv()).await {
        state.handle_event(event, &tx, Utc::now()).await?;
    }

    let now = Utc::now();
    let report = ui::text::card_report(&state.view_model(now), state.chart().renderer().live());
    info!(samples = state.store().len(), "one-shot report ready");
    state.handle_event(AppEvent::Detach, &tx, now).await?;
    Ok(report)
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cli: &Cli,
    mut inputs: CardInputs,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);

    let host = std::mem::take(&mut inputs.host);
    let mut app = card(TerminalChart::new(), cli, inputs)?;
    let size = terminal.size()?;
    start_card(&tx, host, size.width).await?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx, Utc::now()).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx, Utc::now()).await?;
                }
            }
        }

        terminal.draw(|frame| ui::render(frame, &app, Utc::now()))?;
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        existing(panic);
    }));
}
