use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    app::{
        config::CardConfig,
        events::{AppEvent, schedule_animation_frame},
        scheduler::RefreshScheduler,
        view_model::{ViewInputs, ViewModel, derive_view_model},
    },
    chart::{
        ChartContext, ChartController, ChartDefinition, ChartRenderer, ChartStructure, ChartTheme,
        ChartTransition, ForecastSeries, SeriesOptions, build_series,
    },
    data::{
        forecast::{ForecastStore, window_size},
        host::HostSnapshot,
        subscription::{ForecastSink, ForecastSource, SubscribeRequest, SubscriptionHandle},
    },
    domain::weather::{ForecastEvent, ForecastSample},
    error::CardError,
    i18n::{Catalog, DEFAULT_LOCALE},
};

mod input;

/// Pixel width of one terminal column when measuring the card.
pub const CELL_WIDTH_PX: f64 = 8.0;

/// Columns taken by the card's left and right border.
const BORDER_COLUMNS: u16 = 2;

/// Container width in pixels for a terminal `columns` wide.
#[must_use]
pub fn container_width_px(columns: u16) -> f64 {
    f64::from(columns.saturating_sub(BORDER_COLUMNS)) * CELL_WIDTH_PX
}

#[derive(Debug, Clone)]
pub struct CardOptions {
    pub offset: FixedOffset,
    pub theme: ChartTheme,
    pub frame_ms: u64,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            theme: ChartTheme::default(),
            frame_ms: 16,
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
struct Dirty {
    config: bool,
    host: bool,
    forecast: bool,
    layout: bool,
}

impl Dirty {
    fn any(self) -> bool {
        self.config || self.host || self.forecast || self.layout
    }
}

/// Observed state of one card. Every mutation marks what changed and
/// `reconcile` turns the marks into subscription, timer and chart work.
pub struct CardState<R: ChartRenderer> {
    pub running: bool,
    config: Option<CardConfig>,
    host: Option<HostSnapshot>,
    store: ForecastStore,
    container_width: f64,
    chart: ChartController<R>,
    scheduler: RefreshScheduler,
    source: Arc<dyn ForecastSource>,
    subscription: Option<SubscriptionHandle>,
    generation: u64,
    subscription_failed: bool,
    attached: bool,
    dirty: Dirty,
    frame_requested: bool,
    catalog: Catalog,
    options: CardOptions,
    last_error: Option<String>,
}

impl<R: ChartRenderer> CardState<R> {
    pub fn new(renderer: R, source: Arc<dyn ForecastSource>, options: CardOptions) -> Self {
        Self {
            running: true,
            config: None,
            host: None,
            store: ForecastStore::default(),
            container_width: 0.0,
            chart: ChartController::new(renderer),
            scheduler: RefreshScheduler::new(),
            source,
            subscription: None,
            generation: 0,
            subscription_failed: false,
            attached: false,
            dirty: Dirty::default(),
            frame_requested: false,
            catalog: Catalog::builtin(),
            options,
            last_error: None,
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    pub fn host(&self) -> Option<&HostSnapshot> {
        self.host.as_ref()
    }

    pub fn store(&self) -> &ForecastStore {
        &self.store
    }

    pub fn chart(&self) -> &ChartController<R> {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartController<R> {
        &mut self.chart
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &CardOptions {
        &self.options
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn autoscroll_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validates and installs a configuration. A different entity or cadence
    /// releases the current subscription.
    pub fn set_config(&mut self, config: CardConfig) -> Result<(), CardError> {
        config.validate()?;
        let resubscribe = self.config.as_ref().is_none_or(|current| {
            current.entity != config.entity || current.forecast.cadence != config.forecast.cadence
        });
        if resubscribe {
            self.release_subscription();
            self.store.set_cadence(config.forecast.cadence);
            self.store.clear();
        }
        self.subscription_failed = false;
        self.last_error = None;
        self.config = Some(config);
        self.sync_locale();
        self.dirty.config = true;
        Ok(())
    }

    pub fn set_host(&mut self, host: HostSnapshot) {
        self.host = Some(host);
        self.sync_locale();
        self.dirty.host = true;
    }

    /// Applies one subscription push. Pushes from a released subscription or
    /// after detach are dropped.
    pub fn apply_forecast(&mut self, generation: u64, event: ForecastEvent, now: DateTime<Utc>) {
        let current = self.subscription.as_ref().map(SubscriptionHandle::generation);
        if !self.attached || current != Some(generation) {
            debug!(generation, ?current, "dropping stale forecast push");
            return;
        }
        self.store.replace(event.forecast);
        if self.autoscroll_enabled() {
            self.store.prune_outdated(now);
        }
        self.dirty.forecast = true;
    }

    /// New container width in pixels.
    pub fn resize(&mut self, width_px: f64) {
        if (self.container_width - width_px).abs() > f64::EPSILON {
            self.container_width = width_px;
            self.dirty.layout = true;
        }
    }

    pub fn autoscroll_tick(&mut self, token: u64, now: DateTime<Utc>) {
        if !self.scheduler.fired(token) || !self.attached || !self.autoscroll_enabled() {
            return;
        }
        self.store.prune_outdated(now);
        self.dirty.forecast = true;
    }

    pub fn animation_frame(&mut self) {
        self.frame_requested = false;
        if self.attached && self.chart.is_deferred() {
            self.dirty.layout = true;
        }
    }

    pub fn request_rebuild(&mut self) {
        self.chart.request_rebuild();
        self.dirty.config = true;
    }

    pub fn toggle_autoscroll(&mut self) {
        if let Some(config) = &mut self.config {
            config.autoscroll = !config.autoscroll;
            info!(autoscroll = config.autoscroll, "autoscroll toggled");
            self.dirty.config = true;
        }
    }

    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.subscription_failed = false;
        self.dirty = Dirty {
            config: true,
            host: true,
            forecast: true,
            layout: true,
        };
    }

    /// Stops the hourly timer, releases the subscription and destroys the
    /// chart. Later pushes, ticks and frames become no-ops.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.scheduler.cancel();
        self.release_subscription();
        self.chart.detach();
        self.store.clear();
        self.dirty = Dirty::default();
    }

    pub fn window(&self) -> &[ForecastSample] {
        self.store.window(self.window_len())
    }

    pub fn window_len(&self) -> usize {
        let Some(config) = &self.config else {
            return 0;
        };
        window_size(
            config.forecast.number_of_forecasts,
            self.container_width,
            config.forecast.labels_font_size,
        )
    }

    pub fn series(&self) -> Option<ForecastSeries<'_>> {
        let config = self.config.as_ref()?;
        Some(build_series(
            self.window(),
            SeriesOptions {
                round_temp: config.forecast.round_temp,
                precipitation_mode: config.forecast.precipitation_type,
            },
        ))
    }

    #[must_use]
    pub fn view_model(&self, now: DateTime<Utc>) -> ViewModel {
        derive_view_model(&ViewInputs {
            config: self.config.as_ref(),
            host: self.host.as_ref(),
            window: self.window(),
            translator: &self.catalog,
            now,
            offset: self.options.offset,
        })
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => self.attach(),
            AppEvent::HostUpdated(host) => self.set_host(host),
            AppEvent::ForecastPushed { generation, event } => {
                self.apply_forecast(generation, event, now);
            }
            AppEvent::AutoscrollTick { token } => self.autoscroll_tick(token, now),
            AppEvent::AnimationFrame => self.animation_frame(),
            AppEvent::Resize { width_px } => self.resize(width_px),
            AppEvent::Input(event) => self.handle_input(event, tx).await?,
            AppEvent::Detach => self.detach(),
            AppEvent::Quit => {
                self.detach();
                self.running = false;
            }
        }
        self.reconcile(tx, now);
        Ok(())
    }

    async fn handle_input(&mut self, event: Event, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match input::command_for(key) {
                    Some(input::KeyCommand::Quit) => tx.send(AppEvent::Quit).await?,
                    Some(input::KeyCommand::Rebuild) => self.request_rebuild(),
                    Some(input::KeyCommand::ToggleAutoscroll) => self.toggle_autoscroll(),
                    None => {}
                }
            }
            Event::Resize(columns, _) => {
                self.resize(container_width_px(columns));
            }
            _ => {}
        }
        Ok(())
    }

    /// Turns dirty marks into subscription, scheduler and chart transitions.
    pub fn reconcile(&mut self, tx: &mpsc::Sender<AppEvent>, now: DateTime<Utc>) {
        if !self.attached || !self.dirty.any() {
            return;
        }
        let dirty = std::mem::take(&mut self.dirty);
        let Some(config) = self.config.clone() else {
            return;
        };

        if dirty.config || dirty.host {
            self.ensure_subscription(&config, tx);
        }

        if config.autoscroll {
            self.scheduler
                .enable(tx, &now.with_timezone(&self.options.offset));
            self.store.prune_outdated(now);
        } else {
            self.scheduler.cancel();
        }

        self.sync_chart(&config, tx);
    }

    fn ensure_subscription(&mut self, config: &CardConfig, tx: &mpsc::Sender<AppEvent>) {
        if self.subscription.is_some() || self.subscription_failed {
            return;
        }
        let Some(weather) = self.host.as_ref().and_then(|host| host.entity(&config.entity))
        else {
            return;
        };

        let cadence = config.forecast.cadence;
        if !weather.weather_attributes().supports(cadence.feature()) {
            let err = CardError::Subscription(format!(
                "weather entity \"{}\" does not support {cadence} forecasts",
                config.entity
            ));
            self.fail_subscription(&err);
            return;
        }

        self.generation += 1;
        let request = SubscribeRequest {
            entity_id: config.entity.clone(),
            cadence,
        };
        match self
            .source
            .subscribe(&request, ForecastSink::new(tx.clone(), self.generation))
        {
            Ok(handle) => {
                info!(
                    entity_id = %request.entity_id,
                    %cadence,
                    generation = handle.generation(),
                    "forecast subscription opened"
                );
                self.subscription = Some(handle);
            }
            Err(err) => self.fail_subscription(&err),
        }
    }

    fn fail_subscription(&mut self, err: &CardError) {
        error!(error = %err, "forecast subscription failed");
        self.subscription_failed = true;
        self.last_error = Some(err.to_string());
    }

    fn release_subscription(&mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.unsubscribe();
        }
    }

    fn sync_chart(&mut self, config: &CardConfig, tx: &mpsc::Sender<AppEvent>) {
        let window_len = self.window_len();
        let (Some(host), false) = (&self.host, self.store.window(window_len).is_empty()) else {
            if self.chart.clear() {
                debug!("chart destroyed, no forecast to show");
            }
            return;
        };
        let window = self.store.window(window_len);

        let series = build_series(
            window,
            SeriesOptions {
                round_temp: config.forecast.round_temp,
                precipitation_mode: config.forecast.precipitation_type,
            },
        );
        let ctx = ChartContext {
            forecast: &config.forecast,
            use_12hour_format: config.use_12hour_format,
            unit_system: &host.unit_system,
            theme: &self.options.theme,
            translator: &self.catalog,
            offset: self.options.offset,
        };
        let definition = ChartDefinition::build(&series, &ctx);
        let structure = ChartStructure::new(
            config,
            &host.unit_system,
            self.catalog.locale(),
            &self.options.theme,
            definition.dataset_count(),
        );

        match self.chart.sync(structure, &definition) {
            Ok(ChartTransition::Deferred) => self.request_frame(tx),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "chart sync failed"),
        }
    }

    fn request_frame(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if !self.frame_requested {
            self.frame_requested = true;
            schedule_animation_frame(tx.clone(), self.options.frame_ms);
        }
    }

    fn autoscroll_enabled(&self) -> bool {
        self.config.as_ref().is_some_and(|config| config.autoscroll)
    }

    fn sync_locale(&mut self) {
        let locale = self
            .config
            .as_ref()
            .and_then(|config| config.locale.clone())
            .or_else(|| self.host.as_ref().and_then(|host| host.language.clone()))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        if locale != self.catalog.locale() {
            self.catalog.set_locale(locale);
        }
    }
}
