use tracing::debug;

use super::definition::{ChartData, ChartDefinition, ChartTheme};
use crate::{
    app::config::{CardConfig, ChartStyle},
    domain::weather::{Cadence, PrecipitationMode, UnitSystem},
    error::CardError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(pub u64);

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

/// Drawing backend a chart instance lives in.
pub trait ChartRenderer {
    /// Whether the drawing surface exists yet.
    fn surface_ready(&self) -> bool;
    fn create(&mut self, definition: &ChartDefinition) -> Result<ChartId, CardError>;
    fn update(&mut self, id: ChartId, data: &ChartData) -> Result<(), CardError>;
    fn destroy(&mut self, id: ChartId);
}

/// Inputs that decide axes, dataset shape and styling. Any difference
/// between two fingerprints means the chart must be rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStructure {
    pub entity: String,
    pub cadence: Cadence,
    pub style: ChartStyle,
    pub precipitation_mode: PrecipitationMode,
    pub show_probability: bool,
    pub labels_font_size: f64,
    pub precip_bar_size: f64,
    pub chart_height: u32,
    pub colors: [String; 3],
    pub chart_text_color: String,
    pub chart_datetime_color: Option<String>,
    pub disable_animation: bool,
    pub use_12hour_format: bool,
    pub unit_system: UnitSystem,
    pub locale: String,
    pub theme: ChartTheme,
    pub dataset_count: usize,
}

impl ChartStructure {
    #[must_use]
    pub fn new(
        config: &CardConfig,
        unit_system: &UnitSystem,
        locale: &str,
        theme: &ChartTheme,
        dataset_count: usize,
    ) -> Self {
        let forecast = &config.forecast;
        Self {
            entity: config.entity.clone(),
            cadence: forecast.cadence,
            style: forecast.style,
            precipitation_mode: forecast.precipitation_type,
            show_probability: forecast.show_probability,
            labels_font_size: forecast.labels_font_size,
            precip_bar_size: forecast.precip_bar_size,
            chart_height: forecast.chart_height,
            colors: [
                forecast.temperature1_color.clone(),
                forecast.temperature2_color.clone(),
                forecast.precipitation_color.clone(),
            ],
            chart_text_color: forecast.chart_text_color.clone(),
            chart_datetime_color: forecast.chart_datetime_color.clone(),
            disable_animation: forecast.disable_animation,
            use_12hour_format: config.use_12hour_format,
            unit_system: unit_system.clone(),
            locale: locale.to_string(),
            theme: theme.clone(),
            dataset_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChartState {
    #[default]
    Absent,
    Built {
        id: ChartId,
        structure: ChartStructure,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTransition {
    Built(ChartId),
    Rebuilt { previous: ChartId, current: ChartId },
    Updated(ChartId),
    /// No surface yet; retry on the next animation frame.
    Deferred,
}

/// Owns the single live chart instance.
#[derive(Debug)]
pub struct ChartController<R> {
    renderer: R,
    state: ChartState,
    deferred: bool,
    force_rebuild: bool,
}

impl<R: ChartRenderer> ChartController<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            state: ChartState::Absent,
            deferred: false,
            force_rebuild: false,
        }
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    pub fn chart_id(&self) -> Option<ChartId> {
        match &self.state {
            ChartState::Built { id, .. } => Some(*id),
            ChartState::Absent => None,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Next `sync` rebuilds even when the structure is unchanged.
    pub fn request_rebuild(&mut self) {
        self.force_rebuild = true;
    }

    /// Brings the live chart in line with `definition`: in-place update when
    /// `structure` matches the live chart, otherwise destroy and rebuild.
    pub fn sync(
        &mut self,
        structure: ChartStructure,
        definition: &ChartDefinition,
    ) -> Result<ChartTransition, CardError> {
        let in_place = match &self.state {
            ChartState::Built { id, structure: live } if !self.force_rebuild && *live == structure => {
                Some(*id)
            }
            _ => None,
        };
        if let Some(id) = in_place {
            self.renderer.update(id, &definition.data)?;
            debug!(%id, "chart data updated in place");
            return Ok(ChartTransition::Updated(id));
        }

        if !self.renderer.surface_ready() {
            return Ok(self.defer());
        }

        let previous = self.destroy_live();
        let id = match self.renderer.create(definition) {
            Ok(id) => id,
            Err(CardError::RenderTargetMissing) => return Ok(self.defer()),
            Err(err) => return Err(err),
        };
        self.state = ChartState::Built { id, structure };
        self.deferred = false;
        self.force_rebuild = false;

        Ok(match previous {
            Some(previous) => {
                debug!(%previous, current = %id, "chart rebuilt");
                ChartTransition::Rebuilt {
                    previous,
                    current: id,
                }
            }
            None => {
                debug!(%id, "chart built");
                ChartTransition::Built(id)
            }
        })
    }

    /// Destroys the live chart while the card has nothing to draw, so the
    /// chart area stays empty. Returns whether one existed.
    pub fn clear(&mut self) -> bool {
        self.destroy_live().is_some()
    }

    /// Destroys the live chart. Returns whether one existed.
    pub fn detach(&mut self) -> bool {
        self.deferred = false;
        self.destroy_live().is_some()
    }

    fn defer(&mut self) -> ChartTransition {
        self.deferred = true;
        debug!("chart surface missing, draw deferred to next frame");
        ChartTransition::Deferred
    }

    fn destroy_live(&mut self) -> Option<ChartId> {
        match std::mem::take(&mut self.state) {
            ChartState::Built { id, .. } => {
                self.renderer.destroy(id);
                Some(id)
            }
            ChartState::Absent => None,
        }
    }
}

/// Keeps the live definition in memory instead of drawing it. Used by
/// one-shot mode and tests.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    surface: bool,
    next_id: u64,
    live: Option<(ChartId, ChartDefinition)>,
    pub created: usize,
    pub updated: usize,
    pub destroyed: usize,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            surface: true,
            next_id: 1,
            live: None,
            created: 0,
            updated: 0,
            destroyed: 0,
        }
    }

    /// Starts without a surface, as before the first layout pass.
    #[must_use]
    pub fn unmounted() -> Self {
        Self {
            surface: false,
            ..Self::new()
        }
    }

    pub fn mount(&mut self) {
        self.surface = true;
    }

    #[must_use]
    pub fn live(&self) -> Option<&ChartDefinition> {
        self.live.as_ref().map(|(_, definition)| definition)
    }
}

impl ChartRenderer for HeadlessRenderer {
    fn surface_ready(&self) -> bool {
        self.surface
    }

    fn create(&mut self, definition: &ChartDefinition) -> Result<ChartId, CardError> {
        if !self.surface {
            return Err(CardError::RenderTargetMissing);
        }
        let id = ChartId(self.next_id);
        self.next_id += 1;
        self.live = Some((id, definition.clone()));
        self.created += 1;
        Ok(id)
    }

    fn update(&mut self, id: ChartId, data: &ChartData) -> Result<(), CardError> {
        match &mut self.live {
            Some((live, definition)) if *live == id => {
                definition.apply(data);
                self.updated += 1;
                Ok(())
            }
            _ => Err(CardError::RenderTargetMissing),
        }
    }

    fn destroy(&mut self, id: ChartId) {
        if self.live.as_ref().is_some_and(|(live, _)| *live == id) {
            self.live = None;
        }
        self.destroyed += 1;
    }
}

#[cfg(test)]
mod tests;
