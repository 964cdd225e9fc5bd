use chrono::FixedOffset;

use super::{
    labels::{precipitation_label, temperature_label, tick_label, tooltip_line, tooltip_title},
    series::ForecastSeries,
};
use crate::{
    app::config::{ChartStyle, ForecastConfig},
    domain::weather::{Cadence, PrecipitationMode, UnitSystem},
    i18n::Translator,
};

/// Host colors the chart inherits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTheme {
    pub text_color: String,
    pub divider_color: String,
    pub background_color: String,
    pub rtl: bool,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            text_color: "rgba(225, 225, 225, 1.0)".to_string(),
            divider_color: "rgba(225, 225, 225, 0.12)".to_string(),
            background_color: "rgba(28, 28, 28, 1.0)".to_string(),
            rtl: false,
        }
    }
}

/// Everything a chart build reads besides the series.
#[derive(Clone, Copy)]
pub struct ChartContext<'a> {
    pub forecast: &'a ForecastConfig,
    pub use_12hour_format: bool,
    pub unit_system: &'a UnitSystem,
    pub theme: &'a ChartTheme,
    pub translator: &'a dyn Translator,
    pub offset: FixedOffset,
}

impl ChartContext<'_> {
    #[must_use]
    pub fn precipitation_unit(&self) -> String {
        match self.forecast.precipitation_type {
            PrecipitationMode::Probability => "%".to_string(),
            PrecipitationMode::Rainfall if self.unit_system.is_metric_length() => {
                self.translator.text("units.mm")
            }
            PrecipitationMode::Rainfall => self.translator.text("units.in"),
        }
    }

    #[must_use]
    pub fn text_color(&self) -> String {
        if self.forecast.chart_text_color == "auto" {
            self.theme.text_color.clone()
        } else {
            self.forecast.chart_text_color.clone()
        }
    }

    /// Daily rainfall charts with a probability line need tighter padding.
    fn compact_labels(&self) -> bool {
        self.forecast.precipitation_type == PrecipitationMode::Rainfall
            && self.forecast.show_probability
            && self.forecast.cadence != Cadence::Hourly
    }

    fn probability_lines(&self) -> bool {
        self.forecast.precipitation_type == PrecipitationMode::Rainfall
            && self.forecast.show_probability
    }
}

/// Fixed ceiling of the precipitation axis. Larger values are clipped.
#[must_use]
pub fn precipitation_axis_max(mode: PrecipitationMode, cadence: Cadence, metric: bool) -> f64 {
    match (mode, cadence, metric) {
        (PrecipitationMode::Probability, _, _) => 100.0,
        (_, Cadence::Hourly, true) => 4.0,
        (_, Cadence::Daily, true) => 20.0,
        (_, _, false) => 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisId {
    Temperature,
    Precipitation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatasetKind {
    Line,
    Bar {
        bar_percentage: f64,
        category_percentage: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAlign {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabelStyle {
    /// Value in a box drawn in the dataset color.
    Boxed,
    Floating {
        align: LabelAlign,
        color: String,
        font_size: f64,
    },
    /// Precipitation amount anchored at the bar base.
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStyle {
    pub label: String,
    pub kind: DatasetKind,
    pub axis: AxisId,
    pub color: String,
    pub labels: LabelStyle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetData {
    pub values: Vec<f64>,
    /// Rendered data label per value; `None` hides it.
    pub point_labels: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
}

/// The part of a chart a data refresh replaces in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<Vec<String>>,
    pub datasets: Vec<DatasetData>,
    pub temperature_bounds: Option<(f64, f64)>,
    pub tooltips: Vec<Tooltip>,
}

impl ChartData {
    #[must_use]
    pub fn build(series: &ForecastSeries<'_>, ctx: &ChartContext<'_>) -> Self {
        let forecast = ctx.forecast;
        let precip_unit = ctx.precipitation_unit();
        let temp_unit = ctx.unit_system.temperature.as_str();
        let probability_lines = ctx.probability_lines();

        let labels = series
            .date_time
            .iter()
            .map(|at| tick_label(*at, ctx.offset, forecast.cadence, ctx.use_12hour_format))
            .collect();

        let temperature = |values: &[f64]| DatasetData {
            values: values.to_vec(),
            point_labels: values
                .iter()
                .map(|value| Some(temperature_label(*value)))
                .collect(),
        };
        let precipitation = DatasetData {
            values: series.precip.clone(),
            point_labels: series
                .precip
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    precipitation_label(
                        *value,
                        &precip_unit,
                        forecast.precipitation_type,
                        forecast.show_probability,
                        series.probability(idx),
                    )
                })
                .collect(),
        };

        let high_label = ctx.translator.text("tempHi");
        let low_label = ctx.translator.text("tempLo");
        let precip_label = ctx.translator.text("precip");
        let tooltips = series
            .date_time
            .iter()
            .enumerate()
            .map(|(idx, at)| {
                let mut lines = vec![tooltip_line(
                    &high_label,
                    series.temp_high[idx],
                    temp_unit,
                    None,
                )];
                if let Some(low) = series.temp_low.get(idx) {
                    lines.push(tooltip_line(&low_label, *low, temp_unit, None));
                }
                let probability = series.probability(idx).filter(|_| probability_lines);
                lines.push(tooltip_line(
                    &precip_label,
                    series.precip[idx],
                    &precip_unit,
                    probability,
                ));
                Tooltip {
                    title: tooltip_title(*at, ctx.offset, ctx.use_12hour_format),
                    lines,
                }
            })
            .collect();

        Self {
            labels,
            datasets: vec![
                temperature(&series.temp_high),
                temperature(&series.temp_low),
                precipitation,
            ],
            temperature_bounds: series
                .temperature_range()
                .map(|(lo, hi)| (lo - 5.0, hi + 3.0)),
            tooltips,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueAxis {
    pub suggested_min: Option<f64>,
    pub suggested_max: Option<f64>,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub animation_duration_ms: u32,
    pub tick_padding: u16,
    pub label_padding: u16,
    pub font_size: f64,
    pub height: u32,
    pub text_color: String,
    pub datetime_color: String,
    pub divider_color: String,
    pub background_color: String,
    pub reverse_x: bool,
    pub show_legend: bool,
    pub x_axis_on_top: bool,
}

/// Full description of one chart instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDefinition {
    pub datasets: Vec<DatasetStyle>,
    pub temperature_axis: ValueAxis,
    pub precipitation_axis: ValueAxis,
    pub options: ChartOptions,
    pub data: ChartData,
}

impl ChartDefinition {
    #[must_use]
    pub fn build(series: &ForecastSeries<'_>, ctx: &ChartContext<'_>) -> Self {
        let forecast = ctx.forecast;
        let data = ChartData::build(series, ctx);
        let text_color = ctx.text_color();

        let temperature_labels = |align: LabelAlign| match forecast.style {
            ChartStyle::Style1 => LabelStyle::Boxed,
            ChartStyle::Style2 => LabelStyle::Floating {
                align,
                color: text_color.clone(),
                font_size: forecast.labels_font_size + 1.0,
            },
        };

        let datasets = vec![
            DatasetStyle {
                label: ctx.translator.text("tempHi"),
                kind: DatasetKind::Line,
                axis: AxisId::Temperature,
                color: forecast.temperature1_color.clone(),
                labels: temperature_labels(LabelAlign::Top),
            },
            DatasetStyle {
                label: ctx.translator.text("tempLo"),
                kind: DatasetKind::Line,
                axis: AxisId::Temperature,
                color: forecast.temperature2_color.clone(),
                labels: temperature_labels(LabelAlign::Bottom),
            },
            DatasetStyle {
                label: ctx.translator.text("precip"),
                kind: DatasetKind::Bar {
                    bar_percentage: forecast.precip_bar_size / 100.0,
                    category_percentage: 1.0,
                },
                axis: AxisId::Precipitation,
                color: forecast.precipitation_color.clone(),
                labels: LabelStyle::Bar,
            },
        ];

        let compact = ctx.compact_labels();
        let options = ChartOptions {
            animation_duration_ms: if forecast.disable_animation { 0 } else { 1000 },
            tick_padding: if compact { 4 } else { 10 },
            label_padding: if compact { 3 } else { 4 },
            font_size: forecast.labels_font_size,
            height: forecast.chart_height,
            datetime_color: forecast
                .chart_datetime_color
                .clone()
                .unwrap_or_else(|| ctx.theme.text_color.clone()),
            text_color,
            divider_color: ctx.theme.divider_color.clone(),
            background_color: ctx.theme.background_color.clone(),
            reverse_x: ctx.theme.rtl,
            show_legend: false,
            x_axis_on_top: true,
        };

        Self {
            datasets,
            temperature_axis: ValueAxis {
                suggested_min: data.temperature_bounds.map(|(lo, _)| lo),
                suggested_max: data.temperature_bounds.map(|(_, hi)| hi),
                unit: ctx.unit_system.temperature.clone(),
            },
            precipitation_axis: ValueAxis {
                suggested_min: None,
                suggested_max: Some(precipitation_axis_max(
                    forecast.precipitation_type,
                    forecast.cadence,
                    ctx.unit_system.is_metric_length(),
                )),
                unit: ctx.precipitation_unit(),
            },
            options,
            data,
        }
    }

    /// Replaces the data arrays and the temperature bounds in place.
    pub fn apply(&mut self, data: &ChartData) {
        self.data.clone_from(data);
        self.temperature_axis.suggested_min = data.temperature_bounds.map(|(lo, _)| lo);
        self.temperature_axis.suggested_max = data.temperature_bounds.map(|(_, hi)| hi);
    }

    #[must_use]
    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }
}
