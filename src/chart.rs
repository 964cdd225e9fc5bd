mod controller;
mod definition;
mod labels;
mod series;

pub use controller::{
    ChartController, ChartId, ChartRenderer, ChartState, ChartStructure, ChartTransition,
    HeadlessRenderer,
};
pub use definition::{
    AxisId, ChartContext, ChartData, ChartDefinition, ChartOptions, ChartTheme, DatasetData,
    DatasetKind, DatasetStyle, LabelAlign, LabelStyle, Tooltip, ValueAxis,
    precipitation_axis_max,
};
pub use labels::{
    precipitation_amount, precipitation_label, temperature_label, tick_label, tooltip_line,
    tooltip_title,
};
pub use series::{ForecastSeries, SeriesOptions, build_series};
