use std::cell::Cell;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Paragraph,
        canvas::{Canvas, Context, Line as CanvasLine},
    },
};

use crate::{
    chart::{
        AxisId, ChartData, ChartDefinition, ChartId, ChartRenderer, DatasetKind, DatasetStyle,
        LabelAlign, LabelStyle,
    },
    error::CardError,
    ui::theme::Palette,
};

const BAR_STROKES: usize = 8;

/// Chart instance drawn with a braille canvas. The surface exists once a
/// frame has laid the chart area out.
#[derive(Debug, Default)]
pub struct TerminalChart {
    surface: Cell<Option<Rect>>,
    next_id: u64,
    live: Option<(ChartId, ChartDefinition)>,
}

impl TerminalChart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn live(&self) -> Option<&ChartDefinition> {
        self.live.as_ref().map(|(_, definition)| definition)
    }

    fn mount(&self, area: Rect) {
        self.surface.set(Some(area).filter(|a| a.width > 0 && a.height > 0));
    }
}

impl ChartRenderer for TerminalChart {
    fn surface_ready(&self) -> bool {
        self.surface.get().is_some()
    }

    fn create(&mut self, definition: &ChartDefinition) -> Result<ChartId, CardError> {
        if !self.surface_ready() {
            return Err(CardError::RenderTargetMissing);
        }
        self.next_id += 1;
        let id = ChartId(self.next_id);
        self.live = Some((id, definition.clone()));
        Ok(id)
    }

    fn update(&mut self, id: ChartId, data: &ChartData) -> Result<(), CardError> {
        match &mut self.live {
            Some((live, definition)) if *live == id => {
                definition.apply(data);
                Ok(())
            }
            _ => Err(CardError::RenderTargetMissing),
        }
    }

    fn destroy(&mut self, id: ChartId) {
        if self.live.as_ref().is_some_and(|(live, _)| *live == id) {
            self.live = None;
        }
    }
}

/// Horizontal cell center of category `idx` out of `count`.
fn column_x(idx: usize, count: usize, reverse: bool) -> f64 {
    let idx = if reverse { count - 1 - idx } else { idx };
    idx as f64
}

pub fn render(frame: &mut Frame, area: Rect, chart: &TerminalChart, palette: &Palette) {
    chart.mount(area);
    let Some(definition) = chart.live() else {
        let placeholder = Paragraph::new("Loading forecast…")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, area);
        return;
    };

    let count = definition.data.labels.len();
    if count == 0 || area.height < 4 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(2)])
        .split(area);
    let (ticks_area, plot_area) = if definition.options.x_axis_on_top {
        (rows[0], rows[1])
    } else {
        (rows[1], rows[0])
    };

    render_ticks(frame, ticks_area, definition, palette);
    render_plot(frame, plot_area, definition, palette);
}

fn render_ticks(frame: &mut Frame, area: Rect, definition: &ChartDefinition, palette: &Palette) {
    let style = Style::default().fg(palette.color(&definition.options.datetime_color, Color::Gray));
    let count = definition.data.labels.len();
    let reverse = definition.options.reverse_x;
    let mut upper = vec![String::new(); count];
    let mut lower = vec![String::new(); count];
    for (idx, label) in definition.data.labels.iter().enumerate() {
        let slot = column_x(idx, count, reverse) as usize;
        match label.as_slice() {
            [date, time] => {
                upper[slot].clone_from(date);
                lower[slot].clone_from(time);
            }
            [single] => lower[slot].clone_from(single),
            _ => {}
        }
    }
    let lines = [upper, lower]
        .into_iter()
        .map(|row| Line::from(spread(&row, area.width)).style(style))
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().add_modifier(Modifier::BOLD)),
        area,
    );
}

/// Centers each label in an equal share of `width` columns.
#[must_use]
pub fn spread(labels: &[String], width: u16) -> String {
    let count = labels.len().max(1);
    let slot = usize::from(width) / count;
    let mut out = String::with_capacity(usize::from(width));
    for label in labels {
        let text: String = label.chars().take(slot).collect();
        let len = text.chars().count();
        let left = slot.saturating_sub(len) / 2;
        let right = slot.saturating_sub(len + left);
        out.push_str(&" ".repeat(left));
        out.push_str(&text);
        out.push_str(&" ".repeat(right));
    }
    out
}

fn render_plot(frame: &mut Frame, area: Rect, definition: &ChartDefinition, palette: &Palette) {
    let count = definition.data.labels.len();
    let reverse = definition.options.reverse_x;
    let (lo, hi) = definition
        .data
        .temperature_bounds
        .filter(|(lo, hi)| hi > lo)
        .unwrap_or((0.0, 1.0));
    let precip_max = definition
        .precipitation_axis
        .suggested_max
        .filter(|max| *max > 0.0)
        .unwrap_or(1.0);
    let text_color = palette.color(&definition.options.text_color, Color::White);
    let background = palette.background();
    let cell_w = count as f64 / f64::from(area.width.max(1));
    let cell_h = (hi - lo) / f64::from(area.height.max(1));

    let canvas = Canvas::default()
        .background_color(background)
        .marker(Marker::Braille)
        .x_bounds([-0.5, count as f64 - 0.5])
        .y_bounds([lo, hi])
        .paint(|ctx| {
            for (style, data) in definition.datasets.iter().zip(&definition.data.datasets) {
                if let DatasetKind::Bar {
                    bar_percentage,
                    category_percentage,
                } = style.kind
                {
                    let color = palette.color(&style.color, Color::LightBlue);
                    let width = (bar_percentage * category_percentage).clamp(0.05, 1.0);
                    for (idx, value) in data.values.iter().enumerate() {
                        let height = (value / precip_max).clamp(0.0, 1.0) * (hi - lo);
                        if height <= 0.0 {
                            continue;
                        }
                        let x = column_x(idx, count, reverse);
                        draw_bar(ctx, x, width, lo, height, color);
                    }
                }
            }
            ctx.layer();

            for (style, data) in definition.datasets.iter().zip(&definition.data.datasets) {
                if style.kind != DatasetKind::Line || style.axis != AxisId::Temperature {
                    continue;
                }
                let color = palette.color(&style.color, Color::Yellow);
                let points = data
                    .values
                    .iter()
                    .enumerate()
                    .map(|(idx, value)| (column_x(idx, count, reverse), *value))
                    .collect::<Vec<_>>();
                for pair in points.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: pair[0].1,
                        x2: pair[1].0,
                        y2: pair[1].1,
                        color,
                    });
                }
            }
            ctx.layer();

            for (style, data) in definition.datasets.iter().zip(&definition.data.datasets) {
                for (idx, label) in data.point_labels.iter().enumerate() {
                    let Some(label) = label else { continue };
                    let value = data.values.get(idx).copied().unwrap_or(lo);
                    let x = column_x(idx, count, reverse);
                    print_label(
                        ctx,
                        LabelAnchor { x, value, lo, cell_w, cell_h },
                        label,
                        style,
                        palette,
                        text_color,
                        background,
                    );
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_bar(ctx: &mut Context<'_>, x: f64, width: f64, base: f64, height: f64, color: Color) {
    let left = x - width / 2.0;
    for stroke in 0..=BAR_STROKES {
        let bx = left + width * stroke as f64 / BAR_STROKES as f64;
        ctx.draw(&CanvasLine {
            x1: bx,
            y1: base,
            x2: bx,
            y2: base + height,
            color,
        });
    }
}

#[derive(Clone, Copy)]
struct LabelAnchor {
    x: f64,
    value: f64,
    lo: f64,
    cell_w: f64,
    cell_h: f64,
}

fn print_label(
    ctx: &mut Context<'_>,
    anchor: LabelAnchor,
    label: &str,
    style: &DatasetStyle,
    palette: &Palette,
    text_color: Color,
    background: Color,
) {
    let lines = label.lines().filter(|line| !line.is_empty()).collect::<Vec<_>>();
    let centered = |text: &str| anchor.x - text.chars().count() as f64 * anchor.cell_w / 2.0;
    match &style.labels {
        LabelStyle::Boxed => {
            let color = palette.color(&style.color, text_color);
            for text in lines {
                ctx.print(
                    centered(text),
                    anchor.value,
                    Span::styled(text.to_string(), Style::default().fg(background).bg(color)),
                );
            }
        }
        LabelStyle::Floating { align, color, .. } => {
            let fg = palette.color(color, text_color);
            let y = match align {
                LabelAlign::Top => anchor.value + anchor.cell_h,
                LabelAlign::Bottom => anchor.value - anchor.cell_h,
            };
            for text in lines {
                ctx.print(
                    centered(text),
                    y,
                    Span::styled(text.to_string(), Style::default().fg(fg)),
                );
            }
        }
        LabelStyle::Bar => {
            for (row, text) in lines.iter().copied().rev().enumerate() {
                ctx.print(
                    centered(text),
                    anchor.lo + row as f64 * anchor.cell_h,
                    Span::styled(text.to_string(), Style::default().fg(text_color)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_centers_labels_in_equal_slots() {
        let labels = ["MON", "TUE"].map(str::to_string);
        assert_eq!(spread(&labels, 10), " MON  TUE ");
    }

    #[test]
    fn spread_truncates_to_slot() {
        let labels = ["Jan 12".to_string()];
        assert_eq!(spread(&labels, 4), "Jan ");
    }

    #[test]
    fn surface_appears_after_first_layout() {
        let mut chart = TerminalChart::new();
        assert!(!chart.surface_ready());
        assert_eq!(
            chart
                .update(ChartId(1), &ChartData::default())
                .expect_err("nothing live"),
            CardError::RenderTargetMissing
        );
        chart.mount(Rect::new(0, 0, 40, 10));
        assert!(chart.surface_ready());
        chart.mount(Rect::new(0, 0, 0, 10));
        assert!(!chart.surface_ready());
    }

    #[test]
    fn columns_reverse_for_rtl() {
        assert_eq!(column_x(0, 3, false), 0.0);
        assert_eq!(column_x(0, 3, true), 2.0);
    }
}
