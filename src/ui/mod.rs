pub mod chart;
pub mod glyphs;
pub mod panels;
pub mod text;
pub mod theme;

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    app::{
        state::CardState,
        view_model::{CardView, MISSING_ENTITY_TEXT, ViewModel},
    },
    ui::{chart::TerminalChart, theme::Palette},
};

const APP_TITLE: &str = "weather-chart";
/// Pixels of configured chart height per terminal row.
const ROW_HEIGHT_PX: u32 = 16;

pub fn render(frame: &mut Frame, state: &CardState<TerminalChart>, now: DateTime<Utc>) {
    let area = frame.area();

    if area.width < 30 || area.height < 12 {
        let warning = Paragraph::new("Terminal too small. Resize to at least 30x12.")
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(APP_TITLE));
        frame.render_widget(warning, area);
        return;
    }

    let palette = Palette::new(
        &state.options().theme.background_color,
        theme::detect_color_capability(),
    );
    let border = Style::default().fg(palette.color(&state.options().theme.divider_color, Color::DarkGray));

    match state.view_model(now) {
        ViewModel::Unconfigured => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(APP_TITLE)
                .border_style(border);
            frame.render_widget(
                Paragraph::new("Waiting for card configuration and host state…").block(block),
                area,
            );
        }
        ViewModel::MissingEntity { title } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(title.unwrap_or_else(|| APP_TITLE.to_string()))
                .border_style(border);
            frame.render_widget(
                Paragraph::new(MISSING_ENTITY_TEXT)
                    .style(Style::default().fg(Color::LightRed))
                    .block(block),
                area,
            );
        }
        ViewModel::Ready(view) => render_card(frame, area, state, &view, &palette, border),
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    state: &CardState<TerminalChart>,
    view: &CardView,
    palette: &Palette,
    border: Style,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view.title.clone().unwrap_or_else(|| APP_TITLE.to_string()))
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chart_rows = u16::try_from((view.chart_height / ROW_HEIGHT_PX).max(6)).unwrap_or(6);
    let main_rows = if view.main.is_some() { 2 } else { 0 };
    let attribute_rows = panels::attribute_rows(&view.attributes);
    let icon_rows = u16::from(!view.condition_icons.is_empty());
    let wind_rows = u16::from(!view.wind_forecast.is_empty());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(main_rows),
            Constraint::Length(attribute_rows + u16::from(attribute_rows > 0)),
            Constraint::Min(chart_rows.min(inner.height / 2).max(4)),
            Constraint::Length(icon_rows),
            Constraint::Length(wind_rows),
            Constraint::Length(1),
        ])
        .split(inner);

    if let Some(main) = &view.main {
        panels::render_main(frame, rows[0], main);
    }
    panels::render_attributes(frame, rows[1], &view.attributes);
    chart::render(frame, rows[2], state.chart().renderer(), palette);

    let reverse = state.options().theme.rtl;
    panels::render_forecast_row(
        frame,
        rows[3],
        panels::condition_cells(&view.condition_icons),
        reverse,
    );
    panels::render_forecast_row(frame, rows[4], panels::wind_cells(&view.wind_forecast), reverse);
    render_status(frame, rows[5], state, view);
}

fn render_status(frame: &mut Frame, area: Rect, state: &CardState<TerminalChart>, view: &CardView) {
    let mut parts = Vec::new();
    if let Some(changed) = &view.last_changed {
        parts.push(changed.clone());
    }
    if let Some(err) = state.last_error() {
        parts.push(format!("⚠ {err}"));
    }
    if state.config().is_some_and(|config| config.autoscroll) {
        parts.push("autoscroll".to_string());
    }
    parts.push("q quit · r rebuild · a autoscroll".to_string());
    let style = if state.last_error().is_some() {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(Line::from(parts.join("  "))).style(style), area);
}
