use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::view_model::{Attribute, AttributeKind, MainPanel, WindForecastItem},
    domain::weather::ConditionIcon,
    ui::{
        chart::spread,
        glyphs::{arrow_glyph, attribute_glyph, condition_glyph},
    },
};

pub fn render_main(frame: &mut Frame, area: Rect, main: &MainPanel) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(18)])
        .split(area);

    let mut headline = Vec::new();
    if let Some(icon) = &main.icon {
        headline.push(Span::raw(format!("{} ", condition_glyph(icon))));
    }
    if let Some(temperature) = &main.temperature {
        headline.push(Span::styled(
            temperature.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(condition) = &main.condition {
        headline.push(Span::raw(format!("  {condition}")));
    }

    let mut lines = vec![Line::from(headline)];
    let secondary = [&main.feels_like, &main.description]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>();
    if !secondary.is_empty() {
        lines.push(Line::from(secondary.join("  ·  ")).style(Style::default().fg(Color::Gray)));
    }
    frame.render_widget(Paragraph::new(lines), columns[0]);

    if let Some(clock) = &main.clock {
        let mut lines = vec![Line::from(Span::styled(
            clock.time.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        let date = [&clock.day, &clock.date]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>();
        if !date.is_empty() {
            lines.push(Line::from(date.join(" ")));
        }
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Right), columns[1]);
    }
}

/// Attribute text grouped into the left, middle and right columns.
#[must_use]
pub fn attribute_columns(attributes: &[Attribute]) -> [Vec<String>; 3] {
    let mut columns: [Vec<String>; 3] = Default::default();
    for attribute in attributes {
        let column = match attribute.kind {
            AttributeKind::Humidity
            | AttributeKind::Pressure
            | AttributeKind::DewPoint
            | AttributeKind::Visibility => 0,
            AttributeKind::Uv | AttributeKind::Sunrise | AttributeKind::Sunset => 1,
            AttributeKind::WindDirection | AttributeKind::WindSpeed | AttributeKind::WindGust => 2,
        };
        columns[column].push(format!(
            "{} {}",
            attribute_glyph(attribute.kind, &attribute.icon),
            attribute.text
        ));
    }
    columns
}

#[must_use]
pub fn attribute_rows(attributes: &[Attribute]) -> u16 {
    let rows = attribute_columns(attributes)
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    u16::try_from(rows).unwrap_or(u16::MAX)
}

pub fn render_attributes(frame: &mut Frame, area: Rect, attributes: &[Attribute]) {
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
    let alignments = [Alignment::Left, Alignment::Center, Alignment::Right];
    for ((column, area), alignment) in attribute_columns(attributes)
        .into_iter()
        .zip(areas.iter())
        .zip(alignments)
    {
        let lines = column.into_iter().map(Line::from).collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(lines).alignment(alignment), *area);
    }
}

#[must_use]
pub fn condition_cells(icons: &[Option<ConditionIcon>]) -> Vec<String> {
    icons
        .iter()
        .map(|icon| icon.as_ref().map(condition_glyph).unwrap_or_default().to_string())
        .collect()
}

#[must_use]
pub fn wind_cells(items: &[WindForecastItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let arrow = item.icon.as_deref().map(arrow_glyph).unwrap_or_default();
            match item.speed {
                Some(speed) => format!("{arrow}{speed} {}", item.unit).trim().to_string(),
                None => arrow.to_string(),
            }
        })
        .collect()
}

/// One cell per chart column, mirrored for right-to-left layouts.
pub fn render_forecast_row(frame: &mut Frame, area: Rect, mut cells: Vec<String>, reverse: bool) {
    if cells.is_empty() {
        return;
    }
    if reverse {
        cells.reverse();
    }
    frame.render_widget(Paragraph::new(spread(&cells, area.width)), area);
}
