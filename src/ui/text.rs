use std::fmt::Write as _;

use crate::{
    app::view_model::{CardView, MISSING_ENTITY_TEXT, ViewModel},
    chart::ChartDefinition,
    ui::{
        glyphs::condition_glyph,
        panels::{attribute_columns, condition_cells, wind_cells},
    },
};

/// Plain-text rendition of the card for non-interactive output.
#[must_use]
pub fn card_report(view: &ViewModel, chart: Option<&ChartDefinition>) -> String {
    match view {
        ViewModel::Unconfigured => "card is not configured\n".to_string(),
        ViewModel::MissingEntity { title } => match title {
            Some(title) => format!("{title}\n{MISSING_ENTITY_TEXT}\n"),
            None => format!("{MISSING_ENTITY_TEXT}\n"),
        },
        ViewModel::Ready(view) => {
            let mut out = ready_report(view);
            if let Some(chart) = chart {
                out.push('\n');
                out.push_str(&series_table(chart, view));
            }
            out
        }
    }
}

fn ready_report(view: &CardView) -> String {
    let mut out = String::new();
    if let Some(title) = &view.title {
        let _ = writeln!(out, "{title}");
    }
    if let Some(main) = &view.main {
        let headline = [
            main.icon.as_ref().map(|icon| condition_glyph(icon).to_string()),
            main.temperature.clone(),
            main.condition.clone(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
        if !headline.is_empty() {
            let _ = writeln!(out, "{}", headline.join("  "));
        }
        for line in [&main.feels_like, &main.description].into_iter().flatten() {
            let _ = writeln!(out, "{line}");
        }
        if let Some(clock) = &main.clock {
            let parts = [Some(&clock.time), clock.day.as_ref(), clock.date.as_ref()]
                .into_iter()
                .flatten()
                .cloned()
                .collect::<Vec<_>>();
            let _ = writeln!(out, "{}", parts.join(" "));
        }
    }
    for column in attribute_columns(&view.attributes) {
        if !column.is_empty() {
            let _ = writeln!(out, "{}", column.join("   "));
        }
    }
    if let Some(changed) = &view.last_changed {
        let _ = writeln!(out, "{changed}");
    }
    out
}

fn series_table(chart: &ChartDefinition, view: &CardView) -> String {
    let mut out = String::new();
    let mut header = vec![String::new()];
    header.extend(chart.datasets.iter().map(|dataset| dataset.label.clone()));
    let icons = condition_cells(&view.condition_icons);
    let wind = wind_cells(&view.wind_forecast);
    if !icons.is_empty() {
        header.push(String::new());
    }
    if !wind.is_empty() {
        header.push(String::new());
    }

    let rows = chart
        .data
        .labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let mut row = vec![label.join(" ")];
            for dataset in &chart.data.datasets {
                let cell = dataset
                    .point_labels
                    .get(idx)
                    .cloned()
                    .flatten()
                    .map_or_else(|| "-".to_string(), |text| text.replace("\n\n", " "));
                row.push(cell);
            }
            if let Some(icon) = icons.get(idx) {
                row.push(icon.clone());
            }
            if let Some(wind) = wind.get(idx) {
                row.push(wind.clone());
            }
            row
        })
        .collect::<Vec<_>>();

    let columns = header.len();
    let widths = (0..columns)
        .map(|col| {
            std::iter::once(&header)
                .chain(&rows)
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    for row in std::iter::once(&header).chain(&rows) {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entity_report_keeps_title() {
        let report = card_report(
            &ViewModel::MissingEntity {
                title: Some("Home".to_string()),
            },
            None,
        );
        assert_eq!(report, "Home\nPlease, check your weather entity\n");
    }

    #[test]
    fn unconfigured_report_is_one_line() {
        assert_eq!(card_report(&ViewModel::Unconfigured, None), "card is not configured\n");
    }
}
