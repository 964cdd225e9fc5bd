use super::*;
use crate::{
    chart::{
        definition::ChartContext,
        series::{SeriesOptions, build_series},
    },
    domain::weather::ForecastSample,
    i18n::Catalog,
};
use chrono::{Duration, FixedOffset, TimeZone, Utc};

fn config() -> CardConfig {
    CardConfig {
        entity: "weather.home".to_string(),
        ..CardConfig::default()
    }
}

fn definition(config: &CardConfig, base: f64) -> ChartDefinition {
    let window: Vec<ForecastSample> = (0..3)
        .map(|idx| {
            ForecastSample::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(idx),
                base + idx as f64,
            )
        })
        .collect();
    let catalog = Catalog::builtin();
    let theme = ChartTheme::default();
    let unit_system = UnitSystem::default();
    let ctx = ChartContext {
        forecast: &config.forecast,
        use_12hour_format: config.use_12hour_format,
        unit_system: &unit_system,
        theme: &theme,
        translator: &catalog,
        offset: FixedOffset::east_opt(0).expect("utc offset"),
    };
    ChartDefinition::build(&build_series(&window, SeriesOptions::default()), &ctx)
}

fn structure(config: &CardConfig) -> ChartStructure {
    ChartStructure::new(config, &UnitSystem::default(), "en", &ChartTheme::default(), 3)
}

#[test]
fn data_push_updates_the_same_instance() {
    let config = config();
    let mut controller = ChartController::new(HeadlessRenderer::new());

    let first = controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("built");
    let ChartTransition::Built(id) = first else {
        panic!("expected a build, got {first:?}");
    };

    let second = controller
        .sync(structure(&config), &definition(&config, 20.0))
        .expect("updated");
    assert_eq!(second, ChartTransition::Updated(id));
    assert_eq!(controller.chart_id(), Some(id));

    let renderer = controller.renderer();
    assert_eq!(renderer.created, 1);
    assert_eq!(renderer.updated, 1);
    assert_eq!(renderer.destroyed, 0);
    let live = renderer.live().expect("live chart");
    assert_eq!(live.data.datasets[0].values, vec![20.0, 21.0, 22.0]);
}

#[test]
fn structural_change_destroys_and_rebuilds() {
    let mut config = config();
    let mut controller = ChartController::new(HeadlessRenderer::new());
    controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("built");

    config.forecast.cadence = Cadence::Hourly;
    let transition = controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("rebuilt");
    assert_eq!(
        transition,
        ChartTransition::Rebuilt {
            previous: ChartId(1),
            current: ChartId(2)
        }
    );
    assert_eq!(controller.renderer().destroyed, 1);
    assert_eq!(controller.renderer().created, 2);

    config.entity = "weather.other".to_string();
    assert!(matches!(
        controller.sync(structure(&config), &definition(&config, 10.0)),
        Ok(ChartTransition::Rebuilt { .. })
    ));
}

#[test]
fn missing_surface_defers_until_mounted() {
    let config = config();
    let mut controller = ChartController::new(HeadlessRenderer::unmounted());

    let transition = controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("deferred");
    assert_eq!(transition, ChartTransition::Deferred);
    assert!(controller.is_deferred());
    assert_eq!(controller.state(), &ChartState::Absent);

    controller.renderer_mut().mount();
    let transition = controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("built");
    assert_eq!(transition, ChartTransition::Built(ChartId(1)));
    assert!(!controller.is_deferred());
}

#[test]
fn requested_rebuild_replaces_an_unchanged_chart() {
    let config = config();
    let mut controller = ChartController::new(HeadlessRenderer::new());
    controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("built");
    controller.request_rebuild();
    assert!(matches!(
        controller.sync(structure(&config), &definition(&config, 10.0)),
        Ok(ChartTransition::Rebuilt { .. })
    ));
    assert!(matches!(
        controller.sync(structure(&config), &definition(&config, 10.0)),
        Ok(ChartTransition::Updated(_))
    ));
}

#[test]
fn detach_destroys_once() {
    let config = config();
    let mut controller = ChartController::new(HeadlessRenderer::new());
    assert!(!controller.detach());
    controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("built");
    assert!(controller.detach());
    assert!(!controller.detach());
    assert_eq!(controller.renderer().destroyed, 1);
    assert!(controller.renderer().live().is_none());
}

#[test]
fn clear_returns_to_absent_and_next_sync_builds() {
    let config = config();
    let mut controller = ChartController::new(HeadlessRenderer::new());
    controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("built");
    assert!(controller.clear());
    assert_eq!(controller.state(), &ChartState::Absent);
    assert!(controller.renderer().live().is_none());

    let next = controller
        .sync(structure(&config), &definition(&config, 10.0))
        .expect("built again");
    assert!(matches!(next, ChartTransition::Built(_)));
}
