use super::WindBearing;

const ARROW_ICONS: [&str; 9] = [
    "arrow-down",
    "arrow-bottom-left",
    "arrow-left",
    "arrow-top-left",
    "arrow-up",
    "arrow-top-right",
    "arrow-right",
    "arrow-bottom-right",
    "arrow-down",
];

const SECTORS: [&str; 17] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW", "N",
];

fn compass_degrees(point: &str) -> Option<f64> {
    SECTORS[..16]
        .iter()
        .position(|s| *s == point)
        .map(|idx| idx as f64 * 22.5)
}

fn bearing_degrees(bearing: &WindBearing) -> Option<f64> {
    match bearing {
        WindBearing::Degrees(deg) if deg.is_finite() => Some(deg.rem_euclid(360.0)),
        WindBearing::Degrees(_) => None,
        WindBearing::Compass(point) => compass_degrees(point.trim()),
    }
}

/// 16-point compass key (`"NNE"`), suitable for translation lookups.
#[must_use]
pub fn wind_direction_sector(bearing: &WindBearing) -> Option<&'static str> {
    let deg = bearing_degrees(bearing)?;
    SECTORS.get(((deg + 11.25) / 22.5) as usize).copied()
}

/// Human label for a bearing. Compass strings are shown as given; degree values
/// go through `translate` with a `cardinalDirections.<point>` key.
#[must_use]
pub fn wind_direction_label(
    bearing: &WindBearing,
    translate: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    match bearing {
        WindBearing::Compass(point) => Some(point.clone()),
        WindBearing::Degrees(_) => {
            let sector = wind_direction_sector(bearing)?;
            Some(
                translate(&format!("cardinalDirections.{sector}"))
                    .unwrap_or_else(|| sector.to_string()),
            )
        }
    }
}

/// Arrow pointing where the wind blows to.
#[must_use]
pub fn wind_direction_icon(bearing: &WindBearing) -> Option<&'static str> {
    let deg = bearing_degrees(bearing)?;
    ARROW_ICONS.get(((deg + 22.5) / 45.0) as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_map_to_sixteen_sectors() {
        assert_eq!(wind_direction_sector(&WindBearing::Degrees(0.0)), Some("N"));
        assert_eq!(wind_direction_sector(&WindBearing::Degrees(11.3)), Some("NNE"));
        assert_eq!(wind_direction_sector(&WindBearing::Degrees(225.0)), Some("SW"));
        assert_eq!(wind_direction_sector(&WindBearing::Degrees(355.0)), Some("N"));
        assert_eq!(wind_direction_sector(&WindBearing::Degrees(360.0)), Some("N"));
    }

    #[test]
    fn compass_points_share_the_degree_arrows() {
        assert_eq!(
            wind_direction_icon(&WindBearing::Compass("WNW".to_string())),
            Some("arrow-bottom-right")
        );
        assert_eq!(
            wind_direction_icon(&WindBearing::Degrees(90.0)),
            Some("arrow-left")
        );
        assert_eq!(wind_direction_icon(&WindBearing::Compass("??".to_string())), None);
    }

    #[test]
    fn degree_labels_are_translated() {
        let label = wind_direction_label(&WindBearing::Degrees(180.0), |key| {
            (key == "cardinalDirections.S").then(|| "Süd".to_string())
        });
        assert_eq!(label.as_deref(), Some("Süd"));
        let label = wind_direction_label(&WindBearing::Compass("NE".to_string()), |_| None);
        assert_eq!(label.as_deref(), Some("NE"));
    }
}
