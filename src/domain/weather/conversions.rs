use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WeatherAttributes;
use crate::error::UnsupportedUnitError;

const KMH_PER_MPH: f64 = 1.60934;
const MS_PER_MPH: f64 = 0.44704;
const MS_PER_KMH: f64 = 3.6;

const MMHG_PER_HPA: f64 = 0.75006;
const HPA_PER_INHG: f64 = 33.8639;
const MMHG_PER_INHG: f64 = 25.4;

/// Upper bounds (exclusive, km/h) of Beaufort forces 0 through 11.
const BEAUFORT_THRESHOLDS_KMH: [f64; 12] = [
    1.0, 6.0, 12.0, 20.0, 29.0, 39.0, 50.0, 62.0, 75.0, 89.0, 103.0, 118.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedUnit {
    KilometersPerHour,
    MetersPerSecond,
    MilesPerHour,
    Beaufort,
}

impl SpeedUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KilometersPerHour => "km/h",
            Self::MetersPerSecond => "m/s",
            Self::MilesPerHour => "mph",
            Self::Beaufort => "Bft",
        }
    }

    fn kmh_factor(self) -> Option<f64> {
        match self {
            Self::KilometersPerHour => Some(1.0),
            Self::MetersPerSecond => Some(MS_PER_KMH),
            Self::MilesPerHour => Some(KMH_PER_MPH),
            Self::Beaufort => None,
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = UnsupportedUnitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "km/h" => Ok(Self::KilometersPerHour),
            "m/s" => Ok(Self::MetersPerSecond),
            "mph" => Ok(Self::MilesPerHour),
            "Bft" => Ok(Self::Beaufort),
            other => Err(UnsupportedUnitError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureUnit {
    Hectopascal,
    MillimeterOfMercury,
    InchOfMercury,
}

impl PressureUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hectopascal => "hPa",
            Self::MillimeterOfMercury => "mmHg",
            Self::InchOfMercury => "inHg",
        }
    }

    fn rounds_to_integer(self) -> bool {
        matches!(self, Self::Hectopascal | Self::MillimeterOfMercury)
    }
}

impl FromStr for PressureUnit {
    type Err = UnsupportedUnitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "hPa" => Ok(Self::Hectopascal),
            "mmHg" => Ok(Self::MillimeterOfMercury),
            "inHg" => Ok(Self::InchOfMercury),
            other => Err(UnsupportedUnitError::Unknown(other.to_string())),
        }
    }
}

/// Wind speed in `to`, rounded to an integer. Beaufort is only a valid target.
pub fn convert_speed(value: f64, from: SpeedUnit, to: SpeedUnit) -> Result<f64, UnsupportedUnitError> {
    if from == to {
        return Ok(value.round());
    }

    let converted = match (from, to) {
        (SpeedUnit::Beaufort, _) => {
            return Err(UnsupportedUnitError::NonPhysicalSource(
                from.as_str().to_string(),
            ));
        }
        (_, SpeedUnit::Beaufort) => {
            let factor = from.kmh_factor().unwrap_or(1.0);
            return Ok(f64::from(beaufort_scale(value * factor)));
        }
        (SpeedUnit::KilometersPerHour, SpeedUnit::MetersPerSecond) => value * 1000.0 / 3600.0,
        (SpeedUnit::MilesPerHour, SpeedUnit::MetersPerSecond) => value * MS_PER_MPH,
        (SpeedUnit::MetersPerSecond, SpeedUnit::KilometersPerHour) => value * MS_PER_KMH,
        (SpeedUnit::MilesPerHour, SpeedUnit::KilometersPerHour) => value * KMH_PER_MPH,
        (SpeedUnit::MetersPerSecond, SpeedUnit::MilesPerHour) => value / MS_PER_MPH,
        (SpeedUnit::KilometersPerHour, SpeedUnit::MilesPerHour) => value / KMH_PER_MPH,
        _ => value,
    };

    Ok(converted.round())
}

#[must_use]
pub fn beaufort_scale(kmh: f64) -> u8 {
    BEAUFORT_THRESHOLDS_KMH
        .iter()
        .position(|limit| kmh < *limit)
        .map_or(12, |force| force as u8)
}

/// Pressure in `to`; hPa and mmHg results are rounded, inHg keeps its fraction.
#[must_use]
pub fn convert_pressure(value: f64, from: PressureUnit, to: PressureUnit) -> f64 {
    let converted = match (from, to) {
        (PressureUnit::Hectopascal, PressureUnit::MillimeterOfMercury) => value * MMHG_PER_HPA,
        (PressureUnit::MillimeterOfMercury, PressureUnit::Hectopascal) => value / MMHG_PER_HPA,
        (PressureUnit::InchOfMercury, PressureUnit::Hectopascal) => value * HPA_PER_INHG,
        (PressureUnit::Hectopascal, PressureUnit::InchOfMercury) => value / HPA_PER_INHG,
        (PressureUnit::InchOfMercury, PressureUnit::MillimeterOfMercury) => value * MMHG_PER_INHG,
        (PressureUnit::MillimeterOfMercury, PressureUnit::InchOfMercury) => value / MMHG_PER_INHG,
        _ => value,
    };

    if to.rounds_to_integer() {
        converted.round()
    } else {
        converted
    }
}

/// Converts an entity's wind speed for display. Matching unit names skip
/// conversion but still round.
pub fn display_speed(
    value: f64,
    native: Option<&str>,
    target: &str,
) -> Result<f64, UnsupportedUnitError> {
    if native == Some(target) {
        return Ok(value.round());
    }
    let native = native.ok_or(UnsupportedUnitError::MissingNative)?;
    convert_speed(value, native.parse()?, target.parse()?)
}

pub fn display_pressure(
    value: f64,
    native: Option<&str>,
    target: &str,
) -> Result<f64, UnsupportedUnitError> {
    if native == Some(target) {
        return Ok(match target.parse::<PressureUnit>() {
            Ok(unit) if unit.rounds_to_integer() => value.round(),
            _ => value,
        });
    }
    let native = native.ok_or(UnsupportedUnitError::MissingNative)?;
    Ok(convert_pressure(value, native.parse()?, target.parse()?))
}

/// Configured unit overrides, each falling back to the entity's native unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayUnits {
    pub speed: Option<String>,
    pub pressure: Option<String>,
    pub visibility: Option<String>,
    pub temperature: Option<String>,
}

impl DisplayUnits {
    #[must_use]
    pub fn resolve(&self, attributes: &WeatherAttributes) -> Self {
        Self {
            speed: self.speed.clone().or_else(|| attributes.wind_speed_unit.clone()),
            pressure: self
                .pressure
                .clone()
                .or_else(|| attributes.pressure_unit.clone()),
            visibility: self
                .visibility
                .clone()
                .or_else(|| attributes.visibility_unit.clone()),
            temperature: self
                .temperature
                .clone()
                .or_else(|| attributes.temperature_unit.clone()),
        }
    }
}
