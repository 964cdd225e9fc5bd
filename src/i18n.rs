use std::collections::HashMap;

use serde_json::Value;

pub const DEFAULT_LOCALE: &str = "en";

pub trait Translator {
    fn translate(&self, key: &str) -> Option<String>;

    /// Translation or the key itself.
    fn text(&self, key: &str) -> String {
        self.translate(key).unwrap_or_else(|| key.to_string())
    }
}

const EN: &[(&str, &str)] = &[
    ("tempHi", "Temperature"),
    ("tempLo", "Temperature night"),
    ("precip", "Precipitations"),
    ("feelsLike", "Feels like"),
    ("units.km/h", "km/h"),
    ("units.m/s", "m/s"),
    ("units.mph", "mph"),
    ("units.Bft", "Bft"),
    ("units.hPa", "hPa"),
    ("units.mmHg", "mm Hg"),
    ("units.inHg", "in Hg"),
    ("units.mm", "mm"),
    ("units.in", "in"),
    ("units.km", "km"),
    ("units.mi", "mi"),
    ("clear-night", "Clear, night"),
    ("cloudy", "Cloudy"),
    ("exceptional", "Exceptional"),
    ("fog", "Fog"),
    ("hail", "Hail"),
    ("lightning", "Lightning"),
    ("lightning-rainy", "Lightning, rainy"),
    ("partlycloudy", "Partly cloudy"),
    ("pouring", "Pouring"),
    ("rainy", "Rainy"),
    ("snowy", "Snowy"),
    ("snowy-rainy", "Snowy, rainy"),
    ("sunny", "Sunny"),
    ("windy", "Windy"),
    ("windy-variant", "Windy"),
    ("cardinalDirections.N", "N"),
    ("cardinalDirections.NNE", "NNE"),
    ("cardinalDirections.NE", "NE"),
    ("cardinalDirections.ENE", "ENE"),
    ("cardinalDirections.E", "E"),
    ("cardinalDirections.ESE", "ESE"),
    ("cardinalDirections.SE", "SE"),
    ("cardinalDirections.SSE", "SSE"),
    ("cardinalDirections.S", "S"),
    ("cardinalDirections.SSW", "SSW"),
    ("cardinalDirections.SW", "SW"),
    ("cardinalDirections.WSW", "WSW"),
    ("cardinalDirections.W", "W"),
    ("cardinalDirections.WNW", "WNW"),
    ("cardinalDirections.NW", "NW"),
    ("cardinalDirections.NNW", "NNW"),
];

/// Per-locale string tables. Lookups fall back to [`DEFAULT_LOCALE`] when the
/// active locale, or a key in it, is missing.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: HashMap<String, HashMap<String, String>>,
    locale: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    #[must_use]
    pub fn builtin() -> Self {
        let en = EN
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self {
            tables: HashMap::from([(DEFAULT_LOCALE.to_string(), en)]),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Merges tables from `{ "<locale>": { "<key>": "..." | { nested } } }`.
    /// Nested objects become dotted keys.
    pub fn merge_json(&mut self, source: &str) -> Result<(), serde_json::Error> {
        let parsed: HashMap<String, Value> = serde_json::from_str(source)?;
        for (locale, value) in parsed {
            let table = self.tables.entry(locale).or_default();
            flatten_into(table, "", &value);
        }
        Ok(())
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.tables.contains_key(locale)
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> Option<String> {
        self.tables
            .get(&self.locale)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.tables
                    .get(DEFAULT_LOCALE)
                    .and_then(|table| table.get(key))
            })
            .cloned()
    }
}

fn flatten_into(table: &mut HashMap<String, String>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(table, &path, nested);
            }
        }
        Value::String(text) => {
            table.insert(prefix.to_string(), text.clone());
        }
        Value::Null => {}
        other => {
            table.insert(prefix.to_string(), other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_locale_falls_back_to_english() {
        let mut catalog = Catalog::builtin();
        catalog.set_locale("xx");
        assert_eq!(catalog.translate("tempHi").as_deref(), Some("Temperature"));
        assert_eq!(catalog.text("nope"), "nope");
    }

    #[test]
    fn merged_tables_flatten_nested_keys() {
        let mut catalog = Catalog::builtin();
        catalog
            .merge_json(r#"{"de": {"tempHi": "Temperatur", "units": {"mm": "mm"}}}"#)
            .expect("valid catalog");
        catalog.set_locale("de");
        assert!(catalog.has_locale("de"));
        assert_eq!(catalog.translate("tempHi").as_deref(), Some("Temperatur"));
        assert_eq!(catalog.translate("units.mm").as_deref(), Some("mm"));
        assert_eq!(catalog.translate("tempLo").as_deref(), Some("Temperature night"));
    }
}
