use std::{collections::HashMap, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::domain::weather::{EntityState, UnitSystem};

/// Entity states and locale settings the card reads from its host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostSnapshot {
    pub language: Option<String>,
    pub unit_system: UnitSystem,
    pub states: HashMap<String, EntityState>,
}

impl HostSnapshot {
    /// Accepts `states` either keyed by entity id or as a list of entities.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum States {
            Keyed(HashMap<String, EntityState>),
            Listed(Vec<EntityState>),
        }

        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            language: Option<String>,
            #[serde(default)]
            unit_system: UnitSystem,
            #[serde(default)]
            states: Option<States>,
        }

        let raw: Raw = serde_json::from_str(source)?;
        let states = match raw.states {
            Some(States::Keyed(map)) => map
                .into_iter()
                .map(|(id, mut entity)| {
                    if entity.entity_id.is_empty() {
                        entity.entity_id.clone_from(&id);
                    }
                    (id, entity)
                })
                .collect(),
            Some(States::Listed(list)) => list
                .into_iter()
                .map(|entity| (entity.entity_id.clone(), entity))
                .collect(),
            None => HashMap::new(),
        };
        Ok(Self {
            language: raw.language,
            unit_system: raw.unit_system,
            states,
        })
    }

    pub fn insert(&mut self, entity: EntityState) {
        self.states.insert(entity.entity_id.clone(), entity);
    }

    #[must_use]
    pub fn entity(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    /// Numeric state of an optional alternative sensor.
    #[must_use]
    pub fn numeric_state(&self, entity_id: Option<&str>) -> Option<f64> {
        entity_id
            .and_then(|id| self.entity(id))
            .and_then(EntityState::numeric_state)
    }

    #[must_use]
    pub fn raw_state(&self, entity_id: Option<&str>) -> Option<&str> {
        entity_id
            .and_then(|id| self.entity(id))
            .map(|entity| entity.state.as_str())
    }

    #[must_use]
    pub fn sun(&self) -> Option<&EntityState> {
        self.entity("sun.sun")
    }
}

pub fn load_host_snapshot(path: &Path) -> anyhow::Result<HostSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading host states {} failed", path.display()))?;
    HostSnapshot::from_json(&content)
        .with_context(|| format!("host states {} are invalid", path.display()))
}
