//! Configuration management for the knobs console
//!
//! Handles loading, parsing, and validating YAML configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::time::Duration;
use tokio::fs;
use tracing::info;

use crate::error::KnobsError;
use crate::store::{Knob, KnobStore, DEFAULT_DEBOUNCE_MS, UNGROUPED};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KnobsConfig {
    /// Change notification debounce window
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Knobs loaded into the store at startup
    #[serde(default)]
    pub knobs: Vec<SeedKnob>,
}

/// Knob preloaded from configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedKnob {
    #[serde(default)]
    pub group: String,
    pub name: String,
    #[serde(rename = "type", default = "default_knob_type")]
    pub knob_type: String,
    #[serde(default)]
    pub value: Value,
    /// Type-specific attributes (min, max, options, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_knob_type() -> String {
    "text".to_string()
}

impl Default for KnobsConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            knobs: Vec::new(),
        }
    }
}

impl SeedKnob {
    /// Build the knob record stored for this seed
    pub fn to_knob(&self) -> Knob {
        Knob {
            name: self.name.clone(),
            knob_type: self.knob_type.clone(),
            value: self.value.clone(),
            group_id: self.group.clone(),
            used: false,
            extra: self.extra.clone(),
        }
    }
}

impl KnobsConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path))?;

        info!("Loaded {} seed knobs from {}", config.knobs.len(), path);
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: KnobsConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<(), KnobsError> {
        let mut seen = HashSet::new();
        for seed in &self.knobs {
            if seed.name.is_empty() {
                let group = if seed.group == UNGROUPED {
                    "<ungrouped>"
                } else {
                    seed.group.as_str()
                };
                return Err(KnobsError::Config(format!(
                    "knob in group {} has an empty name",
                    group
                )));
            }
            if !seen.insert((seed.group.as_str(), seed.name.as_str())) {
                return Err(KnobsError::Config(format!(
                    "duplicate knob {:?} in group {:?}",
                    seed.name, seed.group
                )));
            }
        }
        Ok(())
    }

    /// Debounce window as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Create a store configured with this debounce window and the seed knobs
    pub fn build_store(&self) -> KnobStore {
        let store = KnobStore::with_debounce(self.debounce());
        self.seed(&store);
        store
    }

    /// Write every seed knob into `store`
    pub fn seed(&self, store: &KnobStore) {
        for seed in &self.knobs {
            store.set(&seed.group, &seed.name, seed.to_knob());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SAMPLE: &str = r##"
debounce_ms: 20
knobs:
  - group: Style
    name: color
    type: color
    value: "#ff0000"
  - name: label
    value: Hello
  - group: Layout
    name: width
    type: number
    value: 120
    min: 0
    max: 400
"##;

    #[test]
    fn test_parse_sample() {
        let config = KnobsConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(20));
        assert_eq!(config.knobs.len(), 3);

        let label = &config.knobs[1];
        assert_eq!(label.group, "");
        assert_eq!(label.knob_type, "text");

        let width = config.knobs[2].to_knob();
        assert_eq!(width.group_id, "Layout");
        assert_eq!(width.attr("max"), Some(&json!(400)));
    }

    #[test]
    fn test_defaults() {
        let config = KnobsConfig::from_yaml("{}").unwrap();
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert!(config.knobs.is_empty());
    }

    #[test]
    fn test_rejects_duplicates() {
        let yaml = r#"
knobs:
  - { group: A, name: x, value: 1 }
  - { group: A, name: x, value: 2 }
"#;
        let err = KnobsConfig::from_yaml(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate knob"));
    }

    #[test]
    fn test_same_name_in_other_group_is_fine() {
        let yaml = r#"
knobs:
  - { group: A, name: x, value: 1 }
  - { group: B, name: x, value: 2 }
"#;
        assert!(KnobsConfig::from_yaml(yaml).is_ok());
    }

    #[test]
    fn test_rejects_empty_name() {
        let config = KnobsConfig {
            debounce_ms: 50,
            knobs: vec![SeedKnob {
                group: String::new(),
                name: String::new(),
                knob_type: "text".to_string(),
                value: Value::Null,
                extra: Map::new(),
            }],
        };
        assert!(matches!(config.validate(), Err(KnobsError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_and_seed() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("knobs.yaml");
        std::fs::write(&path, SAMPLE)?;

        let config = KnobsConfig::load(&path.to_string_lossy()).await?;
        let store = config.build_store();

        assert_eq!(store.debounce(), Duration::from_millis(20));
        assert!(store.has("Style", "color"));
        assert!(store.has("", "label"));
        assert_eq!(store.names("Layout"), vec!["width"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        assert!(KnobsConfig::load("/definitely/not/here.yaml").await.is_err());
    }
}
