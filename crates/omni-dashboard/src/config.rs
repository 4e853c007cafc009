use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const APP_DIR: &str = "com.omni.dashboard";

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

fn default_temperature() -> f32 {
    omni_bedrock::chat::DEFAULT_TEMPERATURE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmniConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub region: String,
    /// Bedrock inference profile used for the assistant.
    pub model_id: String,
    /// Added in v1.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Where the chat transcript is kept. Defaults to the platform data
    /// directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for OmniConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            region: DEFAULT_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            temperature: default_temperature(),
            data_dir: None,
        }
    }
}

impl OmniConfig {
    /// Apply `OMNI_MODEL_ID` and `AWS_REGION` from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("OMNI_MODEL_ID").ok(),
            std::env::var("AWS_REGION").ok(),
        )
    }

    fn with_overrides(mut self, model_id: Option<String>, region: Option<String>) -> Self {
        if let Some(model_id) = model_id.filter(|v| !v.trim().is_empty()) {
            self.model_id = model_id;
        }
        if let Some(region) = region.filter(|v| !v.trim().is_empty()) {
            self.region = region;
        }
        self
    }

    /// Directory holding the transcript store.
    pub fn data_dir(&self) -> eyre::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let base =
                    dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
                Ok(base.join(APP_DIR))
            }
        }
    }
}

/// Settings changed by `omni config`. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigUpdate {
    pub region: Option<String>,
    pub model_id: Option<String>,
    pub temperature: Option<f32>,
    pub data_dir: Option<PathBuf>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to `config`, rejecting values the model would refuse.
    pub fn apply(self, config: &mut OmniConfig) -> eyre::Result<()> {
        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                eyre::bail!("temperature must be between 0 and 1, got {temperature}");
            }
            config.temperature = temperature;
        }
        if let Some(region) = self.region.filter(|v| !v.trim().is_empty()) {
            config.region = region;
        }
        if let Some(model_id) = self.model_id.filter(|v| !v.trim().is_empty()) {
            config.model_id = model_id;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = Some(data_dir);
        }
        Ok(())
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join(APP_DIR))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config, or defaults when none has been saved yet.
pub fn load_config() -> eyre::Result<OmniConfig> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(OmniConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> eyre::Result<OmniConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: OmniConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Bring a config written by an older version up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 → v1: the model field was called `model`; temperature was fixed.
    if from_version < 1 {
        if let Some(model) = obj.remove("model") {
            obj.entry("model_id").or_insert(model);
        }
        obj.entry("temperature")
            .or_insert(serde_json::json!(default_temperature()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (model renamed to model_id)");
    }

    Ok(json)
}

pub fn save_config(config: &OmniConfig) -> eyre::Result<()> {
    save_config_to(&config_dir()?, config)
}

pub fn save_config_to(dir: &Path, config: &OmniConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v0_config_is_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"region":"eu-west-1","model":"eu.anthropic.claude-haiku-4-5-20251001-v1:0"}"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.config_version, 1);
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.model_id, "eu.anthropic.claude-haiku-4-5-20251001-v1:0");
        assert_eq!(config.temperature, default_temperature());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = OmniConfig {
            config_version: 0,
            temperature: 0.2,
            data_dir: Some(dir.path().join("data")),
            ..OmniConfig::default()
        };

        save_config_to(dir.path(), &config).unwrap();
        let loaded = load_config_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(loaded.config_version, CURRENT_VERSION);
        assert_eq!(loaded.temperature, 0.2);
        assert_eq!(loaded.data_dir, config.data_dir);
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[test]
    fn overrides_ignore_blank_values() {
        let config = OmniConfig::default()
            .with_overrides(Some("custom-model".to_string()), Some("  ".to_string()));
        assert_eq!(config.model_id, "custom-model");
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let mut config = OmniConfig::default();
        ConfigUpdate {
            model_id: Some("eu.anthropic.claude-haiku-4-5-20251001-v1:0".to_string()),
            temperature: Some(0.3),
            ..ConfigUpdate::default()
        }
        .apply(&mut config)
        .unwrap();

        assert_eq!(config.model_id, "eu.anthropic.claude-haiku-4-5-20251001-v1:0");
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.region, DEFAULT_REGION);
        assert!(ConfigUpdate::default().is_empty());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = OmniConfig::default();
        let update = ConfigUpdate {
            temperature: Some(1.5),
            region: Some("eu-west-1".to_string()),
            ..ConfigUpdate::default()
        };
        assert!(update.apply(&mut config).is_err());
        assert_eq!(config, OmniConfig::default());
    }

    #[test]
    fn non_object_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
