//! Runtime configuration handling for mobile.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use std::path::{Path, PathBuf};

use crave_core::Result;
use serde::{Deserialize, Serialize};

const RUNTIME_CONFIG_FILE: &str = "mobile-config.json";

/// Where the active completion model setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    RuntimeSettings,
    EnvironmentFallback,
    Default,
}

#[derive(Debug, Clone)]
pub struct ResolvedModel {
    pub model: Option<String>,
    pub source: ModelSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MobileRuntimeConfig {
    #[serde(default)]
    pub completion_model: Option<String>,
}

impl MobileRuntimeConfig {
    pub fn from_raw(completion_model: Option<String>) -> Self {
        Self {
            completion_model: normalize_text_option(completion_model),
        }
    }
}

pub fn default_runtime_config_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crave")
        .join(RUNTIME_CONFIG_FILE)
}

pub fn load_runtime_config() -> MobileRuntimeConfig {
    load_runtime_config_from_path(&default_runtime_config_path())
}

pub fn load_runtime_config_from_path(path: &Path) -> MobileRuntimeConfig {
    if !path.exists() {
        return MobileRuntimeConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<MobileRuntimeConfig>(&content) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(
                    "Failed to parse mobile runtime config at {}: {}",
                    path.display(),
                    error
                );
                MobileRuntimeConfig::default()
            }
        },
        Err(error) => {
            tracing::warn!(
                "Failed to read mobile runtime config at {}: {}",
                path.display(),
                error
            );
            MobileRuntimeConfig::default()
        }
    }
}

pub fn save_runtime_config(config: &MobileRuntimeConfig) -> Result<()> {
    save_runtime_config_to_path(config, &default_runtime_config_path())
}

pub fn save_runtime_config_to_path(config: &MobileRuntimeConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let normalized = MobileRuntimeConfig::from_raw(config.completion_model.clone());
    let content = serde_json::to_string_pretty(&normalized)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Resolve the completion model: runtime settings win over the environment.
pub fn resolve_completion_model() -> ResolvedModel {
    resolve_completion_model_from(
        load_runtime_config().completion_model,
        std::env::var("CRAVE_OPENAI_MODEL").ok(),
    )
}

pub fn resolve_completion_model_from(
    runtime: Option<String>,
    env: Option<String>,
) -> ResolvedModel {
    if let Some(model) = normalize_text_option(runtime) {
        return ResolvedModel {
            model: Some(model),
            source: ModelSource::RuntimeSettings,
        };
    }

    if let Some(model) = normalize_text_option(env) {
        return ResolvedModel {
            model: Some(model),
            source: ModelSource::EnvironmentFallback,
        };
    }

    ResolvedModel {
        model: None,
        source: ModelSource::Default,
    }
}

fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_settings_win_over_env() {
        let resolved = resolve_completion_model_from(
            Some(" gpt-4o ".to_string()),
            Some("gpt-4o-mini".to_string()),
        );
        assert_eq!(resolved.model.as_deref(), Some("gpt-4o"));
        assert_eq!(resolved.source, ModelSource::RuntimeSettings);
    }

    #[test]
    fn env_fallback_applies_when_runtime_blank() {
        let resolved =
            resolve_completion_model_from(Some("   ".to_string()), Some("gpt-4o-mini".to_string()));
        assert_eq!(resolved.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(resolved.source, ModelSource::EnvironmentFallback);
    }

    #[test]
    fn default_when_nothing_configured() {
        let resolved = resolve_completion_model_from(None, None);
        assert_eq!(resolved.model, None);
        assert_eq!(resolved.source, ModelSource::Default);
    }

    #[test]
    fn save_and_load_runtime_config_roundtrip() {
        let test_dir = std::env::temp_dir().join(format!(
            "crave-mobile-config-test-{}",
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let config_path = test_dir.join("mobile-config.json");

        let config = MobileRuntimeConfig::from_raw(Some(" gpt-4o-mini ".to_string()));
        save_runtime_config_to_path(&config, &config_path).unwrap();

        let loaded = load_runtime_config_from_path(&config_path);
        assert_eq!(loaded.completion_model.as_deref(), Some("gpt-4o-mini"));

        let _ = std::fs::remove_file(config_path);
        let _ = std::fs::remove_dir_all(test_dir);
    }

    #[test]
    fn corrupt_config_degrades_to_default() {
        let test_dir = std::env::temp_dir().join(format!(
            "crave-mobile-config-corrupt-{}",
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        std::fs::create_dir_all(&test_dir).unwrap();
        let config_path = test_dir.join("mobile-config.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let loaded = load_runtime_config_from_path(&config_path);
        assert_eq!(loaded, MobileRuntimeConfig::default());

        let _ = std::fs::remove_file(config_path);
        let _ = std::fs::remove_dir_all(test_dir);
    }
}
