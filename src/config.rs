use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::layer::Runtime;

pub const CONFIG_ENV: &str = "LAYERGEN_CONFIG";

#[derive(Debug, Default, Deserialize)]
pub struct LayergenConfig {
    #[serde(default)]
    pub tools: ToolsSection,
    #[serde(default)]
    pub runtimes: RuntimesSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolsSection {
    #[serde(default)]
    pub aws: ToolEntry,
    #[serde(default)]
    pub pip: ToolEntry,
    #[serde(default)]
    pub npm: ToolEntry,
}

impl ToolsSection {
    pub fn entry(&self, name: &str) -> Option<&ToolEntry> {
        match name {
            "aws" => Some(&self.aws),
            "pip" => Some(&self.pip),
            "npm" => Some(&self.npm),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolEntry {
    pub path: Option<PathBuf>,
}

/// Overrides for the `--compatible-runtimes` tag sent on publish.
#[derive(Debug, Default, Deserialize)]
pub struct RuntimesSection {
    pub nodejs: Option<String>,
    pub python: Option<String>,
}

impl LayergenConfig {
    pub fn compatible_tag(&self, runtime: Runtime) -> &str {
        let configured = match runtime {
            Runtime::Nodejs => self.runtimes.nodejs.as_deref(),
            Runtime::Python => self.runtimes.python.as_deref(),
        };
        configured
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .unwrap_or_else(|| runtime.default_compatible_tag())
    }
}

pub fn load() -> Result<LayergenConfig> {
    let path_override = std::env::var(CONFIG_ENV).ok();
    load_from(path_override.as_deref())
}

pub fn load_from(path_override: Option<&str>) -> Result<LayergenConfig> {
    let Some(path) = config_path_override(path_override) else {
        return Ok(LayergenConfig::default());
    };

    if !path.exists() {
        return Ok(LayergenConfig::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: LayergenConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn config_path_override(path_override: Option<&str>) -> Option<PathBuf> {
    if let Some(raw) = path_override {
        return Some(PathBuf::from(raw));
    }
    config_path()
}

pub fn config_path() -> Option<PathBuf> {
    // XDG location first, then ~/.layergen/config.toml.
    if let Some(mut dir) = dirs::config_dir() {
        dir.push("layergen");
        dir.push("config.toml");
        if dir.exists() {
            return Some(dir);
        }
    }
    dirs::home_dir().map(|mut home| {
        home.push(".layergen");
        home.push("config.toml");
        home
    })
}
