use std::path::Path;

use certvet_inspect::InspectorPolicy;
use serde::Deserialize;

use crate::error::{CliError, CliResult};

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log: LogCfg,
    #[serde(default)]
    pub inspectors: Vec<InspectorPolicy>,
}

#[derive(Debug, Deserialize)]
pub struct LogCfg {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogCfg {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

impl Settings {
    pub fn load<P: AsRef<Path>>(config_path: P) -> CliResult<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> CliResult<Self> {
        let settings = toml::from_str(contents)?;
        Ok(settings)
    }
}
