// FILE: src/cli/config.rs

use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Extra `name_type -> property id` mappings
    pub custom_mappings: Option<HashMap<String, String>>,
    pub output_directory: Option<String>,
    pub output_extension: Option<String>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        ConverterError::FileNotFound {
            path: format!("Config file {}: {}", config_path, e),
        }
    })?;

    let config = parse(config_path, &config_content)?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

fn parse(config_path: &str, content: &str) -> Result<ConfigFile> {
    if config_path.ends_with(".json") {
        serde_json::from_str(content)
            .map_err(|e| ConverterError::config(config_path, format!("Invalid JSON config: {}", e)))
    } else if config_path.ends_with(".toml") {
        toml::from_str(content)
            .map_err(|e| ConverterError::config(config_path, format!("Invalid TOML config: {}", e)))
    } else {
        Err(ConverterError::config(
            config_path,
            "Config file must be .json or .toml format",
        ))
    }
}
