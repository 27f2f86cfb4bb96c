use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimulatorConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let substituted = substitution::substitute_env_vars(&content)?;

    let config: SimulatorConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Load the file when a path is given, otherwise fall back to the built-in
/// defaults.
pub fn load_config_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<SimulatorConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            debug!("No configuration file given, using defaults");
            Ok(generate_default_config())
        }
    }
}

#[instrument]
pub fn generate_default_config() -> SimulatorConfig {
    SimulatorConfig {
        server: ServerSettings::default(),
        logging: LoggingSettings::default(),
        instrument: InstrumentSettings::default(),
        docs: Some(DocsSettings {
            html_path: "virtual_laser_api_docs.html".to_string(),
        }),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &SimulatorConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}
