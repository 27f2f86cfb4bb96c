//! PHAROS virtual laser CLI and server binary
//!
//! Serves the PHAROS REST API from a simulated instrument so client software
//! can be developed without the laser.

use anyhow::{Context, Result};
use cli::{Cli, Commands, LogFormatArg};
use config::{
    generate_default_config, load_config, load_config_or_default, save_config, validate_config,
    SimulatorConfig,
};
use laser::api::{laser_routes, LaserApiState};
use laser::{SharedLaser, VirtualLaser};
use observability::{init_logging, init_metrics, LogFormat};
use server::{validate_port_available, validate_port_range, HttpServer, ServerConfig, ServerExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const SERVICE_NAME: &str = "pharos-sim";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            host,
            port,
            log_format,
        } => start_laser(config, host, port, log_format).await,
        Commands::Validate { config } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty)?;
            info!("Executing 'validate' command");
            validate_command(config).await
        }
        Commands::Init { output } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty)?;
            info!("Executing 'init' command");
            init_command(output).await
        }
    }
}

/// Apply command line overrides on top of the file (or default) configuration.
fn apply_overrides(
    config: &mut SimulatorConfig,
    host: Option<String>,
    port: Option<u16>,
    log_format: Option<LogFormatArg>,
) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(format) = log_format {
        config.logging.format = format.as_str().to_string();
    }
}

async fn start_laser(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    log_format: Option<LogFormatArg>,
) -> Result<()> {
    // The log format may come from the file, so the config is read first.
    let mut config = load_config_or_default(config_path.as_deref())?;
    apply_overrides(&mut config, host, port, log_format);

    let format = LogFormat::parse(&config.logging.format).unwrap_or_default();
    init_logging(SERVICE_NAME, format)?;
    info!(config = ?config_path, "PHAROS virtual laser starting...");

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start the virtual laser due to configuration errors");
    }

    if let Some(metrics_port) = config.server.metrics_port {
        init_metrics(metrics_port)?;
    }

    let laser = VirtualLaser::from_settings(&config.instrument)
        .context("Invalid instrument settings")?;
    let initial_state = laser.state();
    let output_enabled = laser.is_output_enabled();
    let shared = SharedLaser::new(laser);

    let mut api_state = LaserApiState::new(shared);
    if let Some(docs) = &config.docs {
        debug!(path = %docs.html_path, "Serving documentation page at /");
        api_state = api_state.with_docs(&docs.html_path);
    }
    let router = laser_routes(Arc::new(api_state));

    let server_config = ServerConfig::new(config.server.host.clone(), config.server.port);
    validate_port_range(server_config.port)?;
    validate_port_available(&server_config).await?;

    print_banner(&server_config, initial_state, output_enabled);
    info!(
        host = %server_config.host,
        port = server_config.port,
        state = %initial_state,
        "Starting virtual laser"
    );

    HttpServer::new(server_config, router)
        .run_with_ctrl_c()
        .await?;

    info!("Virtual laser shutdown complete");
    Ok(())
}

fn print_banner(config: &ServerConfig, state: laser::OperationalState, output_enabled: bool) {
    let base = format!("http://{}:{}", config.host, config.port);
    println!();
    println!("=== PHAROS Virtual Laser (development mode) ===");
    println!();
    println!("  Server:          {}", base);
    println!("  Documentation:   {}/", base);
    println!("  Route index:     {}/docs", base);
    println!("  API info:        {}/info", base);
    println!("  Health check:    {}/health", base);
    println!();
    println!("  Laser state:     {}", state);
    println!("  Output enabled:  {}", output_enabled);
    println!();
    println!("Press Ctrl+C to stop the server");
    println!();
}

async fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    let instrument = &config.instrument;
    println!("[ok] Configuration is valid!");
    println!();
    println!("Bind address: {}:{}", config.server.host, config.server.port);
    println!("Log format: {}", config.logging.format);
    println!(
        "Attenuator: {}%, PP divider: {}",
        instrument.target_attenuator_percentage, instrument.pp_divider
    );
    println!(
        "Presets: {} (selected {})",
        instrument.presets.len(),
        instrument.selected_preset
    );

    Ok(())
}

async fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("This configuration includes:");
    println!("  - Bind address 127.0.0.1:{}", config.server.port);
    println!("  - Power-on laser parameters");
    println!("  - {} factory presets", config.instrument.presets.len());
    println!();
    println!("Next steps:");
    println!("  1. Edit the configuration file to customize settings");
    println!(
        "  2. Run 'pharos-sim validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'pharos-sim start --config {:?}' to start the virtual laser",
        output_path
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = generate_default_config();
        apply_overrides(
            &mut config,
            Some("0.0.0.0".to_string()),
            Some(20021),
            Some(LogFormatArg::Json),
        );

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 20021);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = generate_default_config();
        apply_overrides(&mut config, None, None, None);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 20020);
        assert_eq!(config.logging.format, "pretty");
    }
}
