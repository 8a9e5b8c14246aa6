pub mod execute;
pub mod health;
pub mod list;

use agentry_core::{AgentCatalog, ComponentRegistry, HarnessConfig};
use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::*;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = HarnessConfig::load().context("Failed to load configuration")?;
    if let Some(dir) = cli.components_dir {
        config.components_dir = dir;
    }
    init_tracing(&config);
    debug!(
        components_dir = %config.components_dir.display(),
        manifest_file = %config.manifest_file,
        env_overrides = config.env_overrides,
        "Loaded configuration"
    );

    let catalog = AgentCatalog::from_inventory();
    let registry =
        ComponentRegistry::scan_with(&config.components_dir, &catalog, &config.scan_options());

    match cli.command {
        Commands::Execute { flow, params } => {
            execute::run(&registry, &flow, &params, cli.json).await
        }
        Commands::List => list::run(&catalog, &registry, cli.json),
        Commands::Health { names } => health::run(&registry, &names, cli.json).await,
    }
}

/// Logs go to stderr so `--json` output on stdout stays clean.
fn init_tracing(config: &HarnessConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
