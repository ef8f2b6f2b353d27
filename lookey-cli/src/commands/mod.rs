//! Command handlers -- one module per subcommand

pub mod config;
pub mod locate;
pub mod scan;

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use lookey_core::config::LookeyConfig;
use lookey_locator::{
    HttpDetectionGateway, InMemoryCatalog, LocatorConfig, LocatorEngine, LocatorEngineBuilder,
};

use crate::error::CliError;

/// Engine wired to the HTTP detector and the TOML catalog.
pub type CliEngine = LocatorEngine<HttpDetectionGateway, InMemoryCatalog>;

/// Build the locator engine from the loaded configuration.
///
/// A missing catalog file only disables enrichment; a malformed one is an error.
pub async fn build_engine(config: &LookeyConfig) -> Result<CliEngine, CliError> {
    let locator_config = LocatorConfig::from_core(config);
    let gateway = HttpDetectionGateway::new(&locator_config)?;

    let catalog_path = Path::new(&config.catalog.path);
    let catalog = if catalog_path.exists() {
        InMemoryCatalog::from_file(catalog_path).await?
    } else {
        warn!(
            path = %catalog_path.display(),
            "catalog file not found, product details and allergy checks disabled"
        );
        InMemoryCatalog::new()
    };

    let engine = LocatorEngineBuilder::new()
        .config(locator_config)
        .gateway(Arc::new(gateway))
        .catalog(Arc::new(catalog))
        .build()?;
    Ok(engine)
}
