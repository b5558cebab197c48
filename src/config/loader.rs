use std::{path::Path, sync::Arc};

use config::{Config, File, FileFormat};
use eyre::{Context, Result};

use crate::{
    config::{models::RouteTableConfig, validation::RouteTableValidator},
    core::Router,
};

/// Load a route table from a file using the config crate.
/// Supports multiple formats: YAML, JSON, TOML, INI.
pub fn load_route_table(config_path: &str) -> Result<RouteTableConfig> {
    let table = load_route_table_unchecked(config_path)?;
    RouteTableValidator::validate(&table)
        .with_context(|| format!("Invalid route table in {config_path}"))?;
    Ok(table)
}

/// Load a route table without validating it (used by the validate command)
pub fn load_route_table_unchecked(config_path: &str) -> Result<RouteTableConfig> {
    let config_path = Path::new(config_path);

    // Determine file format based on extension
    let format = match config_path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        Some("ini") => FileFormat::Ini,
        _ => FileFormat::Toml, // Default to TOML
    };

    let settings = Config::builder()
        .add_source(File::new(
            config_path
                .to_str()
                .ok_or_else(|| eyre::eyre!("Invalid UTF-8 path: {}", config_path.display()))?,
            format,
        ))
        .build()
        .with_context(|| format!("Failed to build config from {}", config_path.display()))?;

    let table: RouteTableConfig = settings.try_deserialize().with_context(|| {
        format!(
            "Failed to deserialize route table from {}",
            config_path.display()
        )
    })?;

    Ok(table)
}

/// Build a router whose handlers are the handler names from the table.
pub fn build_router(table: &RouteTableConfig) -> Result<Router<Arc<str>>> {
    let routes = table
        .routes
        .iter()
        .map(|entry| -> Result<_> {
            let method = RouteTableValidator::parse_method(entry)?;
            Ok((method, entry.pattern.as_str(), Arc::<str>::from(entry.handler.as_str())))
        })
        .collect::<Result<Vec<_>>>()?;

    let router = Router::with_config(table.router.clone());
    router
        .handle_all(routes)
        .wrap_err("Failed to register route table")?;
    Ok(router)
}
