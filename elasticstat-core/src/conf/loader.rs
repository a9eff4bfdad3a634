use crate::conf::{Config, ConfigError, validate_config};
use std::fs;
use std::path::Path;

/// Reads, parses and validates an HCL config file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let src = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    parse_config(path, &src)
}

/// `path` is only used in error messages.
pub fn parse_config(path: &Path, src: &str) -> Result<Config, ConfigError> {
    let config: Config = hcl::from_str(src).map_err(|e| ConfigError::parse(path, e))?;

    validate_config(&config)?;
    tracing::debug!(path = %path.display(), "loaded config");

    Ok(config)
}
