//! Run specification loading

use std::fs;
use std::path::Path;

use super::resolved::RunConfig;
use super::schema::RunSpec;
use super::validate::validate_spec;
use crate::{Error, Result};

/// Load and validate a YAML run specification
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<RunSpec> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(format!(
            "Failed to read run specification {}: {e}",
            path.as_ref().display()
        ))
    })?;
    parse_spec(&content)
}

/// Parse and validate a YAML run specification
pub fn parse_spec(yaml: &str) -> Result<RunSpec> {
    let spec: RunSpec = serde_yaml::from_str(yaml)
        .map_err(|e| Error::Config(format!("Failed to parse YAML run specification: {e}")))?;
    validate_spec(&spec).map_err(|e| Error::Config(format!("Invalid run specification: {e}")))?;
    Ok(spec)
}

/// Load, validate and resolve a run specification
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    load_spec(path).map(|spec| RunConfig::resolve(&spec))
}
