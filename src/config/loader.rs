use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::DirectableConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".directable.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<DirectableConfig> {
    let config = toml::from_str::<DirectableConfig>(contents)?;

    if config
        .analysis
        .system_prefixes
        .iter()
        .any(|prefix| prefix.is_empty())
    {
        return Err(Error::Configuration(
            "analysis.system_prefixes must not contain an empty prefix".to_string(),
        ));
    }
    Ok(config)
}

/// Try loading config from a discovered path; failures fall back to defaults
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<DirectableConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!(
                "Invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

/// Only real read errors are logged, not "file not found"
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Directory ancestors of `start`, itself included, up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.directable.toml`.
pub fn discover_config(start: PathBuf) -> DirectableConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DirectableConfig::default()
        })
}

pub fn load_config() -> DirectableConfig {
    match std::env::current_dir() {
        Ok(current) => discover_config(current),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            DirectableConfig::default()
        }
    }
}

/// Load an explicitly named config file; unlike discovery, every failure is an error.
pub fn load_config_from(path: &Path) -> Result<DirectableConfig> {
    let contents = read_config_file(path).map_err(|e| Error::io_at(path, e))?;
    parse_and_validate_config(&contents).map_err(|e| match e {
        Error::Configuration(message) => Error::Configuration(message),
        other => Error::Configuration(format!("{}: {}", path.display(), other)),
    })
}
