//! `.directable.toml` configuration.
//!
//! ```toml
//! [analysis]
//! system_prefixes = ["/Applications/Xcode"]
//! teardown_selectors = [".cxx_destruct"]
//!
//! [output]
//! default_format = "terminal"
//! directory = "build/directable"
//! ```

mod core;
mod loader;

pub use self::core::{
    default_system_prefixes, default_teardown_selectors, AnalysisConfig, DirectableConfig,
    OutputConfig,
};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

use std::path::Path;

/// The configuration for this run: an explicit file when given, discovery otherwise.
pub fn resolve_config(explicit: Option<&Path>) -> crate::core::Result<DirectableConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => Ok(load_config()),
    }
}
