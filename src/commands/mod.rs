//! CLI command implementations.
//!
//! - **analyze**: classify unit sources and write their reports
//! - **merge**: combine a directory of per-unit reports
//! - **init**: write a default `.directable.toml`

pub mod analyze;
pub mod init;
pub mod merge;

pub use analyze::{handle_analyze, AnalyzeOptions};
pub use init::{init_config, init_config_in};
pub use merge::handle_merge;
