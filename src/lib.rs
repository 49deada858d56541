//! Decides which Objective-C methods can safely become `objc_direct`.
//!
//! A unit's declarations are loaded into a [`model::DeclarationModel`], the
//! [`analysis::DirectFinder`] classifies every implemented method, and the
//! resulting [`report::DirectableReport`] lists the directable methods next
//! to the selectors and qualified names that must stay dynamic.

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod model;
pub mod observability;
pub mod output;
pub mod report;

pub use crate::analysis::{analyze_model, analyze_path, DirectFinder};
pub use crate::config::{AnalysisConfig, DirectableConfig};
pub use crate::core::{Error, Result};
pub use crate::model::{DeclarationModel, ModelBuilder, UnitSource};
pub use crate::report::{DirectableReport, ReportEntry};
