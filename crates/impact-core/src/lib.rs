//! Core types, configuration, and error handling for impact.
//!
//! This crate provides the shared foundation used by all other impact crates:
//! - [`ImpactError`]: unified error type using `thiserror`
//! - [`ImpactConfig`]: configuration loaded from `.impact.toml`
//! - [`FileAnalysisConfig`]: windows and keywords for file risk analysis
//! - Shared types: [`Commit`], [`PullRequest`], [`PrState`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{
    DataConfig, FileAnalysisConfig, FileAnalysisOverrides, HistoryConfig, ImpactConfig,
    DEFAULT_BUG_FIX_KEYWORDS,
};
pub use error::ImpactError;
pub use types::{Commit, OutputFormat, PrState, PullRequest};

/// A convenience `Result` type for impact operations.
pub type Result<T> = std::result::Result<T, ImpactError>;
