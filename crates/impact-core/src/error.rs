use std::path::PathBuf;

/// Errors that can occur across impact.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary renders it through `miette` at the boundary.
///
/// The file risk analysis itself never fails: only loading configuration,
/// synced activity data, or git history can.
///
/// # Examples
///
/// ```
/// use impact_core::ImpactError;
///
/// let err = ImpactError::Config("recent_window_days must be positive".into());
/// assert!(err.to_string().contains("recent_window_days"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ImpactError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(impact::io))]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(impact::config))]
    Config(String),

    /// Git operation failure.
    #[error("git error: {0}")]
    #[diagnostic(code(impact::git))]
    Git(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(impact::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(impact::toml))]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(code(impact::file_not_found))]
    FileNotFound(PathBuf),

    /// No synced activity data is available.
    #[error("no activity data found at {}", .0.display())]
    #[diagnostic(
        code(impact::no_data),
        help("sync your GitHub activity first, or point --data at an existing data.json")
    )]
    NoData(PathBuf),
}
