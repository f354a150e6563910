use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ImpactError;

/// Commit message keywords that mark a commit as a bug fix.
pub const DEFAULT_BUG_FIX_KEYWORDS: &[&str] = &[
    "fix", "bug", "bugfix", "hotfix", "patch", "issue", "revert", "rollback",
];

/// Top-level configuration loaded from `.impact.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use impact_core::ImpactConfig;
///
/// let config = ImpactConfig::default();
/// assert_eq!(config.analysis.resolve().recent_window_days, 90);
/// assert_eq!(config.history.max_files_per_commit, 25);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// File risk analysis overrides.
    #[serde(default)]
    pub analysis: FileAnalysisOverrides,
    /// Synced activity data location.
    #[serde(default)]
    pub data: DataConfig,
    /// Local git history mining settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

impl ImpactConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::FileNotFound`] if `path` does not exist,
    /// [`ImpactError::Io`] if it cannot be read, or [`ImpactError::Toml`] if
    /// the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use impact_core::ImpactConfig;
    /// use std::path::Path;
    ///
    /// let config = ImpactConfig::from_file(Path::new(".impact.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ImpactError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ImpactError::FileNotFound(path.to_path_buf()),
            _ => ImpactError::Io(e),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use impact_core::ImpactConfig;
    ///
    /// let toml = r#"
    /// [analysis]
    /// recent_window_days = 30
    /// "#;
    /// let config = ImpactConfig::from_toml(toml).unwrap();
    /// let analysis = config.analysis.resolve();
    /// assert_eq!(analysis.recent_window_days, 30);
    /// assert_eq!(analysis.baseline_window_days, 90);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ImpactError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Settings for the file risk analysis.
///
/// Built once per analysis and never mutated afterwards. Keywords are stored
/// lower-cased.
///
/// # Examples
///
/// ```
/// use impact_core::FileAnalysisConfig;
///
/// let config = FileAnalysisConfig::default();
/// assert_eq!(config.recent_window_days, 90);
/// assert_eq!(config.baseline_window_days, 90);
/// assert!(config.bug_fix_keywords.contains(&"hotfix".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysisConfig {
    /// Length of the trailing window measuring current activity.
    pub recent_window_days: u32,
    /// Length of the window immediately before the recent one.
    pub baseline_window_days: u32,
    /// Lower-cased substrings identifying bug-fix commit messages.
    pub bug_fix_keywords: Vec<String>,
}

impl Default for FileAnalysisConfig {
    fn default() -> Self {
        Self {
            recent_window_days: 90,
            baseline_window_days: 90,
            bug_fix_keywords: DEFAULT_BUG_FIX_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
        }
    }
}

/// Partial [`FileAnalysisConfig`], as read from `[analysis]` or CLI flags.
///
/// Unset fields fall back to the defaults. A keyword list, when given,
/// replaces the default list instead of extending it.
///
/// # Examples
///
/// ```
/// use impact_core::FileAnalysisOverrides;
///
/// let overrides = FileAnalysisOverrides {
///     bug_fix_keywords: Some(vec!["Resolve".into()]),
///     ..FileAnalysisOverrides::default()
/// };
/// let config = overrides.resolve();
/// assert_eq!(config.recent_window_days, 90);
/// assert_eq!(config.bug_fix_keywords, vec!["resolve".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysisOverrides {
    /// Recent window length in days.
    #[serde(default)]
    pub recent_window_days: Option<u32>,
    /// Baseline window length in days.
    #[serde(default)]
    pub baseline_window_days: Option<u32>,
    /// Replacement bug-fix keyword list.
    #[serde(default)]
    pub bug_fix_keywords: Option<Vec<String>>,
}

impl FileAnalysisOverrides {
    /// Layer `self` on top of `base`: fields set here win, the rest come
    /// from `base`.
    ///
    /// # Examples
    ///
    /// ```
    /// use impact_core::FileAnalysisOverrides;
    ///
    /// let file = FileAnalysisOverrides {
    ///     recent_window_days: Some(30),
    ///     baseline_window_days: Some(60),
    ///     ..FileAnalysisOverrides::default()
    /// };
    /// let cli = FileAnalysisOverrides {
    ///     recent_window_days: Some(14),
    ///     ..FileAnalysisOverrides::default()
    /// };
    /// let merged = cli.layered_over(&file);
    /// assert_eq!(merged.recent_window_days, Some(14));
    /// assert_eq!(merged.baseline_window_days, Some(60));
    /// ```
    pub fn layered_over(&self, base: &FileAnalysisOverrides) -> FileAnalysisOverrides {
        FileAnalysisOverrides {
            recent_window_days: self.recent_window_days.or(base.recent_window_days),
            baseline_window_days: self.baseline_window_days.or(base.baseline_window_days),
            bug_fix_keywords: self
                .bug_fix_keywords
                .clone()
                .or_else(|| base.bug_fix_keywords.clone()),
        }
    }

    /// Merge with the defaults into a complete [`FileAnalysisConfig`].
    pub fn resolve(&self) -> FileAnalysisConfig {
        let defaults = FileAnalysisConfig::default();
        FileAnalysisConfig {
            recent_window_days: self
                .recent_window_days
                .unwrap_or(defaults.recent_window_days),
            baseline_window_days: self
                .baseline_window_days
                .unwrap_or(defaults.baseline_window_days),
            bug_fix_keywords: match &self.bug_fix_keywords {
                Some(keywords) => keywords.iter().map(|k| k.to_lowercase()).collect(),
                None => defaults.bug_fix_keywords,
            },
        }
    }
}

/// Where the synced activity data lives.
///
/// # Examples
///
/// ```
/// use impact_core::DataConfig;
///
/// let config = DataConfig::default();
/// assert!(config.path.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the synced `data.json` (default: `~/.impact-journal/data.json`).
    pub path: Option<PathBuf>,
}

/// Local git history mining configuration.
///
/// # Examples
///
/// ```
/// use impact_core::HistoryConfig;
///
/// let config = HistoryConfig::default();
/// assert!(config.since_days.is_none());
/// assert_eq!(config.max_files_per_commit, 25);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Only mine commits from the last N days (default: whole history).
    #[serde(default)]
    pub since_days: Option<u64>,
    /// Skip commits touching more files than this (default: 25).
    #[serde(default = "default_max_files_per_commit")]
    pub max_files_per_commit: usize,
}

fn default_max_files_per_commit() -> usize {
    25
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            since_days: None,
            max_files_per_commit: default_max_files_per_commit(),
        }
    }
}
