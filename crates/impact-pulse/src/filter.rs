//! Commit selection and time-window bucketing for a single file.
//!
//! Windows are anchored at an explicit `now`, so the same corpus analyzed at
//! different instants can land commits in different windows.

use chrono::{DateTime, TimeDelta, Utc};
use impact_core::{Commit, FileAnalysisConfig};

/// The recent and baseline windows ending at a given instant.
///
/// The recent window is `[recent_start, ∞)`; the baseline window is
/// `[baseline_start, recent_start)`, immediately preceding it with no overlap.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_core::FileAnalysisConfig;
/// use impact_pulse::filter::{AnalysisWindows, Window};
///
/// let now = Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap();
/// let windows = AnalysisWindows::ending_at(now, &FileAnalysisConfig::default());
///
/// let recent = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
/// let baseline = Utc.with_ymd_and_hms(2025, 10, 20, 10, 0, 0).unwrap();
/// let ancient = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
/// assert_eq!(windows.classify(recent), Some(Window::Recent));
/// assert_eq!(windows.classify(baseline), Some(Window::Baseline));
/// assert_eq!(windows.classify(ancient), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindows {
    /// Inclusive lower bound of the recent window.
    pub recent_start: DateTime<Utc>,
    /// Inclusive lower bound of the baseline window.
    pub baseline_start: DateTime<Utc>,
}

/// Which window a timestamp falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// At or after the recent window start.
    Recent,
    /// Inside the baseline window.
    Baseline,
}

impl AnalysisWindows {
    /// Compute the windows that end at `now`.
    pub fn ending_at(now: DateTime<Utc>, config: &FileAnalysisConfig) -> Self {
        let recent_start = days_before(now, config.recent_window_days);
        let baseline_start = days_before(recent_start, config.baseline_window_days);
        Self {
            recent_start,
            baseline_start,
        }
    }

    /// Place a timestamp into a window, or `None` when it predates both.
    pub fn classify(&self, at: DateTime<Utc>) -> Option<Window> {
        if at >= self.recent_start {
            Some(Window::Recent)
        } else if at >= self.baseline_start {
            Some(Window::Baseline)
        } else {
            None
        }
    }
}

fn days_before(instant: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    instant
        .checked_sub_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// The commits touching one file, split by window.
#[derive(Debug, Clone)]
pub struct FileHistory<'a> {
    /// Commits touching the file, any date.
    pub total_commits: u32,
    /// Matching commits in the recent window, in corpus order.
    pub recent: Vec<&'a Commit>,
    /// Number of matching commits in the baseline window.
    pub baseline_commits: u32,
}

impl FileHistory<'_> {
    /// Number of matching commits in the recent window.
    pub fn recent_commits(&self) -> u32 {
        self.recent.len() as u32
    }
}

/// Select the commits touching `filename` and bucket them into `windows`.
///
/// Matching is an exact string comparison against each commit's touched
/// paths. Commits without file detail never match.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_core::{Commit, FileAnalysisConfig};
/// use impact_pulse::filter::{filter_file_history, AnalysisWindows};
///
/// let now = Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap();
/// let commits = vec![Commit {
///     id: "1".into(),
///     message: "Fix timeout".into(),
///     authored_at: Utc.with_ymd_and_hms(2026, 2, 10, 10, 0, 0).unwrap(),
///     touched_files: vec!["src/net.rs".into()],
/// }];
/// let windows = AnalysisWindows::ending_at(now, &FileAnalysisConfig::default());
/// let history = filter_file_history("src/net.rs", &commits, &windows);
/// assert_eq!(history.total_commits, 1);
/// assert_eq!(history.recent_commits(), 1);
/// assert_eq!(history.baseline_commits, 0);
/// ```
pub fn filter_file_history<'a>(
    filename: &str,
    commits: &'a [Commit],
    windows: &AnalysisWindows,
) -> FileHistory<'a> {
    let mut history = FileHistory {
        total_commits: 0,
        recent: Vec::new(),
        baseline_commits: 0,
    };

    for commit in commits.iter().filter(|c| c.touches(filename)) {
        history.total_commits += 1;
        match windows.classify(commit.authored_at) {
            Some(Window::Recent) => history.recent.push(commit),
            Some(Window::Baseline) => history.baseline_commits += 1,
            None => {}
        }
    }

    history
}
