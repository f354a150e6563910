//! Per-file risk analysis entry points.
//!
//! [`analyze_file`] is a pure function of the commit corpus, the target
//! path, the configuration, and the instant the windows end at. Callers that
//! want the wall clock use [`analyze_file_now`].

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use impact_core::{Commit, FileAnalysisConfig, DEFAULT_BUG_FIX_KEYWORDS};
use serde::{Deserialize, Serialize};

use crate::averages::{compute_repo_averages, RepoAverages};
use crate::bugfix::is_bug_fix;
use crate::filter::{filter_file_history, AnalysisWindows, Window};
use crate::risk::{activity_multiplier, classify_risk, RiskLevel, RiskSignals};
use crate::rounding::round_half_up;
use crate::trend::{detect_trend, TrendDirection};

/// Risk analysis of a single file.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_pulse::analyzer::FileAnalysis;
/// use impact_pulse::risk::RiskLevel;
/// use impact_pulse::trend::TrendDirection;
///
/// let analysis = FileAnalysis {
///     filename: "src/net.rs".into(),
///     total_commits: 7,
///     recent_commits: 4,
///     repo_avg_commits: 1.3,
///     activity_multiplier: 3.1,
///     bug_fix_count: 2,
///     bug_fix_percentage: 50,
///     repo_avg_bug_fix_percentage: 28.6,
///     baseline_commits: 2,
///     trend_direction: TrendDirection::Increasing,
///     trend_percentage: 100,
///     risk_level: RiskLevel::High,
///     risk_reasons: vec!["Activity 3.1x above average".into()],
///     analyzed_at: Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap(),
/// };
/// assert!(analysis.recent_commits <= analysis.total_commits);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    /// Path as given by the caller.
    pub filename: String,
    /// Commits touching the file, any date.
    pub total_commits: u32,
    /// Commits touching the file in the recent window.
    pub recent_commits: u32,
    /// Repository-wide average commits per file.
    pub repo_avg_commits: f64,
    /// `recent_commits / repo_avg_commits`, one decimal.
    pub activity_multiplier: f64,
    /// Bug-fix commits in the recent window.
    pub bug_fix_count: u32,
    /// `bug_fix_count / recent_commits` as a rounded percentage.
    pub bug_fix_percentage: u32,
    /// Repository-wide average bug-fix percentage.
    pub repo_avg_bug_fix_percentage: f64,
    /// Commits touching the file in the baseline window.
    pub baseline_commits: u32,
    /// Recent-versus-baseline direction.
    pub trend_direction: TrendDirection,
    /// Signed percentage change from baseline to recent.
    pub trend_percentage: i64,
    /// Verdict from the risk ladder.
    pub risk_level: RiskLevel,
    /// Why the verdict was reached. Never empty.
    pub risk_reasons: Vec<String>,
    /// The instant the analysis windows end at.
    pub analyzed_at: DateTime<Utc>,
}

/// Analyze `filename` against the whole commit corpus, with windows ending
/// at `now`.
///
/// Never fails: an empty corpus or an unknown file yields zero counts and an
/// `UNKNOWN` verdict. Configured keywords decide the file's own bug-fix
/// count; repository averages always use [`DEFAULT_BUG_FIX_KEYWORDS`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_core::{Commit, FileAnalysisConfig};
/// use impact_pulse::analyzer::analyze_file;
/// use impact_pulse::risk::RiskLevel;
///
/// let now = Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap();
/// let analysis = analyze_file("src/net.rs", &[], &FileAnalysisConfig::default(), now);
/// assert_eq!(analysis.total_commits, 0);
/// assert_eq!(analysis.risk_level, RiskLevel::Unknown);
/// assert_eq!(analysis.analyzed_at, now);
/// ```
pub fn analyze_file(
    filename: &str,
    commits: &[Commit],
    config: &FileAnalysisConfig,
    now: DateTime<Utc>,
) -> FileAnalysis {
    let averages = compute_repo_averages(commits, DEFAULT_BUG_FIX_KEYWORDS);
    analyze_with_averages(filename, commits, config, &averages, now)
}

/// [`analyze_file`] with windows ending at the current wall-clock time.
pub fn analyze_file_now(
    filename: &str,
    commits: &[Commit],
    config: &FileAnalysisConfig,
) -> FileAnalysis {
    analyze_file(filename, commits, config, Utc::now())
}

/// Analyze every file touched in the recent window.
///
/// Repository averages are computed once and shared. Results are ordered by
/// risk level (most severe first), then recent commits descending, then
/// filename.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_core::{Commit, FileAnalysisConfig};
/// use impact_pulse::analyzer::analyze_repository;
///
/// let now = Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap();
/// let commits = vec![Commit {
///     id: "1".into(),
///     message: "Fix crash".into(),
///     authored_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
///     touched_files: vec!["a.rs".into(), "b.rs".into()],
/// }];
/// let ranked = analyze_repository(&commits, &FileAnalysisConfig::default(), now);
/// assert_eq!(ranked.len(), 2);
/// assert_eq!(ranked[0].filename, "a.rs");
/// ```
pub fn analyze_repository(
    commits: &[Commit],
    config: &FileAnalysisConfig,
    now: DateTime<Utc>,
) -> Vec<FileAnalysis> {
    let windows = AnalysisWindows::ending_at(now, config);
    let recent_files: BTreeSet<&str> = commits
        .iter()
        .filter(|c| windows.classify(c.authored_at) == Some(Window::Recent))
        .flat_map(|c| c.touched_files.iter().map(String::as_str))
        .collect();

    if recent_files.is_empty() {
        return Vec::new();
    }

    let averages = compute_repo_averages(commits, DEFAULT_BUG_FIX_KEYWORDS);
    let mut analyses: Vec<FileAnalysis> = recent_files
        .into_iter()
        .map(|file| analyze_with_averages(file, commits, config, &averages, now))
        .collect();

    analyses.sort_by(|a, b| {
        a.risk_level
            .rank()
            .cmp(&b.risk_level.rank())
            .then_with(|| b.recent_commits.cmp(&a.recent_commits))
            .then_with(|| a.filename.cmp(&b.filename))
    });

    analyses
}

fn analyze_with_averages(
    filename: &str,
    commits: &[Commit],
    config: &FileAnalysisConfig,
    averages: &RepoAverages,
    now: DateTime<Utc>,
) -> FileAnalysis {
    let windows = AnalysisWindows::ending_at(now, config);
    let history = filter_file_history(filename, commits, &windows);
    let recent_commits = history.recent_commits();

    let bug_fix_count = history
        .recent
        .iter()
        .filter(|c| is_bug_fix(&c.message, &config.bug_fix_keywords))
        .count() as u32;
    let bug_fix_percentage = if recent_commits > 0 {
        round_half_up(f64::from(bug_fix_count) / f64::from(recent_commits) * 100.0) as u32
    } else {
        0
    };

    let trend = detect_trend(recent_commits, history.baseline_commits);
    let multiplier = activity_multiplier(recent_commits, averages.avg_commits_per_file);

    let verdict = classify_risk(&RiskSignals {
        recent_commits,
        activity_multiplier: multiplier,
        bug_fix_percentage,
        trend,
        repo_avg_bug_fix_percentage: averages.avg_bug_fix_percentage,
        recent_window_days: config.recent_window_days,
    });

    tracing::debug!(
        file = filename,
        total = history.total_commits,
        recent = recent_commits,
        baseline = history.baseline_commits,
        bug_fixes = bug_fix_count,
        level = %verdict.level,
        "analyzed file"
    );

    FileAnalysis {
        filename: filename.to_string(),
        total_commits: history.total_commits,
        recent_commits,
        repo_avg_commits: averages.avg_commits_per_file,
        activity_multiplier: multiplier,
        bug_fix_count,
        bug_fix_percentage,
        repo_avg_bug_fix_percentage: averages.avg_bug_fix_percentage,
        baseline_commits: history.baseline_commits,
        trend_direction: trend.direction,
        trend_percentage: trend.percentage,
        risk_level: verdict.level,
        risk_reasons: verdict.reasons,
        analyzed_at: now,
    }
}

impl fmt::Display for FileAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File Risk Analysis: {}", self.filename)?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Risk level: {}\n", self.risk_level)?;

        writeln!(f, "Activity")?;
        writeln!(f, "  Recent commits:     {}", self.recent_commits)?;
        writeln!(f, "  All-time commits:   {}", self.total_commits)?;
        writeln!(f, "  Repository average: {} commits", self.repo_avg_commits)?;
        writeln!(f, "  Multiplier:         {}x\n", self.activity_multiplier)?;

        writeln!(f, "Bug fixes")?;
        writeln!(
            f,
            "  This file:          {}/{} commits ({}%)",
            self.bug_fix_count, self.recent_commits, self.bug_fix_percentage
        )?;
        writeln!(
            f,
            "  Repository average: {}%\n",
            self.repo_avg_bug_fix_percentage
        )?;

        writeln!(f, "Stability trend")?;
        writeln!(f, "  Baseline commits:   {}", self.baseline_commits)?;
        writeln!(f, "  Recent commits:     {}", self.recent_commits)?;
        writeln!(
            f,
            "  Trend:              {} ({}%)\n",
            self.trend_direction, self.trend_percentage
        )?;

        writeln!(f, "Reasons")?;
        for reason in &self.risk_reasons {
            writeln!(f, "  - {reason}")?;
        }
        Ok(())
    }
}

impl FileAnalysis {
    /// Render the analysis as a markdown string.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use impact_core::FileAnalysisConfig;
    /// use impact_pulse::analyzer::analyze_file;
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap();
    /// let md = analyze_file("a.rs", &[], &FileAnalysisConfig::default(), now).to_markdown();
    /// assert!(md.starts_with("# File Risk Analysis: `a.rs`"));
    /// assert!(md.contains("**Risk level:** UNKNOWN"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# File Risk Analysis: `{}`\n\n", self.filename));
        out.push_str(&format!("**Risk level:** {}\n\n", self.risk_level));

        out.push_str("| Metric | This file | Repository average |\n");
        out.push_str("|--------|-----------|--------------------|\n");
        out.push_str(&format!(
            "| Recent commits | {} ({}x) | {} |\n",
            self.recent_commits, self.activity_multiplier, self.repo_avg_commits
        ));
        out.push_str(&format!(
            "| Bug fixes | {}/{} ({}%) | {}% |\n",
            self.bug_fix_count,
            self.recent_commits,
            self.bug_fix_percentage,
            self.repo_avg_bug_fix_percentage
        ));
        out.push_str(&format!(
            "| Trend | {} ({}%) | baseline: {} commits |\n\n",
            self.trend_direction, self.trend_percentage, self.baseline_commits
        ));

        out.push_str("## Reasons\n\n");
        for reason in &self.risk_reasons {
            out.push_str(&format!("- {reason}\n"));
        }
        out
    }
}
