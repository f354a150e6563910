//! Rule-based risk classification for a single file.
//!
//! The rules overlap, so they are kept as an ordered ladder and the first
//! matching rung decides the verdict. A file at 2.6x activity with 45% bug
//! fixes satisfies both the second `HIGH` rung and the `MEDIUM` rung; it is
//! `HIGH` because that rung comes first.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rounding::round_tenths;
use crate::trend::{Trend, TrendDirection};

/// Categorical risk verdict for a file.
///
/// # Examples
///
/// ```
/// use impact_pulse::risk::RiskLevel;
///
/// assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
/// assert_eq!(RiskLevel::Unknown.to_string(), "UNKNOWN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Hot and defect-prone.
    High,
    /// Elevated activity or bug-fix share.
    Medium,
    /// Within normal ranges.
    Low,
    /// No recent activity to judge.
    Unknown,
}

impl RiskLevel {
    /// Sort key: most severe first, `Unknown` last.
    pub fn rank(self) -> u8 {
        match self {
            RiskLevel::High => 0,
            RiskLevel::Medium => 1,
            RiskLevel::Low => 2,
            RiskLevel::Unknown => 3,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Everything the ladder looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskSignals {
    /// Commits touching the file in the recent window.
    pub recent_commits: u32,
    /// Recent commits relative to the repository average, one decimal.
    pub activity_multiplier: f64,
    /// Share of recent commits that are bug fixes (0–100).
    pub bug_fix_percentage: u32,
    /// Recent-versus-baseline trend.
    pub trend: Trend,
    /// Repository-wide bug-fix percentage, for context in reasons.
    pub repo_avg_bug_fix_percentage: f64,
    /// Recent window length, for the no-activity reason.
    pub recent_window_days: u32,
}

/// Verdict plus the human-readable reasons behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    /// Risk level.
    pub level: RiskLevel,
    /// Reasons in the order they were established. Never empty.
    pub reasons: Vec<String>,
}

/// Recent commits divided by the repository average, one decimal.
///
/// Zero when the repository average is zero.
///
/// # Examples
///
/// ```
/// use impact_pulse::risk::activity_multiplier;
///
/// assert_eq!(activity_multiplier(4, 1.5), 2.7);
/// assert_eq!(activity_multiplier(4, 0.0), 0.0);
/// ```
pub fn activity_multiplier(recent_commits: u32, repo_avg_commits: f64) -> f64 {
    if repo_avg_commits > 0.0 {
        round_tenths(f64::from(recent_commits) / repo_avg_commits)
    } else {
        0.0
    }
}

struct RiskRule {
    name: &'static str,
    applies: fn(&RiskSignals) -> bool,
    assess: fn(&RiskSignals) -> RiskAssessment,
}

const RISK_LADDER: &[RiskRule] = &[
    RiskRule {
        name: "no-recent-activity",
        applies: |s| s.recent_commits == 0,
        assess: |s| RiskAssessment {
            level: RiskLevel::Unknown,
            reasons: vec![format!(
                "No recent activity in last {} days",
                s.recent_window_days
            )],
        },
    },
    RiskRule {
        name: "hot-buggy-increasing",
        applies: |s| {
            s.activity_multiplier >= 3.0
                && s.bug_fix_percentage >= 50
                && s.trend.direction == TrendDirection::Increasing
        },
        assess: |s| RiskAssessment {
            level: RiskLevel::High,
            reasons: vec![
                activity_reason(s),
                bug_fix_reason(s),
                format!("Activity increased {}%", s.trend.percentage),
            ],
        },
    },
    RiskRule {
        name: "hot-buggy",
        applies: |s| s.activity_multiplier >= 2.5 && s.bug_fix_percentage >= 40,
        assess: |s| RiskAssessment {
            level: RiskLevel::High,
            reasons: vec![
                activity_reason(s),
                format!(
                    "{}% of commits are bug fixes (repo avg: {}%)",
                    s.bug_fix_percentage, s.repo_avg_bug_fix_percentage
                ),
            ],
        },
    },
    RiskRule {
        name: "elevated",
        applies: |s| s.activity_multiplier >= 2.0 || s.bug_fix_percentage >= 30,
        assess: |s| {
            let mut reasons = Vec::new();
            if s.activity_multiplier >= 2.0 {
                reasons.push(activity_reason(s));
            }
            if s.bug_fix_percentage >= 30 {
                reasons.push(bug_fix_reason(s));
            }
            if s.trend.direction == TrendDirection::Increasing {
                reasons.push(format!("Activity is increasing ({}%)", s.trend.percentage));
            }
            RiskAssessment {
                level: RiskLevel::Medium,
                reasons,
            }
        },
    },
    RiskRule {
        name: "normal",
        applies: |_| true,
        assess: |_| normal(),
    },
];

fn activity_reason(s: &RiskSignals) -> String {
    format!("Activity {}x above average", s.activity_multiplier)
}

fn bug_fix_reason(s: &RiskSignals) -> String {
    format!("{}% of commits are bug fixes", s.bug_fix_percentage)
}

fn normal() -> RiskAssessment {
    RiskAssessment {
        level: RiskLevel::Low,
        reasons: vec!["Activity and bug fix rates are normal".to_string()],
    }
}

/// Run the signals down the risk ladder; the first matching rule wins.
///
/// # Examples
///
/// ```
/// use impact_pulse::risk::{classify_risk, RiskLevel, RiskSignals};
/// use impact_pulse::trend::{Trend, TrendDirection};
///
/// let signals = RiskSignals {
///     recent_commits: 6,
///     activity_multiplier: 2.6,
///     bug_fix_percentage: 45,
///     trend: Trend { direction: TrendDirection::Stable, percentage: 20 },
///     repo_avg_bug_fix_percentage: 12.5,
///     recent_window_days: 90,
/// };
/// let verdict = classify_risk(&signals);
/// assert_eq!(verdict.level, RiskLevel::High);
/// assert_eq!(verdict.reasons[1], "45% of commits are bug fixes (repo avg: 12.5%)");
/// ```
pub fn classify_risk(signals: &RiskSignals) -> RiskAssessment {
    match RISK_LADDER.iter().find(|rule| (rule.applies)(signals)) {
        Some(rule) => {
            tracing::trace!(rule = rule.name, "risk rule matched");
            (rule.assess)(signals)
        }
        None => normal(),
    }
}
