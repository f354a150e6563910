//! Activity trend between the baseline and recent windows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rounding::round_half_up;

/// Direction of a file's activity compared with its baseline window.
///
/// # Examples
///
/// ```
/// use impact_pulse::trend::TrendDirection;
///
/// let json = serde_json::to_string(&TrendDirection::Increasing).unwrap();
/// assert_eq!(json, "\"increasing\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Recent activity is at least 50% above the baseline.
    Increasing,
    /// Recent activity is more than 50% below the baseline.
    Decreasing,
    /// Anything in between.
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Trend direction plus the signed percentage change behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trend {
    /// Classified direction.
    pub direction: TrendDirection,
    /// Rounded percentage change from baseline to recent.
    pub percentage: i64,
}

/// Compare recent activity against the baseline window.
///
/// With no baseline activity, any recent activity reports as a 100% surge.
///
/// # Examples
///
/// ```
/// use impact_pulse::trend::{detect_trend, TrendDirection};
///
/// let t = detect_trend(4, 2);
/// assert_eq!(t.direction, TrendDirection::Increasing);
/// assert_eq!(t.percentage, 100);
///
/// let t = detect_trend(5, 0);
/// assert_eq!(t.direction, TrendDirection::Increasing);
/// assert_eq!(t.percentage, 100);
///
/// let t = detect_trend(0, 0);
/// assert_eq!(t.direction, TrendDirection::Stable);
/// assert_eq!(t.percentage, 0);
/// ```
pub fn detect_trend(recent_commits: u32, baseline_commits: u32) -> Trend {
    if baseline_commits > 0 {
        let change = f64::from(recent_commits) - f64::from(baseline_commits);
        let percentage = round_half_up(change / f64::from(baseline_commits) * 100.0) as i64;
        let direction = if percentage >= 50 {
            TrendDirection::Increasing
        } else if percentage < -50 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };
        Trend {
            direction,
            percentage,
        }
    } else if recent_commits > 0 {
        Trend {
            direction: TrendDirection::Increasing,
            percentage: 100,
        }
    } else {
        Trend {
            direction: TrendDirection::Stable,
            percentage: 0,
        }
    }
}
