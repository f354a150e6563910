//! Activity summary over a calendar period.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeZone};
use impact_core::PrState;
use serde::{Deserialize, Serialize};

use crate::dates::{is_within_range, start_of_day, start_of_month, start_of_week};
use crate::store::ActivityLog;

/// Calendar period a summary covers, always ending now.
///
/// # Examples
///
/// ```
/// use impact_reports::summary::Period;
///
/// let p: Period = "week".parse().unwrap();
/// assert_eq!(p, Period::Week);
/// assert_eq!(Period::default(), Period::Week);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Since midnight.
    Today,
    /// Since midnight on Sunday.
    #[default]
    Week,
    /// Since midnight on the first of the month.
    Month,
}

impl Period {
    /// Start of the period containing `now`.
    pub fn start<Tz: TimeZone>(self, now: &DateTime<Tz>) -> DateTime<Tz> {
        match self {
            Period::Today => start_of_day(now),
            Period::Week => start_of_week(now),
            Period::Month => start_of_month(now),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Today => write!(f, "today"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" | "day" => Ok(Period::Today),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(format!("unknown period: {other}")),
        }
    }
}

/// A pull request created during the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPr {
    /// Pull request title.
    pub title: String,
    /// Repository name.
    pub repo: String,
    /// Current state.
    pub state: PrState,
}

/// What happened during a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The period summarized.
    pub period: Period,
    /// Start of the period.
    pub start_date: DateTime<FixedOffset>,
    /// End of the period (the time the summary was generated).
    pub end_date: DateTime<FixedOffset>,
    /// Commits in the period across all repositories.
    pub total_commits: usize,
    /// Commit messages per repository. Repositories without commits in the
    /// period are left out.
    pub commits_by_repo: BTreeMap<String, Vec<String>>,
    /// Pull requests created in the period.
    pub prs_in_range: Vec<SummaryPr>,
}

/// Summarize the activity log over `period`, ending at `now`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_reports::store::ActivityLog;
/// use impact_reports::summary::{generate_summary, Period};
///
/// let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
/// let summary = generate_summary(&ActivityLog::default(), Period::Month, &now);
/// assert_eq!(summary.total_commits, 0);
/// assert_eq!(summary.start_date, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
/// ```
pub fn generate_summary<Tz: TimeZone>(
    log: &ActivityLog,
    period: Period,
    now: &DateTime<Tz>,
) -> Summary {
    let start = period.start(now);

    let commits_by_repo: BTreeMap<String, Vec<String>> = log
        .commits
        .iter()
        .filter_map(|(repo, commits)| {
            let messages: Vec<String> = commits
                .iter()
                .filter(|c| is_within_range(&c.authored_at, &start, now))
                .map(|c| c.message.clone())
                .collect();
            (!messages.is_empty()).then(|| (repo.clone(), messages))
        })
        .collect();
    let total_commits = commits_by_repo.values().map(Vec::len).sum();

    let prs_in_range = log
        .pull_requests
        .iter()
        .filter(|pr| is_within_range(&pr.created_at, &start, now))
        .map(|pr| SummaryPr {
            title: pr.title.clone(),
            repo: pr.repo_name().to_string(),
            state: pr.state,
        })
        .collect();

    Summary {
        period,
        start_date: start.fixed_offset(),
        end_date: now.fixed_offset(),
        total_commits,
        commits_by_repo,
        prs_in_range,
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Summary ({}): {} - {}",
            self.period,
            self.start_date.format("%a %b %d %Y"),
            self.end_date.format("%a %b %d %Y")
        )?;
        writeln!(f, "\nTotal commits: {}", self.total_commits)?;
        if !self.commits_by_repo.is_empty() {
            writeln!(f, "\nBy repository:")?;
            for (repo, messages) in &self.commits_by_repo {
                writeln!(f, "  {repo}: {} commits", messages.len())?;
            }
        }
        write!(f, "\nPull requests: {}", self.prs_in_range.len())?;
        for pr in &self.prs_in_range {
            write!(f, "\n  - {} ({}, {})", pr.title, pr.repo, pr.state)?;
        }
        Ok(())
    }
}

impl Summary {
    /// Render the summary as a markdown string.
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "# Summary: {}\n\n{} to {}\n\n**Total commits:** {}\n",
            self.period,
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            self.total_commits
        );
        for (repo, messages) in &self.commits_by_repo {
            out.push_str(&format!("\n## {repo} ({} commits)\n\n", messages.len()));
            for message in messages {
                out.push_str(&format!("- {}\n", message.lines().next().unwrap_or("")));
            }
        }
        out.push_str(&format!(
            "\n## Pull requests ({})\n\n",
            self.prs_in_range.len()
        ));
        for pr in &self.prs_in_range {
            out.push_str(&format!("- {} (`{}`, {})\n", pr.title, pr.repo, pr.state));
        }
        out
    }
}
