//! Daily standup: what was done yesterday, what is open today.

use std::fmt;

use chrono::{DateTime, TimeDelta, TimeZone};
use impact_core::PrState;
use serde::{Deserialize, Serialize};

use crate::dates::{is_within_range, start_of_day};
use crate::store::ActivityLog;

/// A commit made yesterday, labelled with its repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandupCommit {
    /// Repository name.
    pub repo: String,
    /// Full commit message.
    pub message: String,
}

/// Standup notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standup {
    /// Commits authored yesterday, repository by repository.
    pub yesterday_commits: Vec<StandupCommit>,
    /// Titles of pull requests still open.
    pub open_prs: Vec<String>,
}

/// Build standup notes as of `now`.
///
/// "Yesterday" is `[start of yesterday, start of today]` in `now`'s time
/// zone, both ends inclusive.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_reports::standup::generate_standup;
/// use impact_reports::store::ActivityLog;
///
/// let now = Utc.with_ymd_and_hms(2026, 1, 16, 9, 0, 0).unwrap();
/// let standup = generate_standup(&ActivityLog::default(), &now);
/// assert!(standup.yesterday_commits.is_empty());
/// assert!(standup.open_prs.is_empty());
/// ```
pub fn generate_standup<Tz: TimeZone>(log: &ActivityLog, now: &DateTime<Tz>) -> Standup {
    let yesterday = now.clone() - TimeDelta::days(1);
    let start = start_of_day(&yesterday);
    let end = start_of_day(now);

    let yesterday_commits = log
        .commits
        .iter()
        .flat_map(|(repo, commits)| {
            commits
                .iter()
                .filter(|c| is_within_range(&c.authored_at, &start, &end))
                .map(move |c| StandupCommit {
                    repo: repo.clone(),
                    message: c.message.clone(),
                })
        })
        .collect();

    let open_prs = log
        .pull_requests
        .iter()
        .filter(|pr| pr.state == PrState::Open)
        .map(|pr| pr.title.clone())
        .collect();

    Standup {
        yesterday_commits,
        open_prs,
    }
}

impl fmt::Display for Standup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "STANDUP\n")?;
        writeln!(f, "Yesterday:")?;
        if self.yesterday_commits.is_empty() {
            writeln!(f, "  - No commits")?;
        }
        for commit in &self.yesterday_commits {
            writeln!(f, "  - {} ({})", subject(&commit.message), commit.repo)?;
        }

        writeln!(f, "\nToday:")?;
        if self.open_prs.is_empty() {
            writeln!(f, "  - Continue current work")?;
        }
        for title in &self.open_prs {
            writeln!(f, "  - Work on: {title}")?;
        }

        writeln!(f, "\nBlockers:")?;
        write!(f, "  - None")
    }
}

impl Standup {
    /// Render the standup as a markdown string.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Standup\n\n## Yesterday\n\n");
        if self.yesterday_commits.is_empty() {
            out.push_str("- No commits\n");
        }
        for commit in &self.yesterday_commits {
            out.push_str(&format!(
                "- {} (`{}`)\n",
                subject(&commit.message),
                commit.repo
            ));
        }

        out.push_str("\n## Today\n\n");
        if self.open_prs.is_empty() {
            out.push_str("- Continue current work\n");
        }
        for title in &self.open_prs {
            out.push_str(&format!("- Work on: {title}\n"));
        }

        out.push_str("\n## Blockers\n\n- None\n");
        out
    }
}

fn subject(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use impact_core::{Commit, PullRequest};

    fn commit(message: &str, at: DateTime<Utc>) -> Commit {
        Commit {
            id: message.into(),
            message: message.into(),
            authored_at: at,
            touched_files: Vec::new(),
        }
    }

    fn pr(title: &str, state: PrState) -> PullRequest {
        PullRequest {
            title: title.into(),
            state,
            created_at: Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap(),
            repository_url: "https://api.github.com/repos/user/my-project".into(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 16, 9, 0, 0).unwrap()
    }

    fn sample_log() -> ActivityLog {
        let mut log = ActivityLog::default();
        log.commits.insert(
            "my-project".into(),
            vec![
                commit("Yesterday noon", Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()),
                commit("Two days ago", Utc.with_ymd_and_hms(2026, 1, 14, 12, 0, 0).unwrap()),
                commit("This morning", Utc.with_ymd_and_hms(2026, 1, 16, 8, 0, 0).unwrap()),
            ],
        );
        log.commits.insert(
            "other".into(),
            vec![commit(
                "Start of yesterday",
                Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
            )],
        );
        log.pull_requests = vec![
            pr("Open PR", PrState::Open),
            pr("Closed PR", PrState::Closed),
            pr("Another Open", PrState::Open),
        ];
        log
    }

    #[test]
    fn empty_log_yields_empty_standup() {
        assert_eq!(
            generate_standup(&ActivityLog::default(), &now()),
            Standup::default()
        );
    }

    #[test]
    fn picks_yesterdays_commits_with_repo() {
        let standup = generate_standup(&sample_log(), &now());
        assert_eq!(
            standup.yesterday_commits,
            vec![
                StandupCommit {
                    repo: "my-project".into(),
                    message: "Yesterday noon".into()
                },
                StandupCommit {
                    repo: "other".into(),
                    message: "Start of yesterday".into()
                },
            ]
        );
    }

    #[test]
    fn midnight_today_counts_as_yesterday() {
        let mut log = ActivityLog::default();
        log.commits.insert(
            "r".into(),
            vec![commit("Midnight", Utc.with_ymd_and_hms(2026, 1, 16, 0, 0, 0).unwrap())],
        );
        assert_eq!(generate_standup(&log, &now()).yesterday_commits.len(), 1);
    }

    #[test]
    fn only_open_prs_are_listed() {
        let standup = generate_standup(&sample_log(), &now());
        assert_eq!(standup.open_prs, vec!["Open PR", "Another Open"]);
    }

    #[test]
    fn day_boundaries_follow_time_zone() {
        // In UTC-10 "yesterday" runs from 10:00 UTC on the 15th to 10:00 UTC
        // on the 16th.
        let tz = FixedOffset::west_opt(10 * 3600).unwrap();
        let local_now = tz.with_ymd_and_hms(2026, 1, 16, 9, 0, 0).unwrap();
        let messages: Vec<String> = generate_standup(&sample_log(), &local_now)
            .yesterday_commits
            .into_iter()
            .map(|c| c.message)
            .collect();
        assert_eq!(messages, vec!["Yesterday noon", "This morning"]);
    }

    #[test]
    fn display_has_placeholders_when_empty() {
        let text = Standup::default().to_string();
        assert!(text.contains("  - No commits"));
        assert!(text.contains("  - Continue current work"));
        assert!(text.ends_with("Blockers:\n  - None"));
    }

    #[test]
    fn display_uses_commit_subject() {
        let standup = Standup {
            yesterday_commits: vec![StandupCommit {
                repo: "api".into(),
                message: "Fix login\n\nLong body".into(),
            }],
            open_prs: vec!["Add SSO".into()],
        };
        let text = standup.to_string();
        assert!(text.contains("  - Fix login (api)\n"));
        assert!(!text.contains("Long body"));
        assert!(text.contains("  - Work on: Add SSO"));
        assert!(standup.to_markdown().contains("- Fix login (`api`)"));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(generate_standup(&sample_log(), &now())).unwrap();
        assert!(json.get("yesterdayCommits").is_some());
        assert_eq!(json["openPrs"][0], "Open PR");
    }
}
