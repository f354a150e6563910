//! Commit history analysis: file risk, bug-fix density, and activity trends.
//!
//! Scores how change-prone and defect-prone a file is by comparing its
//! windowed commit counts and bug-fix share against repository-wide
//! averages, then running the result through an ordered risk ladder.
//! Commits come from synced GitHub data or are mined from a local
//! repository with git2.

pub mod analyzer;
pub mod averages;
pub mod bugfix;
pub mod filter;
pub mod mining;
pub mod risk;
mod rounding;
pub mod trend;
