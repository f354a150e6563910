//! Activity reports built from the synced GitHub data file.
//!
//! Loads the activity log written by the sync step and turns it into
//! daily standups and period summaries.

pub mod dates;
pub mod standup;
pub mod store;
pub mod summary;
