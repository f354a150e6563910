//! Bug-fix commit detection.

/// Whether a commit message looks like a bug fix.
///
/// Case-insensitive substring match: true if any keyword occurs anywhere in
/// the message. An empty keyword list never matches.
///
/// # Examples
///
/// ```
/// use impact_core::FileAnalysisConfig;
/// use impact_pulse::bugfix::is_bug_fix;
///
/// let keywords = FileAnalysisConfig::default().bug_fix_keywords;
/// assert!(is_bug_fix("Fix connection timeout", &keywords));
/// assert!(!is_bug_fix("Add new feature", &keywords));
///
/// assert!(is_bug_fix("Resolve timeout", &["resolve"]));
/// assert!(!is_bug_fix("Fix timeout", &["resolve"]));
/// ```
pub fn is_bug_fix<S: AsRef<str>>(message: &str, keywords: &[S]) -> bool {
    let message = message.to_lowercase();
    keywords
        .iter()
        .any(|keyword| message.contains(&keyword.as_ref().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use impact_core::DEFAULT_BUG_FIX_KEYWORDS;

    fn default_match(message: &str) -> bool {
        is_bug_fix(message, DEFAULT_BUG_FIX_KEYWORDS)
    }

    #[test]
    fn detects_default_keywords() {
        assert!(default_match("Fix connection timeout"));
        assert!(default_match("Hotfix: memory leak in auth"));
        assert!(default_match("fix: null pointer exception"));
        assert!(default_match("Bug fix for login issue"));
        assert!(default_match("Revert previous commit"));
        assert!(default_match("Rollback broken deployment"));
        assert!(default_match("Patch security vulnerability"));
        assert!(default_match("Resolve issue with auth flow"));
    }

    #[test]
    fn ignores_non_fix_messages() {
        assert!(!default_match("Add new bluetooth feature"));
        assert!(!default_match("Update configuration"));
        assert!(!default_match("Refactor connection logic"));
        assert!(!default_match("Improve performance"));
    }

    #[test]
    fn matches_inside_words() {
        // Substring semantics: "prefix" contains "fix".
        assert!(default_match("Rename prefix helper"));
        assert!(default_match("DEBUGGING session notes"));
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        assert!(is_bug_fix("Resolve timeout error", &["resolve"]));
        assert!(!is_bug_fix("Fix timeout error", &["resolve"]));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert!(is_bug_fix("resolve the crash", &["RESOLVE"]));
    }

    #[test]
    fn empty_keyword_list_never_matches() {
        let none: [&str; 0] = [];
        assert!(!is_bug_fix("Fix everything", &none));
        assert!(!is_bug_fix("", &none));
    }
}
