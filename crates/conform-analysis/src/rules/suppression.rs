//! Inline suppression: `conform-ignore` and `# noqa` comments.

use conform_core::constants::SUPPRESSION_MARKER;

/// Decides whether a violation is silenced by a comment in the source.
///
/// Supports:
/// - `// conform-ignore` on the violating line or the line above (all rules)
/// - `# conform-ignore SRP001, NAME001` (listed rules only)
/// - `# noqa` / `# noqa: NAME001` on the violating line
pub struct SuppressionChecker {
    marker: &'static str,
}

impl SuppressionChecker {
    pub fn new() -> Self {
        Self {
            marker: SUPPRESSION_MARKER,
        }
    }

    /// Check a violation at the 1-based `line` of `lines`. Violations
    /// without a line are never suppressed.
    pub fn is_suppressed(&self, lines: &[&str], line: Option<u32>, rule_id: &str) -> bool {
        let Some(line) = line else {
            return false;
        };
        if line == 0 {
            return false;
        }
        let idx = (line - 1) as usize;

        if let Some(current) = lines.get(idx) {
            let trimmed = current.trim();
            if self.check_marker(trimmed, rule_id) == Some(true)
                || check_noqa(trimmed, rule_id) == Some(true)
            {
                return true;
            }
        }

        idx > 0
            && lines.get(idx - 1).is_some_and(|above| {
                let above = above.trim();
                is_comment_only(above) && self.check_marker(above, rule_id) == Some(true)
            })
    }

    /// `Some(applies)` when the line carries the marker inside a comment.
    fn check_marker(&self, trimmed: &str, rule_id: &str) -> Option<bool> {
        let pos = trimmed.find(self.marker)?;

        let before = &trimmed[..pos];
        let is_comment = before.contains("//")
            || before.contains('#')
            || before.contains("--")
            || before.contains("/*");
        if !is_comment {
            return None;
        }

        let after = trimmed[pos + self.marker.len()..]
            .trim()
            .trim_start_matches(':')
            .trim_end_matches("*/")
            .trim_end_matches("-->")
            .trim();
        if after.is_empty() {
            return Some(true);
        }
        Some(lists_rule(after, rule_id))
    }
}

impl Default for SuppressionChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// `# noqa` alone suppresses everything; `# noqa: A, B` only the listed ids.
fn check_noqa(trimmed: &str, rule_id: &str) -> Option<bool> {
    let pos = trimmed.find("# noqa")?;
    let after = trimmed[pos + "# noqa".len()..].trim();
    if after.is_empty() {
        return Some(true);
    }
    match after.strip_prefix(':') {
        Some(rules) => Some(lists_rule(rules, rule_id)),
        None => Some(true),
    }
}

/// A line holding nothing but a comment.
fn is_comment_only(trimmed: &str) -> bool {
    ["#", "//", "--", "/*", "<!--"]
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

fn lists_rule(list: &str, rule_id: &str) -> bool {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .any(|r| r == rule_id)
}
