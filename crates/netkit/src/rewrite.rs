//! Debug rendering of file rewrites

use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Log the line-level difference between `before` and `after` at debug level.
pub(crate) fn log_diff(path: &Path, before: &str, after: &str) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }

    let diff = TextDiff::from_lines(before, after);
    let mut rendered = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => continue,
        };
        rendered.push_str(&format!("{sign} {change}"));
        if change.missing_newline() {
            rendered.push('\n');
        }
    }

    log::debug!("Rewriting {}:\n{}", path.display(), rendered.trim_end());
}
