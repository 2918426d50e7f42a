//! Hosts table editing
//!
//! The hosts file is line-oriented text where one line may carry several
//! aliases. Edits keep unrelated lines byte-for-byte and only ever append new
//! entries in the `ip<TAB>name` form.

use crate::error::Result;
use crate::exec::PrivilegedExecutor;
use crate::rewrite::log_diff;
use crate::state::StateReader;

/// Address conventionally mapped to the machine's own hostname
pub const LOCALHOST_ALIAS_ADDR: &str = "127.0.1.1";

/// The hosts file as an ordered sequence of lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsTable {
    lines: Vec<String>,
}

/// Whitespace-separated fields of a line, ignoring any `#` comment
fn fields(line: &str) -> Vec<&str> {
    let content = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    content.split_whitespace().collect()
}

/// True if `name` is one of the names (not the address) on this line
fn names_host(line: &str, name: &str) -> bool {
    fields(line).iter().skip(1).any(|f| *f == name)
}

impl HostsTable {
    /// Split file content into lines, keeping them verbatim
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Render back to file content, newline-terminated when non-empty
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Ensure `name` resolves to `ip` through exactly one line.
    ///
    /// A line with address `ip` that already lists `name` is kept as-is and
    /// every other line naming `name` is dropped. Without such a line, all
    /// lines naming `name` go and a fresh `ip<TAB>name` line is appended.
    pub fn upsert(&self, name: &str, ip: &str) -> (Self, bool) {
        let bound = self.lines.iter().position(|line| {
            let f = fields(line);
            f.first() == Some(&ip) && f.iter().skip(1).any(|n| *n == name)
        });

        let Some(keep) = bound else {
            let (mut table, _) = self.remove(name);
            table.lines.push(format!("{ip}\t{name}"));
            return (table, true);
        };

        let lines: Vec<String> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(idx, line)| *idx == keep || !names_host(line, name))
            .map(|(_, line)| line.clone())
            .collect();
        let changed = lines.len() != self.lines.len();
        (Self { lines }, changed)
    }

    /// Drop every non-comment line on which `name` appears as a name
    pub fn remove(&self, name: &str) -> (Self, bool) {
        let lines: Vec<String> = self
            .lines
            .iter()
            .filter(|l| !names_host(l, name))
            .cloned()
            .collect();
        let changed = lines.len() != self.lines.len();
        (Self { lines }, changed)
    }

    /// Point the `127.0.1.1` line at `name`.
    ///
    /// The first such line keeps its leading fields and gets its trailing name
    /// replaced; without one, `127.0.1.1<TAB>name` is appended.
    pub fn set_localhost_alias(&self, name: &str) -> (Self, bool) {
        let mut table = self.clone();
        let position = table
            .lines
            .iter()
            .position(|l| fields(l).first() == Some(&LOCALHOST_ALIAS_ADDR));

        let Some(idx) = position else {
            table.lines.push(format!("{LOCALHOST_ALIAS_ADDR}\t{name}"));
            return (table, true);
        };

        let line = &table.lines[idx];
        let mut f = fields(line);
        if f.len() > 1 && f.last() == Some(&name) {
            return (table, false);
        }
        if f.len() > 1 {
            f.pop();
        }
        f.push(name);

        let mut updated = f.join("\t");
        if let Some(comment) = line.find('#').map(|i| &line[i..]) {
            updated.push(' ');
            updated.push_str(comment);
        }
        table.lines[idx] = updated;
        (table, true)
    }
}

/// Re-read the hosts file, apply `edit`, and write it back only if it changed.
///
/// Returns whether a write happened.
pub fn edit_hosts_file<F>(
    reader: &StateReader<'_>,
    exec: &dyn PrivilegedExecutor,
    edit: F,
) -> Result<bool>
where
    F: FnOnce(&HostsTable) -> (HostsTable, bool),
{
    let path = &reader.paths().hosts_file;
    let current = reader.read_hosts_table()?;
    let (updated, changed) = edit(&current);
    if !changed {
        log::debug!("{} already up to date", path.display());
        return Ok(false);
    }

    let before = current.render();
    let after = updated.render();
    log_diff(path, &before, &after);
    exec.write_file(path, &after)?;
    Ok(true)
}
