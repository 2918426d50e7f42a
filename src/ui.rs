//! Terminal output for runs
//!
//! Status lines go to stdout, errors to stderr. Each action prints a
//! `[n/N]` step line followed by one indented outcome line.

use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg.green().bold());
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg.yellow().bold());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a header underlined to its own width
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print the step line that opens an action
pub fn step(num: usize, total: usize, action: &str) {
    println!("{} {action}", format!("[{num}/{total}]").blue().bold());
}

/// Outcome line: the action changed something
pub fn applied(change: &str) {
    println!("  {} {change}", "✓".green());
}

/// Outcome line: the host already matched
pub fn unchanged() {
    println!("  {} {}", "○".dimmed(), "already in desired state".dimmed());
}

/// Outcome line: the action failed
pub fn failed(reason: &str) {
    println!("  {} {}", "✗".red(), reason.red());
}

/// Indented count line for the summary
pub fn tally(count: usize, label: &str) {
    println!("    • {count} {label}");
}
