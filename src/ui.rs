//! Terminal messages.
//!
//! Everything goes to stderr; stdout carries generated config only.

use colored::Colorize;

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    eprintln!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    eprintln!();
    eprintln!("{}", title.bold());
    eprintln!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Pluralize a noun for counts in summaries
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
