//! Terminal output helpers

use colored::*;
use mcpwatch_core::HealthStatus;

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!("{}", "=".repeat(title.len()).dimmed());
}

/// Status word colored by severity
pub fn status(status: HealthStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        HealthStatus::Healthy => text.green(),
        HealthStatus::Degraded => text.yellow(),
        HealthStatus::Unhealthy => text.red(),
        HealthStatus::Unknown => text.dimmed(),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
