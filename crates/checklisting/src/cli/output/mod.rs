//! Output formatting utilities

use console::{style, Style};

use checklisting_core::{HumanReadableSerializer, ResultStatus, ResultWriter, TaskResult};

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for a result line of the given status
pub fn status_style(status: ResultStatus) -> Style {
    match status {
        ResultStatus::Failure => Style::new().red().bold(),
        ResultStatus::Warning => Style::new().yellow(),
        ResultStatus::Success => Style::new().green(),
        ResultStatus::Info => Style::new().blue(),
        ResultStatus::Unknown => Style::new().dim(),
    }
}

/// Node statuses in the same pre-order the human serializer emits lines
fn statuses(result: &TaskResult, out: &mut Vec<ResultStatus>) {
    out.push(result.status());
    for child in result.results().unwrap_or_default() {
        statuses(child, out);
    }
}

/// Human-readable lines paired with the status of the node they render
pub fn styled_lines(result: &TaskResult) -> Vec<(String, ResultStatus)> {
    let mut order = Vec::with_capacity(result.node_count());
    statuses(result, &mut order);
    HumanReadableSerializer.get_lines(result).zip(order).collect()
}

/// Prints each result tree to stdout, colored by status
#[derive(Debug, Default)]
pub struct ConsoleWriter;

impl ResultWriter for ConsoleWriter {
    fn write(&self, result: &TaskResult) {
        for (line, status) in styled_lines(result) {
            println!("{}", status_style(status).apply_to(line));
        }
    }
}
