//! Output formatting for CLI commands.

use clap::ValueEnum;
use colored::Colorize;
use rm_capacity::{bar_fill, classify, Tier};
use serde::Serialize;
use tabled::{Table, Tabled};

const CLI_SCHEMA_VERSION: &str = "rmctl.v1";

/// Width of a rendered capacity bar, in cells.
const BAR_WIDTH: usize = 20;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// Print data in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                let table = Table::new(data).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = format_json(data, "[]");
            println!("{}", json);
        }
    }
}

/// Print a single item as JSON, regardless of format.
pub fn print_single<T: Serialize>(data: &T) {
    println!("{}", format_json(data, "{}"));
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}

/// Print a section heading for table output.
pub fn print_heading(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Renders a capacity bar coloured by tier, e.g. `[████████░░░░] 65% warning`.
pub fn capacity_bar(total: i32) -> String {
    let tier = classify(total);
    let filled = usize::from(bar_fill(total)) * BAR_WIDTH / 100;
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    );
    let label = format!("{total}% {tier}");

    match tier {
        Tier::Normal => format!("[{}] {}", bar.green(), label.green()),
        Tier::Warning => format!("[{}] {}", bar.yellow(), label.yellow()),
        Tier::Overloaded => format!("[{}] {}", bar.red(), label.red().bold()),
    }
}

/// Result of a write operation.
pub struct Receipt<'a, T: Serialize> {
    pub message: String,
    pub kind: &'a str,
    pub resource_key: &'a str,
    pub resource: &'a T,
    pub ids: serde_json::Value,
    /// Extra lines shown after the success message in table output.
    pub details: Vec<String>,
}

pub fn receipt_value<T: Serialize>(
    kind: &str,
    resource_key: &str,
    resource: &T,
    ids: serde_json::Value,
) -> serde_json::Value {
    let mut receipt = serde_json::Map::new();
    receipt.insert("kind".to_string(), serde_json::json!(kind));
    receipt.insert("ids".to_string(), ids);
    receipt.insert(
        resource_key.to_string(),
        serde_json::to_value(resource).unwrap_or_else(|_| serde_json::json!({})),
    );
    serde_json::json!({ "receipt": receipt })
}

pub fn print_receipt<T: Serialize>(format: OutputFormat, receipt: Receipt<'_, T>) {
    match format {
        OutputFormat::Table => {
            print_success(&receipt.message);
            for line in &receipt.details {
                println!("  {line}");
            }
        }
        OutputFormat::Json => {
            let out = receipt_value(
                receipt.kind,
                receipt.resource_key,
                receipt.resource,
                receipt.ids,
            );
            print_single(&out);
        }
    }
}

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let wrapped = wrap_with_schema(value);
    let sorted = sort_json_value(wrapped);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| fallback.to_string())
}

fn wrap_with_schema(value: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": value
    })
}

fn sort_json_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(values) => {
            serde_json::Value::Array(values.into_iter().map(sort_json_value).collect())
        }
        serde_json::Value::Object(entries) => {
            let mut pairs: Vec<_> = entries.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut mapped = serde_json::Map::new();
            for (key, value) in pairs {
                mapped.insert(key, sort_json_value(value));
            }
            serde_json::Value::Object(mapped)
        }
        other => other,
    }
}
