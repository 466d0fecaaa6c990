//! Output formatting for console commands.

use cafe_events::Severity;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::notifications::Notification;

const CLI_SCHEMA_VERSION: &str = "cafe.cli.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
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

/// Print a single item as JSON.
pub fn print_single<T: Serialize>(data: &T, _format: OutputFormat) {
    println!("{}", format_json(data, "{}"));
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Render a notification as a one-line toast on stderr.
pub fn present_notification(notification: &Notification) {
    eprintln!("{}", toast_line(notification.severity, &notification.message));
}

fn toast_line(severity: Severity, message: &str) -> String {
    let line = match severity {
        Severity::Success => format!("✔ {message}").green(),
        Severity::Error => format!("✖ {message}").red(),
        Severity::Warning => format!("! {message}").yellow(),
        Severity::Info => format!("i {message}").blue(),
    };
    line.to_string()
}

/// `-` for missing values in tables.
pub fn display_option(opt: Option<&str>) -> String {
    opt.unwrap_or("-").to_string()
}

/// Shorten long text for table cells.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_output_is_wrapped_and_sorted() {
        let data = serde_json::json!({ "name": "Café Central", "id": 1 });
        let out: serde_json::Value = serde_json::from_str(&format_json(&data, "{}")).unwrap();

        assert_eq!(out["schemaVersion"], CLI_SCHEMA_VERSION);
        assert_eq!(out["data"]["name"], "Café Central");

        let keys: Vec<_> = out["data"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name"]);
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate("corto", 30), "corto");
        assert_eq!(
            truncate("Mesa junto a la ventana, por favor, si es posible", 30),
            "Mesa junto a la ventana, por f..."
        );
    }

    #[test]
    fn toast_line_contains_message() {
        colored::control::set_override(false);
        assert_eq!(toast_line(Severity::Success, "Guardado"), "✔ Guardado");
        assert_eq!(toast_line(Severity::Error, "boom"), "✖ boom");
    }

    #[test]
    fn format_parse_defaults_to_table() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Table);
    }
}
