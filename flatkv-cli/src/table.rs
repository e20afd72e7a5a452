/// Table formatting for store dumps using comfy-table

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::Value;
use std::collections::BTreeMap;

/// Format key/value entries as a two-column table
///
/// Strings are shown without quotes; every other value is shown as compact JSON.
pub fn format_entries_table(entries: &BTreeMap<String, Value>) -> String {
    if entries.is_empty() {
        return "No keys found".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("key"), Cell::new("value")]);

    for (key, value) in entries {
        table.add_row(vec![Cell::new(key), Cell::new(format_value(value))]);
    }

    table.to_string()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
