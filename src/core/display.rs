use crate::core::RecordSet;
use crate::domain::model::value_text;

/// Numbered `field: value` blocks in each record's own field order.
pub fn render_entries(records: &RecordSet) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut text = String::from("\n=== Current Time Entries ===\n");
    for (index, record) in records.iter().enumerate() {
        text.push_str(&format!("\nEntry #{}:\n", index + 1));
        for (field, value) in &record.data {
            text.push_str(&format!("{}: {}\n", field, value_text(value)));
        }
    }
    Some(text)
}
