use crate::adapters::Console;
use crate::core::{Record, RecordSet};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// Fields asked for when there is no record to copy the shape from.
pub const DEFAULT_TEMPLATE: [(&str, &str); 5] = [
    ("date", "Enter date (YYYY-MM-DD): "),
    ("startTime", "Enter start time (HH:MM): "),
    ("endTime", "Enter end time (HH:MM): "),
    ("description", "Enter description: "),
    ("project", "Enter project: "),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPrompt {
    pub field: String,
    pub prompt: String,
}

/// The first record's fields, in order, or the built-in template when the set is empty.
pub fn entry_template(records: &RecordSet) -> Vec<FieldPrompt> {
    match records.first() {
        Some(first) => first
            .fields()
            .map(|field| FieldPrompt {
                field: field.to_string(),
                prompt: format!("Enter {}: ", field),
            })
            .collect(),
        None => DEFAULT_TEMPLATE
            .iter()
            .map(|(field, prompt)| FieldPrompt {
                field: field.to_string(),
                prompt: prompt.to_string(),
            })
            .collect(),
    }
}

/// Values are stored verbatim as text.
pub fn read_entry<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    template: &[FieldPrompt],
) -> Result<Record> {
    let mut record = Record::new();
    for field in template {
        let answer = console.prompt(&field.prompt)?;
        record.insert(field.field.as_str(), answer);
    }
    Ok(record)
}
