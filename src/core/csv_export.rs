use crate::core::{Record, RecordSet, Storage};
use crate::utils::error::Result;
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { records: usize, bytes: usize },
    NothingToSave,
}

/// Header row comes from the first record; every row is projected onto it.
/// Returns `None` for an empty set.
pub fn render_csv(records: &[Record]) -> Option<String> {
    let headers: Vec<&str> = records.first()?.fields().collect();

    let mut csv_content = headers.join(",");
    csv_content.push('\n');

    for record in records {
        let row: Vec<Cow<'_, str>> = headers
            .iter()
            .map(|header| format_cell(record.get(header)))
            .collect();
        csv_content.push_str(&row.join(","));
        csv_content.push('\n');
    }

    Some(csv_content)
}

/// Text containing a comma is wrapped in double quotes. Embedded quotes and
/// line breaks are written as-is.
pub fn format_cell(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) if s.contains(',') => Cow::Owned(format!("\"{}\"", s)),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Overwrites `path` with the whole record set in one write. An empty set
/// writes nothing.
pub fn save_csv<S: Storage>(storage: &S, path: &Path, records: &RecordSet) -> Result<SaveOutcome> {
    let Some(csv_content) = render_csv(records.as_slice()) else {
        tracing::debug!("record set is empty, skipping save");
        return Ok(SaveOutcome::NothingToSave);
    };

    storage.write_file(path, csv_content.as_bytes())?;

    tracing::info!(
        path = %path.display(),
        records = records.len(),
        bytes = csv_content.len(),
        "✅ CSV saved"
    );
    Ok(SaveOutcome::Saved {
        records: records.len(),
        bytes: csv_content.len(),
    })
}
