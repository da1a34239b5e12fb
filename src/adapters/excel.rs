use crate::domain::model::{value_text, Record};
use crate::domain::ports::SpreadsheetReader;
use crate::utils::error::{RegistrationError, Result};
use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader};
use chrono::Timelike;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::path::Path;

const EMPTY_HEADER: &str = "__EMPTY";

/// Reads xlsx, xlsm, xlsb, xls and ods through calamine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelReader;

impl ExcelReader {
    pub fn new() -> Self {
        Self
    }
}

impl SpreadsheetReader for ExcelReader {
    fn read_records(&self, path: &Path) -> Result<Vec<Record>> {
        let ingestion_error = |message: String| RegistrationError::IngestionError {
            path: path.display().to_string(),
            message,
        };

        let mut workbook =
            open_workbook_auto(path).map_err(|e| ingestion_error(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        let first_sheet = sheet_names
            .first()
            .ok_or_else(|| ingestion_error("workbook contains no worksheets".to_string()))?;

        let range = workbook
            .worksheet_range(first_sheet)
            .map_err(|e| ingestion_error(format!("failed to read sheet '{}': {}", first_sheet, e)))?;

        let (height, width) = range.get_size();
        tracing::debug!(sheet = %first_sheet, height, width, "worksheet opened");

        Ok(records_from_range(&range))
    }
}

/// The first row of the used range names the fields. Empty cells are left
/// out of their record and rows with no values at all are skipped.
pub fn records_from_range(range: &Range<Data>) -> Vec<Record> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers = header_names(header_row);

    rows.filter_map(|row| {
        let record: Record = headers
            .iter()
            .zip(row)
            .filter_map(|(header, cell)| cell_value(cell).map(|value| (header.clone(), value)))
            .collect();
        (!record.is_empty()).then_some(record)
    })
    .collect()
}

fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    row.iter()
        .map(|cell| {
            let name = cell_value(cell)
                .map(|value| value_text(&value))
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| EMPTY_HEADER.to_string());
            unique_header(name, &mut seen)
        })
        .collect()
}

/// Repeats of `name` become `name_1`, `name_2`, ... skipping any suffix already taken.
fn unique_header(name: String, seen: &mut HashMap<String, usize>) -> String {
    let Some(&next) = seen.get(&name) else {
        seen.insert(name.clone(), 1);
        return name;
    };

    let mut counter = next;
    let candidate = loop {
        let candidate = format!("{}_{}", name, counter);
        counter += 1;
        if !seen.contains_key(&candidate) {
            break candidate;
        }
    };
    seen.insert(name, counter);
    seen.insert(candidate.clone(), 1);
    candidate
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Float(n) => float_value(*n),
        Data::Int(n) => Some(Value::from(*n)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::Error(e) => Some(Value::String(e.to_string())),
        Data::DateTime(dt) => datetime_value(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

fn float_value(n: f64) -> Option<Value> {
    // Whole numbers are kept integral so they print without a trailing ".0"
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

fn datetime_value(dt: &ExcelDateTime) -> Option<Value> {
    let serial = dt.as_f64();
    if dt.is_duration() {
        return float_value(serial);
    }
    let Some(datetime) = dt.as_datetime() else {
        return float_value(serial);
    };

    let time_format = if datetime.second() != 0 {
        "%H:%M:%S"
    } else {
        "%H:%M"
    };
    let has_date = serial.trunc() > 0.0;
    let has_time = datetime.num_seconds_from_midnight() != 0;

    let text = match (has_date, has_time) {
        (true, false) => datetime.format("%Y-%m-%d").to_string(),
        (false, _) => datetime.format(time_format).to_string(),
        (true, true) => datetime
            .format(&format!("%Y-%m-%d {}", time_format))
            .to_string(),
    };
    Some(Value::String(text))
}
