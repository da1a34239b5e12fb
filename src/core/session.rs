use crate::adapters::Console;
use crate::core::csv_export::{save_csv, SaveOutcome};
use crate::core::display::render_entries;
use crate::core::entry::{entry_template, read_entry};
use crate::core::{ConfigProvider, RecordSet, SessionState, SpreadsheetReader, Storage};
use crate::utils::error::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const START_PROMPT: &str =
    "Enter the path to your Excel file (or press Enter to start with empty data): ";
pub const RELOAD_PROMPT: &str = "Enter the path to your Excel file: ";
pub const CHOICE_PROMPT: &str = "Enter your choice (1-5): ";

const MENU: &str = "\n=== Menu ===\n\
                    1. Display all time entries\n\
                    2. Add new time entry\n\
                    3. Save to CSV\n\
                    4. Load from Excel file\n\
                    5. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Display,
    Add,
    Save,
    Load,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Display),
            "2" => Some(Self::Add),
            "3" => Some(Self::Save),
            "4" => Some(Self::Load),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Owns the record set for one run and drives the menu.
///
/// Spreadsheet and save failures are reported on the console and turned into
/// `false`; only console failures come back as `Err`.
pub struct SessionController<S: Storage, X: SpreadsheetReader> {
    records: RecordSet,
    state: SessionState,
    storage: S,
    spreadsheets: X,
}

impl<S: Storage, X: SpreadsheetReader> SessionController<S, X> {
    pub fn new(storage: S, spreadsheets: X, output_path: impl Into<PathBuf>) -> Self {
        Self {
            records: RecordSet::new(),
            state: SessionState::new(output_path),
            storage,
            spreadsheets,
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, spreadsheets: X, config: &C) -> Self {
        Self::new(storage, spreadsheets, config.output_path())
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start prompt (skipped when `initial_spreadsheet` is given), then the menu loop.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        initial_spreadsheet: Option<&str>,
    ) -> Result<()> {
        console.say("=== Time Registration Application ===")?;
        self.start(console, initial_spreadsheet)?;
        self.menu_loop(console)
    }

    pub fn start<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        initial_spreadsheet: Option<&str>,
    ) -> Result<()> {
        let answer = match initial_spreadsheet {
            Some(path) => path.to_string(),
            None => console.prompt(START_PROMPT)?,
        };

        let path = answer.trim();
        if !path.is_empty() {
            self.load_spreadsheet(console, path)?;
        }
        Ok(())
    }

    pub fn menu_loop<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<()> {
        let mut running = true;
        while running {
            console.say(MENU)?;
            let choice = console.prompt(CHOICE_PROMPT)?;
            running = self.dispatch(console, &choice)? == Flow::Continue;
        }
        tracing::debug!(records = self.records.len(), "menu loop finished");
        Ok(())
    }

    pub fn dispatch<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        choice: &str,
    ) -> Result<Flow> {
        match MenuChoice::parse(choice) {
            Some(MenuChoice::Display) => self.display_entries(console)?,
            Some(MenuChoice::Add) => {
                self.add_entry(console)?;
            }
            Some(MenuChoice::Save) => {
                self.save(console)?;
            }
            Some(MenuChoice::Load) => {
                let answer = console.prompt(RELOAD_PROMPT)?;
                let path = answer.trim();
                if !path.is_empty() {
                    self.load_spreadsheet(console, path)?;
                }
            }
            Some(MenuChoice::Exit) => {
                console.say("Exiting application. Goodbye!")?;
                return Ok(Flow::Exit);
            }
            None => {
                tracing::debug!(choice, "unrecognised menu choice");
                console.say("Invalid choice. Please try again.")?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Replaces the record set with the spreadsheet's records. On failure the
    /// current records stay as they are.
    pub fn load_spreadsheet<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        path: &str,
    ) -> Result<bool> {
        console.say(format_args!("Loading data from {}...", path))?;

        match self.spreadsheets.read_records(Path::new(path)) {
            Ok(records) => {
                let count = records.len();
                let previous = self.records.len();
                self.records.replace(records);
                self.state.source_path = path.to_string();

                tracing::info!(path, records = count, replaced = previous, "📥 spreadsheet loaded");
                console.say(format_args!("Successfully loaded {} entries.", count))?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(path, category = ?e.category(), "❌ spreadsheet load failed: {}", e);
                console.say(format_args!(
                    "Error loading Excel file: {}",
                    e.user_friendly_message()
                ))?;
                Ok(false)
            }
        }
    }

    pub fn save<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<bool> {
        let output_path = self.state.output_path();

        match save_csv(&self.storage, output_path, &self.records) {
            Ok(SaveOutcome::Saved { .. }) => {
                console.say(format_args!("Data saved to {}", output_path.display()))?;
                Ok(true)
            }
            Ok(SaveOutcome::NothingToSave) => {
                console.say("No entries to save.")?;
                Ok(false)
            }
            Err(e) => {
                tracing::error!(
                    path = %output_path.display(),
                    category = ?e.category(),
                    "❌ CSV save failed: {}",
                    e
                );
                console.say(format_args!(
                    "Error saving to CSV: {}",
                    e.user_friendly_message()
                ))?;
                Ok(false)
            }
        }
    }

    /// Appends one entry and saves straight away. Returns whether the save
    /// succeeded; the entry stays in memory either way.
    pub fn add_entry<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<bool> {
        console.say("\n=== Add New Time Entry ===")?;

        let template = entry_template(&self.records);
        let record = read_entry(console, &template)?;
        self.records.push(record);

        tracing::info!(fields = template.len(), records = self.records.len(), "➕ entry added");
        console.say("Entry added successfully!")?;

        self.save(console)
    }

    pub fn display_entries<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<()> {
        match render_entries(&self.records) {
            Some(text) => console.say(text.trim_end_matches('\n')),
            None => console.say("No entries to display."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use crate::utils::error::RegistrationError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Cursor;

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<PathBuf, Vec<u8>>>,
        fail_writes: bool,
    }

    impl MockStorage {
        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        fn get_file(&self, path: &str) -> Option<String> {
            self.files
                .borrow()
                .get(Path::new(path))
                .map(|data| String::from_utf8(data.clone()).unwrap())
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            self.files.borrow().get(path).cloned().ok_or_else(|| {
                RegistrationError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                ))
            })
        }

        fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            if self.fail_writes {
                return Err(RegistrationError::SerializationError {
                    path: path.display().to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "permission denied",
                    ),
                });
            }
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockSpreadsheets {
        sheets: HashMap<String, Vec<Record>>,
    }

    impl MockSpreadsheets {
        fn with(mut self, path: &str, records: Vec<Record>) -> Self {
            self.sheets.insert(path.to_string(), records);
            self
        }
    }

    impl SpreadsheetReader for MockSpreadsheets {
        fn read_records(&self, path: &Path) -> Result<Vec<Record>> {
            let key = path.to_string_lossy();
            self.sheets
                .get(key.as_ref())
                .cloned()
                .ok_or_else(|| RegistrationError::IngestionError {
                    path: key.to_string(),
                    message: "no such file".to_string(),
                })
        }
    }

    fn entry(date: &str, project: &str) -> Record {
        [("date", date), ("project", project)].into_iter().collect()
    }

    fn console(input: &str) -> Console<Cursor<String>, Vec<u8>> {
        Console::new(Cursor::new(input.to_string()), Vec::new())
    }

    fn output_of(console: &Console<Cursor<String>, Vec<u8>>) -> String {
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Display));
        assert_eq!(MenuChoice::parse(" 5 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse(""), None);
        assert_eq!(MenuChoice::parse("12"), None);
    }

    #[test]
    fn test_invalid_choice_changes_nothing() {
        let sheets = MockSpreadsheets::default().with("week.xlsx", vec![entry("2024-01-01", "A")]);
        let mut session = SessionController::new(MockStorage::default(), sheets, "out.csv");
        let mut console = console("week.xlsx\n");
        session.start(&mut console, None).unwrap();

        let records_before = session.records().clone();
        let state_before = session.state().clone();

        let flow = session.dispatch(&mut console, "9").unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.records(), &records_before);
        assert_eq!(session.state(), &state_before);
        assert!(output_of(&console).ends_with("Invalid choice. Please try again.\n"));
    }

    #[test]
    fn test_add_on_empty_set_uses_default_fields_and_saves() {
        let mut session = SessionController::new(
            MockStorage::default(),
            MockSpreadsheets::default(),
            "out.csv",
        );
        let mut console = console("2024-01-01\n09:00\n17:00\nwork\nA\n");

        let saved = session.add_entry(&mut console).unwrap();
        assert!(saved);
        assert_eq!(session.records().len(), 1);
        assert_eq!(
            session.storage.get_file("out.csv").unwrap(),
            "date,startTime,endTime,description,project\n2024-01-01,09:00,17:00,work,A\n"
        );

        let output = output_of(&console);
        assert!(output.contains("Entry added successfully!"));
        assert!(output.contains("Data saved to out.csv"));
    }

    #[test]
    fn test_add_uses_first_record_shape() {
        let sheets = MockSpreadsheets::default().with(
            "week.xlsx",
            vec![entry("2024-01-01", "A"), entry("2024-01-02", "B")],
        );
        let mut session = SessionController::new(MockStorage::default(), sheets, "out.csv");
        let mut console = console("week.xlsx\n2024-01-03\nC\n");
        session.start(&mut console, None).unwrap();

        session.add_entry(&mut console).unwrap();
        let added = session.records().iter().last().unwrap();
        assert_eq!(added, &entry("2024-01-03", "C"));
        assert!(output_of(&console).contains("Enter date: Enter project: "));
    }

    #[test]
    fn test_failed_save_keeps_added_entry() {
        let mut session = SessionController::new(
            MockStorage::failing(),
            MockSpreadsheets::default(),
            "out.csv",
        );
        let mut console = console("2024-01-01\n09:00\n17:00\nwork\nA\n");

        let saved = session.add_entry(&mut console).unwrap();
        assert!(!saved);
        assert_eq!(session.records().len(), 1);
        assert!(output_of(&console).contains("Error saving to CSV: permission denied"));
    }

    #[test]
    fn test_save_empty_reports_nothing_to_save() {
        let session = SessionController::new(
            MockStorage::default(),
            MockSpreadsheets::default(),
            "out.csv",
        );
        let mut console = console("");

        assert!(!session.save(&mut console).unwrap());
        assert!(session.storage.get_file("out.csv").is_none());
        assert_eq!(output_of(&console), "No entries to save.\n");
    }

    #[test]
    fn test_reload_replaces_records() {
        let sheets = MockSpreadsheets::default()
            .with("old.xlsx", vec![entry("2024-01-01", "A"), entry("2024-01-02", "B")])
            .with("new.xlsx", vec![entry("2024-02-01", "Z")]);
        let mut session = SessionController::new(MockStorage::default(), sheets, "out.csv");
        let mut console = console("old.xlsx\nnew.xlsx\n");
        session.start(&mut console, None).unwrap();
        assert_eq!(session.records().len(), 2);

        session.dispatch(&mut console, "4").unwrap();
        assert_eq!(session.records().as_slice(), &[entry("2024-02-01", "Z")]);
        assert_eq!(session.state().source_path, "new.xlsx");
    }

    #[test]
    fn test_failed_reload_keeps_records() {
        let sheets = MockSpreadsheets::default().with("old.xlsx", vec![entry("2024-01-01", "A")]);
        let mut session = SessionController::new(MockStorage::default(), sheets, "out.csv");
        let mut console = console("old.xlsx\nmissing.xlsx\n");
        session.start(&mut console, None).unwrap();

        session.dispatch(&mut console, "4").unwrap();
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.state().source_path, "old.xlsx");
        assert!(output_of(&console).contains("Error loading Excel file: no such file"));
    }

    #[test]
    fn test_blank_reload_answer_is_ignored() {
        let sheets = MockSpreadsheets::default().with("old.xlsx", vec![entry("2024-01-01", "A")]);
        let mut session = SessionController::new(MockStorage::default(), sheets, "out.csv");
        let mut console = console("old.xlsx\n   \n");
        session.start(&mut console, None).unwrap();

        session.dispatch(&mut console, "4").unwrap();
        assert_eq!(session.records().len(), 1);
        assert!(!output_of(&console).contains("Loading data from   "));
    }

    #[test]
    fn test_start_with_bad_path_is_not_fatal() {
        let mut session = SessionController::new(
            MockStorage::default(),
            MockSpreadsheets::default(),
            "out.csv",
        );
        let mut console = console("nope.xlsx\n5\n");

        session.run(&mut console, None).unwrap();
        assert!(session.records().is_empty());
        assert_eq!(session.state().source_path, "");
        assert!(output_of(&console).contains("Exiting application. Goodbye!"));
    }

    #[test]
    fn test_initial_spreadsheet_skips_start_prompt() {
        let sheets = MockSpreadsheets::default().with("week.xlsx", vec![entry("2024-01-01", "A")]);
        let mut session = SessionController::new(MockStorage::default(), sheets, "out.csv");
        let mut console = console("5\n");

        session.run(&mut console, Some("week.xlsx")).unwrap();
        assert_eq!(session.records().len(), 1);
        assert!(!output_of(&console).contains(START_PROMPT));
    }

    #[test]
    fn test_display_entries() {
        let sheets = MockSpreadsheets::default().with("week.xlsx", vec![entry("2024-01-01", "A")]);
        let mut session = SessionController::new(MockStorage::default(), sheets, "out.csv");
        let mut console = console("");

        session.display_entries(&mut console).unwrap();
        session.load_spreadsheet(&mut console, "week.xlsx").unwrap();
        session.display_entries(&mut console).unwrap();

        let output = output_of(&console);
        assert!(output.starts_with("No entries to display.\n"));
        assert!(output.ends_with("Entry #1:\ndate: 2024-01-01\nproject: A\n"));
    }

    #[test]
    fn test_end_of_input_is_an_error() {
        let mut session = SessionController::new(
            MockStorage::default(),
            MockSpreadsheets::default(),
            "out.csv",
        );
        let mut console = console("\n1\n");

        let err = session.run(&mut console, None).unwrap_err();
        assert!(matches!(err, RegistrationError::InputError { .. }));
    }
}
