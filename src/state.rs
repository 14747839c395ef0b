use std::path::PathBuf;

use crate::data::model::DataTable;
use crate::ui::menus::DaqSource;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Options fixed for the whole run (from the command line).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where cleaned CSVs and plots are written.
    pub output_dir: PathBuf,
    /// Whether to print the head of the table after loading.
    pub inspect: bool,
    /// Rows shown by the inspector.
    pub head_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("create_csvs"),
            inspect: true,
            head_rows: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// State of one interactive session: the chosen DAQ and its cleaned table.
#[derive(Debug)]
pub struct Session {
    pub source: DaqSource,
    pub table: DataTable,
    /// Where the cleaned table was saved, if it was.
    pub saved_to: Option<PathBuf>,
    /// Plots written so far, in order.
    pub plots: Vec<PathBuf>,
}

impl Session {
    pub fn new(source: DaqSource, table: DataTable) -> Self {
        Self {
            source,
            table,
            saved_to: None,
            plots: Vec::new(),
        }
    }
}
