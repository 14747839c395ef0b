use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::data::loader::{load_file, save_csv};
use crate::data::naming::apply_names;
use crate::state::{Session, Settings};
use crate::ui::inspect::show_head;
use crate::ui::menus::{DaqSource, GraphKind, MenuItem, choose};
use crate::ui::prompt::{Console, PromptError};
use crate::ui::templates::run_template;

// ---------------------------------------------------------------------------
// Session driver
// ---------------------------------------------------------------------------

/// Drives one interactive run: pick a source, load and clean it, then make
/// graphs until the user stops.
pub struct DaqVizApp<R, W> {
    console: Console<R, W>,
    settings: Settings,
}

impl<R: BufRead, W: Write> DaqVizApp<R, W> {
    pub fn new(console: Console<R, W>, settings: Settings) -> Self {
        Self { console, settings }
    }

    /// Run the whole session.  `Ok(None)` means the user quit at the source
    /// menu.  Only console failures (including end of input) are returned as
    /// errors; file and plot failures are reported and the flow resumes.
    pub fn run(&mut self) -> Result<Option<Session>, PromptError> {
        let Some(mut session) = self.load_session()? else {
            return Ok(None);
        };

        if self.settings.inspect {
            show_head(&mut self.console, &session.table, self.settings.head_rows)?;
        }

        self.graph_loop(&mut session)?;
        log::info!(
            "{} session finished: cleaned table {}, {} graph(s) written",
            session.source.label(),
            session
                .saved_to
                .as_ref()
                .map_or_else(|| "not saved".to_string(), |p| format!("saved to {}", p.display())),
            session.plots.len()
        );
        Ok(Some(session))
    }

    /// Consume the app and return the console writer (used by tests).
    #[cfg(test)]
    fn into_output(self) -> W {
        self.console.into_output()
    }

    // -- Ingestion --

    fn load_session(&mut self) -> Result<Option<Session>, PromptError> {
        loop {
            let Some(source) = choose::<DaqSource, _, _>(&mut self.console)? else {
                return Ok(None);
            };
            match self.ingest(source) {
                Ok(session) => return Ok(Some(session)),
                Err(e) => self.report(e)?,
            }
        }
    }

    fn ingest(&mut self, source: DaqSource) -> anyhow::Result<Session> {
        let sensors = match source {
            DaqSource::AgilentRaw => self
                .console
                .ask_count("Please enter number of sensors used: ")?,
            _ => 0,
        };

        let path_prompt = if source.is_raw() {
            "Please enter the location of the raw data: "
        } else {
            "Please enter your file name: "
        };
        let path = PathBuf::from(self.console.ask_line(path_prompt)?.trim());

        let mut table = load_file(&path, source.layout(sensors))?;
        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            table.len(),
            table.column_names(),
            path.display()
        );

        let rename = source.is_raw()
            || self
                .console
                .ask_yes("Would you like to rename the sensor columns, Y/n? ")?;
        if rename {
            let names = self.ask_sensor_names(table.width())?;
            apply_names(&mut table, &names)?;
        }

        let mut session = Session::new(source, table);
        if source.is_raw() {
            let base_name = self.console.ask_line("Save file as? ")?;
            let saved = save_csv(&session.table, &self.settings.output_dir, &base_name)?;
            log::info!("Saved cleaned table to {}", saved.display());
            self.console.say(format_args!("Saved {}", saved.display()))?;
            session.saved_to = Some(saved);
        }
        Ok(session)
    }

    fn ask_sensor_names(&mut self, count: usize) -> Result<Vec<String>, PromptError> {
        (1..=count)
            .map(|i| -> Result<String, PromptError> {
                let prompt = format!("Please enter sensor {i} name: ");
                Ok(self.console.ask_line(&prompt)?.trim().to_string())
            })
            .collect()
    }

    // -- Graphs --

    fn graph_loop(&mut self, session: &mut Session) -> Result<(), PromptError> {
        while self.console.ask_yes("Would you like to make a graph, Y/n? ")? {
            let Some(kind) = choose::<GraphKind, _, _>(&mut self.console)? else {
                break;
            };
            let written = run_template(
                &mut self.console,
                &session.table,
                kind,
                &self.settings.output_dir,
            );
            match written {
                Ok(path) => {
                    log::info!("Wrote {:?} graph to {}", kind, path.display());
                    self.console.say(format_args!("Saved {}", path.display()))?;
                    session.plots.push(path);
                }
                Err(e) => self.report(e)?,
            }
        }
        Ok(())
    }

    /// Show a failed operation to the user.  Console failures are passed up
    /// because nothing more can be asked.
    fn report(&mut self, err: anyhow::Error) -> Result<(), PromptError> {
        match err.downcast::<PromptError>() {
            Ok(fatal) => Err(fatal),
            Err(err) => {
                log::error!("{err:#}");
                self.console.say(format_args!("Error: {err:#}"))
            }
        }
    }
}
