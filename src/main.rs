mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use app::DaqVizApp;
use state::Settings;
use ui::prompt::{Console, PromptError};

#[derive(Parser)]
#[command(name = "daq-viz", version, about = "Clean DAQ exports and plot them")]
struct Cli {
    /// Directory for cleaned CSV files and plots
    #[arg(long, default_value = "create_csvs")]
    output_dir: PathBuf,
    /// Skip the preview of the cleaned table
    #[arg(long)]
    no_inspect: bool,
    /// Rows shown in the preview
    #[arg(long, default_value_t = 5)]
    head_rows: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let settings = Settings {
        output_dir: cli.output_dir,
        inspect: !cli.no_inspect,
        head_rows: cli.head_rows,
    };
    log::debug!("settings: {settings:?}");

    let mut app = DaqVizApp::new(Console::stdio(), settings);
    match app.run() {
        Ok(_) | Err(PromptError::Eof) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("session aborted: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
