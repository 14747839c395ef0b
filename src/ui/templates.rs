use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::loader::safe_file_name;
use crate::data::model::DataTable;

use super::menus::GraphKind;
use super::plot::{PlotSpec, Scaling, render_pdf, select_series, table_range};
use super::prompt::{Console, PromptError};

// ---------------------------------------------------------------------------
// Template constants
// ---------------------------------------------------------------------------

impl GraphKind {
    /// Axis labels baked into the quick templates.  `None` for Custom.
    pub fn fixed_axis_labels(self) -> Option<(&'static str, &'static str)> {
        match self {
            GraphKind::Temperature => Some(("Time (sec)", "Temp (C)")),
            GraphKind::Pressure => Some(("Time (sec)", "Pressure (psi)")),
            GraphKind::Current => Some(("Time (sec)", "Current (A)")),
            GraphKind::Custom => None,
        }
    }

    /// Prompt for the upper y limit of the quick templates.
    fn limit_prompt(self) -> &'static str {
        match self {
            GraphKind::Temperature => {
                "Please enter the upper limit for the 'Temperature' axis (typically 1200C): "
            }
            GraphKind::Pressure => {
                "Please enter the upper limit for the 'Pressure' axis (typically 60): "
            }
            _ => "Please enter the upper limit for the 'Current' axis (typically 60): ",
        }
    }
}

// ---------------------------------------------------------------------------
// Interactive runners
// ---------------------------------------------------------------------------

/// Ask everything the chosen template needs, render it into `out_dir` and
/// return the written file.
pub fn run_template<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    table: &DataTable,
    kind: GraphKind,
    out_dir: &Path,
) -> Result<PathBuf> {
    let (spec, file_stem) = match kind {
        GraphKind::Custom => ask_custom(console, table)?,
        quick => ask_quick(console, table, quick)?,
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let path = out_dir.join(format!("{}.pdf", safe_file_name(&file_stem)));
    render_pdf(&spec, &path).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Temperature, Pressure and Current: fixed labels, 0..limit y axis,
/// file named after the title.
fn ask_quick<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    table: &DataTable,
    kind: GraphKind,
) -> Result<(PlotSpec, String)> {
    let names = ask_series_names(console, table)?;

    let scaling = match kind {
        GraphKind::Pressure => Scaling::PRESSURE,
        GraphKind::Current => console.ask_with("Enter known resistance: ", |s| {
            let ohms: f64 = s
                .parse()
                .map_err(|_| PromptError::bad_input(format!("'{s}' is not a valid number.")))?;
            Scaling::divide_by(ohms)
                .map_err(|_| PromptError::bad_input("Resistance must be a non-zero number."))
        })?,
        _ => Scaling::Identity,
    };

    let upper = console.ask_with(kind.limit_prompt(), |s| match s.parse::<f64>() {
        Ok(v) if v > 0.0 && v.is_finite() => Ok(v),
        Ok(_) => Err(PromptError::bad_input("The upper limit must be greater than zero.")),
        Err(_) => Err(PromptError::bad_input(format!("'{s}' is not a valid number."))),
    })?;
    let title = console.ask_line("Enter Graph Title: ")?;

    let (x_label, y_label) = kind.fixed_axis_labels().unwrap_or(("", ""));
    let spec = PlotSpec {
        title: title.clone(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        y_range: (0.0, upper),
        x_ticks: table.index.clone(),
        series: select_series(table, &names, scaling)?,
    };
    Ok((spec, title))
}

/// Custom: optional multiplier, limits from the whole table, user labels
/// and file name.
fn ask_custom<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    table: &DataTable,
) -> Result<(PlotSpec, String)> {
    let file_stem = console.ask_line("Enter the plot file name: ")?;
    let names = ask_series_names(console, table)?;

    let scaling = if console.ask_yes("Do you have a multiplier Y/n? ")? {
        Scaling::Multiply(console.ask_finite("Enter multiplier value: ")?)
    } else {
        Scaling::Identity
    };

    let y_range = table_range(table)?;
    let title = console.ask_line("Enter Graph Title: ")?;
    let x_label = console.ask_line("Enter x-axis title: ")?;
    let y_label = console.ask_line("Enter y-axis title: ")?;

    let spec = PlotSpec {
        title,
        x_label,
        y_label,
        y_range,
        x_ticks: table.index.clone(),
        series: select_series(table, &names, scaling)?,
    };
    Ok((spec, file_stem))
}

/// Series count, then one existing column name per series.
fn ask_series_names<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    table: &DataTable,
) -> Result<Vec<String>, PromptError> {
    let count = console.ask_count("How many series in this figure? ")?;
    let mut names = Vec::with_capacity(count);
    for i in 1..=count {
        let prompt = format!("Please enter series {i} name: ");
        let name = console.ask_with(&prompt, |s| match table.column(s) {
            Some(_) => Ok(s.to_string()),
            None => Err(PromptError::bad_input(format!(
                "No column named '{s}'. Available: {}",
                table.column_names().join(", ")
            ))),
        })?;
        names.push(name);
    }
    Ok(names)
}
