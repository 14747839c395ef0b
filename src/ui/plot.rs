//! Line plots of selected table columns, written as PDF files.
//!
//! [`plotters`] draws each figure into an in-memory SVG document, which
//! [`svg2pdf`] converts to a single-page PDF.  Each call owns its drawing
//! area and drops it once the file is written, so a long session does not
//! accumulate figures.

use std::path::Path;

use plotters::prelude::{
    BLACK, ChartBuilder, Color, IntoDrawingArea, LineSeries, PathElement, SVGBackend,
    SeriesLabelPosition, WHITE,
};
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};
use thiserror::Error;

use crate::color::generate_palette;
use crate::data::model::{DataTable, TableError};

/// Figure size in pixels (8 x 4.5 at 100 dpi).
const FIGURE_SIZE: (u32, u32) = (800, 450);

/// Errors that can occur while building or drawing a plot.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Failed to convert chart to PDF: {0}")]
    PdfConversion(String),

    #[error("Failed to save file: {0}")]
    FileSave(#[from] std::io::Error),
}

type Result<T> = core::result::Result<T, PlotError>;

// ---------------------------------------------------------------------------
// Scaling
// ---------------------------------------------------------------------------

/// Unit conversion applied to every plotted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scaling {
    Identity,
    Multiply(f64),
    Divide(f64),
}

impl Scaling {
    /// Pressure transducers: volts to psi.
    pub const PRESSURE: Scaling = Scaling::Multiply(50.0);

    /// Ohm's law through a shunt of `resistance` ohms.  Zero and non-finite
    /// resistances are rejected here so nothing infinite reaches a plot.
    pub fn divide_by(resistance: f64) -> Result<Self> {
        if resistance == 0.0 || !resistance.is_finite() {
            return Err(PlotError::InvalidData(format!(
                "cannot divide by a resistance of {resistance}"
            )));
        }
        Ok(Scaling::Divide(resistance))
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            Scaling::Identity => v,
            Scaling::Multiply(k) => v * k,
            Scaling::Divide(r) => v / r,
        }
    }
}

// ---------------------------------------------------------------------------
// PlotSpec
// ---------------------------------------------------------------------------

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Everything needed to draw one figure.  Built per graph, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_range: (f64, f64),
    /// Row labels shown under integer x positions.
    pub x_ticks: Vec<String>,
    pub series: Vec<PlotSeries>,
}

/// Copy the named columns out of `table`, scaled.
pub fn select_series(
    table: &DataTable,
    names: &[String],
    scaling: Scaling,
) -> core::result::Result<Vec<PlotSeries>, TableError> {
    names
        .iter()
        .map(|name| {
            let column = table
                .column(name)
                .ok_or_else(|| TableError::UnknownColumn(name.clone()))?;
            Ok(PlotSeries {
                name: name.clone(),
                values: column.values.iter().map(|&v| scaling.apply(v)).collect(),
            })
        })
        .collect()
}

/// Y limits spanning every value of the whole table, widened by one unit
/// either side when the data is flat.
pub fn table_range(table: &DataTable) -> Result<(f64, f64)> {
    let (lo, hi) = table
        .value_range()
        .ok_or_else(|| PlotError::InvalidData("table has no finite values".into()))?;
    if lo == hi {
        Ok((lo - 1.0, hi + 1.0))
    } else {
        Ok((lo, hi))
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw `spec` as a line chart and write it to `output_path` as a PDF.
pub fn render_pdf(spec: &PlotSpec, output_path: &Path) -> Result<()> {
    let svg = draw_svg(spec)?;
    let pdf = svg_to_pdf(&svg)?;
    std::fs::write(output_path, pdf)?;
    Ok(())
}

/// Parse the SVG text and lay it out on one PDF page of the same size.
fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| PlotError::PdfConversion(e.to_string()))?;
    svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| PlotError::PdfConversion(e.to_string()))
}

/// Draw `spec` into an SVG document held in memory.
fn draw_svg(spec: &PlotSpec) -> Result<String> {
    let (y_lo, y_hi) = spec.y_range;
    if !(y_lo < y_hi) {
        return Err(PlotError::InvalidData(format!("empty y range {y_lo}..{y_hi}")));
    }
    let rows = spec.series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    if rows == 0 {
        return Err(PlotError::InvalidData("no data to plot".into()));
    }
    let x_max = rows.saturating_sub(1).max(1) as f64;

    let mut svg = String::new();
    let root = SVGBackend::with_string(&mut svg, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_lo..y_hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let ticks = &spec.x_ticks;
    let tick_label = |x: &f64| {
        let pos = x.round();
        if (x - pos).abs() > 1e-9 || pos < 0.0 {
            return String::new();
        }
        ticks.get(pos as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .x_labels(8)
        .x_label_formatter(&tick_label)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let colours = generate_palette(spec.series.len());
    for (series, colour) in spec.series.iter().zip(colours) {
        let points = series
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| (i as f64, v));
        chart
            .draw_series(LineSeries::new(points, colour.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(series.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present().map_err(|e| PlotError::Drawing(e.to_string()))?;
    drop(chart);
    drop(root);
    Ok(svg)
}
