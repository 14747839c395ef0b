use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::model::{Column, DataTable};
use super::reshape::{channel_positions, parse_cell, split_timestamp, trim_trailing_empty};

/// Metadata lines an Agilent raw export writes before the per-channel lines.
pub const AGILENT_PREAMBLE_LINES: usize = 8;

/// Preamble lines an HBM raw export writes before its header row.
pub const HBM_PREAMBLE_LINES: usize = 38;

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

/// The file layouts understood by the loader, one per supported export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// UTF-16 comma-separated export with `sensors + 8` preamble lines and
    /// an alarm column after every channel.
    AgilentRaw { sensors: usize },
    /// Plain CSV whose first column is the scan number.
    AgilentProcessed,
    /// Whitespace-separated export with a fixed 38-line preamble.
    HbmRaw,
    /// Plain CSV whose first column is the sample time.
    HbmProcessed,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse a DAQ export.  Every error carries the offending path.
pub fn load_file(path: &Path, layout: Layout) -> Result<DataTable> {
    let text = read_source(path)?;
    let parsed = match layout {
        Layout::AgilentRaw { sensors } => parse_agilent_raw(&text, sensors),
        Layout::AgilentProcessed => parse_indexed_csv(&text, "Scan"),
        Layout::HbmRaw => parse_hbm_raw(&text),
        Layout::HbmProcessed => parse_indexed_csv(&text, "Time"),
    };
    parsed.with_context(|| format!("parsing {}", path.display()))
}

/// Read a file and decode it to text.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_text(&bytes).with_context(|| format!("decoding {}", path.display()))
}

/// Decode raw bytes: a UTF-16 byte-order mark selects UTF-16, a UTF-8 BOM
/// is stripped, anything else must be valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => {
            String::from_utf8(rest.to_vec()).context("invalid UTF-8 after byte-order mark")
        }
        _ => String::from_utf8(bytes.to_vec())
            .context("not valid UTF-8 and no UTF-16 byte-order mark"),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        bail!("UTF-16 data has an odd number of bytes");
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).context("invalid UTF-16 sequence")
}

/// Write `table` as `<dir>/<base_name>.csv`, creating `dir` if needed.
pub fn save_csv(table: &DataTable, dir: &Path, base_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let path = dir.join(format!("{}.csv", safe_file_name(base_name)));

    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

    let header = std::iter::once(table.index_name.as_str()).chain(table.column_names());
    writer
        .write_record(header)
        .with_context(|| format!("writing header to {}", path.display()))?;

    for (row, label) in table.index.iter().enumerate() {
        let mut record = Vec::with_capacity(table.width() + 1);
        record.push(label.clone());
        for column in &table.columns {
            let v = column.values[row];
            record.push(if v.is_nan() { String::new() } else { v.to_string() });
        }
        writer
            .write_record(&record)
            .with_context(|| format!("writing row {row} to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    Ok(path)
}

/// Turn a user-typed name into a single path component.
pub fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

// ---------------------------------------------------------------------------
// Agilent raw
// ---------------------------------------------------------------------------

/// Parse an Agilent 34972A raw export already decoded to text.
///
/// Layout after the preamble:
///
/// ```text
/// Scan,Time,101 (C),Alarm 101,102 (C),Alarm 102
/// 1,3/12/2020 10:15:30:123,+2.345E+01,0,+2.401E+01,0
/// ```
///
/// The result is indexed by `HMS` and holds one column per sensor, labelled
/// with the channel header until the user names it.
pub fn parse_agilent_raw(text: &str, sensors: usize) -> Result<DataTable> {
    if sensors == 0 {
        bail!("sensor count must be at least 1");
    }
    let skip = sensors
        .checked_add(AGILENT_PREAMBLE_LINES)
        .with_context(|| format!("{sensors} sensors is more than any export can hold"))?;
    let body = skip_lines(text, skip)
        .with_context(|| format!("expected at least {skip} preamble lines"))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    let mut records = reader.records();

    let mut header: Vec<String> = records
        .next()
        .context("missing header row after preamble")?
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    trim_trailing_empty(&mut header);

    let positions = channel_positions(&header, sensors)?;
    let mut index = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); sensors];

    for (row_no, result) in records.enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let time = record
            .get(1)
            .with_context(|| format!("row {row_no}: missing Time field"))?;
        let stamp = split_timestamp(time).with_context(|| format!("row {row_no}"))?;
        if index.is_empty() {
            log::debug!("first scan recorded on {}", stamp.date);
        }
        index.push(stamp.hms());

        for (slot, &pos) in values.iter_mut().zip(&positions) {
            let cell = record.get(pos).unwrap_or("");
            slot.push(numeric_cell(cell, row_no, &header[pos])?);
        }
    }

    let columns = positions
        .iter()
        .zip(values)
        .map(|(&pos, v)| Column::new(header[pos].clone(), v))
        .collect();
    Ok(DataTable::new("HMS", index, columns)?)
}

// ---------------------------------------------------------------------------
// Processed CSV (Agilent and HBM)
// ---------------------------------------------------------------------------

/// Parse a processed export: header row, first column is the index.  The
/// index keeps its own header (`HMS` for tables this tool saved) and
/// `default_index` is used only when that cell is blank.
pub fn parse_indexed_csv(text: &str, default_index: &str) -> Result<DataTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut header: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    trim_trailing_empty(&mut header);
    if header.len() < 2 {
        bail!("expected an index column and at least one data column");
    }

    let mut index = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); header.len() - 1];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        index.push(record.get(0).unwrap_or("").to_string());
        for (col, slot) in values.iter_mut().enumerate() {
            let cell = record.get(col + 1).unwrap_or("");
            slot.push(numeric_cell(cell, row_no, &header[col + 1])?);
        }
    }

    let columns = header[1..]
        .iter()
        .zip(values)
        .map(|(name, v)| Column::new(name.clone(), v))
        .collect();
    let index_name = match header[0].as_str() {
        "" => default_index,
        name => name,
    };
    Ok(DataTable::new(index_name, index, columns)?)
}

// ---------------------------------------------------------------------------
// HBM raw
// ---------------------------------------------------------------------------

/// Parse an HBM MX403B raw export (whitespace separated).
///
/// Any channel with a missing or non-numeric reading in any row is dropped,
/// which discards the status fields the recorder interleaves with data.
pub fn parse_hbm_raw(text: &str) -> Result<DataTable> {
    let body = skip_lines(text, HBM_PREAMBLE_LINES)
        .with_context(|| format!("expected at least {HBM_PREAMBLE_LINES} preamble lines"))?;
    let mut lines = body.lines().filter(|l| !l.trim().is_empty());

    let header: Vec<&str> = lines
        .next()
        .context("missing header row after preamble")?
        .split_whitespace()
        .collect();
    if header.len() < 2 {
        bail!("expected a time column and at least one channel");
    }

    let mut index = Vec::new();
    let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); header.len() - 1];
    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        index.push(tokens[0].to_string());
        for (col, slot) in cells.iter_mut().enumerate() {
            let value = tokens
                .get(col + 1)
                .and_then(|t| parse_cell(t))
                .filter(|v| !v.is_nan());
            slot.push(value);
        }
    }

    let mut columns = Vec::new();
    for (name, column) in header[1..].iter().zip(cells) {
        match column.into_iter().collect::<Option<Vec<f64>>>() {
            Some(values) => columns.push(Column::new(*name, values)),
            None => log::warn!("dropping HBM column '{name}': it has missing values"),
        }
    }
    if columns.is_empty() {
        bail!("every channel has missing values");
    }
    Ok(DataTable::new("Time", index, columns)?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Return the text after the first `n` lines, or `None` if there are fewer.
fn skip_lines(text: &str, n: usize) -> Option<&str> {
    let mut rest = text;
    for _ in 0..n {
        let newline = rest.find('\n')?;
        rest = &rest[newline + 1..];
    }
    Some(rest)
}

/// Empty cells become NaN; anything else must be a number.
fn numeric_cell(cell: &str, row: usize, column: &str) -> Result<f64> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    parse_cell(cell)
        .with_context(|| format!("row {row}, column '{column}': '{cell}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn decodes_utf16_with_either_byte_order() {
        let le = fixtures::utf16le_bytes("Scan,Time\r\n");
        assert_eq!(decode_text(&le).unwrap(), "Scan,Time\r\n");

        let mut be = vec![0xFE, 0xFF];
        for unit in "ok".encode_utf16() {
            be.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_text(&be).unwrap(), "ok");
    }

    #[test]
    fn strips_utf8_bom_and_rejects_garbage() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFa,b").unwrap(), "a,b");
        assert!(decode_text(&[0xC3, 0x28]).is_err());
        assert!(decode_text(&[0xFF, 0xFE, 0x41]).is_err());
    }

    #[test]
    fn agilent_raw_yields_one_column_per_sensor() {
        for sensors in 1..=4 {
            let text = fixtures::agilent_raw_text(sensors, 5);
            let table = parse_agilent_raw(&text, sensors).unwrap();
            assert_eq!(table.width(), sensors);
            assert_eq!(table.len(), 5);
            assert_eq!(table.index_name, "HMS");
            assert!(table
                .column_names()
                .iter()
                .all(|n| !n.to_ascii_lowercase().contains("alarm")));
        }
    }

    #[test]
    fn agilent_raw_builds_hms_index_and_values() {
        let table = parse_agilent_raw(&fixtures::agilent_raw_text(2, 3), 2).unwrap();
        assert_eq!(table.index, vec!["10 15 00", "10 15 01", "10 15 02"]);
        assert_eq!(table.column_names(), vec!["101 (C)", "102 (C)"]);
        assert_eq!(table.columns[0].values, vec![20.0, 20.5, 21.0]);
        assert_eq!(table.columns[1].values, vec![21.0, 21.5, 22.0]);
    }

    #[test]
    fn agilent_raw_with_wrong_sensor_count_fails() {
        let text = fixtures::agilent_raw_text(3, 2);
        // Two sensors skips one line too few, so the header is a channel line.
        assert!(parse_agilent_raw(&text, 2).is_err());
        assert!(parse_agilent_raw(&text, 0).is_err());
    }

    #[test]
    fn absurd_sensor_count_is_an_error_not_a_panic() {
        let text = fixtures::agilent_raw_text(1, 1);
        let err = parse_agilent_raw(&text, usize::MAX).unwrap_err();
        assert!(format!("{err:#}").contains("more than any export can hold"));
    }

    #[test]
    fn agilent_raw_reports_bad_numbers() {
        let text = fixtures::agilent_raw_text(1, 1).replace("+2.000E1", "oops");
        let err = parse_agilent_raw(&text, 1).unwrap_err();
        assert!(format!("{err:#}").contains("'oops' is not a number"));
    }

    #[test]
    fn processed_csv_keeps_first_column_as_index() {
        let text = "Scan,101 (C),102 (C)\n1,20.5,21\n2,20.75,\n";
        let table = parse_indexed_csv(text, "Scan").unwrap();
        assert_eq!(table.index_name, "Scan");
        assert_eq!(table.index, vec!["1", "2"]);
        assert_eq!(table.column_names(), vec!["101 (C)", "102 (C)"]);
        assert!(table.columns[1].values[1].is_nan());
    }

    #[test]
    fn processed_csv_keeps_its_own_index_header() {
        let table = parse_indexed_csv("HMS,T1\n10 15 00,20\n", "Scan").unwrap();
        assert_eq!(table.index_name, "HMS");
        assert_eq!(table.index, vec!["10 15 00"]);

        let blank = parse_indexed_csv(",T1\n1,20\n", "Time").unwrap();
        assert_eq!(blank.index_name, "Time");
    }

    #[test]
    fn hbm_raw_drops_columns_with_missing_values() {
        let table = parse_hbm_raw(&fixtures::hbm_raw_text(4)).unwrap();
        assert_eq!(table.index_name, "Time");
        assert_eq!(table.column_names(), vec!["Ch1", "Ch2"]);
        assert_eq!(table.len(), 4);
        assert_eq!(table.index[1], "0.1");
        assert_eq!(table.columns[0].values[1], 1.1);
    }

    #[test]
    fn hbm_raw_needs_its_preamble() {
        assert!(parse_hbm_raw("Time Ch1\n0 1\n").is_err());
    }

    #[test]
    fn load_file_names_the_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let err = load_file(&missing, Layout::AgilentProcessed).unwrap_err();
        assert!(format!("{err:#}").contains("nope.csv"));

        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "Scan,a\n1,xyz\n").unwrap();
        let err = load_file(&bad, Layout::AgilentProcessed).unwrap_err();
        assert!(format!("{err:#}").contains("bad.csv"));
    }

    #[test]
    fn load_file_reads_utf16_agilent_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        std::fs::write(&path, fixtures::utf16le_bytes(&fixtures::agilent_raw_text(3, 4))).unwrap();
        let table = load_file(&path, Layout::AgilentRaw { sensors: 3 }).unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn save_csv_writes_index_then_columns() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let mut table = parse_indexed_csv("Scan,a,b\n1,1.5,\n2,3,4\n", "Scan").unwrap();
        table.columns[0].name = "T1".into();

        let path = save_csv(&table, &out, "run/1").unwrap();
        assert_eq!(path, out.join("run_1.csv"));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, "Scan,T1,b\n1,1.5,\n2,3,4\n");
    }

    #[test]
    fn safe_file_name_falls_back_for_blank_names() {
        assert_eq!(safe_file_name("  "), "untitled");
        assert_eq!(safe_file_name(" Oven run "), "Oven run");
        assert_eq!(safe_file_name("a\\b:c"), "a_b_c");
    }
}
