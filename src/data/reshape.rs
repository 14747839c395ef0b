use anyhow::{Context, Result, bail};

use super::model::TableError;

// ---------------------------------------------------------------------------
// Alarm columns
// ---------------------------------------------------------------------------

/// Positions of the data columns that survive alarm removal.
///
/// Agilent raw exports lay the header out as
/// `Scan, Time, ch1, Alarm ch1, ch2, Alarm ch2, …`; the alarm column sits
/// right after each channel. Returns the kept channel positions (2, 4, …).
pub fn channel_positions(header: &[String], sensors: usize) -> Result<Vec<usize>, TableError> {
    let expected = sensors
        .checked_mul(2)
        .and_then(|n| n.checked_add(2))
        .ok_or(TableError::TooManySensors(sensors))?;
    if header.len() != expected {
        return Err(TableError::LayoutMismatch {
            sensors,
            expected,
            actual: header.len(),
        });
    }

    let mut kept = Vec::with_capacity(sensors);
    for ch in 0..sensors {
        let value_pos = 2 + 2 * ch;
        let alarm_pos = value_pos + 1;
        if !header[alarm_pos].to_ascii_lowercase().contains("alarm") {
            log::warn!(
                "dropping unlabelled column {alarm_pos} ('{}') as an alarm column",
                header[alarm_pos]
            );
        }
        kept.push(value_pos);
    }
    Ok(kept)
}

/// Strip trailing empty cells (exports often end each line with a comma).
pub fn trim_trailing_empty(fields: &mut Vec<String>) {
    while fields.last().is_some_and(|f| f.trim().is_empty()) {
        fields.pop();
    }
}

// ---------------------------------------------------------------------------
// Timestamp split
// ---------------------------------------------------------------------------

/// A composite `date time-of-day` field broken into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    pub date: String,
    pub hour: String,
    pub minute: String,
    /// Seconds, possibly with a fractional part (`30.123`).
    pub second: String,
}

impl Timestamp {
    /// The display label used as the row index: `hour minute second`.
    pub fn hms(&self) -> String {
        format!("{} {} {}", self.hour, self.minute, self.second)
    }
}

/// Split `"3/12/2020 10:15:30.123"` (or `10:15:30:123`) into its parts.
///
/// A fourth colon-separated field is treated as milliseconds and dropped
/// from the label, matching the `SS[.mmm]` form otherwise.
pub fn split_timestamp(raw: &str) -> Result<Timestamp> {
    let mut parts = raw.split_whitespace();
    let date = parts
        .next()
        .with_context(|| format!("empty timestamp '{raw}'"))?;
    let time = parts
        .next()
        .with_context(|| format!("timestamp '{raw}' has no time-of-day part"))?;

    let fields: Vec<&str> = time.split(':').collect();
    if !(3..=4).contains(&fields.len()) || fields.iter().any(|f| f.is_empty()) {
        bail!("time-of-day '{time}' is not HH:MM:SS[.mmm]");
    }

    Ok(Timestamp {
        date: date.to_string(),
        hour: fields[0].to_string(),
        minute: fields[1].to_string(),
        second: fields[2].to_string(),
    })
}

// ---------------------------------------------------------------------------
// Numeric cells
// ---------------------------------------------------------------------------

/// Parse one numeric cell. Accepts a leading `+` and exponent forms.
pub fn parse_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok()
}
