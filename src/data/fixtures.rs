//! Synthetic DAQ exports shared by the unit tests.

use super::loader::{AGILENT_PREAMBLE_LINES, HBM_PREAMBLE_LINES};

/// An Agilent 34972A raw export with `sensors` channels and `rows` scans.
///
/// Channel `c` at row `r` reads `20 + c + 0.5 r`; the time of day starts at
/// 10:15:00 and advances one second per scan.
pub fn agilent_raw_text(sensors: usize, rows: usize) -> String {
    let mut lines: Vec<String> = vec![
        "Name,Oven profile".into(),
        "Owner,lab".into(),
        "Comments,".into(),
        "Acquisition Date,3/12/2020 10:15:00".into(),
        "Instrument,34972A,MY12345678".into(),
        "Total Sweeps,0".into(),
        format!("Total Channels,{sensors}"),
        "Channel,Name,Function,Range,Resolution,Integration,Delay".into(),
    ];
    assert_eq!(lines.len(), AGILENT_PREAMBLE_LINES);
    for c in 0..sensors {
        lines.push(format!("{},,Temp (Type J),,,,", 101 + c));
    }

    let mut header = vec!["Scan".to_string(), "Time".to_string()];
    for c in 0..sensors {
        header.push(format!("{} (C)", 101 + c));
        header.push(format!("Alarm {}", 101 + c));
    }
    lines.push(format!("{},", header.join(",")));

    for r in 0..rows {
        let mut row = vec![
            (r + 1).to_string(),
            format!("3/12/2020 10:15:{:02}:{:03}", r, r * 10),
        ];
        for c in 0..sensors {
            row.push(format!("{:+.3E}", 20.0 + c as f64 + 0.5 * r as f64));
            row.push("0".into());
        }
        lines.push(format!("{},", row.join(",")));
    }

    lines.join("\r\n") + "\r\n"
}

/// Encode text as UTF-16LE with a byte-order mark, as BenchLink does.
pub fn utf16le_bytes(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

/// An HBM raw export: `Ch1`/`Ch2` complete, `Status` missing on odd rows
/// and `Ch3` reporting `NaN` once.
pub fn hbm_raw_text(rows: usize) -> String {
    let mut text = String::new();
    for i in 0..HBM_PREAMBLE_LINES {
        text.push_str(&format!("# catman header line {}\n", i + 1));
    }
    text.push_str("Time  Ch1  Ch2  Ch3  Status\n");
    for r in 0..rows {
        let ch3 = if r == 2 { "NaN".to_string() } else { format!("{}", 3 * r) };
        let mut line = format!("0.{r}  1.{r}  2.{r}  {ch3}");
        if r % 2 == 0 {
            line.push_str("  1");
        }
        text.push_str(&line);
        text.push('\n');
    }
    text
}
