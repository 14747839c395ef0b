use std::io::{BufRead, Write};

use crate::data::model::DataTable;

use super::prompt::{Console, PromptError};

/// Print the first `rows` rows and the table shape for a visual check.
pub fn show_head<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    table: &DataTable,
    rows: usize,
) -> Result<(), PromptError> {
    console.say(table.head(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;
    use std::io::Cursor;

    #[test]
    fn prints_only_the_requested_rows() {
        let table = DataTable::new(
            "Scan",
            (1..=10).map(|i| i.to_string()).collect(),
            vec![Column::new("T1", (1..=10).map(f64::from).collect())],
        )
        .unwrap();
        let mut console = Console::new(Cursor::new(Vec::new()), Vec::new());
        show_head(&mut console, &table, 3).unwrap();

        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("[10 rows x 1 columns]"));
    }
}
