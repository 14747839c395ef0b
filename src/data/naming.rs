use super::model::{DataTable, TableError};

/// Relabel the data columns left to right with `names`.
///
/// The index keeps its fixed name. Names are not checked for emptiness or
/// uniqueness; only the count has to match.
pub fn apply_names(table: &mut DataTable, names: &[String]) -> Result<(), TableError> {
    if names.len() != table.width() {
        return Err(TableError::NameCountMismatch {
            expected: table.width(),
            actual: names.len(),
        });
    }
    for (column, name) in table.columns.iter_mut().zip(names) {
        column.name = name.clone();
    }
    Ok(())
}
