use crate::error::CleanerError;
use crate::table::RawTable;
use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Workbook formats read through calamine; everything else must be CSV.
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];
const CSV_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// A header that changed during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRename {
    pub original: String,
    pub canonical: String,
}

/// Reads the pitch sheet, dispatching on the file extension.
///
/// Workbooks go through calamine (first worksheet), CSV exports through polars.
/// Either way every cell arrives as text and the first row is the header.
pub fn load_table(path: &Path) -> Result<RawTable, CleanerError> {
    if !path.is_file() {
        return Err(CleanerError::SourceNotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        load_workbook(path)
    } else if extension.is_empty() || CSV_EXTENSIONS.contains(&extension.as_str()) {
        load_csv(path)
    } else {
        Err(CleanerError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })
    }
}

/// Reads the first worksheet of a workbook, keeping every cell as text.
pub fn load_workbook(path: &Path) -> Result<RawTable, CleanerError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CleanerError::EmptyWorkbook(path.to_path_buf()))??;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| cell_text(cell).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();
    let rows: Vec<Vec<Option<String>>> = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let table = RawTable::new(columns, rows);
    tracing::info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "Loaded source workbook."
    );
    Ok(table)
}

/// Workbook cell as it would read in the sheet; empty cells are missing.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}

/// Reads a CSV export of the pitch sheet, keeping every cell as text.
///
/// Nothing is parsed here: currency and percent decorations must survive until
/// the coercion stage sees them.
pub fn load_csv(path: &Path) -> Result<RawTable, CleanerError> {
    if !path.is_file() {
        return Err(CleanerError::SourceNotFound(path.to_path_buf()));
    }

    // A zero-row inference window makes polars read every column as String.
    let df = CsvReader::from_path(path)?
        .has_header(true)
        .infer_schema(Some(0))
        .finish()?;

    let table = frame_to_raw_table(&df)?;
    tracing::info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "Loaded source table."
    );
    Ok(table)
}

/// Copies a DataFrame into a row-major text table.
pub fn frame_to_raw_table(df: &DataFrame) -> Result<RawTable, CleanerError> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(columns.len()); df.height()];
    for series in df.get_columns() {
        let text = series.cast(&DataType::String)?;
        for (row, value) in rows.iter_mut().zip(text.str()?.into_iter()) {
            row.push(value.map(str::to_string));
        }
    }

    Ok(RawTable::new(columns, rows))
}

/// Canonical column name: trimmed, lowercased, whitespace replaced by `_`.
pub fn canonical_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Renames every column to its canonical form.
///
/// Names that collide after normalization get a numeric suffix so every
/// column stays addressable.
pub fn normalize_columns(table: RawTable) -> (RawTable, Vec<ColumnRename>) {
    let (columns, rows) = table.into_parts();
    let mut taken: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut renames = Vec::new();
    let mut canonical_columns = Vec::with_capacity(columns.len());

    for original in columns {
        let base = canonical_name(&original);
        let mut canonical = base.clone();
        let mut n = 2;
        while taken.contains(&canonical) {
            canonical = format!("{base}_{n}");
            n += 1;
        }
        if canonical != base {
            tracing::warn!(
                original = %original,
                canonical = %canonical,
                "Column name collides with an earlier column after normalization."
            );
        }
        taken.insert(canonical.clone());
        if canonical != original {
            renames.push(ColumnRename {
                original,
                canonical: canonical.clone(),
            });
        }
        canonical_columns.push(canonical);
    }

    tracing::debug!(renamed = renames.len(), "Normalized column names.");
    (RawTable::new(canonical_columns, rows), renames)
}

/// Removes rows identical to an earlier row, keeping the first occurrence.
///
/// Survivors keep their relative order, and a second pass removes nothing.
pub fn drop_duplicates(table: RawTable) -> (RawTable, usize) {
    let (columns, rows) = table.into_parts();
    let before = rows.len();
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(before);

    let rows: Vec<_> = rows
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();

    let removed = before - rows.len();
    if removed > 0 {
        tracing::info!(removed, "Dropped duplicate rows.");
    }
    (RawTable::new(columns, rows), removed)
}
