//! In-memory tables passed between cleaning stages.
//!
//! `RawTable` is row-major text straight from the source. After coercion the
//! data moves into the column-major `TypedTable`, where every numeric-like
//! column is `Option<f64>` and everything else stays text.

use serde::Serialize;

/// Row-major text table as read from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Builds a table; every row is padded or truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Option<String>>>) {
        (self.columns, self.rows)
    }
}

/// Values of one column after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Text(Vec<Option<String>>),
    Numeric(Vec<Option<f64>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

/// Column-major table with typed columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedTable {
    columns: Vec<Column>,
    height: usize,
}

impl TypedTable {
    pub fn new(columns: Vec<Column>, height: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == height));
        Self { columns, height }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric values of `name`, or `None` if absent or not numeric.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name).map(|c| &c.values) {
            Some(ColumnValues::Numeric(values)) => Some(values),
            _ => None,
        }
    }

    /// Cell values of `name` rendered as text, whatever the column type.
    pub fn text_values(&self, name: &str) -> Option<Vec<Option<String>>> {
        self.column(name).map(|c| match &c.values {
            ColumnValues::Text(values) => values.clone(),
            ColumnValues::Numeric(values) => values
                .iter()
                .map(|v| v.map(format_number))
                .collect(),
        })
    }
}

/// Formats a number the way it is echoed back to users: integral values without
/// a fractional part, everything else as-is.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// How many cells of a column were empty after deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Counts blank or absent cells per column.
pub fn missing_summary(table: &RawTable) -> Vec<MissingCount> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| MissingCount {
            column: column.clone(),
            missing: table
                .rows()
                .iter()
                .filter(|row| is_blank(row[idx].as_deref()))
                .count(),
        })
        .collect()
}

pub(crate) fn is_blank(cell: Option<&str>) -> bool {
    cell.is_none_or(|s| s.trim().is_empty())
}
