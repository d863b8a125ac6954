// salesflow-core/src/domain/sales/wide.rs

use crate::domain::table::Table;

/// Wide per-model sales matrix. Columns are model names in ascending order,
/// rows follow ascending timestamp but carry no timestamp themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WideTable {
    columns: Vec<String>,
    rows: Vec<Vec<u64>>,
}

impl WideTable {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<u64>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by row position and model name.
    pub fn value(&self, row: usize, model: &str) -> Option<u64> {
        let col = self.columns.iter().position(|c| c == model)?;
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn to_table(&self) -> Table {
        Table::new(
            self.columns.clone(),
            self.rows
                .iter()
                .map(|r| r.iter().map(u64::to_string).collect())
                .collect(),
        )
    }
}
