// salesflow-core/src/infrastructure/adapters/csv_files.rs

use std::fs;
use std::path::Path;

use tracing::{info, instrument};

use crate::domain::sales::WideTable;
use crate::domain::table::Table;
use crate::error::SalesflowError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::storage::{TableSink, TableSource};

/// Comma-separated files with a header row.
pub struct CsvFiles;

impl CsvFiles {
    pub fn parse(bytes: &[u8]) -> Result<Table, InfrastructureError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(Table::new(headers, rows))
    }

    /// Serializes the wide table; an empty table becomes an empty file.
    pub fn render(table: &WideTable) -> Result<Vec<u8>, InfrastructureError> {
        if table.columns().is_empty() {
            return Ok(Vec::new());
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(u64::to_string))?;
        }
        writer
            .into_inner()
            .map_err(|e| InfrastructureError::Io(std::io::Error::other(e.to_string())))
    }
}

impl TableSource for CsvFiles {
    #[instrument(skip(self))]
    fn read_table(&self, path: &Path) -> Result<Table, SalesflowError> {
        let bytes = fs::read(path)?;
        let table = Self::parse(&bytes)?;
        info!(rows = table.len(), columns = table.headers.len(), "CSV loaded");
        Ok(table)
    }
}

impl TableSink for CsvFiles {
    #[instrument(skip(self, table), fields(rows = table.n_rows(), columns = table.columns().len()))]
    fn write_wide(&self, path: &Path, table: &WideTable) -> Result<(), SalesflowError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let bytes = Self::render(table)?;
        atomic_write(path, bytes)?;
        info!(path = ?path, "Processed CSV written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::reshape_sales;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_parse_keeps_cells_verbatim() -> Result<()> {
        let table = CsvFiles::parse(b"timestamp,model,sales\n2024-01-01, GPU-A ,10\n")?;
        assert_eq!(table.headers, vec!["timestamp", "model", "sales"]);
        assert_eq!(table.rows[0][1], " GPU-A ");
        Ok(())
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert!(CsvFiles::parse(b"a,b\n1,2\n3\n").is_err());
    }

    #[test]
    fn test_write_then_read_processed() -> Result<()> {
        let dir = tempdir()?;
        let raw = CsvFiles::parse(
            b"timestamp,model,sales\n2024-01-01 10:00,A,10\n2024-01-01 10:00,a,5\n2024-01-01 11:00,B,3\n",
        )?;
        let wide = reshape_sales(&raw)?;

        let out = dir.path().join("processed/sales_processed_20240101_1200.csv");
        CsvFiles.write_wide(&out, &wide)?;

        assert_eq!(fs::read_to_string(&out)?, "a,b\n15,0\n0,3\n");
        let back = CsvFiles.read_table(&out)?;
        assert_eq!(back, wide.to_table());
        Ok(())
    }

    #[test]
    fn test_empty_table_is_empty_file() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("empty.csv");
        CsvFiles.write_wide(&out, &WideTable::empty())?;
        assert_eq!(fs::read(&out)?.len(), 0);

        let back = CsvFiles.read_table(&out)?;
        assert!(back.headers.is_empty());
        assert!(back.is_empty());
        Ok(())
    }
}
