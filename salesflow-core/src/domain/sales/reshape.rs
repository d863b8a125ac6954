// salesflow-core/src/domain/sales/reshape.rs
//
// Long -> wide reshape of raw sales records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::domain::error::DomainError;
use crate::domain::sales::coerce::{coerce_sales, normalize_model, parse_timestamp};
use crate::domain::sales::wide::WideTable;
use crate::domain::table::Table;

/// Header of a raw sales file (any order).
pub const RAW_COLUMNS: [&str; 3] = ["timestamp", "model", "sales"];

struct RawColumns {
    timestamp: usize,
    model: usize,
    sales: usize,
}

fn check_schema(table: &Table) -> Result<RawColumns, DomainError> {
    let found: BTreeSet<&str> = table.headers.iter().map(|h| h.trim()).collect();
    let expected: BTreeSet<&str> = RAW_COLUMNS.into_iter().collect();

    let mismatch = || DomainError::SchemaMismatch {
        expected: expected.iter().copied().collect::<Vec<_>>().join(", "),
        found: table
            .headers
            .iter()
            .map(|h| h.trim())
            .collect::<Vec<_>>()
            .join(", "),
    };

    // Exactly three distinct headers, all expected: no extras, no duplicates.
    if table.headers.len() != RAW_COLUMNS.len() || found != expected {
        return Err(mismatch());
    }

    match (
        table.column_index("timestamp"),
        table.column_index("model"),
        table.column_index("sales"),
    ) {
        (Some(timestamp), Some(model), Some(sales)) => Ok(RawColumns {
            timestamp,
            model,
            sales,
        }),
        _ => Err(mismatch()),
    }
}

/// Validates a raw `timestamp,model,sales` table and pivots it into a wide
/// integer table, one column per normalized model.
///
/// Steps run in a fixed order: sales coercion (non-numeric -> 0, negative ->
/// 0), model normalization (trim + lower-case), timestamp parsing (rows with
/// a bad timestamp or blank model are dropped), `(timestamp, model)` sum,
/// pivot with zero fill, round half to even, and finally the timestamp is
/// discarded. A model label normalizing to `timestamp` would collide with the
/// discarded key, so those rows are dropped with a warning. No surviving rows
/// gives an empty table, not an error.
pub fn reshape_sales(table: &Table) -> Result<WideTable, DomainError> {
    let cols = check_schema(table)?;

    let mut grouped: BTreeMap<(NaiveDateTime, String), f64> = BTreeMap::new();
    let mut dropped = 0usize;
    let mut reserved = 0usize;

    for row in &table.rows {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");

        let sales = coerce_sales(cell(cols.sales));
        let model = normalize_model(cell(cols.model));
        let timestamp = parse_timestamp(cell(cols.timestamp));

        match (timestamp, model) {
            (Some(_), Some(model)) if model == "timestamp" => reserved += 1,
            (Some(ts), Some(model)) => *grouped.entry((ts, model)).or_insert(0.0) += sales,
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, "Rows dropped (unparseable timestamp or blank model)");
    }
    if reserved > 0 {
        warn!(rows = reserved, "Rows dropped: model label 'timestamp' is reserved");
    }

    if grouped.is_empty() {
        info!(input_rows = table.len(), "No valid rows left, emitting empty table");
        return Ok(WideTable::empty());
    }

    let models: Vec<String> = grouped
        .keys()
        .map(|(_, m)| m.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let col_of: BTreeMap<&str, usize> = models
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i))
        .collect();

    let mut pivot: BTreeMap<NaiveDateTime, Vec<f64>> = BTreeMap::new();
    for ((ts, model), total) in &grouped {
        let row = pivot.entry(*ts).or_insert_with(|| vec![0.0; models.len()]);
        if let Some(&c) = col_of.get(model.as_str()) {
            row[c] += total;
        }
    }

    let rows: Vec<Vec<u64>> = pivot
        .into_values()
        .map(|row| row.into_iter().map(to_count).collect())
        .collect();

    info!(
        input_rows = table.len(),
        output_rows = rows.len(),
        models = models.len(),
        "Sales reshaped to wide form"
    );

    Ok(WideTable::new(models, rows))
}

fn to_count(value: f64) -> u64 {
    // `as` saturates: anything below zero (there is none after coercion) maps to 0
    value.round_ties_even() as u64
}
