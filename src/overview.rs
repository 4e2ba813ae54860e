use crate::aggregate::{amount_summary, AmountSummary};
use crate::table::{date_values, SalesTable};
use arrow::{array::Array, error::ArrowError, util::display::array_value_to_string};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Structure of one column of the loaded table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub unique: usize,
    pub nulls: usize,
    /// Share of null cells in percent; `None` for an empty table.
    pub null_pct: Option<f64>,
}

/// What the full (unfiltered) upload looks like.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataOverview {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// `None` when the file has no sales amount column.
    pub amount: Option<AmountSummary>,
    pub sample_header: Vec<String>,
    /// First rows rendered as text, nulls as empty strings.
    pub sample: Vec<Vec<String>>,
}

pub fn data_overview(table: &SalesTable, sample_rows: usize) -> Result<DataOverview, ArrowError> {
    let batch = table.batch();
    let rows = batch.num_rows();

    let mut columns = Vec::with_capacity(batch.num_columns());
    for (field, col) in batch.schema().fields().iter().zip(batch.columns()) {
        let mut seen = HashSet::new();
        for i in 0..rows {
            if col.is_valid(i) {
                seen.insert(array_value_to_string(col, i)?);
            }
        }
        let nulls = col.null_count();
        columns.push(ColumnInfo {
            name: field.name().clone(),
            data_type: field.data_type().to_string(),
            unique: seen.len(),
            nulls,
            null_pct: (rows > 0).then(|| nulls as f64 * 100.0 / rows as f64),
        });
    }

    let mut sample = Vec::with_capacity(sample_rows.min(rows));
    for i in 0..sample_rows.min(rows) {
        let row = batch
            .columns()
            .iter()
            .map(|col| {
                if col.is_null(i) {
                    Ok(String::new())
                } else {
                    array_value_to_string(col, i)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        sample.push(row);
    }

    let dates: Vec<NaiveDate> = table
        .dates()
        .map(|d| date_values(d).flatten().collect())
        .unwrap_or_default();

    Ok(DataOverview {
        rows,
        columns,
        first_date: dates.iter().min().copied(),
        last_date: dates.iter().max().copied(),
        amount: amount_summary(table).ok(),
        sample_header: table.column_names(),
        sample,
    })
}
