use super::mean;
use crate::error::AggregateError;
use crate::table::SalesTable;
use serde::Serialize;

/// Headline sums over a row set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of non-null sales amounts.
    pub total: f64,
    /// Mean of non-null sales amounts; `None` when there are none.
    pub mean: Option<f64>,
    /// Every row, priced or not.
    pub rows: usize,
    /// Rows with a usable sales amount.
    pub priced_rows: usize,
}

pub fn totals(table: &SalesTable) -> Result<Totals, AggregateError> {
    let amounts = table.require_amounts()?;
    let (total, priced_rows) = amounts
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    Ok(Totals {
        total,
        mean: mean(total, priced_rows),
        rows: table.num_rows(),
        priced_rows,
    })
}
