use super::time_series::{time_series, Granularity};
use crate::error::AggregateError;
use crate::table::SalesTable;

/// Mean month-over-month change of monthly sales, as a fraction (0.1 = +10%).
///
/// Months are those present in the data, so a gap compares the months on
/// either side of it. The first month has no change and is left out, as are
/// 0→0 transitions. A rise from 0 is an infinite change and makes the mean
/// infinite. `None` when fewer than two months remain.
pub fn monthly_growth_rate(table: &SalesTable) -> Result<Option<f64>, AggregateError> {
    let monthly = time_series(table, Granularity::Month)?;
    let changes: Vec<f64> = monthly
        .windows(2)
        .map(|w| (w[1].total - w[0].total) / w[0].total)
        .filter(|c| !c.is_nan())
        .collect();

    if changes.is_empty() {
        return Ok(None);
    }
    Ok(Some(changes.iter().sum::<f64>() / changes.len() as f64))
}
