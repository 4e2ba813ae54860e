use super::ranking::RankedTotal;
use super::sum_by_key;
use crate::error::AggregateError;
use crate::process::calendar::{MONTH_NAMES, WEEKDAY_NAMES};
use crate::schema::columns;
use crate::table::SalesTable;

/// Sales per calendar month name, January first; months with no rows omitted.
pub fn sales_by_month_name(table: &SalesTable) -> Result<Vec<RankedTotal>, AggregateError> {
    ordered_by(table, columns::MONTH_NAME, &MONTH_NAMES)
}

/// Sales per weekday name, Monday first; days with no rows omitted.
pub fn sales_by_weekday(table: &SalesTable) -> Result<Vec<RankedTotal>, AggregateError> {
    ordered_by(table, columns::DAY_OF_WEEK, &WEEKDAY_NAMES)
}

fn ordered_by(
    table: &SalesTable,
    column: &'static str,
    order: &[&str],
) -> Result<Vec<RankedTotal>, AggregateError> {
    let amounts = table.require_amounts()?;
    let names = table.require_text(column)?;
    let groups = sum_by_key(names.iter(), amounts);
    Ok(order
        .iter()
        .filter_map(|name| {
            groups.get(name).map(|total| RankedTotal {
                key: name.to_string(),
                total: *total,
            })
        })
        .collect())
}
