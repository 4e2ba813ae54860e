use super::sum_by_key;
use crate::error::AggregateError;
use crate::schema::Dimension;
use crate::table::SalesTable;
use serde::Serialize;

/// Total sales for one value of a dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTotal {
    pub key: String,
    pub total: f64,
}

/// Summed sales per distinct value of `dim`, keys in ascending order.
pub fn sales_by(table: &SalesTable, dim: Dimension) -> Result<Vec<RankedTotal>, AggregateError> {
    let amounts = table.require_amounts()?;
    let keys = table.require_text(dim.column())?;
    Ok(sum_by_key(keys.iter(), amounts)
        .into_iter()
        .map(|(key, total)| RankedTotal {
            key: key.to_string(),
            total,
        })
        .collect())
}

/// The value of `dim` with the highest summed sales.
///
/// Ties go to the first maximum in key order; `None` on an empty row set.
pub fn top_by(table: &SalesTable, dim: Dimension) -> Result<Option<String>, AggregateError> {
    let groups = sales_by(table, dim)?;
    let mut best: Option<&RankedTotal> = None;
    for g in &groups {
        if best.map_or(true, |b| g.total > b.total) {
            best = Some(g);
        }
    }
    Ok(best.map(|b| b.key.clone()))
}

/// Category totals, smallest first (horizontal bar order).
pub fn category_ranking(table: &SalesTable) -> Result<Vec<RankedTotal>, AggregateError> {
    ascending(table, Dimension::Category)
}

/// Country-region totals, smallest first.
pub fn region_ranking(table: &SalesTable) -> Result<Vec<RankedTotal>, AggregateError> {
    ascending(table, Dimension::Region)
}

/// Best-selling subcategories, largest first, at most `limit`.
pub fn subcategory_ranking(
    table: &SalesTable,
    limit: usize,
) -> Result<Vec<RankedTotal>, AggregateError> {
    let mut groups = sales_by(table, Dimension::Subcategory)?;
    groups.sort_by(|a, b| b.total.total_cmp(&a.total));
    groups.truncate(limit);
    Ok(groups)
}

fn ascending(table: &SalesTable, dim: Dimension) -> Result<Vec<RankedTotal>, AggregateError> {
    let mut groups = sales_by(table, dim)?;
    groups.sort_by(|a, b| a.total.total_cmp(&b.total));
    Ok(groups)
}
