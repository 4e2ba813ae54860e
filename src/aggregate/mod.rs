//! Stateless reducers over a sales table (full or filtered).
//!
//! Mean/ratio metrics on an empty row set are `None`; grouped aggregates
//! on an empty row set are empty vectors. A reducer whose input column is
//! absent returns `AggregateError::MissingColumn`.

pub mod distribution;
pub mod geo;
pub mod growth;
pub mod ranking;
pub mod seasonal;
pub mod time_series;
pub mod totals;

pub use distribution::{amount_summary, channel_distribution, median_amount, AmountSummary, BoxStats};
pub use geo::{geographic_rollup, CityRollup};
pub use growth::monthly_growth_rate;
pub use ranking::{
    category_ranking, region_ranking, sales_by, subcategory_ranking, top_by, RankedTotal,
};
pub use seasonal::{sales_by_month_name, sales_by_weekday};
pub use time_series::{time_series, Granularity, TimePoint};
pub use totals::{totals, Totals};

use arrow::array::{Array, Float64Array};
use std::collections::BTreeMap;

/// Sum amounts per key, keys in sorted order.
///
/// Rows with a null key are dropped. A null amount adds nothing but still
/// opens its group, so a group of only null amounts totals 0.
pub(crate) fn sum_by_key<K: Ord>(
    keys: impl Iterator<Item = Option<K>>,
    amounts: &Float64Array,
) -> BTreeMap<K, f64> {
    let mut groups = BTreeMap::new();
    for (i, key) in keys.enumerate() {
        let Some(key) = key else { continue };
        let total = groups.entry(key).or_insert(0.0);
        if amounts.is_valid(i) {
            *total += amounts.value(i);
        }
    }
    groups
}

/// Mean of `sum` over `n` values, undefined for none.
pub(crate) fn mean(sum: f64, n: usize) -> Option<f64> {
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

/// Non-null amounts in row order.
pub(crate) fn present(amounts: &Float64Array) -> Vec<f64> {
    amounts.iter().flatten().collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::process::load_sales_csv;
    use crate::table::SalesTable;

    pub const HEADER: &str =
        "Date,Sales Amount,Sales Order,Channel,Category,Subcategory,Country-Region,City";

    /// Build a table from body rows under the standard header.
    pub fn table(rows: &[&str]) -> SalesTable {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for r in rows {
            csv.push_str(r);
            csv.push('\n');
        }
        load_sales_csv(csv.as_bytes()).unwrap()
    }

    /// The three-row example used across the aggregate tests.
    pub fn example() -> SalesTable {
        table(&[
            "2024-01-05,100,1,Internet,CategoryA,Road,Canada,Toronto",
            "2024-01-20,50,2,Reseller,CategoryA,Mountain,Canada,Ottawa",
            "2024-02-01,200,3,Internet,CategoryB,Helmets,France,Paris",
        ])
    }
}
