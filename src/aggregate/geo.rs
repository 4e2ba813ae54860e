use super::mean;
use crate::error::AggregateError;
use crate::schema::Dimension;
use crate::table::SalesTable;
use arrow::array::Array;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sales rolled up for one (region, city) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRollup {
    pub region: String,
    pub city: String,
    pub total: f64,
    /// Rows with a usable sales amount.
    pub orders: usize,
    pub average: Option<f64>,
}

/// Per-city sum, count and mean of sales, largest total first, at most `limit`.
///
/// Rows missing either region or city are dropped. Values keep full
/// precision; rounding is left to whoever renders them.
pub fn geographic_rollup(
    table: &SalesTable,
    limit: usize,
) -> Result<Vec<CityRollup>, AggregateError> {
    let amounts = table.require_amounts()?;
    let regions = table.require_text(Dimension::Region.column())?;
    let cities = table.require_text(Dimension::City.column())?;

    let mut groups: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for (i, (region, city)) in regions.iter().zip(cities.iter()).enumerate() {
        let (Some(region), Some(city)) = (region, city) else {
            continue;
        };
        let entry = groups.entry((region, city)).or_insert((0.0, 0));
        if amounts.is_valid(i) {
            entry.0 += amounts.value(i);
            entry.1 += 1;
        }
    }

    let mut rollup: Vec<CityRollup> = groups
        .into_iter()
        .map(|((region, city), (total, orders))| CityRollup {
            region: region.to_string(),
            city: city.to_string(),
            total,
            orders,
            average: mean(total, orders),
        })
        .collect();
    rollup.sort_by(|a, b| b.total.total_cmp(&a.total));
    rollup.truncate(limit);
    Ok(rollup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures;

    #[test]
    fn test_rollup_by_region_and_city() {
        let table = fixtures::table(&[
            "2024-01-01,100,1,Internet,A,S,Canada,Toronto",
            "2024-01-02,50,2,Internet,A,S,Canada,Toronto",
            "2024-01-03,N/A,3,Internet,A,S,Canada,Toronto",
            "2024-01-04,400,4,Internet,A,S,France,Paris",
            "2024-01-05,10,5,Internet,A,S,,Lyon",
        ]);
        let rollup = geographic_rollup(&table, 20).unwrap();
        assert_eq!(rollup.len(), 2);

        assert_eq!(rollup[0].city, "Paris");
        assert_eq!(rollup[0].total, 400.0);

        let toronto = &rollup[1];
        assert_eq!(toronto.region, "Canada");
        assert_eq!(toronto.total, 150.0);
        assert_eq!(toronto.orders, 2);
        assert_eq!(toronto.average, Some(75.0));
    }

    #[test]
    fn test_rollup_respects_limit() {
        let rows: Vec<String> = (0..25)
            .map(|i| format!("2024-01-01,{},1,Internet,A,S,Canada,City{:02}", i + 1, i))
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let rollup = geographic_rollup(&fixtures::table(&refs), 20).unwrap();
        assert_eq!(rollup.len(), 20);
        assert_eq!(rollup[0].city, "City24");
        assert!(rollup.windows(2).all(|w| w[0].total >= w[1].total));
    }

    #[test]
    fn test_city_with_no_priced_rows_has_no_average() {
        let table = fixtures::table(&["2024-01-01,oops,1,Internet,A,S,Canada,Toronto"]);
        let rollup = geographic_rollup(&table, 20).unwrap();
        assert_eq!(rollup[0].orders, 0);
        assert_eq!(rollup[0].average, None);
    }

    #[test]
    fn test_rollup_keeps_full_precision() {
        let table = fixtures::table(&[
            "2024-01-01,0.125,1,Internet,A,S,Canada,Toronto",
            "2024-01-02,0.25,2,Internet,A,S,Canada,Toronto",
            "2024-01-03,0.001,3,Internet,A,S,Canada,Toronto",
        ]);
        let rollup = geographic_rollup(&table, 20).unwrap();
        assert_eq!(rollup[0].total, 0.125 + 0.25 + 0.001);
        assert_eq!(rollup[0].average, Some((0.125 + 0.25 + 0.001) / 3.0));
    }
}
