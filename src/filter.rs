use crate::error::FilterError;
use crate::schema::Dimension;
use crate::table::SalesTable;
use arrow::{
    array::{Array, BooleanArray, StringArray},
    compute::filter_record_batch,
};
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, collections::BTreeSet};
use tracing::debug;

/// Allowed values along one filter dimension.
///
/// `All` is what a caller gets by not choosing anything: every observed
/// value passes, the same rows an explicit set of every observed value
/// keeps. `Only` keeps rows whose value is in the set; an empty set keeps
/// nothing. A null value never passes either form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T: Ord> {
    #[default]
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Selection<T> {
    pub fn only<I: IntoIterator<Item = T>>(values: I) -> Self {
        Selection::Only(values.into_iter().collect())
    }

    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    fn admits<Q>(&self, value: Option<&Q>) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match (self, value) {
            (_, None) => false,
            (Selection::All, Some(_)) => true,
            (Selection::Only(set), Some(v)) => set.contains(v),
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

/// The four sidebar selections, passed explicitly on every call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selections {
    pub years: Selection<i32>,
    pub categories: Selection<String>,
    pub channels: Selection<String>,
    pub regions: Selection<String>,
}

impl Selections {
    /// Explicit selections holding every observed value.
    pub fn from_options(options: &FilterOptions) -> Self {
        Self {
            years: Selection::only(options.years.iter().copied()),
            categories: Selection::only(options.categories.iter().cloned()),
            channels: Selection::only(options.channels.iter().cloned()),
            regions: Selection::only(options.regions.iter().cloned()),
        }
    }

    fn is_unrestricted(&self) -> bool {
        self.years.is_all()
            && self.categories.is_all()
            && self.channels.is_all()
            && self.regions.is_all()
    }
}

/// Sorted distinct non-null values available for each filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub categories: Vec<String>,
    pub channels: Vec<String>,
    pub regions: Vec<String>,
}

pub fn filter_options(table: &SalesTable) -> FilterOptions {
    let years: BTreeSet<i32> = table
        .years()
        .map(|arr| arr.iter().flatten().collect())
        .unwrap_or_default();
    FilterOptions {
        years: years.into_iter().collect(),
        categories: distinct(table.dimension(Dimension::Category)),
        channels: distinct(table.dimension(Dimension::Channel)),
        regions: distinct(table.dimension(Dimension::Region)),
    }
}

fn distinct(arr: Option<&StringArray>) -> Vec<String> {
    let set: BTreeSet<&str> = arr.map(|a| a.iter().flatten().collect()).unwrap_or_default();
    set.into_iter().map(str::to_string).collect()
}

/// Rows whose year, category, channel and region all pass their selection.
///
/// A dimension whose column the table lacks restricts nothing. Returns a
/// new table; `table` is left untouched.
pub fn apply_filters(table: &SalesTable, sel: &Selections) -> Result<SalesTable, FilterError> {
    let years = table.years();
    let categories = table.dimension(Dimension::Category);
    let channels = table.dimension(Dimension::Channel);
    let regions = table.dimension(Dimension::Region);

    let null_free = years.map_or(true, |a| a.null_count() == 0)
        && [categories, channels, regions]
            .iter()
            .all(|c| c.map_or(true, |a| a.null_count() == 0));
    if sel.is_unrestricted() && null_free {
        return Ok(table.clone());
    }

    let mask: BooleanArray = (0..table.num_rows())
        .map(|i| {
            let keep = years.map_or(true, |a| {
                let year = a.is_valid(i).then(|| a.value(i));
                sel.years.admits(year.as_ref())
            }) && passes(&sel.categories, categories, i)
                && passes(&sel.channels, channels, i)
                && passes(&sel.regions, regions, i);
            Some(keep)
        })
        .collect();

    let batch = filter_record_batch(table.batch(), &mask)?;
    debug!(
        kept = batch.num_rows(),
        total = table.num_rows(),
        "filters applied"
    );
    Ok(SalesTable::new(batch))
}

fn passes(sel: &Selection<String>, arr: Option<&StringArray>, i: usize) -> bool {
    arr.map_or(true, |a| sel.admits(text_at(a, i)))
}

fn text_at(arr: &StringArray, i: usize) -> Option<&str> {
    arr.is_valid(i).then(|| arr.value(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{time_series, totals, Granularity};
    use crate::process::load_sales_csv;

    const CSV: &str = "\
Date,Sales Amount,Channel,Category,Country-Region
2023-05-01,10,Internet,Bikes,Canada
2023-06-01,20,Reseller,Bikes,France
2024-01-05,30,Internet,Clothing,Canada
2024-02-10,40,Reseller,Accessories,Germany
";

    fn table() -> SalesTable {
        load_sales_csv(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_filter_options_sorted_distinct() {
        let opts = filter_options(&table());
        assert_eq!(opts.years, vec![2023, 2024]);
        assert_eq!(opts.categories, vec!["Accessories", "Bikes", "Clothing"]);
        assert_eq!(opts.channels, vec!["Internet", "Reseller"]);
        assert_eq!(opts.regions, vec!["Canada", "France", "Germany"]);
    }

    #[test]
    fn test_full_selection_keeps_everything() -> anyhow::Result<()> {
        let t = table();
        let full = Selections::from_options(&filter_options(&t));
        let out = apply_filters(&t, &full)?;
        assert_eq!(out.num_rows(), t.num_rows());
        assert_eq!(out.batch(), t.batch());

        let defaulted = apply_filters(&t, &Selections::default())?;
        assert_eq!(defaulted.batch(), t.batch());
        Ok(())
    }

    #[test]
    fn test_empty_selection_keeps_nothing() -> anyhow::Result<()> {
        let t = table();
        let sel = Selections {
            channels: Selection::none(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&t, &sel)?.num_rows(), 0);
        Ok(())
    }

    #[test]
    fn test_dimensions_are_anded() -> anyhow::Result<()> {
        let t = table();
        let sel = Selections {
            years: Selection::only([2024]),
            channels: Selection::only(["Internet".to_string()]),
            ..Default::default()
        };
        let out = apply_filters(&t, &sel)?;
        assert_eq!(out.num_rows(), 1);
        assert_eq!(out.amounts().unwrap().value(0), 30.0);
        // source table untouched
        assert_eq!(t.num_rows(), 4);
        Ok(())
    }

    #[test]
    fn test_filter_is_idempotent() -> anyhow::Result<()> {
        let t = table();
        let sel = Selections {
            categories: Selection::only(["Bikes".to_string(), "Clothing".to_string()]),
            regions: Selection::only(["Canada".to_string()]),
            ..Default::default()
        };
        let once = apply_filters(&t, &sel)?;
        let twice = apply_filters(&once, &sel)?;
        assert_eq!(once.batch(), twice.batch());
        assert_eq!(once.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn test_default_matches_every_observed_value() -> anyhow::Result<()> {
        let csv = "\
Date,Sales Amount,Channel,Category,Country-Region
2024-01-01,10,Internet,Bikes,Canada
bad,5,Internet,Bikes,Canada
2024-02-01,7,Reseller,,France
";
        let t = load_sales_csv(csv.as_bytes())?;
        let defaulted = apply_filters(&t, &Selections::default())?;
        let explicit = apply_filters(&t, &Selections::from_options(&filter_options(&t)))?;

        assert_eq!(defaulted.num_rows(), 1);
        assert_eq!(defaulted.batch(), explicit.batch());

        let series = time_series(&defaulted, Granularity::Month)?;
        let bucketed: f64 = series.iter().map(|p| p.total).sum();
        assert_eq!(bucketed, totals(&defaulted)?.total);
        Ok(())
    }

    #[test]
    fn test_absent_column_restricts_nothing() -> anyhow::Result<()> {
        let t = load_sales_csv(b"Date,Sales Amount,Channel\n2024-01-01,10,Internet\n")?;
        let sel = Selections {
            categories: Selection::only(["Bikes".to_string()]),
            ..Default::default()
        };
        assert_eq!(apply_filters(&t, &sel)?.num_rows(), 1);

        let sel = Selections {
            years: Selection::only([2023]),
            ..Default::default()
        };
        assert_eq!(apply_filters(&t, &sel)?.num_rows(), 0);
        Ok(())
    }
}
