use super::sum_by_key;
use crate::error::AggregateError;
use crate::process::calendar::{month_start, week_start};
use crate::table::{date_values, SalesTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Width of a time-series bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    /// ISO week, labelled by its Monday.
    Week,
    /// Calendar month, labelled by its first day.
    #[default]
    Month,
}

impl Granularity {
    pub fn bucket(self, d: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => d,
            Granularity::Week => week_start(d),
            Granularity::Month => month_start(d),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            other => Err(format!(
                "unknown granularity `{other}` (expected day, week or month)"
            )),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        f.write_str(s)
    }
}

/// Summed sales for the bucket starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub start: NaiveDate,
    pub total: f64,
}

/// Sales summed per bucket, ascending by bucket start. Undated rows are skipped.
pub fn time_series(
    table: &SalesTable,
    granularity: Granularity,
) -> Result<Vec<TimePoint>, AggregateError> {
    let amounts = table.require_amounts()?;
    let dates = table.require_dates()?;
    let buckets = date_values(dates).map(|d| d.map(|d| granularity.bucket(d)));
    Ok(sum_by_key(buckets, amounts)
        .into_iter()
        .map(|(start, total)| TimePoint { start, total })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{fixtures, totals};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_example() {
        let series = time_series(&fixtures::example(), Granularity::Month).unwrap();
        assert_eq!(
            series,
            vec![
                TimePoint {
                    start: ymd(2024, 1, 1),
                    total: 150.0
                },
                TimePoint {
                    start: ymd(2024, 2, 1),
                    total: 200.0
                },
            ]
        );
    }

    #[test]
    fn test_weekly_buckets_start_monday() {
        let series = time_series(&fixtures::example(), Granularity::Week).unwrap();
        let starts: Vec<NaiveDate> = series.iter().map(|p| p.start).collect();
        // 2024-02-01 is a Thursday
        assert_eq!(starts, vec![ymd(2024, 1, 1), ymd(2024, 1, 15), ymd(2024, 1, 29)]);
    }

    #[test]
    fn test_bucket_sums_match_total() {
        let table = fixtures::table(&[
            "2024-01-05,100,1,Internet,A,Road,Canada,Toronto",
            "2024-01-05,12.5,1,Internet,A,Road,Canada,Toronto",
            "2024-03-09,N/A,1,Internet,A,Road,Canada,Toronto",
            "2024-03-10,7.25,1,Internet,A,Road,Canada,Toronto",
            "2025-12-31,80,1,Internet,A,Road,Canada,Toronto",
        ]);
        let expected = totals(&table).unwrap().total;
        for g in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let series = time_series(&table, g).unwrap();
            let sum: f64 = series.iter().map(|p| p.total).sum();
            assert!((sum - expected).abs() < 1e-9, "{g}: {sum} != {expected}");
            assert!(series.windows(2).all(|w| w[0].start < w[1].start));
        }
    }

    #[test]
    fn test_empty_series() {
        let series = time_series(&fixtures::table(&[]), Granularity::Day).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_granularity() {
        assert_eq!("Weekly".parse::<Granularity>(), Ok(Granularity::Week));
        assert_eq!("day".parse::<Granularity>(), Ok(Granularity::Day));
        assert!("hourly".parse::<Granularity>().is_err());
    }
}
