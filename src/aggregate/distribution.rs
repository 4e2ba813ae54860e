use super::{mean, present};
use crate::error::AggregateError;
use crate::schema::Dimension;
use crate::table::SalesTable;
use arrow::array::Array;
use serde::Serialize;
use std::collections::BTreeMap;

/// Descriptive statistics of the sales amount column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountSummary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); needs two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Five-number summary of sales amounts for one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub key: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn amount_summary(table: &SalesTable) -> Result<AmountSummary, AggregateError> {
    let mut values = present(table.require_amounts()?);
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let avg = mean(values.iter().sum(), n);
    let std = match (avg, n) {
        (Some(m), n) if n > 1 => {
            let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
            Some((ss / (n - 1) as f64).sqrt())
        }
        _ => None,
    };

    Ok(AmountSummary {
        count: n,
        mean: avg,
        std,
        min: values.first().copied(),
        q1: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q3: quantile(&values, 0.75),
        max: values.last().copied(),
    })
}

pub fn median_amount(table: &SalesTable) -> Result<Option<f64>, AggregateError> {
    let mut values = present(table.require_amounts()?);
    values.sort_by(f64::total_cmp);
    Ok(quantile(&values, 0.5))
}

/// Box-plot inputs per channel, channels in ascending order.
pub fn channel_distribution(table: &SalesTable) -> Result<Vec<BoxStats>, AggregateError> {
    let amounts = table.require_amounts()?;
    let channels = table.require_text(Dimension::Channel.column())?;

    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (i, channel) in channels.iter().enumerate() {
        if let Some(channel) = channel {
            if amounts.is_valid(i) {
                groups.entry(channel).or_default().push(amounts.value(i));
            }
        }
    }

    Ok(groups
        .into_iter()
        .filter_map(|(key, mut values)| {
            values.sort_by(f64::total_cmp);
            Some(BoxStats {
                key: key.to_string(),
                count: values.len(),
                min: *values.first()?,
                q1: quantile(&values, 0.25)?,
                median: quantile(&values, 0.5)?,
                q3: quantile(&values, 0.75)?,
                max: *values.last()?,
            })
        })
        .collect())
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}
