use crate::aggregate::{median_amount, monthly_growth_rate, top_by, totals};
use crate::error::AggregateError;
use crate::schema::Dimension;
use crate::table::SalesTable;
use serde::Serialize;
use tracing::warn;

/// Headline numbers for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub average_sale: Option<f64>,
    pub orders: usize,
    pub top_category: Option<String>,
    pub top_region: Option<String>,
}

/// Short findings about the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub top_category: Option<String>,
    pub top_region: Option<String>,
    pub top_channel: Option<String>,
    /// Mean month-over-month change in percent.
    pub avg_monthly_growth_pct: Option<f64>,
    pub average_ticket: Option<f64>,
    pub median_sale: Option<f64>,
}

pub fn kpis(table: &SalesTable) -> Result<Kpis, AggregateError> {
    let t = totals(table)?;
    Ok(Kpis {
        total_sales: t.total,
        average_sale: t.mean,
        orders: t.rows,
        top_category: optional(top_by(table, Dimension::Category))?,
        top_region: optional(top_by(table, Dimension::Region))?,
    })
}

pub fn insights(table: &SalesTable) -> Result<Insights, AggregateError> {
    let t = totals(table)?;
    Ok(Insights {
        top_category: optional(top_by(table, Dimension::Category))?,
        top_region: optional(top_by(table, Dimension::Region))?,
        top_channel: optional(top_by(table, Dimension::Channel))?,
        avg_monthly_growth_pct: optional(monthly_growth_rate(table))?.map(|g| g * 100.0),
        average_ticket: t.mean,
        median_sale: median_amount(table)?,
    })
}

/// A missing secondary column blanks that one field instead of the whole card.
fn optional<T>(res: Result<Option<T>, AggregateError>) -> Result<Option<T>, AggregateError> {
    match res {
        Err(AggregateError::MissingColumn(col)) => {
            warn!(column = col, "column missing; insight unavailable");
            Ok(None)
        }
        other => other,
    }
}
