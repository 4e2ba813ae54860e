use crate::aggregate::{
    category_ranking, channel_distribution, geographic_rollup, region_ranking,
    sales_by_month_name, sales_by_weekday, subcategory_ranking, time_series, BoxStats,
    CityRollup, Granularity, RankedTotal, TimePoint,
};
use crate::config::DashboardConfig;
use crate::error::{AggregateError, ReportError};
use crate::insights::{insights, kpis, Insights, Kpis};
use crate::overview::{data_overview, DataOverview};
use crate::table::SalesTable;
use serde::Serialize;
use tracing::{info, warn};

/// Everything the presentation layer draws for one upload and selection.
///
/// Sections whose input columns are missing from the file are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub overview: DataOverview,
    pub kpis: Option<Kpis>,
    pub granularity: Granularity,
    pub sales_over_time: Option<Vec<TimePoint>>,
    pub category_sales: Option<Vec<RankedTotal>>,
    pub top_subcategories: Option<Vec<RankedTotal>>,
    pub channel_distribution: Option<Vec<BoxStats>>,
    pub region_sales: Option<Vec<RankedTotal>>,
    pub city_rollup: Option<Vec<CityRollup>>,
    pub sales_by_month: Option<Vec<RankedTotal>>,
    pub sales_by_weekday: Option<Vec<RankedTotal>>,
    pub insights: Option<Insights>,
}

/// Overview from the full table, every other section from the filtered one.
#[tracing::instrument(level = "info", skip_all, fields(rows = full.num_rows(), filtered = filtered.num_rows()))]
pub fn build_report(
    full: &SalesTable,
    filtered: &SalesTable,
    cfg: &DashboardConfig,
) -> Result<DashboardReport, ReportError> {
    let overview = data_overview(full, cfg.sample_rows)?;

    let report = DashboardReport {
        total_rows: full.num_rows(),
        filtered_rows: filtered.num_rows(),
        overview,
        kpis: available("kpis", kpis(filtered)),
        granularity: cfg.granularity,
        sales_over_time: available("sales_over_time", time_series(filtered, cfg.granularity)),
        category_sales: available("category_sales", category_ranking(filtered)),
        top_subcategories: available(
            "top_subcategories",
            subcategory_ranking(filtered, cfg.subcategory_limit),
        ),
        channel_distribution: available("channel_distribution", channel_distribution(filtered)),
        region_sales: available("region_sales", region_ranking(filtered)),
        city_rollup: available("city_rollup", geographic_rollup(filtered, cfg.city_limit)),
        sales_by_month: available("sales_by_month", sales_by_month_name(filtered)),
        sales_by_weekday: available("sales_by_weekday", sales_by_weekday(filtered)),
        insights: available("insights", insights(filtered)),
    };

    info!(
        "showing {} of {} records",
        report.filtered_rows, report.total_rows
    );
    Ok(report)
}

fn available<T>(section: &str, res: Result<T, AggregateError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(section, error = %e, "section unavailable");
            None
        }
    }
}
