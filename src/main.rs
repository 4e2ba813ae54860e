use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{format, Cell, Row, Table};
use salesdash::{
    aggregate::Granularity,
    apply_filters, build_report, filter_options,
    overview::{data_overview, DataOverview},
    DashboardConfig, DashboardReport, FilterOptions, Selection, Selections, TableCache,
};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "salesdash")]
#[command(about = "Sales analytics over a CSV export of sales records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// KPIs, trends, rankings and insights for a filtered view
    Report {
        file: PathBuf,
        /// Keep only these years (repeatable; default: all)
        #[arg(long = "year")]
        years: Vec<i32>,
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long = "channel")]
        channels: Vec<String>,
        #[arg(long = "region")]
        regions: Vec<String>,
        /// day, week or month
        #[arg(long)]
        granularity: Option<Granularity>,
        /// TOML file with report limits
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Row sample, column structure and amount statistics of the whole file
    Overview {
        file: PathBuf,
        #[arg(long, default_value_t = 10)]
        rows: usize,
        #[arg(long)]
        json: bool,
    },
    /// Values available to each filter
    Options {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    let cli = Cli::parse();
    let mut cache = TableCache::new();

    match cli.command {
        Command::Report {
            file,
            years,
            categories,
            channels,
            regions,
            granularity,
            config,
            json,
        } => {
            // ─── 2) config: file, then flags ─────────────────────────
            let mut cfg = match config {
                Some(path) => DashboardConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => DashboardConfig::default(),
            };
            if let Some(g) = granularity {
                cfg.granularity = g;
            }

            // ─── 3) load + filter ────────────────────────────────────
            let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let table = cache
                .get_or_load(&bytes)
                .with_context(|| format!("loading {}", file.display()))?;
            let selections = Selections {
                years: selection(years),
                categories: selection(categories),
                channels: selection(channels),
                regions: selection(regions),
            };
            let filtered = apply_filters(&table, &selections).context("applying filters")?;

            // ─── 4) aggregate + render ───────────────────────────────
            let report = build_report(&table, &filtered, &cfg).context("building report")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Command::Overview { file, rows, json } => {
            let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let table = cache
                .get_or_load(&bytes)
                .with_context(|| format!("loading {}", file.display()))?;
            let overview = data_overview(&table, rows).context("building overview")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                print_overview(&overview);
            }
        }

        Command::Options { file, json } => {
            let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let table = cache
                .get_or_load(&bytes)
                .with_context(|| format!("loading {}", file.display()))?;
            let options = filter_options(&table);
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                print_options(&options);
            }
        }
    }

    info!("all done");
    Ok(())
}

/// No values on the command line means every observed value.
fn selection<T: Ord>(values: Vec<T>) -> Selection<T> {
    if values.is_empty() {
        Selection::All
    } else {
        Selection::only(values)
    }
}

fn money(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("${:.2}", v))
}

fn text(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| "n/a".to_string())
}

fn header(cols: &[&str]) -> Row {
    Row::new(cols.iter().map(|c| Cell::new(c).style_spec("bFg")).collect())
}

fn boxed() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table
}

fn print_ranked(title: &str, key_label: &str, rows: &[salesdash::aggregate::RankedTotal]) {
    let mut table = boxed();
    table.add_row(header(&[key_label, "Sales"]));
    for r in rows {
        table.add_row(Row::new(vec![
            Cell::new(&r.key),
            Cell::new(&format!("{:.2}", r.total)).style_spec("r"),
        ]));
    }
    println!("\n--- {} ---", title);
    table.printstd();
}

fn print_report(report: &DashboardReport) {
    println!(
        "Records shown: {} of {}",
        report.filtered_rows, report.total_rows
    );

    if let Some(k) = &report.kpis {
        let mut table = boxed();
        table.add_row(header(&[
            "Total Sales",
            "Average Sale",
            "Orders",
            "Top Category",
            "Top Region",
        ]));
        table.add_row(Row::new(vec![
            Cell::new(&money(Some(k.total_sales))).style_spec("r"),
            Cell::new(&money(k.average_sale)).style_spec("r"),
            Cell::new(&k.orders.to_string()).style_spec("r"),
            Cell::new(&text(&k.top_category)),
            Cell::new(&text(&k.top_region)),
        ]));
        println!("\n--- KPIs ---");
        table.printstd();
    }

    if let Some(series) = &report.sales_over_time {
        let mut table = boxed();
        table.add_row(header(&["Period Start", "Sales"]));
        for p in series {
            table.add_row(Row::new(vec![
                Cell::new(&p.start.to_string()),
                Cell::new(&format!("{:.2}", p.total)).style_spec("r"),
            ]));
        }
        println!("\n--- Sales Over Time ({}) ---", report.granularity);
        table.printstd();
    }

    if let Some(rows) = &report.category_sales {
        print_ranked("Sales by Category", "Category", rows);
    }
    if let Some(rows) = &report.top_subcategories {
        print_ranked("Top Subcategories", "Subcategory", rows);
    }

    if let Some(boxes) = &report.channel_distribution {
        let mut table = boxed();
        table.add_row(header(&["Channel", "Count", "Min", "Q1", "Median", "Q3", "Max"]));
        for b in boxes {
            table.add_row(Row::new(vec![
                Cell::new(&b.key),
                Cell::new(&b.count.to_string()).style_spec("r"),
                Cell::new(&format!("{:.2}", b.min)).style_spec("r"),
                Cell::new(&format!("{:.2}", b.q1)).style_spec("r"),
                Cell::new(&format!("{:.2}", b.median)).style_spec("r"),
                Cell::new(&format!("{:.2}", b.q3)).style_spec("r"),
                Cell::new(&format!("{:.2}", b.max)).style_spec("r"),
            ]));
        }
        println!("\n--- Sales Distribution by Channel ---");
        table.printstd();
    }

    if let Some(rows) = &report.region_sales {
        print_ranked("Sales by Region", "Country-Region", rows);
    }

    if let Some(cities) = &report.city_rollup {
        let mut table = boxed();
        table.add_row(header(&["Region", "City", "Total", "Orders", "Avg Sale"]));
        for c in cities {
            table.add_row(Row::new(vec![
                Cell::new(&c.region),
                Cell::new(&c.city),
                Cell::new(&format!("{:.2}", c.total)).style_spec("r"),
                Cell::new(&c.orders.to_string()).style_spec("r"),
                Cell::new(&money(c.average)).style_spec("r"),
            ]));
        }
        println!("\n--- Top Cities ---");
        table.printstd();
    }

    if let Some(rows) = &report.sales_by_month {
        print_ranked("Sales by Month", "Month", rows);
    }
    if let Some(rows) = &report.sales_by_weekday {
        print_ranked("Sales by Weekday", "Weekday", rows);
    }

    if let Some(i) = &report.insights {
        println!("\n--- Insights ---");
        println!("Best category:            {}", text(&i.top_category));
        println!("Best region:              {}", text(&i.top_region));
        println!("Best channel:             {}", text(&i.top_channel));
        match i.avg_monthly_growth_pct {
            Some(g) => println!("Avg monthly growth:       {:.1}%", g),
            None => println!("Avg monthly growth:       n/a"),
        }
        println!("Average ticket:           {}", money(i.average_ticket));
        println!("Median sale:              {}", money(i.median_sale));
    }
}

fn print_overview(ov: &DataOverview) {
    println!("Rows: {}", ov.rows);
    if let (Some(first), Some(last)) = (ov.first_date, ov.last_date) {
        println!("Dates: {} → {}", first, last);
    }

    let mut sample = boxed();
    sample.add_row(Row::new(
        ov.sample_header
            .iter()
            .map(|h| Cell::new(h).style_spec("bFg"))
            .collect(),
    ));
    for row in &ov.sample {
        sample.add_row(Row::new(row.iter().map(|v| Cell::new(v)).collect()));
    }
    println!("\n--- Sample ---");
    sample.printstd();

    if let Some(a) = &ov.amount {
        let fmt_opt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
        let mut table = boxed();
        table.add_row(header(&["Statistic", "Sales Amount"]));
        for (label, value) in [
            ("count", a.count.to_string()),
            ("mean", fmt_opt(a.mean)),
            ("std", fmt_opt(a.std)),
            ("min", fmt_opt(a.min)),
            ("25%", fmt_opt(a.q1)),
            ("50%", fmt_opt(a.median)),
            ("75%", fmt_opt(a.q3)),
            ("max", fmt_opt(a.max)),
        ] {
            table.add_row(Row::new(vec![
                Cell::new(label),
                Cell::new(&value).style_spec("r"),
            ]));
        }
        println!("\n--- Sales Amount Statistics ---");
        table.printstd();
    }

    let mut cols = boxed();
    cols.add_row(header(&["Column", "Type", "Unique", "Nulls", "Null %"]));
    for c in &ov.columns {
        cols.add_row(Row::new(vec![
            Cell::new(&c.name),
            Cell::new(&c.data_type),
            Cell::new(&c.unique.to_string()).style_spec("r"),
            Cell::new(&c.nulls.to_string()).style_spec("r"),
            Cell::new(
                &c.null_pct
                    .map_or_else(|| "n/a".to_string(), |p| format!("{:.1}%", p)),
            )
            .style_spec("r"),
        ]));
    }
    println!("\n--- Columns ---");
    cols.printstd();
}

fn print_options(options: &FilterOptions) {
    let years: Vec<String> = options.years.iter().map(i32::to_string).collect();
    println!("Years:       {}", years.join(", "));
    println!("Categories:  {}", options.categories.join(", "));
    println!("Channels:    {}", options.channels.join(", "));
    println!("Regions:     {}", options.regions.join(", "));
}
