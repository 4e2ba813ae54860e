pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod insights;
pub mod overview;
pub mod process;
pub mod report;
pub mod schema;
pub mod table;

pub use cache::TableCache;
pub use config::DashboardConfig;
pub use error::{AggregateError, ConfigError, FilterError, LoadError, ReportError};
pub use filter::{apply_filters, filter_options, FilterOptions, Selection, Selections};
pub use process::{load_sales_csv, load_sales_file};
pub use report::{build_report, DashboardReport};
pub use table::SalesTable;
