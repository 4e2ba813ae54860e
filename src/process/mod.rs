pub mod calendar;
pub mod convert;
pub mod date_parser;
pub mod loader;
pub mod utils;

pub use loader::{load_sales_csv, load_sales_file};
