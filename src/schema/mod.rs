pub mod arrow;
pub mod columns;

pub use self::arrow::{build_output_layout, map_to_arrow_type, raw_string_schema, ColumnSource};
pub use self::columns::{missing_expected, Dimension};
