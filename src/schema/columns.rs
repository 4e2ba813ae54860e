// src/schema/columns.rs

use serde::{Deserialize, Serialize};

pub const WEEKDAY: &str = "WeekDay";
pub const DAY: &str = "Day";
pub const MONTH: &str = "Month";
pub const YEAR: &str = "Year";
pub const DATE: &str = "Date";
pub const SALES_AMOUNT: &str = "Sales Amount";
pub const SALES_ORDER: &str = "Sales Order";
pub const CHANNEL: &str = "Channel";
pub const PRODUCT: &str = "Product";
pub const MODEL: &str = "Model";
pub const COLOR: &str = "Color";
pub const SKU: &str = "SKU";
pub const CATEGORY: &str = "Category";
pub const SUBCATEGORY: &str = "Subcategory";
pub const COUNTRY_REGION: &str = "Country-Region";
pub const CITY: &str = "City";

pub const MONTH_NAME: &str = "MonthName";
pub const QUARTER: &str = "Quarter";
pub const DAY_OF_WEEK: &str = "DayOfWeek";

/// Column names the upload is expected to carry, in file order.
pub const EXPECTED_COLUMNS: [&str; 16] = [
    WEEKDAY,
    DAY,
    MONTH,
    YEAR,
    DATE,
    SALES_AMOUNT,
    SALES_ORDER,
    CHANNEL,
    PRODUCT,
    MODEL,
    COLOR,
    SKU,
    CATEGORY,
    SUBCATEGORY,
    COUNTRY_REGION,
    CITY,
];

/// Columns computed from `Date` at load time.
pub const DERIVED_COLUMNS: [&str; 5] = [YEAR, MONTH, MONTH_NAME, QUARTER, DAY_OF_WEEK];

/// Numeric columns coerced to f64.
pub const NUMERIC_COLUMNS: [&str; 2] = [SALES_AMOUNT, SALES_ORDER];

/// Categorical columns that get trimmed and null-token normalised.
pub const CATEGORICAL_COLUMNS: [&str; 5] = [CHANNEL, CATEGORY, SUBCATEGORY, COUNTRY_REGION, CITY];

/// A categorical field sales can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Channel,
    Category,
    Subcategory,
    Region,
    City,
}

impl Dimension {
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Channel => CHANNEL,
            Dimension::Category => CATEGORY,
            Dimension::Subcategory => SUBCATEGORY,
            Dimension::Region => COUNTRY_REGION,
            Dimension::City => CITY,
        }
    }
}

/// Expected columns absent from `headers` (case-sensitive).
pub fn missing_expected<S: AsRef<str>>(headers: &[S]) -> Vec<&'static str> {
    EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|want| !headers.iter().any(|h| h.as_ref() == *want))
        .collect()
}
