// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field, Schema};
use std::sync::Arc;

use super::columns::{self, DERIVED_COLUMNS};

/// Map a column of the sales upload to the Arrow DataType it holds once cleaned.
///
/// Covers:
/// - Date                        → Date32
/// - Sales Amount, Sales Order   → Float64
/// - Year, Month, Quarter        → Int32 (derived from Date)
/// - MonthName, DayOfWeek        → Utf8 (derived from Date)
/// - fallback                    → Utf8
pub fn map_to_arrow_type(name: &str) -> DataType {
    match name {
        columns::DATE => DataType::Date32,
        columns::SALES_AMOUNT | columns::SALES_ORDER => DataType::Float64,
        columns::YEAR | columns::MONTH | columns::QUARTER => DataType::Int32,
        _ => DataType::Utf8,
    }
}

/// Schema used to read the raw file: every column as nullable Utf8.
pub fn raw_string_schema(headers: &[String]) -> Arc<Schema> {
    let fields: Vec<Field> = headers
        .iter()
        .map(|n| Field::new(n, DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Where each output column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// Column `i` of the raw batch, converted by name.
    Raw(usize),
    /// Computed from `Date`.
    Derived(&'static str),
}

/// Build the cleaned table layout.
///
/// Raw columns keep their position. When `Date` is present, any raw column
/// named like a derived field is replaced in place, and derived fields the
/// file does not carry are appended in `DERIVED_COLUMNS` order.
pub fn build_output_layout(headers: &[String]) -> (Arc<Schema>, Vec<ColumnSource>) {
    let has_date = headers.iter().any(|h| h == columns::DATE);
    let mut fields = Vec::with_capacity(headers.len() + DERIVED_COLUMNS.len());
    let mut sources = Vec::with_capacity(fields.capacity());

    for (i, name) in headers.iter().enumerate() {
        match DERIVED_COLUMNS.iter().find(|d| **d == name.as_str()) {
            Some(derived) if has_date => {
                fields.push(Field::new(*derived, map_to_arrow_type(derived), true));
                sources.push(ColumnSource::Derived(derived));
            }
            // no Date to derive from: keep whatever the file says, as text
            Some(_) => {
                fields.push(Field::new(name, DataType::Utf8, true));
                sources.push(ColumnSource::Raw(i));
            }
            None => {
                fields.push(Field::new(name, map_to_arrow_type(name), true));
                sources.push(ColumnSource::Raw(i));
            }
        }
    }

    if has_date {
        for derived in DERIVED_COLUMNS {
            if !headers.iter().any(|h| h == derived) {
                fields.push(Field::new(derived, map_to_arrow_type(derived), true));
                sources.push(ColumnSource::Derived(derived));
            }
        }
    }

    (Arc::new(Schema::new(fields)), sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(schema: &Schema) -> Vec<String> {
        schema.fields().iter().map(|f| f.name().clone()).collect()
    }

    #[test]
    fn test_layout_replaces_year_and_month_in_place() {
        let headers: Vec<String> = ["Month", "Year", "Date", "Sales Amount", "Color"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (schema, sources) = build_output_layout(&headers);

        assert_eq!(
            names(&schema),
            vec![
                "Month",
                "Year",
                "Date",
                "Sales Amount",
                "Color",
                "MonthName",
                "Quarter",
                "DayOfWeek"
            ]
        );
        assert_eq!(sources[0], ColumnSource::Derived("Month"));
        assert_eq!(sources[2], ColumnSource::Raw(2));
        assert_eq!(schema.field(1).data_type(), &DataType::Int32);
        assert_eq!(schema.field(2).data_type(), &DataType::Date32);
        assert_eq!(schema.field(3).data_type(), &DataType::Float64);
        assert_eq!(schema.field(4).data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_layout_without_date_keeps_raw_year() {
        let headers: Vec<String> = vec!["Year".into(), "Category".into()];
        let (schema, sources) = build_output_layout(&headers);
        assert_eq!(names(&schema), vec!["Year", "Category"]);
        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert_eq!(sources, vec![ColumnSource::Raw(0), ColumnSource::Raw(1)]);
    }
}
