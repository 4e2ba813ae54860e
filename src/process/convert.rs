use crate::process::calendar::CalendarFields;
use crate::process::{date_parser, utils};
use crate::schema::{columns, ColumnSource};
use arrow::{
    array::{
        Array, ArrayRef, Date32Builder, Float64Builder, Int32Builder, StringArray,
        StringBuilder,
    },
    datatypes::{DataType, SchemaRef},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchOptions},
};
use chrono::NaiveDate;
use std::sync::Arc;

/// Convert the all-Utf8 raw batch into the cleaned, typed sales table.
///
/// Cells that fail coercion become null; nothing here fails on cell content.
pub fn convert_to_final_types(
    raw: &RecordBatch,
    schema: &SchemaRef,
    sources: &[ColumnSource],
) -> Result<RecordBatch, ArrowError> {
    let dates = parse_date_column(raw);
    let mut out: Vec<ArrayRef> = Vec::with_capacity(sources.len());

    for (src, fld) in sources.iter().zip(schema.fields()) {
        let col = match *src {
            ColumnSource::Derived(name) => derive_column(name, &dates),
            ColumnSource::Raw(i) => {
                let arr = raw.column(i);
                match (arr.as_any().downcast_ref::<StringArray>(), fld.data_type()) {
                    // Date → Date32
                    (Some(_), DataType::Date32) => {
                        let mut b = Date32Builder::with_capacity(dates.len());
                        for d in &dates {
                            b.append_option(d.map(date_parser::to_date32));
                        }
                        Arc::new(b.finish()) as ArrayRef
                    }

                    // Numeric → f64
                    (Some(sarr), DataType::Float64) => {
                        let mut b = Float64Builder::with_capacity(sarr.len());
                        for opt in sarr.iter() {
                            b.append_option(opt.and_then(utils::parse_number));
                        }
                        Arc::new(b.finish()) as ArrayRef
                    }

                    // Categorical → trimmed, null tokens removed
                    (Some(sarr), DataType::Utf8)
                        if columns::CATEGORICAL_COLUMNS.contains(&fld.name().as_str()) =>
                    {
                        let cleaned: StringArray =
                            sarr.iter().map(|opt| opt.and_then(utils::clean_cell)).collect();
                        Arc::new(cleaned) as ArrayRef
                    }

                    // Everything else passes through
                    _ => arr.clone(),
                }
            }
        };
        out.push(col);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(raw.num_rows()));
    RecordBatch::try_new_with_options(schema.clone(), out, &options)
}

/// Parse the raw `Date` column once; all-null if the file has none.
fn parse_date_column(raw: &RecordBatch) -> Vec<Option<NaiveDate>> {
    let schema = raw.schema();
    let Ok(idx) = schema.index_of(columns::DATE) else {
        return vec![None; raw.num_rows()];
    };
    match raw.column(idx).as_any().downcast_ref::<StringArray>() {
        Some(sarr) => sarr
            .iter()
            .map(|opt| opt.and_then(date_parser::parse_date))
            .collect(),
        None => vec![None; raw.num_rows()],
    }
}

fn derive_column(name: &str, dates: &[Option<NaiveDate>]) -> ArrayRef {
    let fields: Vec<Option<CalendarFields>> = dates
        .iter()
        .map(|d| d.map(CalendarFields::from_date))
        .collect();

    match name {
        columns::YEAR | columns::MONTH | columns::QUARTER => {
            let mut b = Int32Builder::with_capacity(fields.len());
            for f in &fields {
                b.append_option(f.map(|f| match name {
                    columns::YEAR => f.year,
                    columns::MONTH => f.month as i32,
                    _ => f.quarter as i32,
                }));
            }
            Arc::new(b.finish())
        }
        _ => {
            let mut b = StringBuilder::with_capacity(fields.len(), fields.len() * 9);
            for f in &fields {
                b.append_option(f.map(|f| {
                    if name == columns::MONTH_NAME {
                        f.month_name
                    } else {
                        f.day_of_week
                    }
                }));
            }
            Arc::new(b.finish())
        }
    }
}
