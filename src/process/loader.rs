use crate::error::LoadError;
use crate::process::convert::convert_to_final_types;
use crate::schema::{build_output_layout, missing_expected, raw_string_schema};
use crate::table::SalesTable;
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::{fs, io::Cursor, path::Path};
use tracing::{debug, info, warn};

/// Rows decoded per Arrow batch before the batches are concatenated.
const BATCH_SIZE: usize = 8192;

/// Parse an uploaded sales CSV into the cleaned table.
///
/// Fails only when the content is not tabular at all; individual cells
/// that do not coerce become nulls.
#[tracing::instrument(level = "info", skip(bytes), fields(len = bytes.len()))]
pub fn load_sales_csv(bytes: &[u8]) -> Result<SalesTable, LoadError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let headers = read_headers(text)?;
    let missing = missing_expected(&headers);
    if !missing.is_empty() {
        warn!(?missing, "expected columns absent; dependent aggregates unavailable");
    }

    let raw = csv_to_arrow_batch(text, &headers)?;
    debug!(rows = raw.num_rows(), cols = raw.num_columns(), "raw batch decoded");

    let (schema, sources) = build_output_layout(&headers);
    let batch = convert_to_final_types(&raw, &schema, &sources)?;
    log_null_counts(&batch);

    info!(rows = batch.num_rows(), cols = batch.num_columns(), "sales table loaded");
    Ok(SalesTable::new(batch))
}

/// Read and parse a sales CSV from disk.
pub fn load_sales_file(path: &Path) -> Result<SalesTable, LoadError> {
    let bytes = fs::read(path)?;
    load_sales_csv(&bytes)
}

fn read_headers(text: &str) -> Result<Vec<String>, LoadError> {
    if text.trim().is_empty() {
        return Err(LoadError::NoHeader);
    }
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(text.as_bytes()), Some(0))?;
    let headers: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoHeader);
    }
    Ok(headers)
}

fn csv_to_arrow_batch(text: &str, headers: &[String]) -> Result<RecordBatch, LoadError> {
    if let Some(line) = unterminated_quote(text) {
        warn!(line, "quoted field never closed");
        return Err(ArrowError::CsvError(format!(
            "EOF inside quoted field opened on line {line}"
        ))
        .into());
    }

    let schema = raw_string_schema(headers);
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .with_quote(b'"')
        .with_delimiter(b',')
        .with_truncated_rows(true)
        .build(Cursor::new(text.as_bytes()))?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            let lines: Vec<&str> = text.lines().take(3).collect();
            warn!("CSV parsing failed. First few lines: {:?}", lines);
            e
        })?;

    Ok(concat_batches(&schema, &batches)?)
}

/// Line (1-based) of a quoted field still open at end of input.
///
/// A quote opens a field only at field start; `""` inside it is an escape.
fn unterminated_quote(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut line = 1;
    let mut opened_on = None;
    let mut field_start = true;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if opened_on.is_some() {
            if b == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 1;
                } else {
                    opened_on = None;
                }
            }
        } else if b == b'"' && field_start {
            opened_on = Some(line);
        }
        if b == b'\n' {
            line += 1;
        }
        field_start = opened_on.is_none() && matches!(b, b',' | b'\n' | b'\r');
        i += 1;
    }
    opened_on
}

fn log_null_counts(batch: &RecordBatch) {
    for (field, col) in batch.schema().fields().iter().zip(batch.columns()) {
        let nulls = col.null_count();
        if nulls > 0 {
            debug!(column = %field.name(), nulls, "null cells after cleaning");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::columns;
    use arrow::array::Array;
    use chrono::{Datelike, NaiveDate};
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,salesdash::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const SAMPLE: &str = "\
WeekDay,Day,Month,Year,Date,Sales Amount,Sales Order,Channel,Product,Model,Color,SKU,Category,Subcategory,Country-Region,City
Friday,5,1,2024,2024-01-05,100,1,Internet,Road-150,Road-150,Red,BK-R93R-62,Bikes,Road Bikes,United States,Seattle
Saturday,20,1,2024,2024-01-20,N/A,2,Reseller,Helmet,Sport-100,Blue,HL-U509,Accessories,Helmets,Canada,Toronto
Thursday,1,2,2024,not-a-date,200,x,Internet,Jersey,LS,Black,LJ-0192,Clothing,Jerseys,France,Paris
";

    #[test]
    fn test_load_sample() -> anyhow::Result<()> {
        init_test_logging();
        let table = load_sales_csv(SAMPLE.as_bytes())?;

        assert_eq!(table.num_rows(), 3);
        for col in columns::EXPECTED_COLUMNS {
            assert!(table.column_names().iter().any(|c| c == col), "missing {col}");
        }
        assert!(table.column_names().iter().any(|c| c == columns::DAY_OF_WEEK));

        let amounts = table.amounts().unwrap();
        assert_eq!(amounts.value(0), 100.0);
        assert!(amounts.is_null(1));

        let orders = table.orders().unwrap();
        assert!(orders.is_null(2));

        // Year always follows Date; the file's own Year is replaced
        let years = table.years().unwrap();
        for i in 0..table.num_rows() {
            match table.date_at(i) {
                Some(d) => assert_eq!(years.value(i), d.year()),
                None => assert!(years.is_null(i)),
            }
        }
        assert_eq!(
            table.date_at(0),
            Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
        Ok(())
    }

    #[test]
    fn test_unknown_columns_kept_and_missing_tolerated() -> anyhow::Result<()> {
        let csv = "Date,Sales Amount,Promo Code\n2024-03-01,10,SPRING\n";
        let table = load_sales_csv(csv.as_bytes())?;
        assert_eq!(table.num_rows(), 1);
        let promo = table.text("Promo Code").unwrap();
        assert_eq!(promo.value(0), "SPRING");
        assert!(table.dimension(crate::schema::Dimension::Category).is_none());
        Ok(())
    }

    #[test]
    fn test_header_only_gives_empty_table() -> anyhow::Result<()> {
        let table = load_sales_csv(b"Date,Sales Amount,Category\n")?;
        assert!(table.is_empty());
        assert!(table.amounts().is_some());
        Ok(())
    }

    #[test]
    fn test_load_failures() {
        assert!(matches!(load_sales_csv(b""), Err(LoadError::NoHeader)));
        assert!(matches!(
            load_sales_csv(&[0xff, 0xfe, 0x00, 0x41]),
            Err(LoadError::Encoding(_))
        ));
        let ragged = "Date,Sales Amount\n2024-01-01,1,extra,fields\n";
        assert!(matches!(
            load_sales_csv(ragged.as_bytes()),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            load_sales_csv(b"a\n\"unterminated\n"),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn test_quoted_fields_accepted() -> anyhow::Result<()> {
        let csv = "Date,Sales Amount,City\n2024-01-01,10,\"Paris, \"\"Centre\"\"\"\n2024-01-02,5,12\" Ave\n";
        let table = load_sales_csv(csv.as_bytes())?;
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.text("City").unwrap().value(0), "Paris, \"Centre\"");
        Ok(())
    }

    #[test]
    fn test_unterminated_quote_line() {
        assert_eq!(unterminated_quote("a,b\n1,\"x\n2\n"), Some(2));
        assert_eq!(unterminated_quote("a,b\n1,\"x\"\"y\"\n"), None);
        assert_eq!(unterminated_quote("a,b\n1,5\" screen\n"), None);
    }

    #[test]
    fn test_load_sales_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(SAMPLE.as_bytes())?;
        let table = load_sales_file(file.path())?;
        assert_eq!(table.num_rows(), 3);
        Ok(())
    }
}
