use crate::error::AggregateError;
use crate::process::date_parser;
use crate::schema::{columns, Dimension};
use arrow::{
    array::{Array, Date32Array, Float64Array, Int32Array, StringArray},
    datatypes::SchemaRef,
    record_batch::RecordBatch,
};
use chrono::NaiveDate;

/// The cleaned sales records of one upload, held as a single Arrow batch.
///
/// Typed accessors return `None` when the column is absent or was not
/// converted (e.g. `Year` in a file without `Date`).
#[derive(Debug, Clone)]
pub struct SalesTable {
    batch: RecordBatch,
}

impl SalesTable {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    fn typed<A: Array + 'static>(&self, name: &str) -> Option<&A> {
        let idx = self.batch.schema().index_of(name).ok()?;
        self.batch.column(idx).as_any().downcast_ref::<A>()
    }

    pub fn dates(&self) -> Option<&Date32Array> {
        self.typed(columns::DATE)
    }

    pub fn amounts(&self) -> Option<&Float64Array> {
        self.typed(columns::SALES_AMOUNT)
    }

    pub fn orders(&self) -> Option<&Float64Array> {
        self.typed(columns::SALES_ORDER)
    }

    pub fn years(&self) -> Option<&Int32Array> {
        self.typed(columns::YEAR)
    }

    pub fn text(&self, name: &str) -> Option<&StringArray> {
        self.typed(name)
    }

    pub fn dimension(&self, dim: Dimension) -> Option<&StringArray> {
        self.text(dim.column())
    }

    /// Date of row `i`, or `None` if null.
    pub fn date_at(&self, i: usize) -> Option<NaiveDate> {
        let dates = self.dates()?;
        if dates.is_null(i) {
            return None;
        }
        date_parser::from_date32(dates.value(i))
    }

    pub(crate) fn require_amounts(&self) -> Result<&Float64Array, AggregateError> {
        self.amounts()
            .ok_or(AggregateError::MissingColumn(columns::SALES_AMOUNT))
    }

    pub(crate) fn require_dates(&self) -> Result<&Date32Array, AggregateError> {
        self.dates().ok_or(AggregateError::MissingColumn(columns::DATE))
    }

    pub(crate) fn require_text(&self, name: &'static str) -> Result<&StringArray, AggregateError> {
        self.text(name).ok_or(AggregateError::MissingColumn(name))
    }
}

/// Row-wise date values, `None` for nulls.
pub(crate) fn date_values(arr: &Date32Array) -> impl Iterator<Item = Option<NaiveDate>> + '_ {
    arr.iter()
        .map(|opt| opt.and_then(date_parser::from_date32))
}
