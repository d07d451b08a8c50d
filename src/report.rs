use tracing::debug;

use std::{collections::HashSet, path::Path};

use crate::{
    error::{Error, Result},
    record::{ItemNumber, SalesLog, SalesRecord},
    schema::{Column, Schema, GRAND_TOTAL_LABEL},
    usd::Usd,
};

/// Holds the per-order report built from a sales log.
///
/// To build a `Report` from a CSV file, use [`Report::read_csv`]. To build
/// one from an already loaded log, use [`Report::from_log`].
///
/// The report has one row per distinct order, sorted by item number, and a
/// grand total of the rows' total prices. To write it as a spreadsheet, use
/// [`crate::xlsx::render`].
#[derive(Debug)]
pub struct Report {
    schema: Schema,
    rows: Vec<OrderReportRow>,
    grand_total: Usd,
}

impl Report {
    /// Reads sales data from the CSV file at `path` and builds the report.
    ///
    /// # Errors
    ///
    /// Returns any errors from [`SalesLog::read_csv`].
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_log(SalesLog::read_csv(path)?)
    }

    /// Builds the report from an already loaded sales log.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmountOutOfRange`] if a total price, or the grand
    /// total, is too large to represent.
    pub fn from_log(log: SalesLog) -> Result<Self> {
        let SalesLog { schema, records } = log;
        let read = records.len();
        let rows = first_per_order(records)
            .into_iter()
            .map(OrderReportRow::try_from)
            .collect::<Result<Vec<_>>>()?;
        let rows = sort_by_item_number(rows);
        let grand_total = grand_total(&rows)?;
        debug!(read, orders = rows.len(), %grand_total, "built order report");
        Ok(Self {
            schema,
            rows,
            grand_total,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn rows(&self) -> &[OrderReportRow] {
        &self.rows
    }

    #[must_use]
    pub fn grand_total(&self) -> Usd {
        self.grand_total
    }

    /// Returns the report's cells below the header: one line per order row,
    /// then the grand total line. Every line has one cell per schema column.
    ///
    /// The grand total line is blank except for [`GRAND_TOTAL_LABEL`] in the
    /// column before `TOTAL PRICE`, and the grand total itself.
    #[must_use]
    pub fn table(&self) -> Vec<Vec<Cell<'_>>> {
        let columns = self.schema.columns();
        let mut table: Vec<Vec<Cell<'_>>> = self
            .rows
            .iter()
            .map(|row| columns.iter().map(|c| row.cell(c.kind)).collect())
            .collect();
        let mut total_line = vec![Cell::Blank; columns.len()];
        if let Some(pos) = self.schema.position(Column::TotalPrice) {
            total_line[pos] = Cell::Money(self.grand_total);
            if pos > 0 {
                total_line[pos - 1] = Cell::Text(GRAND_TOTAL_LABEL);
            }
        }
        table.push(total_line);
        table
    }
}

/// One order in the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderReportRow {
    pub item_number: ItemNumber,
    pub qty: u32,
    pub price: Usd,
    pub total_price: Usd,
    pub pass_through: Vec<String>,
}

impl OrderReportRow {
    fn cell(&self, column: Column) -> Cell<'_> {
        match column {
            Column::PassThrough(i) => Cell::parse(self.pass_through.get(i).map_or("", String::as_str)),
            #[allow(clippy::cast_precision_loss)]
            Column::ItemNumber => match &self.item_number {
                ItemNumber::Numeric(n) => Cell::Number(*n as f64),
                ItemNumber::Text(s) => Cell::Text(s),
            },
            Column::ItemQuantity => Cell::Number(f64::from(self.qty)),
            Column::ItemPrice => Cell::Money(self.price),
            Column::TotalPrice => Cell::Money(self.total_price),
        }
    }
}

/// Drops the order identifier and computes the line's total price.
impl TryFrom<SalesRecord> for OrderReportRow {
    type Error = Error;

    fn try_from(record: SalesRecord) -> Result<Self> {
        let total_price = record.price.checked_mul(record.qty).ok_or_else(|| {
            Error::AmountOutOfRange(format!("line {}: total price", record.line))
        })?;
        Ok(Self {
            total_price,
            item_number: record.item_number,
            qty: record.qty,
            price: record.price,
            pass_through: record.pass_through,
        })
    }
}

/// A single spreadsheet cell value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell<'a> {
    Blank,
    Text(&'a str),
    Number(f64),
    Money(Usd),
}

impl<'a> Cell<'a> {
    /// Interprets a copied-through input field: empty is blank, a finite
    /// number is a number, anything else is text.
    #[must_use]
    pub fn parse(text: &'a str) -> Self {
        if text.is_empty() {
            return Self::Blank;
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(text),
        }
    }

    /// Returns the number of characters the cell takes when displayed.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::Blank => 0,
            Self::Text(s) => s.chars().count(),
            Self::Number(n) => n.to_string().len(),
            Self::Money(usd) => usd.to_string().len(),
        }
    }
}

/// Keeps the first record seen for each order identifier, in input order.
#[must_use]
pub fn first_per_order(records: Vec<SalesRecord>) -> Vec<SalesRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.order_id.clone()))
        .collect()
}

/// Sorts rows by item number, ascending. Rows with equal item numbers keep
/// their relative order.
#[must_use]
pub fn sort_by_item_number(mut rows: Vec<OrderReportRow>) -> Vec<OrderReportRow> {
    rows.sort_by(|a, b| a.item_number.cmp(&b.item_number));
    rows
}

/// Sums the rows' total prices.
///
/// # Errors
///
/// Returns [`Error::AmountOutOfRange`] if the sum is too large to represent.
pub fn grand_total(rows: &[OrderReportRow]) -> Result<Usd> {
    rows.iter()
        .try_fold(Usd::default(), |total, row| total.checked_add(row.total_price))
        .ok_or_else(|| Error::AmountOutOfRange("grand total".to_string()))
}
