use serde::Deserialize;
use serde_with::DeserializeFromStr;
use tracing::debug;

use std::{
    convert::Infallible,
    fmt::Display,
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
    str::FromStr,
};

use crate::{
    error::{Error, Result},
    schema::{Schema, ITEM_PRICE},
    usd::Usd,
};

/// Identifies the item sold on a line of the sales log.
///
/// Item numbers that parse as integers sort numerically, before any textual
/// item numbers, which sort lexicographically.
#[derive(Clone, Debug, DeserializeFromStr, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ItemNumber {
    Numeric(i64),
    Text(String),
}

impl FromStr for ItemNumber {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.parse().map_or_else(|_| Self::Text(s.to_string()), Self::Numeric))
    }
}

impl Display for ItemNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The typed fields of a sales log row. Other columns are ignored here.
#[derive(Debug, Deserialize)]
struct Fields {
    #[serde(rename = "ORDER ID")]
    order_id: String,
    #[serde(rename = "ITEM NUMBER")]
    item_number: ItemNumber,
    #[serde(rename = "ITEM QUANTITY")]
    qty: u32,
    #[serde(rename = "ITEM PRICE")]
    price: Usd,
}

/// One line of the sales log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SalesRecord {
    /// Line of the input file the record was read from.
    pub line: u64,
    pub order_id: String,
    pub item_number: ItemNumber,
    pub qty: u32,
    pub price: Usd,
    /// Cells of the columns copied through to the report, in the order given
    /// by [`Schema::pass_through_fields`].
    pub pass_through: Vec<String>,
}

impl SalesRecord {
    fn from_row(
        row: &csv::StringRecord,
        headers: &csv::StringRecord,
        schema: &Schema,
    ) -> Result<Self> {
        let fields: Fields = row
            .deserialize(Some(headers))
            .map_err(|e| invalid_value(e, row, headers))?;
        let pass_through = schema
            .pass_through_fields()
            .iter()
            .map(|&i| row.get(i).unwrap_or_default().to_string())
            .collect();
        Ok(Self {
            line: row.position().map_or(0, csv::Position::line),
            order_id: fields.order_id,
            item_number: fields.item_number,
            qty: fields.qty,
            price: fields.price,
            pass_through,
        })
    }
}

/// Turns a field deserialization failure into an [`Error::InvalidValue`]
/// naming the offending line and column.
fn invalid_value(e: csv::Error, row: &csv::StringRecord, headers: &csv::StringRecord) -> Error {
    if let csv::ErrorKind::Deserialize { err, .. } = e.kind() {
        // errors raised by `FromStr` fields carry no field index
        let field = err
            .field()
            .and_then(|f| usize::try_from(f).ok())
            .or_else(|| {
                headers
                    .iter()
                    .position(|h| h == ITEM_PRICE)
                    .filter(|&i| row.get(i).unwrap_or_default().parse::<Usd>().is_err())
            });
        if let Some(field) = field {
            return Error::InvalidValue {
                line: row.position().map_or(0, csv::Position::line),
                column: headers.get(field).unwrap_or_default().to_string(),
                value: row.get(field).unwrap_or_default().to_string(),
                reason: err.kind().to_string(),
            };
        }
    }
    Error::Csv(e)
}

/// A validated sales log: the report layout implied by its header, and every
/// row in input order.
#[derive(Debug)]
pub struct SalesLog {
    pub schema: Schema,
    pub records: Vec<SalesRecord>,
}

impl SalesLog {
    /// Reads the sales log CSV file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputUnreadable`] if the file cannot be opened or
    /// read, and any other error from [`Self::from_reader`].
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        // a directory opens fine on Unix but fails on the first read
        let log = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            Error::Csv(err) if err.is_io_error() => Error::InputUnreadable {
                path: path.to_path_buf(),
                source: io::Error::from(err),
            },
            other => other,
        })?;
        debug!(path = %path.display(), records = log.records.len(), "read sales data");
        Ok(log)
    }

    /// Reads a sales log in CSV format, with a header row, from `rdr`.
    ///
    /// Leading and trailing whitespace is trimmed from every field.
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// * A required column is missing from the header
    /// * An `ITEM QUANTITY` or `ITEM PRICE` value is not numeric
    /// * The CSV data is malformed, for example a row with too many fields
    pub fn from_reader(rdr: impl Read) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let headers = rdr.headers()?.clone();
        let schema = Schema::from_headers(headers.iter())?;
        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            records.push(SalesRecord::from_row(&row, &headers, &schema)?);
        }
        Ok(Self { schema, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ORDER ID,ITEM NUMBER,ITEM QUANTITY,ITEM PRICE,ADDRESS,CITY,STATE,POSTAL CODE,COUNTRY,NOTES\n";

    #[test]
    fn read_csv_fn_correctly_parses_sales_data() {
        let log = SalesLog::read_csv("testdata/sales.csv").unwrap();
        assert_eq!(log.records.len(), 6, "wrong record count");
        let first = &log.records[0];
        assert_eq!(first.order_id, "10100");
        assert_eq!(first.item_number, ItemNumber::Numeric(5));
        assert_eq!(first.qty, 2);
        assert_eq!(first.price, Usd::from_cents(300));
        assert_eq!(
            first.pass_through,
            vec![
                "2024-01-06",
                "Vintage Cars",
                "S18_1749",
                "Shipped",
                "Online Diecast Creations Co.",
                "6035558647",
            ]
        );
        assert_eq!(log.records[4].price, Usd::from_cents(129_999));
    }

    #[test]
    fn read_csv_fn_returns_error_for_missing_file() {
        let err = SalesLog::read_csv("testdata/bogus.csv").unwrap_err();
        assert!(matches!(err, Error::InputUnreadable { .. }));
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn read_csv_fn_returns_unreadable_error_for_directory() {
        let err = SalesLog::read_csv("testdata").unwrap_err();
        assert!(matches!(err, Error::InputUnreadable { .. }), "{err:?}");
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn read_csv_fn_returns_error_for_missing_price_column() {
        let err = SalesLog::read_csv("testdata/missing_price.csv").unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref name) if name == "ITEM PRICE"));
    }

    #[test]
    fn read_csv_fn_reports_line_and_column_of_non_numeric_quantity() {
        let err = SalesLog::read_csv("testdata/bad_quantity.csv").unwrap_err();
        match err {
            Error::InvalidValue {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "ITEM QUANTITY");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_reader_fn_rejects_non_numeric_price() {
        let data = format!("{HEADER}1,5,2,free,a,b,c,d,e,\n");
        let err = SalesLog::from_reader(data.as_bytes()).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(err, Error::InvalidValue { ref column, .. } if column == "ITEM PRICE"));
    }

    #[test]
    fn from_reader_fn_accepts_price_with_fractions_of_a_cent() {
        let data = format!("{HEADER}1,5,2,3.999,a,b,c,d,e,\n");
        let log = SalesLog::from_reader(data.as_bytes()).unwrap();
        assert_eq!(log.records[0].price.amount(), rust_decimal_macros::dec!(3.999));
    }

    #[test]
    fn from_reader_fn_trims_fields() {
        let data = format!("{HEADER} 7 , A-12 , 3 , 1.25 ,a,b,c,d,e, gift \n");
        let log = SalesLog::from_reader(data.as_bytes()).unwrap();
        let record = &log.records[0];
        assert_eq!(record.order_id, "7");
        assert_eq!(record.item_number, ItemNumber::Text("A-12".into()));
        assert_eq!(record.qty, 3);
        assert_eq!(record.pass_through, vec!["gift"]);
    }

    #[test]
    fn from_reader_fn_accepts_header_only_input() {
        let log = SalesLog::from_reader(HEADER.as_bytes()).unwrap();
        assert!(log.records.is_empty());
        assert!(log.schema.names().any(|n| n == "TOTAL PRICE"));
    }

    #[test]
    fn item_numbers_sort_numerically_before_text() {
        let mut items: Vec<ItemNumber> = ["10", "B2", "2", "A1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        items.sort();
        assert_eq!(
            items.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["2", "10", "A1", "B2"]
        );
    }
}
