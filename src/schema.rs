//! Input column names and the declared layout of the report's columns.

use crate::error::{Error, Result};

pub const ORDER_ID: &str = "ORDER ID";
pub const ITEM_NUMBER: &str = "ITEM NUMBER";
pub const ITEM_QUANTITY: &str = "ITEM QUANTITY";
pub const ITEM_PRICE: &str = "ITEM PRICE";
pub const TOTAL_PRICE: &str = "TOTAL PRICE";
pub const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL";

/// Customer address columns, required in the input but never reported.
pub const GEOGRAPHY: [&str; 5] = ["ADDRESS", "CITY", "STATE", "POSTAL CODE", "COUNTRY"];

/// Every column the input header must contain.
pub const REQUIRED: [&str; 9] = [
    ORDER_ID,
    ITEM_NUMBER,
    ITEM_QUANTITY,
    ITEM_PRICE,
    "ADDRESS",
    "CITY",
    "STATE",
    "POSTAL CODE",
    "COUNTRY",
];

/// What a report column holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// An input column copied into the report unchanged. The index selects
    /// the cell from [`crate::SalesRecord::pass_through`].
    PassThrough(usize),
    ItemNumber,
    ItemQuantity,
    ItemPrice,
    TotalPrice,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputColumn {
    pub name: String,
    pub kind: Column,
}

/// The ordered list of report columns, derived once from the input header.
///
/// Input columns keep their left-to-right order, minus [`ORDER_ID`] and the
/// [`GEOGRAPHY`] columns. [`TOTAL_PRICE`] follows whichever of
/// [`ITEM_QUANTITY`] and [`ITEM_PRICE`] comes later in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<OutputColumn>,
    pass_through: Vec<usize>,
}

impl Schema {
    /// Builds the report layout for an input with the given `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] if any of [`REQUIRED`] is absent, and
    /// [`Error::ReservedColumn`] if the input already has a [`TOTAL_PRICE`]
    /// column.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let headers: Vec<&str> = headers.into_iter().collect();
        if let Some(missing) = REQUIRED.iter().find(|name| !headers.contains(*name)) {
            return Err(Error::MissingColumn((*missing).to_string()));
        }
        if headers.contains(&TOTAL_PRICE) {
            return Err(Error::ReservedColumn(TOTAL_PRICE.to_string()));
        }
        let total_after = headers
            .iter()
            .rposition(|h| *h == ITEM_QUANTITY || *h == ITEM_PRICE);

        let mut columns = Vec::with_capacity(headers.len());
        let mut pass_through = Vec::new();
        for (i, name) in headers.iter().enumerate() {
            let kind = match *name {
                ORDER_ID => None,
                n if GEOGRAPHY.contains(&n) => None,
                ITEM_NUMBER => Some(Column::ItemNumber),
                ITEM_QUANTITY => Some(Column::ItemQuantity),
                ITEM_PRICE => Some(Column::ItemPrice),
                _ => {
                    pass_through.push(i);
                    Some(Column::PassThrough(pass_through.len() - 1))
                }
            };
            if let Some(kind) = kind {
                columns.push(OutputColumn {
                    name: (*name).to_string(),
                    kind,
                });
            }
            if Some(i) == total_after {
                columns.push(OutputColumn {
                    name: TOTAL_PRICE.to_string(),
                    kind: Column::TotalPrice,
                });
            }
        }
        Ok(Self {
            columns,
            pass_through,
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    /// Returns the input field indexes of the pass-through columns, in order.
    #[must_use]
    pub fn pass_through_fields(&self) -> &[usize] {
        &self.pass_through
    }

    #[must_use]
    pub fn position(&self, kind: Column) -> Option<usize> {
        self.columns.iter().position(|c| c.kind == kind)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
