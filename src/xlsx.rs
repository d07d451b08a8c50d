//! Spreadsheet rendering of a [`Report`].

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

use crate::{
    error::Result,
    report::{Cell, Report},
};

pub const SHEET_NAME: &str = "Sales Info";
pub const CURRENCY_FORMAT: &str = "$#,##0.00";

/// Extra characters added to each fitted column width.
const WIDTH_PADDING: usize = 2;

/// Renders `report` as an `.xlsx` workbook with a single "Sales Info" sheet,
/// returning the file contents.
///
/// The sheet holds a bold header row, the report rows, and the grand total
/// line. Money cells use the [`CURRENCY_FORMAT`] number format, and every
/// column is as wide as its widest displayed value.
///
/// # Errors
///
/// Returns any error from building the workbook, for example if the report
/// exceeds the worksheet's row limit.
pub fn render(report: &Report) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    let currency = Format::new().set_num_format(CURRENCY_FORMAT);

    for (col, name) in report.schema().names().enumerate() {
        sheet.write_string_with_format(0, col_num(col), name, &bold)?;
    }

    let table = report.table();
    for (i, line) in table.iter().enumerate() {
        let row = RowNum::try_from(i + 1).unwrap_or(RowNum::MAX);
        for (col, cell) in line.iter().enumerate() {
            let col = col_num(col);
            match cell {
                Cell::Blank => {}
                Cell::Text(s) => {
                    sheet.write_string(row, col, *s)?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                Cell::Money(usd) => {
                    sheet.write_number_with_format(row, col, usd.to_f64(), &currency)?;
                }
            }
        }
    }

    let headers: Vec<&str> = report.schema().names().collect();
    for (col, width) in column_widths(&headers, &table).into_iter().enumerate() {
        let width = u32::try_from(width + WIDTH_PADDING).unwrap_or(u32::MAX);
        sheet.set_column_width(col_num(col), f64::from(width))?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Returns, for each column, the character width of its widest displayed
/// value, header included.
#[must_use]
pub fn column_widths(headers: &[&str], table: &[Vec<Cell<'_>>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for line in table {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.width());
        }
    }
    widths
}

/// Out-of-range columns saturate, so the writer reports the limit error.
fn col_num(col: usize) -> ColNum {
    ColNum::try_from(col).unwrap_or(ColNum::MAX)
}

#[cfg(test)]
mod tests {
    use calamine::{Data, Reader, Xlsx};

    use std::io::Cursor;

    use super::*;
    use crate::SalesLog;

    const BIG_ORDER: &str = "\
ORDER ID,ITEM NUMBER,ITEM QUANTITY,ITEM PRICE,ADDRESS,CITY,STATE,POSTAL CODE,COUNTRY
1,7,10,123456.78,1 Main St,Springfield,IL,62701,USA
";

    fn read_back(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        Xlsx::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn column_widths_fn_fits_currency_rendered_grand_total() {
        let log = SalesLog::from_reader(BIG_ORDER.as_bytes()).unwrap();
        let report = Report::from_log(log).unwrap();
        let headers: Vec<&str> = report.schema().names().collect();
        let widths = column_widths(&headers, &report.table());
        // "ITEM NUMBER", "ITEM QUANTITY", "$123,456.78", "$1,234,567.80"
        assert_eq!(widths, vec![11, 13, 11, 13]);
    }

    #[test]
    fn render_fn_writes_single_sales_info_sheet() {
        let report = Report::read_csv("testdata/sales.csv").unwrap();
        let mut workbook = read_back(render(&report).unwrap());
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.height(), 6, "header, four orders, grand total");
        assert_eq!(range.width(), 10);
        assert_eq!(range.get((0, 6)), Some(&Data::String("TOTAL PRICE".into())));
        assert_eq!(range.get((1, 1)), Some(&Data::Float(1.0)));
        assert_eq!(range.get((1, 6)), Some(&Data::Float(6.0)));
        assert_eq!(range.get((4, 1)), Some(&Data::Float(12.0)));
        assert_eq!(range.get((5, 5)), Some(&Data::String("GRAND TOTAL".into())));
        assert_eq!(range.get((5, 6)), Some(&Data::Float(38940.75)));
        assert_eq!(range.get((5, 0)), Some(&Data::Empty));
    }

    #[test]
    fn render_fn_never_writes_dropped_columns() {
        let report = Report::read_csv("testdata/sales.csv").unwrap();
        let mut workbook = read_back(render(&report).unwrap());
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let header: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        for dropped in ["ORDER ID", "ADDRESS", "CITY", "STATE", "POSTAL CODE", "COUNTRY"] {
            assert!(!header.iter().any(|h| h == dropped), "{dropped} written");
        }
    }

    #[test]
    fn render_fn_writes_header_and_zero_total_for_empty_report() {
        let report = Report::read_csv("testdata/empty.csv").unwrap();
        let mut workbook = read_back(render(&report).unwrap());
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.height(), 2);
        assert_eq!(range.get((1, 5)), Some(&Data::String("GRAND TOTAL".into())));
        assert_eq!(range.get((1, 6)), Some(&Data::Float(0.0)));
    }
}
