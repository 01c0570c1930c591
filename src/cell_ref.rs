//! Spreadsheet-style labels for columns, rows and cells.

use crate::types::CellPos;

/// Convert a 0-based column index to column letters (A, B, ..., Z, AA, AB, ...).
pub fn column_label(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1; // Convert to 1-based
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + offset));
        n /= 26;
    }
    result
}

/// 1-based row number as shown in the row index strip.
pub fn row_label(row: u32) -> String {
    (u64::from(row) + 1).to_string()
}

/// Label like "B3" for a cell.
pub fn cell_label(pos: CellPos) -> String {
    format!("{}{}", column_label(pos.col), row_label(pos.row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(499), "SF");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn cell_and_row_labels() {
        assert_eq!(row_label(0), "1");
        assert_eq!(cell_label(CellPos::new(2, 1)), "B3");
        assert_eq!(cell_label(CellPos::new(99_999, 26)), "AA100000");
    }
}
