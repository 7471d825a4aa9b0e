// ===============================
// src/a1.rs
// ===============================
//
// A1 notation helpers:
// - column index (0-based) <-> column letters (A, B, ..., Z, AA, ...)
// - sheet name quoting: 'Inventario'!A1:F6  (single quote di-escape jadi '')
// - parse awal range ("A1:F6", "A:G", "B2") untuk tahu kolom & baris pertama
//

/// 0-based column index to letters. 0 -> "A", 25 -> "Z", 26 -> "AA".
pub fn column_letters(mut idx: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Letters to 0-based column index. Case-insensitive; `None` for empty or non-letters.
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let v = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(v)?;
    }
    Some(acc - 1)
}

/// `'Sheet'!span`
pub fn qualified(sheet: &str, span: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), span)
}

/// Single cell, e.g. `'Inventario'!B3`.
pub fn cell(sheet: &str, col: usize, row: u32) -> String {
    qualified(sheet, &format!("{}{}", column_letters(col), row))
}

/// Full row span, e.g. `'Ventas'!A4:G4`.
pub fn row_span(sheet: &str, first_col: usize, last_col: usize, first_row: u32, last_row: u32) -> String {
    qualified(
        sheet,
        &format!(
            "{}{}:{}{}",
            column_letters(first_col),
            first_row,
            column_letters(last_col),
            last_row
        ),
    )
}

/// Top-left corner of a span like `A1:F6`, `A:G` or `C2`.
/// Missing row (whole-column span) means row 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub col: usize,
    pub row: u32,
}

pub fn origin(span: &str) -> Option<Origin> {
    let first = span.split(':').next()?.trim();
    let split = first
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(first.len());
    let (letters, digits) = first.split_at(split);
    let col = column_index(letters)?;
    let row = if digits.is_empty() {
        1
    } else {
        digits.parse::<u32>().ok().filter(|r| *r > 0)?
    };
    Some(Origin { col, row })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_both_ways() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(6), "G");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");

        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("b"), Some(1));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("ZZ"), Some(701));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
    }

    #[test]
    fn ranges_are_quoted() {
        assert_eq!(qualified("Inventario", "A1:F6"), "'Inventario'!A1:F6");
        assert_eq!(qualified("Bob's", "A:A"), "'Bob''s'!A:A");
        assert_eq!(cell("Inventario", 1, 3), "'Inventario'!B3");
        assert_eq!(row_span("Ventas", 0, 6, 4, 4), "'Ventas'!A4:G4");
    }

    #[test]
    fn origin_of_span() {
        assert_eq!(origin("A1:F6"), Some(Origin { col: 0, row: 1 }));
        assert_eq!(origin("A:G"), Some(Origin { col: 0, row: 1 }));
        assert_eq!(origin("c2:d9"), Some(Origin { col: 2, row: 2 }));
        assert_eq!(origin("A0:B2"), None);
        assert_eq!(origin("12"), None);
    }
}
