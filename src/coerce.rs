// ===============================
// src/coerce.rs
// ===============================
//
// Konversi sel (string) -> tipe domain.
// - Header lookup berdasarkan nama kolom (trim, case-insensitive).
// - Angka: "2.5", " 10 ", "2,50" (koma desimal jika tidak ada titik).
// - Tanggal: format tetap dd/mm/yyyy.
//
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Column positions taken from a header row.
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    pub fn new(row: &[String]) -> Self {
        Self { names: row.iter().map(|s| s.trim().to_lowercase()).collect() }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.names.iter().position(|n| *n == wanted)
    }
}

/// Cell by index; short rows (Sheets trims trailing blanks) read as "".
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let parsed = match s.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) if s.contains(',') && !s.contains('.') => s.replace(',', ".").parse::<f64>().ok(),
        Err(_) => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Optional text: trimmed, empty -> None.
pub fn text(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}
