// ===============================
// src/store.rs
// ===============================
//
// Seam ke remote tabular store:
// - get(range)          -> baris-baris sel (string)
// - update(range, rows) -> tulis baris mulai pojok kiri-atas range
//
// Implementasi nyata: sheets::SheetsClient (Google Sheets v4).
// Untuk test: memory::MemoryStore (grid in-memory, log tulis, injeksi gagal).
//
use async_trait::async_trait;

use crate::error::Result;

pub type Rows = Vec<Vec<String>>;

#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Rows of a qualified A1 range. Trailing empty rows/cells may be omitted.
    async fn get(&self, range: &str) -> Result<Rows>;

    /// Overwrite the cells of `range` with `rows` (row-major).
    async fn update(&self, range: &str, rows: Rows) -> Result<()>;
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{Rows, SheetStore};
    use crate::a1;
    use crate::error::{Error, Result};

    /// In-memory sheets keyed by sheet name. Behaves like the values API:
    /// reads drop trailing blank cells and rows.
    #[derive(Default)]
    pub struct MemoryStore {
        sheets: Mutex<HashMap<String, Rows>>,
        writes: Mutex<Vec<(String, Rows)>>,
        reads: Mutex<Vec<String>>,
        fail_writes_to: Mutex<Option<String>>,
    }

    struct Span {
        sheet: String,
        first_col: usize,
        first_row: usize,
        last_col: Option<usize>,
        last_row: Option<usize>,
    }

    fn parse(range: &str) -> Option<Span> {
        let (sheet, span) = match range.rsplit_once('!') {
            Some((s, span)) => (s.trim_matches('\'').replace("''", "'"), span),
            None => return None,
        };
        let mut parts = span.split(':');
        let start = parts.next()?;
        let end = parts.next().unwrap_or(start);
        let o = a1::origin(start)?;
        let e = a1::origin(end)?;
        let bounded = end.chars().any(|c| c.is_ascii_digit());
        Some(Span {
            sheet,
            first_col: o.col,
            first_row: o.row as usize - 1,
            last_col: Some(e.col),
            last_row: if bounded { Some(e.row as usize - 1) } else { None },
        })
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_sheet(self, name: &str, rows: &[&[&str]]) -> Self {
            let grid = rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect();
            self.sheets.lock().unwrap().insert(name.to_string(), grid);
            self
        }

        /// Every subsequent write whose range contains `needle` fails.
        pub fn fail_writes_to(&self, needle: &str) {
            *self.fail_writes_to.lock().unwrap() = Some(needle.to_string());
        }

        pub fn writes(&self) -> Vec<(String, Rows)> {
            self.writes.lock().unwrap().clone()
        }

        pub fn reads(&self) -> Vec<String> {
            self.reads.lock().unwrap().clone()
        }

        pub fn sheet(&self, name: &str) -> Rows {
            self.sheets.lock().unwrap().get(name).cloned().unwrap_or_default()
        }

        pub fn cell(&self, name: &str, col: usize, row: u32) -> String {
            self.sheet(name)
                .get(row as usize - 1)
                .and_then(|r| r.get(col))
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl SheetStore for MemoryStore {
        async fn get(&self, range: &str) -> Result<Rows> {
            self.reads.lock().unwrap().push(range.to_string());
            let span = parse(range).ok_or_else(|| Error::RemoteConnection(format!("bad range {range}")))?;
            let grid = self.sheet(&span.sheet);
            let last_row = span.last_row.unwrap_or(usize::MAX);
            let mut out: Rows = grid
                .iter()
                .enumerate()
                .filter(|(i, _)| *i >= span.first_row && *i <= last_row)
                .map(|(_, r)| {
                    let last_col = span.last_col.unwrap_or(usize::MAX);
                    let mut cells: Vec<String> = r
                        .iter()
                        .enumerate()
                        .filter(|(c, _)| *c >= span.first_col && *c <= last_col)
                        .map(|(_, v)| v.clone())
                        .collect();
                    while cells.last().map(|c| c.is_empty()).unwrap_or(false) {
                        cells.pop();
                    }
                    cells
                })
                .collect();
            while out.last().map(|r| r.is_empty()).unwrap_or(false) {
                out.pop();
            }
            Ok(out)
        }

        async fn update(&self, range: &str, rows: Rows) -> Result<()> {
            if let Some(needle) = self.fail_writes_to.lock().unwrap().as_deref() {
                if range.contains(needle) {
                    return Err(Error::RemoteConnection("injected write failure".into()));
                }
            }
            let span = parse(range).ok_or_else(|| Error::RemoteConnection(format!("bad range {range}")))?;
            let mut sheets = self.sheets.lock().unwrap();
            let grid = sheets.entry(span.sheet.clone()).or_default();
            for (i, r) in rows.iter().enumerate() {
                let ri = span.first_row + i;
                if grid.len() <= ri {
                    grid.resize(ri + 1, Vec::new());
                }
                for (j, v) in r.iter().enumerate() {
                    let ci = span.first_col + j;
                    let line = &mut grid[ri];
                    if line.len() <= ci {
                        line.resize(ci + 1, String::new());
                    }
                    line[ci] = v.clone();
                }
            }
            drop(sheets);
            self.writes.lock().unwrap().push((range.to_string(), rows));
            Ok(())
        }
    }

    #[tokio::test]
    async fn reads_trim_like_the_values_api() {
        let store = MemoryStore::new().with_sheet(
            "Ventas",
            &[&["Fecha", "Producto", ""], &["01/01/2024", "A"], &[], &[""]],
        );
        let rows = store.get("'Ventas'!A:G").await.unwrap();
        assert_eq!(rows, vec![vec!["Fecha", "Producto"], vec!["01/01/2024", "A"]]);

        let col_a = store.get("'Ventas'!A:A").await.unwrap();
        assert_eq!(col_a.len(), 2);
    }

    #[tokio::test]
    async fn update_writes_at_origin() {
        let store = MemoryStore::new().with_sheet("Inventario", &[&["Producto", "Cantidad"], &["W", "10"]]);
        store
            .update("'Inventario'!B2", vec![vec!["7".to_string()]])
            .await
            .unwrap();
        assert_eq!(store.cell("Inventario", 1, 2), "7");
        assert_eq!(store.writes().len(), 1);

        store.fail_writes_to("Inventario");
        assert!(store.update("'Inventario'!B2", vec![vec!["1".into()]]).await.is_err());
        assert_eq!(store.cell("Inventario", 1, 2), "7");
    }
}
