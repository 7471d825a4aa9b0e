// ===============================
// src/sales.rs
// ===============================
//
// Lenient reader untuk log penjualan. Read path ini hanya untuk display:
// sel yang tidak valid jadi None, tidak pernah error (kecuali koneksi).
//
use std::sync::Arc;

use crate::coerce::{self, Header};
use crate::config::SheetRange;
use crate::domain::SaleRecord;
use crate::error::Result;
use crate::store::SheetStore;

/// Sales log columns, in write order.
pub const COLUMNS: [&str; 7] = [
    "Fecha",
    "Producto",
    "Cantidad",
    "Precio Unitario",
    "Total Venta",
    "Beneficio",
    "Notas",
];

pub struct SalesRepository {
    store: Arc<dyn SheetStore>,
    range: SheetRange,
}

impl SalesRepository {
    pub fn new(store: Arc<dyn SheetStore>, range: SheetRange) -> Self {
        Self { store, range }
    }

    pub async fn list(&self) -> Result<Vec<SaleRecord>> {
        let range = self.range.qualified();
        let rows = self.store.get(&range).await?;
        let records = parse_rows(&rows);
        tracing::debug!(%range, records = records.len(), "sales loaded");
        Ok(records)
    }
}

/// Header row + data rows -> records. Columns absent from the header read as missing.
pub fn parse_rows(rows: &[Vec<String>]) -> Vec<SaleRecord> {
    let Some((head, body)) = rows.split_first() else {
        return Vec::new();
    };
    let header = Header::new(head);
    let pos: Vec<Option<usize>> = COLUMNS.iter().map(|c| header.position(c)).collect();

    body.iter()
        .map(|row| {
            let raw = |i: usize| pos[i].map(|c| coerce::cell(row, c)).unwrap_or("");
            SaleRecord {
                date: coerce::parse_date(raw(0)),
                product: coerce::text(raw(1)),
                quantity: coerce::parse_number(raw(2)),
                unit_price: coerce::parse_number(raw(3)),
                total: coerce::parse_number(raw(4)),
                profit: coerce::parse_number(raw(5)),
                notes: coerce::text(raw(6)),
            }
        })
        .collect()
}
