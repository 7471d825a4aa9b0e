// ===============================
// src/inventory.rs
// ===============================
//
// Strict reader untuk sheet inventory: header di baris pertama range,
// kolom numerik wajib valid (kalau tidak -> DataFormat).
//
use std::sync::Arc;

use crate::coerce::{self, Header};
use crate::config::SheetRange;
use crate::domain::InventoryItem;
use crate::error::{Error, Result};
use crate::metrics::INVENTORY_STOCK;
use crate::store::SheetStore;

pub const COL_PRODUCT: &str = "Producto";
pub const COL_QUANTITY: &str = "Cantidad";
pub const COL_PURCHASE: &str = "Precio Compra";
pub const COL_SALE: &str = "Precio Venta";

/// Items plus the absolute sheet column holding the stock quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    pub items: Vec<InventoryItem>,
    pub quantity_col: usize,
}

impl InventorySnapshot {
    pub fn find(&self, product: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.product == product)
    }
}

pub struct InventoryRepository {
    store: Arc<dyn SheetStore>,
    range: SheetRange,
}

impl InventoryRepository {
    pub fn new(store: Arc<dyn SheetStore>, range: SheetRange) -> Self {
        Self { store, range }
    }

    pub fn sheet(&self) -> &str {
        &self.range.sheet
    }

    pub async fn list(&self) -> Result<Vec<InventoryItem>> {
        Ok(self.snapshot().await?.items)
    }

    pub async fn snapshot(&self) -> Result<InventorySnapshot> {
        let range = self.range.qualified();
        let origin = self.range.origin()?;
        let rows = self.store.get(&range).await?;

        let Some((head, body)) = rows.split_first() else {
            return Err(Error::data_format(&range, "range is empty, header row expected"));
        };
        let header = Header::new(head);
        let col = |name: &str| {
            header
                .position(name)
                .ok_or_else(|| Error::data_format(&range, format!("missing column '{name}'")))
        };
        let (c_product, c_qty, c_buy, c_sell) =
            (col(COL_PRODUCT)?, col(COL_QUANTITY)?, col(COL_PURCHASE)?, col(COL_SALE)?);

        let mut items = Vec::with_capacity(body.len());
        for (i, row) in body.iter().enumerate() {
            let sheet_row = origin.row + 1 + i as u32;
            if coerce::is_blank_row(row) {
                continue;
            }
            let number = |c: usize, name: &str| -> Result<f64> {
                let raw = coerce::cell(row, c);
                match coerce::parse_number(raw) {
                    Some(v) if v >= 0.0 => Ok(v),
                    Some(v) => Err(Error::data_format(
                        &range,
                        format!("row {sheet_row}: '{name}' must be >= 0, got {v}"),
                    )),
                    None => Err(Error::data_format(
                        &range,
                        format!("row {sheet_row}: '{name}' is not a number: '{raw}'"),
                    )),
                }
            };
            let product = coerce::text(coerce::cell(row, c_product)).ok_or_else(|| {
                Error::data_format(&range, format!("row {sheet_row}: '{COL_PRODUCT}' is empty"))
            })?;
            items.push(InventoryItem {
                quantity: number(c_qty, COL_QUANTITY)?,
                purchase_price: number(c_buy, COL_PURCHASE)?,
                sale_price: number(c_sell, COL_SALE)?,
                product,
                row: sheet_row,
            });
        }

        for it in &items {
            INVENTORY_STOCK.with_label_values(&[it.product.as_str()]).set(it.quantity);
        }
        tracing::debug!(%range, items = items.len(), "inventory loaded");
        Ok(InventorySnapshot { items, quantity_col: origin.col + c_qty })
    }
}
