// ===============================
// src/sale.rs
// ===============================
//
// Alur pencatatan penjualan (satu-satunya jalur yang menulis):
//   1) baca panjang kolom pertama log penjualan -> posisi baris berikutnya
//   2) baca snapshot inventory, cari produk + harga beli, cek stok
//   3) total = qty * harga, profit = total - harga_beli * qty
//   4) tulis satu baris penjualan di posisi tadi
//   5) tulis stok baru (stok_lama - qty) ke sel Cantidad produk tsb
//
// Dua write terpisah, TIDAK atomik dan tanpa rollback. Kalau (5) gagal,
// baris penjualan sudah ada tapi stok belum berkurang -> RemoteWrite
// dengan sale_appended = true + event PartialSale.
//
// Single writer diasumsikan. Race yang diketahui:
// - lost update: penjualan lain antara (2) dan (5) ditimpa stok basi
// - append: dua pencatatan bersamaan bisa menghitung baris yang sama di (1)
//
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::a1;
use crate::config::SheetRange;
use crate::domain::{cell_number, Event, NewSale, SaleReceipt};
use crate::error::{Error, Result};
use crate::inventory::InventoryRepository;
use crate::metrics::{SALES_FAILED, SALES_RECORDED};
use crate::sales::COLUMNS;
use crate::store::SheetStore;

pub struct SaleRecorder {
    store: Arc<dyn SheetStore>,
    inventory: InventoryRepository,
    sales: SheetRange,
    events: Option<mpsc::Sender<Event>>,
}

impl SaleRecorder {
    pub fn new(store: Arc<dyn SheetStore>, inventory: SheetRange, sales: SheetRange) -> Self {
        Self {
            inventory: InventoryRepository::new(store.clone(), inventory),
            store,
            sales,
            events: None,
        }
    }

    /// Send audit events to the recorder task.
    pub fn with_events(mut self, tx: mpsc::Sender<Event>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Record a sale dated today (local time).
    pub async fn record(&self, product: &str, quantity: f64, unit_price: f64, notes: &str) -> Result<SaleReceipt> {
        self.record_on(Local::now().date_naive(), product, quantity, unit_price, notes)
            .await
    }

    pub async fn record_on(
        &self,
        date: NaiveDate,
        product: &str,
        quantity: f64,
        unit_price: f64,
        notes: &str,
    ) -> Result<SaleReceipt> {
        let res = self.try_record(date, product, quantity, unit_price, notes).await;
        match &res {
            Ok(receipt) => {
                SALES_RECORDED.inc();
                self.emit(Event::SaleRecorded(receipt.clone()));
            }
            Err(e) => self.failed(product, quantity, e),
        }
        res
    }

    /// Report a sale refused before `record` was reached (form validation).
    pub fn reject(&self, product: &str, quantity: f64, err: &Error) {
        self.failed(product, quantity, err);
    }

    fn failed(&self, product: &str, quantity: f64, e: &Error) {
        SALES_FAILED.with_label_values(&[e.kind()]).inc();
        if matches!(
            e,
            Error::ProductNotFound(_) | Error::InsufficientStock { .. } | Error::InvalidSale(_)
        ) {
            warn!(%product, quantity, reason = %e, "sale rejected");
            self.emit(Event::SaleRejected {
                product: product.to_string(),
                quantity,
                reason: e.to_string(),
            });
        }
    }

    async fn try_record(
        &self,
        date: NaiveDate,
        product: &str,
        quantity: f64,
        unit_price: f64,
        notes: &str,
    ) -> Result<SaleReceipt> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(Error::InvalidSale(format!("quantity must be > 0, got {quantity}")));
        }
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(Error::InvalidSale(format!("unit price must be >= 0, got {unit_price}")));
        }

        // 1) posisi append = jumlah baris terisi di kolom pertama + 1
        let origin = self.sales.origin()?;
        let first_col = a1::column_letters(origin.col);
        let key_range = a1::qualified(&self.sales.sheet, &format!("{first_col}{}:{first_col}", origin.row));
        let used = self.store.get(&key_range).await?.len() as u32;

        // 2) snapshot inventory
        let snapshot = self.inventory.snapshot().await?;
        let item = snapshot
            .find(product)
            .ok_or_else(|| Error::ProductNotFound(product.to_string()))?;
        if quantity > item.quantity {
            return Err(Error::InsufficientStock {
                product: product.to_string(),
                requested: quantity,
                available: item.quantity,
            });
        }

        // 3) hitung
        let sale = NewSale::compute(date, product, quantity, unit_price, item.purchase_price, notes);

        // 4) tulis baris penjualan; log kosong -> header ikut ditulis
        let last_col = origin.col + COLUMNS.len() - 1;
        let (first_row, rows) = if used == 0 {
            let header = COLUMNS.iter().map(|c| c.to_string()).collect();
            (origin.row, vec![header, sale.to_row()])
        } else {
            (origin.row + used, vec![sale.to_row()])
        };
        let sales_row = first_row + rows.len() as u32 - 1;
        let sale_range = a1::row_span(&self.sales.sheet, origin.col, last_col, first_row, sales_row);
        if let Err(e) = self.store.update(&sale_range, rows).await {
            error!(range = %sale_range, error = %e, "sale row write failed");
            return Err(Error::RemoteWrite {
                range: sale_range,
                sale_appended: false,
                detail: e.to_string(),
            });
        }
        info!(%product, quantity, total = sale.total, row = sales_row, "sale appended");

        // 5) scan ulang snapshot dari langkah 2 (bukan fetch ulang), tulis stok baru
        let Some(target) = snapshot.items.iter().find(|i| i.product == product) else {
            return Err(Error::ProductNotFound(product.to_string()));
        };
        let stock_before = target.quantity;
        let stock_after = stock_before - quantity;
        let stock_range = a1::cell(self.inventory.sheet(), snapshot.quantity_col, target.row);
        if let Err(e) = self
            .store
            .update(&stock_range, vec![vec![cell_number(stock_after)]])
            .await
        {
            error!(
                range = %stock_range,
                sales_row,
                sale_appended = true,
                error = %e,
                "stock write failed after sale was appended"
            );
            self.emit(Event::PartialSale {
                sale,
                sales_row,
                stock_range: stock_range.clone(),
                detail: e.to_string(),
            });
            return Err(Error::RemoteWrite {
                range: stock_range,
                sale_appended: true,
                detail: e.to_string(),
            });
        }
        info!(%product, stock_before, stock_after, "stock updated");

        Ok(SaleReceipt { sale, sales_row, stock_before, stock_after })
    }

    fn emit(&self, ev: Event) {
        if let Some(tx) = &self.events {
            if let Err(e) = tx.try_send(ev) {
                warn!(error = %e, "audit event dropped");
            }
        }
    }
}
