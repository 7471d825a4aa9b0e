// ===============================
// src/domain.rs
// ===============================
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the inventory sheet. `row` is the 1-based sheet row it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub row: u32,
}

/// Sales log row as read back. `None` = sentinel "missing" (absent column or unparseable cell).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: Option<NaiveDate>,
    pub product: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub total: Option<f64>,
    pub profit: Option<f64>,
    pub notes: Option<String>,
}

/// A sale about to be appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub date: NaiveDate,
    pub product: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
    pub profit: f64,
    pub notes: String,
}

impl NewSale {
    pub fn compute(
        date: NaiveDate,
        product: &str,
        quantity: f64,
        unit_price: f64,
        purchase_price: f64,
        notes: &str,
    ) -> Self {
        let total = quantity * unit_price;
        let profit = total - purchase_price * quantity;
        Self {
            date,
            product: product.to_string(),
            quantity,
            unit_price,
            total,
            profit,
            notes: notes.to_string(),
        }
    }

    /// Cells in sales-log column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            crate::coerce::format_date(self.date),
            self.product.clone(),
            cell_number(self.quantity),
            cell_number(self.unit_price),
            cell_number(self.total),
            cell_number(self.profit),
            self.notes.clone(),
        ]
    }
}

/// Number as written to a sheet cell. Rounded to 9 decimals so binary
/// noise (`0.1 * 3` -> `0.30000000000000004`) never reaches the sheet.
pub fn cell_number(v: f64) -> String {
    let r = (v * 1e9).round() / 1e9;
    // hindari "-0"
    if r == 0.0 { "0".to_string() } else { r.to_string() }
}

/// Outcome of a successful sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub sale: NewSale,
    pub sales_row: u32,
    pub stock_before: f64,
    pub stock_after: f64,
}

/// Display strings computed by the sheet's own formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_investment: String,
    pub potential_profit: String,
    pub potential_roi: String,
}

/// Audit events, ditulis ke JSONL oleh recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    SaleRecorded(SaleReceipt),
    SaleRejected { product: String, quantity: f64, reason: String },
    PartialSale { sale: NewSale, sales_row: u32, stock_range: String, detail: String },
}
