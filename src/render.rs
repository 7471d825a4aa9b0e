// ===============================
// src/render.rs
// ===============================
//
// Output CLI: metrik, ringkasan chart, tabel inventory & penjualan.
// Mode --json mengeluarkan struktur Dashboard apa adanya.
//
use std::fmt::Write as _;

use serde::Serialize;

use crate::charts::{self, ChartSpec};
use crate::coerce;
use crate::domain::{InventoryItem, SaleRecord, SummaryMetrics};

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub metrics: SummaryMetrics,
    pub charts: Vec<ChartSpec>,
    pub inventory: Vec<InventoryItem>,
    pub sales: Vec<SaleRecord>,
}

impl Dashboard {
    pub fn build(metrics: SummaryMetrics, inventory: Vec<InventoryItem>, sales: Vec<SaleRecord>) -> Self {
        let charts = [
            charts::inventory_stock(&inventory),
            charts::price_comparison(&inventory),
            charts::sales_over_time(&sales),
            charts::products_sold(&sales),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self { metrics, charts, inventory, sales }
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        let m = &self.metrics;
        let _ = writeln!(out, "== Panel de Control de Inventario ==");
        let _ = writeln!(
            out,
            "Inversión Total: {} | Beneficio Potencial: {} | ROI Potencial: {}",
            m.total_investment, m.potential_profit, m.potential_roi
        );
        for c in &self.charts {
            out.push('\n');
            out.push_str(&chart_text(c));
        }
        out.push_str("\n-- Inventario Actual --\n");
        out.push_str(&inventory_table(&self.inventory));
        out.push_str("\n-- Registro de Ventas --\n");
        out.push_str(&sales_table(&self.sales));
        out
    }
}

pub fn num(v: f64) -> String {
    if v.fract() == 0.0 { format!("{v:.0}") } else { format!("{v:.2}") }
}

fn opt_num(v: Option<f64>) -> String {
    v.map(num).unwrap_or_else(|| "-".into())
}

pub fn chart_text(c: &ChartSpec) -> String {
    let mut out = format!("[{}]\n", c.title);
    for s in &c.series {
        let pts: Vec<String> = s.points.iter().map(|p| format!("{}={}", p.label, num(p.value))).collect();
        let _ = writeln!(out, "  {}: {}", s.name, pts.join(", "));
    }
    out
}

pub fn inventory_table(items: &[InventoryItem]) -> String {
    let mut out = format!("{:<20} {:>10} {:>14} {:>14}\n", "Producto", "Cantidad", "Precio Compra", "Precio Venta");
    for i in items {
        let _ = writeln!(
            out,
            "{:<20} {:>10} {:>14} {:>14}",
            i.product,
            num(i.quantity),
            num(i.purchase_price),
            num(i.sale_price)
        );
    }
    out
}

pub fn sales_table(sales: &[SaleRecord]) -> String {
    let mut out = format!(
        "{:<10} {:<20} {:>8} {:>10} {:>10} {:>10}  {}\n",
        "Fecha", "Producto", "Cantidad", "P.Unit", "Total", "Beneficio", "Notas"
    );
    if sales.is_empty() {
        out.push_str("(sin ventas)\n");
    }
    for s in sales {
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:>8} {:>10} {:>10} {:>10}  {}",
            s.date.map(coerce::format_date).unwrap_or_else(|| "-".into()),
            s.product.as_deref().unwrap_or("-"),
            opt_num(s.quantity),
            opt_num(s.unit_price),
            opt_num(s.total),
            opt_num(s.profit),
            s.notes.as_deref().unwrap_or("")
        );
    }
    out
}
