// ===============================
// src/charts.rs
// ===============================
//
// Pure transforms: data repository -> spesifikasi chart (tanpa state/IO).
// None = "tidak ada chart" (input kosong / semua baris terfilter).
//
use std::collections::BTreeMap;

use serde::Serialize;

use crate::coerce;
use crate::domain::{InventoryItem, SaleRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    GroupedBar,
    Line,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub series: Vec<Series>,
}

fn series(name: &str, points: impl IntoIterator<Item = (String, f64)>) -> Series {
    Series {
        name: name.to_string(),
        points: points.into_iter().map(|(label, value)| Point { label, value }).collect(),
    }
}

/// Stock per product.
pub fn inventory_stock(items: &[InventoryItem]) -> Option<ChartSpec> {
    if items.is_empty() {
        return None;
    }
    Some(ChartSpec {
        kind: ChartKind::Bar,
        title: "Stock Actual por Producto".into(),
        x_title: Some("Producto".into()),
        y_title: Some("Cantidad".into()),
        series: vec![series("Cantidad", items.iter().map(|i| (i.product.clone(), i.quantity)))],
    })
}

/// Purchase vs sale price, side by side.
pub fn price_comparison(items: &[InventoryItem]) -> Option<ChartSpec> {
    if items.is_empty() {
        return None;
    }
    Some(ChartSpec {
        kind: ChartKind::GroupedBar,
        title: "Comparativa de Precios por Producto".into(),
        x_title: Some("Producto".into()),
        y_title: Some("Precio (€)".into()),
        series: vec![
            series("Precio Compra", items.iter().map(|i| (i.product.clone(), i.purchase_price))),
            series("Precio Venta", items.iter().map(|i| (i.product.clone(), i.sale_price))),
        ],
    })
}

/// Total sales per day, oldest first. Rows without a date or total are skipped.
pub fn sales_over_time(sales: &[SaleRecord]) -> Option<ChartSpec> {
    let mut by_day = BTreeMap::new();
    for s in sales {
        if let (Some(date), Some(total)) = (s.date, s.total) {
            *by_day.entry(date).or_insert(0.0) += total;
        }
    }
    if by_day.is_empty() {
        return None;
    }
    Some(ChartSpec {
        kind: ChartKind::Line,
        title: "Ventas Totales por Día".into(),
        x_title: Some("Fecha".into()),
        y_title: Some("Ventas (€)".into()),
        series: vec![series(
            "Total Venta",
            by_day.into_iter().map(|(d, v)| (coerce::format_date(d), v)),
        )],
    })
}

/// Units sold per product. Rows without a product or quantity are skipped.
pub fn products_sold(sales: &[SaleRecord]) -> Option<ChartSpec> {
    let mut by_product: BTreeMap<&str, f64> = BTreeMap::new();
    for s in sales {
        if let (Some(p), Some(q)) = (s.product.as_deref(), s.quantity) {
            *by_product.entry(p).or_insert(0.0) += q;
        }
    }
    if by_product.is_empty() {
        return None;
    }
    Some(ChartSpec {
        kind: ChartKind::Pie,
        title: "Distribución de Productos Vendidos".into(),
        x_title: None,
        y_title: None,
        series: vec![series(
            "Cantidad",
            by_product.into_iter().map(|(p, q)| (p.to_string(), q)),
        )],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(p: &str, q: f64, buy: f64, sell: f64) -> InventoryItem {
        InventoryItem { product: p.into(), quantity: q, purchase_price: buy, sale_price: sell, row: 2 }
    }

    fn sale(d: Option<(i32, u32, u32)>, p: Option<&str>, q: Option<f64>, total: Option<f64>) -> SaleRecord {
        SaleRecord {
            date: d.and_then(|(y, m, dd)| NaiveDate::from_ymd_opt(y, m, dd)),
            product: p.map(|s| s.to_string()),
            quantity: q,
            total,
            ..Default::default()
        }
    }

    #[test]
    fn empty_inputs_give_no_chart() {
        assert!(inventory_stock(&[]).is_none());
        assert!(price_comparison(&[]).is_none());
        assert!(sales_over_time(&[]).is_none());
        assert!(products_sold(&[]).is_none());
    }

    #[test]
    fn inventory_charts() {
        let items = [item("Widget", 10.0, 1.0, 2.5), item("Gadget", 4.0, 3.0, 5.0)];
        let stock = inventory_stock(&items).unwrap();
        assert_eq!(stock.kind, ChartKind::Bar);
        assert_eq!(stock.series.len(), 1);
        assert_eq!(stock.series[0].points[1], Point { label: "Gadget".into(), value: 4.0 });

        let prices = price_comparison(&items).unwrap();
        assert_eq!(prices.kind, ChartKind::GroupedBar);
        let names: Vec<_> = prices.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Precio Compra", "Precio Venta"]);
        assert_eq!(prices.series[1].points[0].value, 2.5);
    }

    #[test]
    fn daily_totals_skip_missing_and_sort_by_date() {
        let sales = [
            sale(Some((2024, 3, 8)), Some("A"), Some(1.0), Some(2.0)),
            sale(Some((2024, 3, 7)), Some("A"), Some(1.0), Some(5.0)),
            sale(Some((2024, 3, 8)), Some("B"), Some(1.0), Some(3.0)),
            sale(None, Some("B"), Some(1.0), Some(100.0)),
            sale(Some((2024, 3, 9)), Some("B"), Some(1.0), None),
        ];
        let chart = sales_over_time(&sales).unwrap();
        assert_eq!(chart.kind, ChartKind::Line);
        let pts = &chart.series[0].points;
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0], Point { label: "07/03/2024".into(), value: 5.0 });
        assert_eq!(pts[1], Point { label: "08/03/2024".into(), value: 5.0 });
    }

    #[test]
    fn products_sold_sums_quantities() {
        let sales = [
            sale(None, Some("Widget"), Some(3.0), None),
            sale(None, Some("Gadget"), Some(1.0), None),
            sale(None, Some("Widget"), Some(2.0), None),
            sale(None, None, Some(9.0), None),
            sale(None, Some("Gadget"), None, None),
        ];
        let chart = products_sold(&sales).unwrap();
        assert_eq!(chart.kind, ChartKind::Pie);
        assert_eq!(
            chart.series[0].points,
            vec![
                Point { label: "Gadget".into(), value: 1.0 },
                Point { label: "Widget".into(), value: 5.0 },
            ]
        );
    }

    #[test]
    fn unusable_rows_only_give_no_chart() {
        let sales = [SaleRecord::default(), sale(None, None, Some(1.0), Some(1.0))];
        assert!(sales_over_time(&sales).is_none());
        assert!(products_sold(&sales).is_none());
    }

    #[test]
    fn chart_serializes_kind_in_snake_case() {
        let chart = price_comparison(&[item("W", 1.0, 1.0, 2.0)]).unwrap();
        let v = serde_json::to_value(&chart).unwrap();
        assert_eq!(v["kind"], "grouped_bar");
        assert_eq!(v["series"][0]["points"][0]["label"], "W");
    }
}
