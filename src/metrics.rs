// ===============================
// src/metrics.rs
// ===============================
use once_cell::sync::Lazy;
use prometheus::{Encoder, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

// Single custom registry (we register everything here)
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

// -------- Remote store --------
pub static SHEET_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sheet_requests_total", "remote sheet calls (labels: op, status)"),
        &["op", "status"],
    )
    .unwrap()
});

// -------- Sales --------
pub static SALES_RECORDED: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("sales_recorded_total", "sales fully recorded").unwrap());

pub static SALES_FAILED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sales_failed_total", "sales not (fully) recorded, by reason"),
        &["reason"],
    )
    .unwrap()
});

// Stock terakhir yang terbaca per produk
pub static INVENTORY_STOCK: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new("inventory_stock", "last-read stock per product"),
        &["product"],
    )
    .unwrap()
});

pub fn init() {
    // Register all metrics to the custom registry; double registration is ignored
    for m in [
        REGISTRY.register(Box::new(SHEET_REQUESTS.clone())),
        REGISTRY.register(Box::new(SALES_RECORDED.clone())),
        REGISTRY.register(Box::new(SALES_FAILED.clone())),
        REGISTRY.register(Box::new(INVENTORY_STOCK.clone())),
    ] {
        let _ = m;
    }
}

// Encode all metrics in Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    let mut buf = Vec::new();
    if encoder.encode(&families, &mut buf).is_err() || buf.is_empty() {
        buf.extend_from_slice(b"# no metrics\n");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
