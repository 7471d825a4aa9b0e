// ===============================
// src/main.rs
// ===============================
/*
 # dashboard (teks) / JSON untuk frontend
 stock_sheet dashboard
 stock_sheet dashboard --json

 # catat penjualan (default: qty 1, harga 2.50, notas "Venta")
 stock_sheet sell --product Widget --quantity 3 --price 2.5

 # lihat counters prometheus setelah command selesai
 stock_sheet --metrics products
*/
/*
=============================================================================
Project : stock_sheet — inventory & sales dashboard over Google Sheets
Module  : main.rs
Version : 0.1.0
Author  : Kukuh Tripamungkas Wicaksono (Kukuh TW)
Email   : kukuhtw@gmail.com
WhatsApp: https://wa.me/628129893706
LinkedIn: https://id.linkedin.com/in/kukuhtw
License : MIT (see LICENSE)

Summary : Reads inventory, sales log and summary ranges from a spreadsheet,
          builds chart specs and tables, and records sales (append sale row +
          decrement stock cell). Optional JSONL audit log and Prometheus
          counters.

(c) 2025 Kukuh TW. All rights reserved where applicable.
=============================================================================
*/
mod a1;
mod charts;
mod coerce;
mod config;
mod domain;
mod error;
mod form;
mod google;       // service-account JWT + token exchange
mod inventory;
mod metrics;
mod recorder;     // JSONL audit log (optional)
mod render;
mod sale;
mod sales;
mod sheets;       // Google Sheets v4 values API
mod store;
mod summary;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::domain::{Event, SummaryMetrics};
use crate::error::{Error, Result};
use crate::form::SaleForm;
use crate::inventory::InventoryRepository;
use crate::render::Dashboard;
use crate::sale::SaleRecorder;
use crate::sales::SalesRepository;
use crate::sheets::SheetsClient;
use crate::store::SheetStore;
use crate::summary::SummaryReader;

#[derive(Debug, Parser)]
#[command(name = "stock_sheet", version, about = "Inventory dashboard & sales register over Google Sheets")]
struct Cli {
    /// Overrides SPREADSHEET_ID
    #[arg(long, global = true)]
    spreadsheet_id: Option<String>,

    /// Print Prometheus counters after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Metrics, charts and tables
    Dashboard {
        /// Emit the dashboard as JSON
        #[arg(long)]
        json: bool,
    },
    /// Products available for sale, with current stock
    Products,
    /// Record a sale and decrement stock
    Sell {
        #[arg(long)]
        product: String,
        #[arg(long, default_value_t = form::MIN_QUANTITY)]
        quantity: u32,
        #[arg(long, default_value_t = form::DEFAULT_UNIT_PRICE)]
        price: f64,
        #[arg(long, default_value = form::DEFAULT_NOTES)]
        notes: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ---- Logging ----
    // RUST_LOG menang; fallback LOG_LEVEL; default info. Log ke stderr, output ke stdout.
    // .env hanya dibaca di sini; config::load cukup membaca env
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ---- Metrics ----
    metrics::init();

    let code = match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    };

    if cli.metrics {
        print!("{}", metrics::encode_metrics());
    }
    code
}

async fn run(cli: &Cli) -> Result<()> {
    // ---- Load config & connect ----
    let settings = config::load(cli.spreadsheet_id.as_deref())?;
    info!(
        spreadsheet = %settings.spreadsheet_id,
        inventory = %settings.inventory.qualified(),
        sales = %settings.sales.qualified(),
        summary = %settings.summary.qualified(),
        record_file = ?settings.record_file,
        "startup config"
    );
    let store: Arc<dyn SheetStore> = Arc::new(SheetsClient::connect(&settings)?);

    match &cli.cmd {
        Command::Dashboard { json } => dashboard(&settings, store, *json).await,
        Command::Products => products(&settings, store).await,
        Command::Sell { product, quantity, price, notes } => {
            let form = SaleForm {
                quantity: *quantity,
                unit_price: *price,
                notes: notes.clone(),
                ..SaleForm::new(product.clone())
            };
            sell(&settings, store, form).await
        }
    }
}

async fn dashboard(settings: &Settings, store: Arc<dyn SheetStore>, json: bool) -> Result<()> {
    let pairs = SummaryReader::new(store.clone(), settings.summary.clone()).read().await?;
    let inventory = InventoryRepository::new(store.clone(), settings.inventory.clone()).list().await?;
    let sales = SalesRepository::new(store, settings.sales.clone()).list().await?;

    let dash = Dashboard::build(SummaryMetrics::from_pairs(&pairs), inventory, sales);
    if json {
        let body = serde_json::to_string_pretty(&dash)
            .map_err(|e| Error::data_format("dashboard", e.to_string()))?;
        println!("{body}");
    } else {
        print!("{}", dash.text());
    }
    Ok(())
}

async fn products(settings: &Settings, store: Arc<dyn SheetStore>) -> Result<()> {
    let items = InventoryRepository::new(store, settings.inventory.clone()).list().await?;
    for (name, item) in SaleForm::choices(&items).into_iter().zip(&items) {
        println!("{name}\t{}", render::num(item.quantity));
    }
    Ok(())
}

async fn sell(settings: &Settings, store: Arc<dyn SheetStore>, form: SaleForm) -> Result<()> {
    let inventory = InventoryRepository::new(store.clone(), settings.inventory.clone());

    // ---- Recorder (optional) ----
    // Dibuat sebelum validasi supaya penolakan form juga masuk audit log
    let mut sale_recorder = SaleRecorder::new(store.clone(), settings.inventory.clone(), settings.sales.clone());
    let mut rec_task = None;
    if let Some(path) = settings.record_file.clone() {
        let (rec_tx, rec_rx) = mpsc::channel::<Event>(64);
        rec_task = Some(tokio::spawn(recorder::run(rec_rx, path)));
        sale_recorder = sale_recorder.with_events(rec_tx);
    }

    // Validasi form terhadap stok terakhir yang dibaca; gagal -> tanpa write
    let quantity = f64::from(form.quantity);
    let outcome = match inventory.list().await {
        Ok(items) => match form.validate(&items) {
            Ok(()) => {
                sale_recorder
                    .record(&form.product, quantity, form.unit_price, &form.notes)
                    .await
            }
            Err(e) => {
                sale_recorder.reject(&form.product, quantity, &e);
                Err(e)
            }
        },
        Err(e) => Err(e),
    };

    // Tutup channel supaya recorder flush & selesai
    drop(sale_recorder);
    if let Some(task) = rec_task {
        let _ = task.await;
    }

    let receipt = outcome?;
    println!(
        "Venta registrada: {} x {} a {} = {} (beneficio {}), fila {}",
        receipt.sale.product,
        render::num(receipt.sale.quantity),
        render::num(receipt.sale.unit_price),
        render::num(receipt.sale.total),
        render::num(receipt.sale.profit),
        receipt.sales_row
    );

    // Reload inventory setelah penjualan
    let items = inventory.list().await?;
    print!("{}", render::inventory_table(&items));
    Ok(())
}
