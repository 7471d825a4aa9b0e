// ===============================
// src/config.rs
// ===============================
/*
=============================================================================
Project : stock_sheet — inventory & sales dashboard over Google Sheets
Module  : config.rs
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
use std::env;
use std::path::PathBuf;

use crate::a1;
use crate::error::{Error, Result};

pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credenciales.json";

/// Dari mana key service-account diambil
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    /// Inline JSON (secret store / env `GOOGLE_CREDENTIALS`)
    Inline(String),
    /// Path ke file JSON key
    File(PathBuf),
}

/// A named sheet plus the A1 span read from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub span: String,
}

impl SheetRange {
    pub fn new(sheet: impl Into<String>, span: impl Into<String>) -> Self {
        Self { sheet: sheet.into(), span: span.into() }
    }

    /// `'Sheet'!A1:F6`
    pub fn qualified(&self) -> String {
        a1::qualified(&self.sheet, &self.span)
    }

    pub fn origin(&self) -> Result<a1::Origin> {
        a1::origin(&self.span)
            .ok_or_else(|| Error::Config(format!("invalid A1 span '{}' for sheet {}", self.span, self.sheet)))
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub spreadsheet_id: String,
    pub credentials: CredentialSource,
    pub api_url: String,
    pub http_timeout_secs: u64,

    pub inventory: SheetRange,
    pub sales: SheetRange,
    pub summary: SheetRange,

    pub record_file: Option<String>,
}

/// Load from the environment. `.env` is read once in `main`, before logging init.
/// `spreadsheet_id` overrides `SPREADSHEET_ID`.
pub fn load(spreadsheet_id: Option<&str>) -> Result<Settings> {
    load_from(|k| match (k, spreadsheet_id) {
        ("SPREADSHEET_ID", Some(id)) => Some(id.to_string()),
        _ => env::var(k).ok(),
    })
}

/// Build settings from any key lookup (env in production, a map in tests).
pub fn load_from<F>(get: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    // ===== Target spreadsheet =====
    let spreadsheet_id = non_empty("SPREADSHEET_ID")
        .ok_or_else(|| Error::Config("SPREADSHEET_ID is not set".to_string()))?;

    // ===== Credentials =====
    // Prioritas: GOOGLE_CREDENTIALS (inline) -> GOOGLE_CREDENTIALS_FILE -> credenciales.json
    let credentials = match non_empty("GOOGLE_CREDENTIALS") {
        Some(json) => CredentialSource::Inline(json),
        None => CredentialSource::File(PathBuf::from(
            non_empty("GOOGLE_CREDENTIALS_FILE").unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
        )),
    };

    let api_url = non_empty("SHEETS_API_URL")
        .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.to_string())
        .trim_end_matches('/')
        .to_string();
    let http_timeout_secs = non_empty("HTTP_TIMEOUT_SECS")
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);

    // ===== Ranges =====
    let inventory = SheetRange::new(
        non_empty("INVENTORY_SHEET").unwrap_or_else(|| "Inventario".into()),
        non_empty("INVENTORY_RANGE").unwrap_or_else(|| "A1:F6".into()),
    );
    let sales = SheetRange::new(
        non_empty("SALES_SHEET").unwrap_or_else(|| "Ventas".into()),
        non_empty("SALES_RANGE").unwrap_or_else(|| "A:G".into()),
    );
    let summary = SheetRange::new(
        non_empty("SUMMARY_SHEET").unwrap_or_else(|| "Resumen".into()),
        non_empty("SUMMARY_RANGE").unwrap_or_else(|| "A1:B8".into()),
    );
    for r in [&inventory, &sales, &summary] {
        r.origin()?;
    }

    let record_file = non_empty("RECORD_FILE");

    Ok(Settings {
        spreadsheet_id,
        credentials,
        api_url,
        http_timeout_secs,
        inventory,
        sales,
        summary,
        record_file,
    })
}

impl CredentialSource {
    /// Raw JSON key material.
    pub fn read(&self) -> Result<String> {
        match self {
            CredentialSource::Inline(json) => Ok(json.clone()),
            CredentialSource::File(path) => std::fs::read_to_string(path)
                .map_err(|e| Error::Credential(format!("cannot read {}: {e}", path.display()))),
        }
    }
}
