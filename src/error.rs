// ===============================
// src/error.rs
// ===============================
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    /// Key material missing, unreadable, or rejected by the token endpoint.
    #[error("credential error: {0}")]
    Credential(String),

    #[error("remote connection error: {0}")]
    RemoteConnection(String),

    #[error("data format error in {range}: {detail}")]
    DataFormat { range: String, detail: String },

    #[error("product '{0}' not found in inventory")]
    ProductNotFound(String),

    #[error("insufficient stock for '{product}': requested {requested}, only {available} available")]
    InsufficientStock {
        product: String,
        requested: f64,
        available: f64,
    },

    #[error("invalid sale: {0}")]
    InvalidSale(String),

    /// One of the two sale writes failed. When `sale_appended` is true the
    /// sales log already holds the new row but the stock cell was not updated.
    #[error("remote write to {range} failed: {detail}{}", partial_note(.sale_appended))]
    RemoteWrite {
        range: String,
        sale_appended: bool,
        detail: String,
    },
}

fn partial_note(sale_appended: &bool) -> &'static str {
    if *sale_appended {
        " (sale row was appended; stock NOT decremented)"
    } else {
        ""
    }
}

impl Error {
    pub fn data_format(range: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::DataFormat { range: range.into(), detail: detail.into() }
    }

    /// Short label, dipakai untuk metrics & recorder.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Credential(_) => "credential",
            Error::RemoteConnection(_) => "remote_connection",
            Error::DataFormat { .. } => "data_format",
            Error::ProductNotFound(_) => "product_not_found",
            Error::InsufficientStock { .. } => "insufficient_stock",
            Error::InvalidSale(_) => "invalid_sale",
            Error::RemoteWrite { .. } => "remote_write",
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::RemoteConnection(e.to_string())
    }
}
