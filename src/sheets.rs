// ===============================
// src/sheets.rs
// ===============================
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Duration;
use url::Url;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::google::{fetch_token, AccessToken, ServiceAccountKey};
use crate::metrics::SHEET_REQUESTS;
use crate::store::{Rows, SheetStore};

/// Google Sheets v4 values API (REST, bearer token from a service account).
/// Every call is awaited by the caller; there is no retry.
pub struct SheetsClient {
    http: reqwest::Client,
    api_url: String,
    spreadsheet_id: String,
    key: ServiceAccountKey,
    token: Mutex<Option<AccessToken>>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    range: &'a str,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: &'a Rows,
}

impl SheetsClient {
    pub fn connect(settings: &Settings) -> Result<Self> {
        Url::parse(&settings.api_url)
            .map_err(|e| Error::Config(format!("bad SHEETS_API_URL '{}': {e}", settings.api_url)))?;

        let raw = settings.credentials.read()?;
        let key = ServiceAccountKey::from_json(&raw)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .build()?;

        tracing::info!(
            spreadsheet = %settings.spreadsheet_id,
            client = %key.client_email,
            "sheets client ready"
        );
        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            spreadsheet_id: settings.spreadsheet_id.clone(),
            key,
            token: Mutex::new(None),
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.api_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    async fn bearer(&self) -> Result<String> {
        let mut slot = self.token.lock().await;
        if let Some(t) = slot.as_ref() {
            if t.is_fresh(Utc::now().timestamp()) {
                return Ok(t.token.clone());
            }
        }
        let fresh = match fetch_token(&self.http, &self.key).await {
            Ok(t) => {
                SHEET_REQUESTS.with_label_values(&["token", "ok"]).inc();
                t
            }
            Err(e) => {
                SHEET_REQUESTS.with_label_values(&["token", "err"]).inc();
                return Err(e);
            }
        };
        let token = fresh.token.clone();
        *slot = Some(fresh);
        Ok(token)
    }

    async fn get_inner(&self, range: &str) -> Result<Rows> {
        let token = self.bearer().await?;
        let rsp = self
            .http
            .get(self.values_url(range))
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = rsp.status();
        if !status.is_success() {
            let body = rsp.text().await.unwrap_or_default();
            return Err(status_error(status, range, body));
        }
        let vr = rsp
            .json::<ValueRange>()
            .await
            .map_err(|e| Error::RemoteConnection(format!("unreadable values response for {range}: {e}")))?;
        Ok(vr
            .values
            .into_iter()
            .map(|r| r.iter().map(cell_to_string).collect())
            .collect())
    }

    async fn update_inner(&self, range: &str, rows: &Rows) -> Result<()> {
        let token = self.bearer().await?;
        let body = UpdateBody { range, major_dimension: "ROWS", values: rows };
        let rsp = self
            .http
            .put(self.values_url(range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = rsp.status();
        if !status.is_success() {
            let body = rsp.text().await.unwrap_or_default();
            return Err(status_error(status, range, body));
        }
        Ok(())
    }
}

#[async_trait]
impl SheetStore for SheetsClient {
    async fn get(&self, range: &str) -> Result<Rows> {
        tracing::debug!(%range, "values.get");
        let res = self.get_inner(range).await;
        let label = if res.is_ok() { "ok" } else { "err" };
        SHEET_REQUESTS.with_label_values(&["get", label]).inc();
        if let Err(e) = &res {
            tracing::error!(%range, error = %e, "values.get failed");
        }
        res
    }

    async fn update(&self, range: &str, rows: Rows) -> Result<()> {
        tracing::debug!(%range, rows = rows.len(), "values.update");
        let res = self.update_inner(range, &rows).await;
        let label = if res.is_ok() { "ok" } else { "err" };
        SHEET_REQUESTS.with_label_values(&["update", label]).inc();
        if let Err(e) = &res {
            tracing::error!(%range, error = %e, "values.update failed");
        }
        res
    }
}

fn status_error(status: reqwest::StatusCode, range: &str, body: String) -> Error {
    match status.as_u16() {
        401 | 403 => Error::Credential(format!("{status} on {range}: {body}")),
        _ => Error::RemoteConnection(format!("{status} on {range}: {body}")),
    }
}

/// Sheets returns strings for formatted values but may send numbers/bools.
fn cell_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(true) => "TRUE".to_string(),
        serde_json::Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}
