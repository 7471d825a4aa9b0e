// ===============================
// src/google.rs
// ===============================
//
// Helper auth service-account Google:
// - ServiceAccountKey: subset field dari file JSON key
// - assertion(): JWT RS256 (iss/scope/aud/iat/exp)
// - fetch_token(): tukar assertion -> bearer access token di token_uri
//
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Credential(format!("invalid service account JSON: {e}")))
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Signed JWT assertion for the token endpoint.
pub fn assertion(key: &ServiceAccountKey, now_secs: i64) -> Result<String> {
    let claims = Claims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now_secs,
        exp: now_secs + ASSERTION_LIFETIME_SECS,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| Error::Credential(format!("private_key is not a valid RSA PEM: {e}")))?;
    encode(&header, &claims, &signing_key).map_err(|e| Error::Credential(format!("sign assertion: {e}")))
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// Bearer token with absolute expiry (unix seconds).
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: i64,
}

impl AccessToken {
    /// Dianggap basi 60 detik sebelum expiry.
    pub fn is_fresh(&self, now_secs: i64) -> bool {
        now_secs + 60 < self.expires_at
    }
}

pub async fn fetch_token(http: &reqwest::Client, key: &ServiceAccountKey) -> Result<AccessToken> {
    let now = Utc::now().timestamp();
    let jwt = assertion(key, now)?;

    let rsp = http
        .post(&key.token_uri)
        .form(&[("grant_type", GRANT_TYPE), ("assertion", jwt.as_str())])
        .send()
        .await?;

    let status = rsp.status();
    if !status.is_success() {
        let body = rsp.text().await.unwrap_or_default();
        tracing::error!(%status, %body, "token exchange rejected");
        return Err(Error::Credential(format!("token endpoint returned {status}: {body}")));
    }

    let tr = rsp
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::Credential(format!("unreadable token response: {e}")))?;
    tracing::debug!(client = %key.client_email, expires_in = tr.expires_in, "access token obtained");
    Ok(AccessToken { token: tr.access_token, expires_at: now + tr.expires_in })
}
