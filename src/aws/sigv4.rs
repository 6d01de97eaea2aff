//! AWS Signature Version 4
//!
//! Signs requests for AWS JSON services. Only what this crate sends is
//! supported: a fixed set of headers and an already-encoded query string.

use super::auth::AwsCredentials;
use anyhow::Result;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// A request to be signed
pub struct SigningRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    /// Canonical (sorted, encoded) query string, or empty
    pub query: &'a str,
    /// Header name/value pairs; names are lowercased during signing
    pub headers: &'a [(&'a str, &'a str)],
    pub payload: &'a [u8],
}

/// Headers to add to the outgoing request
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub authorization: String,
    pub security_token: Option<String>,
}

/// Format a timestamp as `YYYYMMDD'T'HHMMSS'Z'`
pub fn amz_date(time: DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| anyhow::anyhow!("HMAC key error: {}", e))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the signing key for a date/region/service scope
pub fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), date)?;
    let k_region = hmac(&k_date, region)?;
    let k_service = hmac(&k_region, service)?;
    hmac(&k_service, "aws4_request")
}

/// Build the canonical request and the `;`-joined signed header list
fn canonical_request(req: &SigningRequest<'_>) -> (String, String) {
    let mut headers: Vec<(String, String)> = req
        .headers
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    headers.sort();

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}\n", k, v))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        req.method,
        req.path,
        req.query,
        canonical_headers,
        signed_headers,
        sha256_hex(req.payload)
    );

    (canonical, signed_headers)
}

/// Sign a request.
///
/// `req.headers` must already contain `host` and `x-amz-date` (and
/// `x-amz-security-token` when using temporary credentials).
pub fn sign(
    req: &SigningRequest<'_>,
    credentials: &AwsCredentials,
    region: &str,
    service: &str,
    time: DateTime<Utc>,
) -> Result<SignedHeaders> {
    let amz_date = amz_date(time);
    let date = &amz_date[..8];
    let scope = format!("{}/{}/{}/aws4_request", date, region, service);

    let (canonical, signed_headers) = canonical_request(req);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        sha256_hex(canonical.as_bytes())
    );

    let key = signing_key(&credentials.secret_access_key, date, region, service)?;
    let signature = hex::encode(hmac(&key, &string_to_sign)?);

    Ok(SignedHeaders {
        authorization: format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, credentials.access_key_id, scope, signed_headers, signature
        ),
        amz_date,
        security_token: credentials.session_token.clone(),
    })
}
