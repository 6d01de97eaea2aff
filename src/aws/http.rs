//! HTTP utilities for AWS JSON 1.1 API calls

use super::auth::AwsCredentials;
use super::error::ApiError;
use super::sigv4::{self, SigningRequest};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Signed HTTP client for one AWS JSON service endpoint
#[derive(Clone)]
pub struct AwsHttpClient {
    client: Client,
    endpoint: Url,
    /// Value of the `host` header that gets signed
    host: String,
    region: String,
    service: String,
    credentials: AwsCredentials,
}

impl AwsHttpClient {
    /// Create a new HTTP client
    pub fn new(
        endpoint: &str,
        region: &str,
        service: &str,
        credentials: AwsCredentials,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => anyhow::bail!("Endpoint URL has no host: {}", endpoint),
        };

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            host,
            region: region.to_string(),
            service: service.to_string(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Call an operation; `target` is the full `X-Amz-Target` value
    pub async fn post(&self, target: &str, body: &Value) -> Result<Value> {
        tracing::debug!("POST {} ({})", self.endpoint, target);

        let payload = serde_json::to_vec(body).context("Failed to serialize request")?;
        let now = chrono::Utc::now();
        let amz_date = sigv4::amz_date(now);

        let mut headers = vec![
            ("content-type", CONTENT_TYPE),
            ("host", self.host.as_str()),
            ("x-amz-date", amz_date.as_str()),
            ("x-amz-target", target),
        ];
        if let Some(token) = self.credentials.session_token.as_deref() {
            headers.push(("x-amz-security-token", token));
        }

        let signed = sigv4::sign(
            &SigningRequest {
                method: "POST",
                path: self.endpoint.path(),
                query: self.endpoint.query().unwrap_or(""),
                headers: &headers,
                payload: &payload,
            },
            &self.credentials,
            &self.region,
            &self.service,
            now,
        )?;

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-target", target)
            .header("authorization", &signed.authorization);
        if let Some(token) = signed.security_token.as_deref() {
            request = request.header("x-amz-security-token", token);
        }

        let response = request
            .body(payload)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Callers decide how loud an error is; some are expected
            tracing::debug!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(ApiError::from_body(status.as_u16(), &response_body).into());
        }

        // Handle empty response
        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).context("Failed to parse response JSON")
    }
}
