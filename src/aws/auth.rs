//! AWS Authentication
//!
//! Resolves credentials and the target region through the standard provider
//! chain of `aws-config`: environment variables, the shared config and
//! credentials files (static keys, SSO, assumed roles, `credential_process`),
//! web identity and container or instance metadata.

use anyhow::{bail, Context, Result};
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;

/// Region used when nothing else is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Credentials used to sign requests
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

// Never print the secret
impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AwsCredentials {
    pub fn new(access_key_id: &str, secret_access_key: &str, session_token: Option<&str>) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: session_token.map(str::to_string),
        }
    }
}

impl From<&Credentials> for AwsCredentials {
    fn from(credentials: &Credentials) -> Self {
        Self::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token(),
        )
    }
}

/// Credentials and region for one client
#[derive(Debug, Clone)]
pub struct ResolvedAuth {
    pub credentials: AwsCredentials,
    pub region: String,
}

/// Resolve credentials and region.
///
/// `profile` takes precedence over `AWS_PROFILE`. `region` replaces whatever
/// the chain would pick; without either the region is [`DEFAULT_REGION`].
pub async fn resolve(profile: Option<&str>, region: Option<&str>) -> Result<ResolvedAuth> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    let sdk_config = loader.load().await;

    let region = match sdk_config.region() {
        Some(region) => region.as_ref().to_string(),
        None => {
            tracing::debug!("No region configured, using {}", DEFAULT_REGION);
            DEFAULT_REGION.to_string()
        }
    };
    if !validate_region(&region) {
        bail!("Invalid region: {}", region);
    }

    let provider = sdk_config
        .credentials_provider()
        .context("No AWS credentials provider configured")?;
    let credentials = provider.provide_credentials().await.with_context(|| {
        format!(
            "No AWS credentials found for profile '{}'",
            profile.unwrap_or("default")
        )
    })?;

    Ok(ResolvedAuth {
        credentials: AwsCredentials::from(&credentials),
        region,
    })
}

/// Validate a region name: lowercase letters, digits and hyphens
fn validate_region(region: &str) -> bool {
    !region.is_empty()
        && region.len() <= 32
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
