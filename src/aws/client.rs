//! CodeDeploy Client
//!
//! Main client for the CodeDeploy API, combining credential resolution,
//! request signing and the typed deployment config operations.

use super::auth::{self, AwsCredentials};
use super::codedeploy::{
    CreateDeploymentConfigInput, CreateDeploymentConfigOutput, DeleteDeploymentConfigInput,
    GetDeploymentConfigInput, GetDeploymentConfigOutput, TARGET_PREFIX,
};
use super::http::AwsHttpClient;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Signing name of the service
pub const SERVICE: &str = "codedeploy";

/// Settings used to build a [`DeployClient`]; unset fields are resolved
/// through the AWS provider chain
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
}

/// Regional CodeDeploy endpoint
pub fn codedeploy_endpoint(region: &str) -> String {
    let suffix = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    format!("https://{}.{}.{}/", SERVICE, region, suffix)
}

/// CodeDeploy API client
#[derive(Clone)]
pub struct DeployClient {
    pub http: AwsHttpClient,
}

impl DeployClient {
    /// Create a client, resolving credentials and region
    pub async fn new(settings: &ClientSettings) -> Result<Self> {
        let auth = auth::resolve(settings.profile.as_deref(), settings.region.as_deref())
            .await
            .context("Failed to initialize AWS credentials")?;

        let endpoint = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| codedeploy_endpoint(&auth.region));

        tracing::info!("Using region: {}, endpoint: {}", auth.region, endpoint);

        Self::with_credentials(&endpoint, &auth.region, auth.credentials, settings.timeout)
    }

    /// Create a client from explicit parts
    pub fn with_credentials(
        endpoint: &str,
        region: &str,
        credentials: AwsCredentials,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let http = AwsHttpClient::new(endpoint, region, SERVICE, credentials, timeout)?;
        Ok(Self { http })
    }

    async fn call<I, O>(&self, operation: &str, input: &I) -> Result<O>
    where
        I: Serialize,
        O: DeserializeOwned + Default,
    {
        let body = serde_json::to_value(input).context("Failed to serialize request")?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        let response = self.http.post(&target, &body).await?;

        if response.is_null() {
            return Ok(O::default());
        }

        serde_json::from_value(response)
            .with_context(|| format!("Failed to parse {} response", operation))
    }

    pub async fn create_deployment_config(
        &self,
        input: &CreateDeploymentConfigInput,
    ) -> Result<CreateDeploymentConfigOutput> {
        self.call("CreateDeploymentConfig", input).await
    }

    pub async fn get_deployment_config(
        &self,
        input: &GetDeploymentConfigInput,
    ) -> Result<GetDeploymentConfigOutput> {
        self.call("GetDeploymentConfig", input).await
    }

    pub async fn delete_deployment_config(&self, input: &DeleteDeploymentConfigInput) -> Result<()> {
        let _: serde_json::Value = self.call("DeleteDeploymentConfig", input).await?;
        Ok(())
    }
}
