//! CodeDeploy deployment config resource
//!
//! Create, read, delete and import for `aws_codedeploy_deployment_config`.
//! There is no update: every attribute forces replacement.

use super::mapping::{
    expand_deployment_config, flatten_minimum_healthy_hosts, flatten_traffic_routing_config,
    flatten_zonal_config,
};
use super::model::DeploymentConfigModel;
use super::state::ResourceData;
use crate::aws::client::DeployClient;
use crate::aws::codedeploy::{
    DeleteDeploymentConfigInput, DeploymentConfigInfo, GetDeploymentConfigInput,
    DEPLOYMENT_CONFIG_DOES_NOT_EXIST,
};
use crate::aws::error::{self, NotFoundError};
use anyhow::{Context, Result};

pub const RESOURCE_TYPE: &str = "aws_codedeploy_deployment_config";

/// Create the deployment config, then read it back into `d`
pub async fn create(client: &DeployClient, d: &mut ResourceData) -> Result<()> {
    let model: DeploymentConfigModel = d.decode()?;
    let name = model.deployment_config_name.clone();
    let input = expand_deployment_config(&model);

    tracing::info!("Creating CodeDeploy Deployment Config: {}", name);
    client
        .create_deployment_config(&input)
        .await
        .with_context(|| format!("creating CodeDeploy Deployment Config ({})", name))?;

    d.set_id(&name);
    d.mark_new_resource(true);

    let result = read(client, d).await;
    d.mark_new_resource(false);
    result
}

/// Refresh `d` from the service.
///
/// A config that has disappeared clears the id instead of failing, unless
/// it was created in this same operation.
pub async fn read(client: &DeployClient, d: &mut ResourceData) -> Result<()> {
    let found = find_deployment_config_by_name(client, d.id()).await;
    let config = match found {
        Err(err) if !d.is_new_resource() && error::is_not_found(&err) => {
            tracing::warn!(
                "CodeDeploy Deployment Config ({}) not found, removing from state",
                d.id()
            );
            d.set_id("");
            return Ok(());
        }
        result => result
            .with_context(|| format!("reading CodeDeploy Deployment Config ({})", d.id()))?,
    };

    set_attributes(d, &config)
}

fn set_attributes(d: &mut ResourceData, config: &DeploymentConfigInfo) -> Result<()> {
    d.set(
        "compute_platform",
        config
            .compute_platform
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or_default(),
    )?;
    d.set(
        "deployment_config_id",
        config.deployment_config_id.as_deref().unwrap_or_default(),
    )?;
    d.set(
        "deployment_config_name",
        config.deployment_config_name.as_deref().unwrap_or_default(),
    )?;
    d.set(
        "minimum_healthy_hosts",
        flatten_minimum_healthy_hosts(config.minimum_healthy_hosts.as_ref()),
    )
    .context("setting minimum_healthy_hosts")?;
    d.set(
        "traffic_routing_config",
        flatten_traffic_routing_config(config.traffic_routing_config.as_ref()),
    )
    .context("setting traffic_routing_config")?;
    d.set(
        "zonal_config",
        flatten_zonal_config(config.zonal_config.as_ref()),
    )
    .context("setting zonal_config")?;

    Ok(())
}

/// Delete the deployment config named by `d`'s id
pub async fn delete(client: &DeployClient, d: &ResourceData) -> Result<()> {
    tracing::info!("Deleting CodeDeploy Deployment Config: {}", d.id());

    client
        .delete_deployment_config(&DeleteDeploymentConfigInput {
            deployment_config_name: d.id().to_string(),
        })
        .await
        .with_context(|| format!("deleting CodeDeploy Deployment Config ({})", d.id()))
}

/// Import by name; the caller reads the state afterwards
pub fn import(id: &str) -> ResourceData {
    ResourceData::from_id(id)
}

/// Fetch a deployment config, mapping "does not exist" to [`NotFoundError`]
pub async fn find_deployment_config_by_name(
    client: &DeployClient,
    name: &str,
) -> Result<DeploymentConfigInfo> {
    let input = GetDeploymentConfigInput {
        deployment_config_name: name.to_string(),
    };
    let request = format!("{:?}", input);

    let output = match client.get_deployment_config(&input).await {
        Err(err) if error::is_a(&err, DEPLOYMENT_CONFIG_DOES_NOT_EXIST) => {
            return Err(NotFoundError::Missing {
                request,
                last_error: err.to_string(),
            }
            .into());
        }
        result => result?,
    };

    output
        .deployment_config_info
        .ok_or_else(|| NotFoundError::EmptyResult { request }.into())
}
