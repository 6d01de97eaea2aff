//! Deployment config resource
//!
//! This module implements the `aws_codedeploy_deployment_config` resource:
//! its schema, typed configuration, the expand/flatten mapping between
//! attribute records and CodeDeploy API shapes, and the lifecycle operations.
//!
//! # Architecture
//!
//! - [`schema`] - Attribute descriptions exposed to the host
//! - [`state`] - Per-instance state handle ([`ResourceData`])
//! - [`model`] - Typed configuration decoded from the attribute map
//! - [`mapping`] - Expand (config to request) and flatten (response to state)
//! - [`deployment_config`] - Create, read, delete and import
//!
//! # Example
//!
//! ```ignore
//! use tf_codedeploy::aws::client::{ClientSettings, DeployClient};
//! use tf_codedeploy::resource::{deployment_config, ResourceData};
//!
//! async fn create(config: serde_json::Map<String, serde_json::Value>) -> anyhow::Result<ResourceData> {
//!     let client = DeployClient::new(&ClientSettings::default()).await?;
//!     let mut data = ResourceData::from_config(config);
//!     deployment_config::create(&client, &mut data).await?;
//!     Ok(data)
//! }
//! ```

pub mod deployment_config;
pub mod mapping;
pub mod model;
pub mod schema;
pub mod state;

pub use schema::deployment_config_schema;
pub use state::ResourceData;
