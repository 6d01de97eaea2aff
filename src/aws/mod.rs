//! AWS API interaction module
//!
//! This module provides the pieces needed to talk to the CodeDeploy JSON API:
//! credentials, request signing, the HTTP transport and the typed operations.
//!
//! # Module Structure
//!
//! - [`auth`] - Credential and region resolution through the AWS provider chain
//! - [`sigv4`] - AWS Signature Version 4 request signing
//! - [`http`] - Signed HTTP transport for JSON 1.1 services
//! - [`client`] - CodeDeploy client with typed operations
//! - [`codedeploy`] - CodeDeploy request/response shapes
//! - [`error`] - Service and not-found errors
//!
//! # Example
//!
//! ```ignore
//! use tf_codedeploy::aws::client::{ClientSettings, DeployClient};
//! use tf_codedeploy::aws::codedeploy::GetDeploymentConfigInput;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = DeployClient::new(&ClientSettings::default()).await?;
//!     let output = client
//!         .get_deployment_config(&GetDeploymentConfigInput {
//!             deployment_config_name: "CodeDeployDefault.OneAtATime".to_string(),
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod codedeploy;
pub mod error;
pub mod http;
pub mod sigv4;
