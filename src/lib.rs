//! CodeDeploy deployment config resource
//!
//! A typed implementation of the `aws_codedeploy_deployment_config` resource:
//! schema, expand/flatten mapping, and create/read/delete/import against the
//! CodeDeploy API.
//!
//! - [`aws`] - Credentials, SigV4 signing, HTTP transport and the CodeDeploy client
//! - [`resource`] - Schema, state, typed model, mapping and lifecycle
//! - [`config`] - Persistent provider settings

pub mod aws;
pub mod config;
pub mod resource;
