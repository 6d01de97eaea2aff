//! Resource schema
//!
//! Describes every attribute of the deployment config resource so a host can
//! show, validate or diff it. The rules described here are enforced when the
//! attribute map is decoded into [`DeploymentConfigModel`](super::model::DeploymentConfigModel).

use crate::aws::codedeploy::{
    ComputePlatform, MinimumHealthyHostsPerZoneType, MinimumHealthyHostsType, TrafficRoutingType,
};
use serde::Serialize;
use serde_json::Value;

/// Attribute value type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AttributeType {
    String,
    Int,
    /// Nested block stored as a list of records
    List { max_items: usize, block: Block },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub kind: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    /// Changing the value replaces the resource
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl Attribute {
    fn new(name: &str, kind: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            optional: true,
            computed: false,
            force_new: false,
            default: None,
            conflicts_with: Vec::new(),
            allowed_values: Vec::new(),
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, AttributeType::Int)
    }

    /// A nested block holding at most one record
    pub fn singleton(name: &str, block: Block) -> Self {
        Self::new(name, AttributeType::List { max_items: 1, block })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self.optional = false;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn conflicts_with(mut self, path: &str) -> Self {
        self.conflicts_with.push(path.to_string());
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed_values = values.iter().map(|v| v.to_string()).collect();
        self
    }
}

/// A set of attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub attributes: Vec<Attribute>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Look up a nested attribute by dotted path, e.g. `zonal_config.monitor_duration_in_seconds`
    pub fn lookup(&self, path: &str) -> Option<&Attribute> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        let attribute = self.get(head)?;
        match (rest, &attribute.kind) {
            (None, _) => Some(attribute),
            (Some(rest), AttributeType::List { block, .. }) => block.lookup(rest),
            (Some(_), _) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub type_name: String,
    pub version: u32,
    pub block: Block,
}

/// Every attribute inside this block is force-new, like the block itself
fn threshold_block(types: &[&str]) -> Block {
    Block::new()
        .attribute(Attribute::string("type").force_new().one_of(types))
        .attribute(Attribute::int("value").force_new())
}

fn time_based_step_block() -> Block {
    Block::new()
        .attribute(Attribute::int("interval").force_new())
        .attribute(Attribute::int("percentage").force_new())
}

/// Schema of `aws_codedeploy_deployment_config`
pub fn deployment_config_schema() -> ResourceSchema {
    let traffic_routing = Block::new()
        .attribute(
            Attribute::singleton("time_based_canary", time_based_step_block())
                .force_new()
                .conflicts_with("traffic_routing_config.0.time_based_linear"),
        )
        .attribute(
            Attribute::singleton("time_based_linear", time_based_step_block())
                .force_new()
                .conflicts_with("traffic_routing_config.0.time_based_canary"),
        )
        .attribute(
            Attribute::string("type")
                .force_new()
                .one_of(TrafficRoutingType::VALUES),
        );

    let zonal = Block::new()
        .attribute(Attribute::int("first_zone_monitor_duration_in_seconds").force_new())
        .attribute(
            Attribute::singleton(
                "minimum_healthy_hosts_per_zone",
                threshold_block(MinimumHealthyHostsPerZoneType::VALUES),
            )
            .force_new(),
        )
        .attribute(Attribute::int("monitor_duration_in_seconds").force_new());

    let block = Block::new()
        .attribute(
            Attribute::string("compute_platform")
                .force_new()
                .with_default(ComputePlatform::default().as_str())
                .one_of(ComputePlatform::VALUES),
        )
        .attribute(Attribute::string("deployment_config_id").computed())
        .attribute(
            Attribute::string("deployment_config_name")
                .required()
                .force_new(),
        )
        .attribute(
            Attribute::singleton(
                "minimum_healthy_hosts",
                threshold_block(MinimumHealthyHostsType::VALUES),
            )
            .force_new(),
        )
        .attribute(Attribute::singleton("traffic_routing_config", traffic_routing).force_new())
        .attribute(Attribute::singleton("zonal_config", zonal).force_new());

    ResourceSchema {
        type_name: super::deployment_config::RESOURCE_TYPE.to_string(),
        version: 0,
        block,
    }
}
