//! Expand/flatten mapping
//!
//! `expand_*` turns typed configuration blocks into CodeDeploy request
//! shapes; `flatten_*` turns response shapes back into attribute records.
//!
//! Flattening an absent block yields an empty list, except for the zonal
//! config blocks, which yield `None` (stored as `null`). Existing state
//! written by earlier releases depends on that difference.

use super::model::{
    DeploymentConfigModel, MinimumHealthyHostsBlock, MinimumHealthyHostsPerZoneBlock,
    TimeBasedRouting, TimeBasedStep, TrafficRoutingBlock, ZonalBlock,
};
use crate::aws::codedeploy::{
    CreateDeploymentConfigInput, MinimumHealthyHosts, MinimumHealthyHostsPerZone,
    TimeBasedCanary, TimeBasedLinear, TrafficRoutingConfig, ZonalConfig,
};
use serde_json::{Map, Value};

/// One element of a list block
pub type Record = Map<String, Value>;

fn enum_value(value: Option<&str>) -> Value {
    Value::String(value.unwrap_or_default().to_string())
}

// =============================================================================
// Expand
// =============================================================================

pub fn expand_deployment_config(model: &DeploymentConfigModel) -> CreateDeploymentConfigInput {
    CreateDeploymentConfigInput {
        deployment_config_name: model.deployment_config_name.clone(),
        compute_platform: Some(model.compute_platform.clone()),
        minimum_healthy_hosts: expand_minimum_healthy_hosts(model.minimum_healthy_hosts.as_ref()),
        traffic_routing_config: expand_traffic_routing_config(
            model.traffic_routing_config.as_ref(),
        ),
        zonal_config: expand_zonal_config(model.zonal_config.as_ref()),
    }
}

pub fn expand_minimum_healthy_hosts(
    block: Option<&MinimumHealthyHostsBlock>,
) -> Option<MinimumHealthyHosts> {
    let block = block?;
    Some(MinimumHealthyHosts {
        kind: block.kind.clone(),
        value: block.value,
    })
}

pub fn expand_traffic_routing_config(
    block: Option<&TrafficRoutingBlock>,
) -> Option<TrafficRoutingConfig> {
    let block = block?;
    let mut config = TrafficRoutingConfig {
        kind: block.kind.clone(),
        ..Default::default()
    };

    match block.routing {
        Some(TimeBasedRouting::Canary(step)) => {
            config.time_based_canary = Some(expand_time_based_canary(&step))
        }
        Some(TimeBasedRouting::Linear(step)) => {
            config.time_based_linear = Some(expand_time_based_linear(&step))
        }
        None => {}
    }

    Some(config)
}

fn expand_time_based_canary(step: &TimeBasedStep) -> TimeBasedCanary {
    TimeBasedCanary {
        canary_interval: step.interval,
        canary_percentage: step.percentage,
    }
}

fn expand_time_based_linear(step: &TimeBasedStep) -> TimeBasedLinear {
    TimeBasedLinear {
        linear_interval: step.interval,
        linear_percentage: step.percentage,
    }
}

pub fn expand_zonal_config(block: Option<&ZonalBlock>) -> Option<ZonalConfig> {
    let block = block?;
    Some(ZonalConfig {
        first_zone_monitor_duration_in_seconds: block.first_zone_monitor_duration_in_seconds,
        monitor_duration_in_seconds: block.monitor_duration_in_seconds,
        minimum_healthy_hosts_per_zone: block
            .minimum_healthy_hosts_per_zone
            .as_ref()
            .map(expand_minimum_healthy_hosts_per_zone),
    })
}

fn expand_minimum_healthy_hosts_per_zone(
    block: &MinimumHealthyHostsPerZoneBlock,
) -> MinimumHealthyHostsPerZone {
    MinimumHealthyHostsPerZone {
        kind: block.kind.clone(),
        value: block.value,
    }
}

// =============================================================================
// Flatten
// =============================================================================

pub fn flatten_minimum_healthy_hosts(hosts: Option<&MinimumHealthyHosts>) -> Vec<Record> {
    let Some(hosts) = hosts else {
        return Vec::new();
    };

    let mut item = Record::new();
    item.insert("type".into(), enum_value(hosts.kind.as_ref().map(|k| k.as_str())));
    item.insert("value".into(), Value::from(hosts.value));

    vec![item]
}

pub fn flatten_traffic_routing_config(config: Option<&TrafficRoutingConfig>) -> Vec<Record> {
    let Some(config) = config else {
        return Vec::new();
    };

    let mut item = Record::new();
    item.insert("type".into(), enum_value(config.kind.as_ref().map(|k| k.as_str())));
    item.insert(
        "time_based_canary".into(),
        records(flatten_time_based_canary(config.time_based_canary.as_ref())),
    );
    item.insert(
        "time_based_linear".into(),
        records(flatten_time_based_linear(config.time_based_linear.as_ref())),
    );

    vec![item]
}

pub fn flatten_time_based_canary(canary: Option<&TimeBasedCanary>) -> Vec<Record> {
    let Some(canary) = canary else {
        return Vec::new();
    };

    let mut item = Record::new();
    item.insert("interval".into(), Value::from(canary.canary_interval));
    item.insert("percentage".into(), Value::from(canary.canary_percentage));

    vec![item]
}

pub fn flatten_time_based_linear(linear: Option<&TimeBasedLinear>) -> Vec<Record> {
    let Some(linear) = linear else {
        return Vec::new();
    };

    let mut item = Record::new();
    item.insert("interval".into(), Value::from(linear.linear_interval));
    item.insert("percentage".into(), Value::from(linear.linear_percentage));

    vec![item]
}

/// `None` when the service returned no zonal config
pub fn flatten_zonal_config(config: Option<&ZonalConfig>) -> Option<Vec<Record>> {
    let config = config?;

    let mut item = Record::new();
    item.insert(
        "first_zone_monitor_duration_in_seconds".into(),
        Value::from(config.first_zone_monitor_duration_in_seconds),
    );
    item.insert(
        "minimum_healthy_hosts_per_zone".into(),
        flatten_minimum_healthy_hosts_per_zone(config.minimum_healthy_hosts_per_zone.as_ref())
            .map(records)
            .unwrap_or(Value::Null),
    );
    item.insert(
        "monitor_duration_in_seconds".into(),
        Value::from(config.monitor_duration_in_seconds),
    );

    Some(vec![item])
}

/// `None` when the zonal config has no per-zone threshold
pub fn flatten_minimum_healthy_hosts_per_zone(
    config: Option<&MinimumHealthyHostsPerZone>,
) -> Option<Vec<Record>> {
    let config = config?;

    let mut item = Record::new();
    item.insert("type".into(), enum_value(config.kind.as_ref().map(|k| k.as_str())));
    item.insert("value".into(), Value::from(config.value));

    Some(vec![item])
}

fn records(items: Vec<Record>) -> Value {
    Value::Array(items.into_iter().map(Value::Object).collect())
}
