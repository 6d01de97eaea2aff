//! Typed resource configuration
//!
//! Decodes the attribute tree of a deployment config into typed blocks.
//! Decoding is where the schema rules are enforced: enum membership, at most
//! one item per singleton block, and the canary/linear conflict.

use crate::aws::codedeploy::{
    ComputePlatform, MinimumHealthyHostsPerZoneType, MinimumHealthyHostsType, TrafficRoutingType,
};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Configuration of one `aws_codedeploy_deployment_config`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfigModel {
    pub deployment_config_name: String,
    /// Computed; present once the resource has been read
    #[serde(default)]
    pub deployment_config_id: Option<String>,
    #[serde(default, deserialize_with = "enum_or_default")]
    pub compute_platform: ComputePlatform,
    #[serde(default, deserialize_with = "singleton")]
    pub minimum_healthy_hosts: Option<MinimumHealthyHostsBlock>,
    #[serde(default, deserialize_with = "singleton")]
    pub traffic_routing_config: Option<TrafficRoutingBlock>,
    #[serde(default, deserialize_with = "singleton")]
    pub zonal_config: Option<ZonalBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinimumHealthyHostsBlock {
    #[serde(rename = "type", default, deserialize_with = "optional_enum")]
    pub kind: Option<MinimumHealthyHostsType>,
    #[serde(default, deserialize_with = "nullable")]
    pub value: i32,
}

/// Interval (minutes) and percentage of one time-based traffic shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeBasedStep {
    #[serde(default, deserialize_with = "nullable")]
    pub interval: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub percentage: i32,
}

/// Time-based shifting: canary or linear, never both
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBasedRouting {
    Canary(TimeBasedStep),
    Linear(TimeBasedStep),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TrafficRoutingAttributes")]
pub struct TrafficRoutingBlock {
    pub kind: Option<TrafficRoutingType>,
    pub routing: Option<TimeBasedRouting>,
}

/// Attribute form of `traffic_routing_config`, before the conflict check
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrafficRoutingAttributes {
    #[serde(rename = "type", default, deserialize_with = "optional_enum")]
    kind: Option<TrafficRoutingType>,
    #[serde(default, deserialize_with = "singleton")]
    time_based_canary: Option<TimeBasedStep>,
    #[serde(default, deserialize_with = "singleton")]
    time_based_linear: Option<TimeBasedStep>,
}

impl TryFrom<TrafficRoutingAttributes> for TrafficRoutingBlock {
    type Error = String;

    fn try_from(attrs: TrafficRoutingAttributes) -> Result<Self, Self::Error> {
        let routing = match (attrs.time_based_canary, attrs.time_based_linear) {
            (Some(_), Some(_)) => {
                return Err(
                    "\"traffic_routing_config.0.time_based_canary\": conflicts with traffic_routing_config.0.time_based_linear"
                        .to_string(),
                )
            }
            (Some(canary), None) => Some(TimeBasedRouting::Canary(canary)),
            (None, Some(linear)) => Some(TimeBasedRouting::Linear(linear)),
            (None, None) => None,
        };

        Ok(Self {
            kind: attrs.kind,
            routing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZonalBlock {
    #[serde(default)]
    pub first_zone_monitor_duration_in_seconds: Option<i64>,
    #[serde(default)]
    pub monitor_duration_in_seconds: Option<i64>,
    #[serde(default, deserialize_with = "singleton")]
    pub minimum_healthy_hosts_per_zone: Option<MinimumHealthyHostsPerZoneBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinimumHealthyHostsPerZoneBlock {
    #[serde(rename = "type", default, deserialize_with = "optional_enum")]
    pub kind: Option<MinimumHealthyHostsPerZoneType>,
    #[serde(default, deserialize_with = "nullable")]
    pub value: i32,
}

/// A list block with at most one element
fn singleton<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default();
    if items.len() > 1 {
        return Err(D::Error::invalid_length(items.len(), &"at most 1 item"));
    }
    Ok(items.into_iter().next())
}

/// An enum attribute; `""` and `null` mean unset
fn optional_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(D::Error::custom),
    }
}

fn enum_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    optional_enum(deserializer).map(Option::unwrap_or_default)
}

/// `null` reads as the type's zero value
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
