//! CodeDeploy API shapes
//!
//! Request and response types for the deployment config operations, in the
//! service's JSON wire format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Target prefix for every CodeDeploy operation
pub const TARGET_PREFIX: &str = "CodeDeploy_20141006";

/// Exception returned when a deployment config name is unknown
pub const DEPLOYMENT_CONFIG_DOES_NOT_EXIST: &str = "DeploymentConfigDoesNotExistException";

/// Error for a string that is not a member of an enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {name} to be one of {expected:?}, got {got:?}")]
pub struct UnknownVariant {
    pub name: &'static str,
    pub expected: &'static [&'static str],
    pub got: String,
}

/// Declare a string-valued API enum with its wire names.
///
/// Deserializing is open: a value added to the service later becomes
/// `Unknown` and is carried through unchanged. `FromStr` stays closed and
/// only accepts the declared names.
macro_rules! api_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A value this client does not know
            Unknown(String),
        }

        impl $name {
            /// All known wire values, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unknown(value) => value.as_str(),
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        name: stringify!($name),
                        expected: Self::VALUES,
                        got: s.to_string(),
                    }),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.parse() {
                    Ok(known) => known,
                    Err(_) => Self::Unknown(value),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

api_enum!(
    /// Platform the deployment config applies to
    ComputePlatform {
        Server => "Server",
        Lambda => "Lambda",
        Ecs => "ECS",
    }
);

impl Default for ComputePlatform {
    fn default() -> Self {
        Self::Server
    }
}

api_enum!(
    MinimumHealthyHostsType {
        HostCount => "HOST_COUNT",
        FleetPercent => "FLEET_PERCENT",
    }
);

api_enum!(
    MinimumHealthyHostsPerZoneType {
        HostCount => "HOST_COUNT",
        FleetPercent => "FLEET_PERCENT",
    }
);

api_enum!(
    /// How traffic is shifted during a Lambda or ECS deployment
    TrafficRoutingType {
        TimeBasedCanary => "TimeBasedCanary",
        TimeBasedLinear => "TimeBasedLinear",
        AllAtOnce => "AllAtOnce",
    }
);

fn is_zero(v: &i32) -> bool {
    *v == 0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumHealthyHosts {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MinimumHealthyHostsType>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub value: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBasedCanary {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub canary_percentage: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub canary_interval: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBasedLinear {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub linear_percentage: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub linear_interval: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRoutingConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TrafficRoutingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_based_canary: Option<TimeBasedCanary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_based_linear: Option<TimeBasedLinear>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumHealthyHostsPerZone {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MinimumHealthyHostsPerZoneType>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub value: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_zone_monitor_duration_in_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_healthy_hosts_per_zone: Option<MinimumHealthyHostsPerZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_duration_in_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentConfigInput {
    pub deployment_config_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_healthy_hosts: Option<MinimumHealthyHosts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_routing_config: Option<TrafficRoutingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_platform: Option<ComputePlatform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zonal_config: Option<ZonalConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentConfigOutput {
    #[serde(default)]
    pub deployment_config_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeploymentConfigInput {
    pub deployment_config_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeploymentConfigOutput {
    #[serde(default)]
    pub deployment_config_info: Option<DeploymentConfigInfo>,
}

/// A deployment config as returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigInfo {
    #[serde(default)]
    pub deployment_config_id: Option<String>,
    #[serde(default)]
    pub deployment_config_name: Option<String>,
    #[serde(default)]
    pub minimum_healthy_hosts: Option<MinimumHealthyHosts>,
    /// Seconds since the epoch
    #[serde(default)]
    pub create_time: Option<f64>,
    #[serde(default)]
    pub compute_platform: Option<ComputePlatform>,
    #[serde(default)]
    pub traffic_routing_config: Option<TrafficRoutingConfig>,
    #[serde(default)]
    pub zonal_config: Option<ZonalConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDeploymentConfigInput {
    pub deployment_config_name: String,
}
