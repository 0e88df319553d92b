//! Eureka XML wire model.
//!
//! Element names and the split attribute/text representation of ports
//! are fixed by the Eureka REST protocol and must round-trip exactly.
//! Optional fields are omitted from output when absent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The data center name used for self-hosted (non-AWS) deployments.
pub const DEFAULT_DATA_CENTER: &str = "MyOwn";

/// Lifecycle status of a registered instance.
///
/// The first three are set by clients; the server may additionally
/// assign states such as `OUT_OF_SERVICE` through status overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    /// Ready to receive traffic.
    Up,
    /// Not ready to receive traffic.
    Down,
    /// Initializing, not yet ready.
    Starting,
    /// Taken out of rotation by a server-side override.
    OutOfService,
    /// Any state this client does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Starting => "STARTING",
            Self::OutOfService => "OUT_OF_SERVICE",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

impl FromStr for InstanceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "UP" => Self::Up,
            "DOWN" => Self::Down,
            "STARTING" => Self::Starting,
            "OUT_OF_SERVICE" => Self::OutOfService,
            _ => Self::Unknown,
        })
    }
}

/// A port with its enabled flag.
///
/// Serialized as `<port enabled="true">8080</port>`: the value is
/// element text and the flag is an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Whether the port is active for traffic.
    #[serde(rename = "@enabled")]
    pub enabled: bool,
    /// The port number.
    #[serde(rename = "$text")]
    pub value: u16,
}

/// Data center descriptor. `MyOwn` for self-hosted, `Amazon` for AWS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCenterInfo {
    /// Data center name.
    pub name: String,
}

impl Default for DataCenterInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATA_CENTER.to_string(),
        }
    }
}

/// Lease settings governing server-side eviction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseInfo {
    /// Seconds without a heartbeat after which the server may evict
    /// the instance.
    #[serde(rename = "evictionDurationInSecs", default)]
    pub eviction_duration_in_secs: u32,
}

/// One registered service process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "instance")]
pub struct Instance {
    /// Host name the instance is reachable at.
    #[serde(rename = "hostName")]
    pub host_name: String,
    /// Application the instance belongs to.
    pub app: String,
    /// IP address of the instance.
    #[serde(rename = "ipAddr")]
    pub ip_addr: String,
    /// Virtual address for logical-service queries.
    #[serde(rename = "vipAddress", default, skip_serializing_if = "Option::is_none")]
    pub vip_address: Option<String>,
    /// Virtual address for secure logical-service queries.
    #[serde(
        rename = "secureVipAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub secure_vip_address: Option<String>,
    /// Current lifecycle status.
    pub status: InstanceStatus,
    /// Plain HTTP port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Port>,
    /// TLS port.
    #[serde(rename = "securePort", default, skip_serializing_if = "Option::is_none")]
    pub secure_port: Option<Port>,
    /// Home page URL.
    #[serde(rename = "homePageUrl", default, skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
    /// Status page URL.
    #[serde(
        rename = "statusPageUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_page_url: Option<String>,
    /// Health check URL.
    #[serde(
        rename = "healthCheckUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_url: Option<String>,
    /// Data center descriptor.
    #[serde(rename = "dataCenterInfo")]
    pub data_center_info: DataCenterInfo,
    /// Lease settings.
    #[serde(rename = "leaseInfo", default, skip_serializing_if = "Option::is_none")]
    pub lease_info: Option<LeaseInfo>,
    /// Free-form key/value metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    /// Instance identifier, `host:app:port`.
    #[serde(rename = "instanceId", default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Server-side status override, if any.
    #[serde(
        rename = "overriddenstatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub overridden_status: Option<String>,
    /// Whether this instance is a coordinating discovery server.
    #[serde(
        rename = "isCoordinatingDiscoveryServer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_coordinating_discovery_server: Option<String>,
    /// Server-maintained last-update timestamp.
    #[serde(
        rename = "lastUpdatedTimestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated_timestamp: Option<String>,
    /// Server-maintained last-dirty timestamp.
    #[serde(
        rename = "lastDirtyTimestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_dirty_timestamp: Option<String>,
    /// Registry action that produced this record (ADDED, MODIFIED, ...).
    #[serde(rename = "actionType", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    /// Country identifier.
    #[serde(rename = "countryId", default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
}

/// A named group of instances, as returned by query operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "application")]
pub struct Application {
    /// Application name.
    pub name: String,
    /// Registered instances of the application.
    #[serde(rename = "instance", default)]
    pub instances: Vec<Instance>,
}

/// The full registry snapshot.
///
/// The hash/version fields are incremental-fetch bookkeeping owned by
/// the server and passed through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "applications")]
pub struct Applications {
    /// Delta version counter.
    #[serde(
        rename = "versions__delta",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub versions_delta: Option<String>,
    /// Hash over the registered applications.
    #[serde(
        rename = "apps__hashcode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub apps_hashcode: Option<String>,
    /// The registered applications.
    #[serde(rename = "application", default)]
    pub applications: Vec<Application>,
}
