use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{Display, EnumString};

/// State reported by the cloud for a multishare instance.
///
/// Anything the cloud reports beyond the states the driver acts on must
/// round-trip unchanged, hence the `Other` rendition.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(from = "String", into = "String")]
pub enum InstanceState {
    /// The instance is being brought up and cannot host shares yet.
    Creating,
    /// The instance is serving and may host new shares.
    Ready,
    /// The instance is under repair and temporarily unusable.
    Repairing,
    /// Any state the driver does not act on.
    Other(String),
}

impl Default for InstanceState {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for InstanceState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "CREATING" => Self::Creating,
            "READY" => Self::Ready,
            "REPAIRING" => Self::Repairing,
            _ => Self::Other(state),
        }
    }
}
impl From<InstanceState> for String {
    fn from(state: InstanceState) -> String {
        state.to_string()
    }
}
impl std::fmt::Display for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Creating => write!(f, "CREATING"),
            Self::Ready => write!(f, "READY"),
            Self::Repairing => write!(f, "REPAIRING"),
            Self::Other(state) => write!(f, "{state}"),
        }
    }
}

/// How an instance attaches to the tenant network.
#[derive(Serialize, Deserialize, Display, EnumString, Debug, Clone, Copy, Eq, PartialEq, Default)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectMode {
    /// Directly peered into the tenant VPC.
    #[default]
    DirectPeering,
    /// Attached through a private service access connection.
    PrivateServiceAccess,
}

/// Network attachment of a multishare instance.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceNetwork {
    /// Name of the VPC network the instance is attached to.
    pub name: String,
    /// The attachment mode.
    pub connect_mode: ConnectMode,
    /// Named address range, or CIDR, the instance's addresses come from.
    pub reserved_ip_range: String,
    /// The address assigned to the instance.
    pub ip: String,
}

/// A managed file server able to host multiple logical shares.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultishareInstance {
    /// The cloud project owning the instance.
    pub project: String,
    /// The cloud location hosting the instance.
    pub location: String,
    /// Instance name, unique within project and location.
    pub name: String,
    /// Service tier of the instance.
    pub tier: String,
    /// File-system protocol exposed by the instance's shares.
    pub protocol: String,
    /// Network attachment.
    pub network: InstanceNetwork,
    /// Provisioned capacity of the instance.
    pub capacity_bytes: u64,
    /// Capacity granularity, in GiB, the cloud enforces for resizes.
    pub capacity_step_size_gb: u64,
    /// How many shares the instance may host.
    pub max_share_count: usize,
    /// Customer managed encryption key, if any.
    pub kms_key_name: String,
    /// Cloud labels attached to the instance.
    pub labels: HashMap<String, String>,
    /// State last reported by the cloud.
    pub state: InstanceState,
}

impl MultishareInstance {
    /// The canonical resource URI inspected by the operation interlocks.
    pub fn uri(&self) -> String {
        format!(
            "projects/{}/locations/{}/instances/{}",
            self.project, self.location, self.name
        )
    }
}

impl std::fmt::Display for MultishareInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.location, self.name)
    }
}
