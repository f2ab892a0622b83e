use super::{transport_string_id, MultishareInstance};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

transport_string_id!(ShareName, "Name of a share, unique across the cluster");

impl ShareName {
    /// Derive the canonical share name from a CSI volume name.
    ///
    /// The cloud restricts share names to `[a-z0-9_]`, volume names are
    /// kubernetes object names. The transform must stay deterministic so that
    /// retried creates for the same volume converge onto one share.
    pub fn from_volume(volume_name: &str) -> Self {
        Self(volume_name.to_ascii_lowercase().replace('-', "_"))
    }
}

/// A logical volume carved out of a multishare instance.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    /// Share name, unique across the cluster.
    pub name: ShareName,
    /// The instance hosting this share.
    pub parent: MultishareInstance,
    /// Capacity of the share.
    pub capacity_bytes: u64,
    /// Export name the workload mounts.
    pub mount_name: String,
    /// Cloud labels attached to the share.
    pub labels: HashMap<String, String>,
    /// Snapshot the share is restored from, if any.
    pub source_snapshot_id: Option<String>,
}

impl Share {
    /// A new share descriptor bound to the given instance.
    pub fn on_instance(
        name: ShareName,
        parent: &MultishareInstance,
        capacity_bytes: u64,
        labels: HashMap<String, String>,
        source_snapshot_id: Option<String>,
    ) -> Self {
        Self {
            mount_name: name.to_string(),
            name,
            parent: parent.clone(),
            capacity_bytes,
            labels,
            source_snapshot_id,
        }
    }

    /// The canonical resource URI inspected by the operation interlocks.
    pub fn uri(&self) -> String {
        format!("{}/shares/{}", self.parent.uri(), self.name)
    }
}

/// Accessibility constraints of a create request, as zones the workload may
/// be scheduled into.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Eq, PartialEq)]
pub struct TopologyRequirement {
    /// Zones the provisioned share must be reachable from.
    pub zones: Vec<String>,
}

/// The validated create request handed over by the CSI frontend.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// The CSI volume name, e.g. `pvc-<uuid>`.
    pub name: String,
    /// Requested share capacity.
    pub capacity_bytes: u64,
    /// Storage class parameters, passed through verbatim.
    pub parameters: HashMap<String, String>,
    /// Accessibility requirement, if the cluster constrains placement.
    pub topology: Option<TopologyRequirement>,
}
