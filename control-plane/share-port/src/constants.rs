//! Various common constants used by the control plane.

/// One GiB in bytes.
pub const GIB: u64 = 1024 * 1024 * 1024;
/// One TiB in bytes.
pub const TIB: u64 = 1024 * GIB;

/// Smallest capacity the cloud accepts for a multishare instance.
pub const MIN_INSTANCE_SIZE_BYTES: u64 = TIB;
/// Largest capacity the cloud accepts for a multishare instance.
pub const MAX_INSTANCE_SIZE_BYTES: u64 = 10 * TIB;

/// Shares placed per instance when the configurable share limit feature is
/// disabled, irrespective of what the instance itself reports.
pub const MAX_SHARES_PER_INSTANCE: usize = 10;

/// Capacity granularity assumed for instance resizes until the cloud reports
/// the instance's own step size.
pub const DEFAULT_CAPACITY_STEP_SIZE_GB: u64 = 256;

/// Instance label carrying the storage class the instance was provisioned for.
pub const STORAGE_CLASS_ID_LABEL: &str = "csi_storage_class_id";
/// Instance label carrying the location of the provisioning cluster.
pub const CLUSTER_LOCATION_LABEL: &str = "csi_cluster_location";
/// Instance label carrying the name of the provisioning cluster.
pub const CLUSTER_NAME_LABEL: &str = "csi_cluster_name";

/// The labels which must agree between an instance and the placement template
/// before a share may land on that instance.
pub fn match_label_keys() -> [&'static str; 3] {
    [
        STORAGE_CLASS_ID_LABEL,
        CLUSTER_LOCATION_LABEL,
        CLUSTER_NAME_LABEL,
    ]
}
