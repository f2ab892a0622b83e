use crate::errors::SvcError;
use async_trait::async_trait;
use ipnetwork::Ipv4Network;
use share_port::types::v0::transport::{ListFilter, MultishareInstance, Operation, Share};

/// Listing and mutation of multishare instances.
///
/// Every mutation is a long-running operation: the call returns the raw
/// [`Operation`] handle and the caller polls for completion.
#[async_trait]
pub trait InstanceApi: Send + Sync {
    /// List instances selected by the filter.
    async fn list_instances(&self, filter: &ListFilter)
        -> Result<Vec<MultishareInstance>, SvcError>;
    /// Fetch the current state of one instance.
    async fn get_instance(&self, instance: &MultishareInstance)
        -> Result<MultishareInstance, SvcError>;
    /// Start creating an instance.
    async fn start_create_instance_op(
        &self,
        instance: &MultishareInstance,
    ) -> Result<Operation, SvcError>;
    /// Start resizing an instance to its descriptor's capacity.
    async fn start_resize_instance_op(
        &self,
        instance: &MultishareInstance,
    ) -> Result<Operation, SvcError>;
    /// Start deleting an instance.
    async fn start_delete_instance_op(
        &self,
        instance: &MultishareInstance,
    ) -> Result<Operation, SvcError>;
}

/// Listing and mutation of shares.
#[async_trait]
pub trait ShareApi: Send + Sync {
    /// List shares selected by the filter.
    async fn list_shares(&self, filter: &ListFilter) -> Result<Vec<Share>, SvcError>;
    /// Start creating a share on its parent instance.
    async fn start_create_share_op(&self, share: &Share) -> Result<Operation, SvcError>;
    /// Start resizing a share to its descriptor's capacity.
    async fn start_resize_share_op(&self, share: &Share) -> Result<Operation, SvcError>;
    /// Start deleting a share.
    async fn start_delete_share_op(&self, share: &Share) -> Result<Operation, SvcError>;
}

/// Listing of long-running operations.
#[async_trait]
pub trait OperationApi: Send + Sync {
    /// List operations selected by the filter, completed ones included.
    async fn list_operations(&self, filter: &ListFilter) -> Result<Vec<Operation>, SvcError>;
}

/// The full cloud file API surface the agents consume.
pub trait CloudFileApi: InstanceApi + ShareApi + OperationApi {}
impl<T: InstanceApi + ShareApi + OperationApi> CloudFileApi for T {}

/// Reservation of tenant address ranges for new instances.
///
/// The allocator lease is local book-keeping only: once an instance create
/// op has been submitted the cloud records the range on the instance itself,
/// so leases are released when the dispatching call returns.
#[async_trait]
pub trait IpAllocator: Send + Sync {
    /// Pick an unused sub-range satisfying the hint for the given instance.
    async fn reserve(
        &self,
        instance: &MultishareInstance,
        cidr_hint: Ipv4Network,
    ) -> Result<Ipv4Network, SvcError>;
    /// Return a previously reserved range to the pool.
    async fn release(&self, range: Ipv4Network);
}
