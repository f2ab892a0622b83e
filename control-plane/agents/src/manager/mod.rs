//! The serialization point for all instance and share mutations.
//!
//! Every entry point takes the manager-wide lock for its full duration, so
//! within one driver replica "decide, then start the op" is atomic. Across
//! replicas the freshly listed op snapshot is the only defence and the
//! cloud's one-op-per-resource rule is the backstop; the resulting aborts
//! are surfaced for the CSI outer loop to retry.

mod workflow;

pub use workflow::{Workflow, WorkflowTarget};

use crate::{
    cloud::{CloudFileApi, IpAllocator},
    config::OpsManagerConfig,
    context::CreateParams,
    controller::{registry, registry::OperationRegistry, scheduling},
    errors::SvcError,
    instance::capacity,
    topology,
};
use ipnetwork::Ipv4Network;
use rand::seq::SliceRandom;
use share_port::types::v0::transport::{
    ConnectMode, CreateShareRequest, ListFilter, MultishareInstance, OperationKind, Share,
    ShareName,
};
use std::sync::Arc;

/// Result of a placement request: either a freshly started workflow, or the
/// share which already satisfies the request.
#[derive(Debug, Clone)]
pub enum ShareCreateOutcome {
    /// A workflow was dispatched; the caller polls it and retries.
    Workflow(Workflow),
    /// The share already exists on a matching instance.
    Existing(Share),
}

/// Manages the lifecycle of all instance and share operations.
pub struct MultishareOpsManager {
    /// Serializes all placement and dispatch decisions of this replica.
    lock: tokio::sync::Mutex<()>,
    pub(crate) cloud: Arc<dyn CloudFileApi>,
    allocator: Arc<dyn IpAllocator>,
    registry: OperationRegistry,
    config: OpsManagerConfig,
}

impl MultishareOpsManager {
    /// A manager driving the given cloud with the given allocator.
    pub fn new(
        cloud: Arc<dyn CloudFileApi>,
        allocator: Arc<dyn IpAllocator>,
        config: OpsManagerConfig,
    ) -> Self {
        Self {
            lock: tokio::sync::Mutex::new(()),
            registry: OperationRegistry::new(cloud.clone(), config.project()),
            cloud,
            allocator,
            config,
        }
    }

    /// Place a new share, creating or expanding an instance when needed.
    ///
    /// Serves CreateVolume. Returns the existing share when a previous
    /// attempt already created it, an instance workflow when room must be
    /// made first (the caller retries once it completes), or the share
    /// create workflow itself.
    pub async fn place_share(
        &self,
        request: &CreateShareRequest,
        template: &MultishareInstance,
        source_snapshot_id: Option<String>,
    ) -> Result<ShareCreateOutcome, SvcError> {
        let _guard = self.lock.lock().await;

        let share_name = ShareName::from_volume(&request.name);
        let params = CreateParams::try_from(&request.parameters)?;
        let regions = topology::allowed_regions(request.topology.as_ref(), self.config.zone())?;

        let ops = self.registry.snapshot().await?;
        if let Some(op) = registry::share_create_for_name(&share_name, &ops) {
            tracing::info!(op = %op.id, share = %share_name, "Share create already in progress");
            return Err(SvcError::ShareCreateInProgress {
                share: share_name,
                op_id: op.id.clone(),
            });
        }

        // A share of the same name on any matching-protocol instance means a
        // previous attempt won the race: report it as created.
        for region in &regions {
            let shares = self
                .cloud
                .list_shares(&ListFilter::location(self.config.project(), region))
                .await?;
            if let Some(existing) = shares
                .into_iter()
                .find(|share| share.name == share_name && share.parent.protocol == template.protocol)
            {
                return Ok(ShareCreateOutcome::Existing(existing));
            }
        }

        let eligible = scheduling::instance_candidates(
            self.cloud.as_ref(),
            &self.config,
            &params,
            template,
            &regions,
            &ops,
        )
        .await?;

        // Uniform-random choice spreads concurrent placements from separate
        // replicas across instances better than a deterministic first-fit.
        let host = eligible.choose(&mut rand::thread_rng()).cloned();
        if let Some(mut host) = host {
            tracing::info!(share = %share_name, instance = %host, "Placing share");
            let share = Share::on_instance(
                share_name,
                &host,
                request.capacity_bytes,
                Default::default(),
                source_snapshot_id,
            );

            let share_total = self.share_capacity_total(&host).await?;
            if let Some(target) = capacity::expansion_target(
                host.capacity_bytes,
                share_total,
                share.capacity_bytes,
                capacity::step_bytes(&host),
            ) {
                host.capacity_bytes = target;
                let workflow = self
                    .start_instance_workflow(host, OperationKind::InstanceUpdate, &ops)
                    .await?;
                return Ok(ShareCreateOutcome::Workflow(workflow));
            }

            let workflow = self
                .start_share_workflow(share, OperationKind::ShareCreate, &ops)
                .await?;
            return Ok(ShareCreateOutcome::Workflow(workflow));
        }

        // No instance can take the share: create one from the template.
        let mut instance = template.clone();
        if instance.network.connect_mode == ConnectMode::PrivateServiceAccess {
            if let Some(range) = params.reserved_ip_range() {
                if range.parse::<Ipv4Network>().is_ok() {
                    return Err(SvcError::NamedRangeExpected {
                        range: range.to_string(),
                    });
                }
                instance.network.reserved_ip_range = range.to_string();
            }
        } else if let Some(cidr) = params.reserved_ipv4_cidr() {
            let range = self.allocator.reserve(&instance, cidr).await?;
            instance.network.reserved_ip_range = range.to_string();
            let result = self
                .start_instance_workflow(instance, OperationKind::InstanceCreate, &ops)
                .await;
            // Whether the create started or failed, the cloud now owns the
            // range through the instance's own state; drop the local lease.
            self.allocator.release(range).await;
            return result.map(ShareCreateOutcome::Workflow);
        }

        let workflow = self
            .start_instance_workflow(instance, OperationKind::InstanceCreate, &ops)
            .await?;
        Ok(ShareCreateOutcome::Workflow(workflow))
    }

    /// Dispatch a share create for a placement decided earlier.
    ///
    /// Used to resume a creation when the caller already holds the share
    /// descriptor; the interlocks are still verified under the lock.
    pub async fn start_share_create(&self, share: &Share) -> Result<Workflow, SvcError> {
        let _guard = self.lock.lock().await;
        let ops = self.registry.snapshot().await?;
        self.start_share_workflow(share.clone(), OperationKind::ShareCreate, &ops)
            .await
    }

    /// Dispatch a share resize for an expansion decided earlier.
    pub async fn start_share_expand(
        &self,
        share: &Share,
        required_bytes: u64,
    ) -> Result<Workflow, SvcError> {
        let _guard = self.lock.lock().await;
        let ops = self.registry.snapshot().await?;
        let mut share = share.clone();
        share.capacity_bytes = required_bytes;
        self.start_share_workflow(share, OperationKind::ShareUpdate, &ops)
            .await
    }

    /// Grow a share to `required_bytes`, expanding the hosting instance
    /// first when it lacks headroom.
    ///
    /// Joins an already running resize of the same share instead of
    /// dispatching a second one.
    pub async fn expand_share(
        &self,
        share: &Share,
        required_bytes: u64,
    ) -> Result<Workflow, SvcError> {
        let _guard = self.lock.lock().await;
        let ops = self.registry.snapshot().await?;

        if let Some(op) = registry::share_op_of_kind(share, OperationKind::ShareUpdate, &ops) {
            return Ok(Workflow {
                target: WorkflowTarget::Share(share.clone()),
                kind: op.kind,
                op: op.id.clone(),
            });
        }

        if let Some(op) = registry::instance_or_child_op(&share.parent, &ops) {
            tracing::info!(instance = %share.parent, op = %op.id, "Instance busy, aborting share expansion");
            return Err(SvcError::OpInProgress {
                op_id: op.id.clone(),
                kind: op.kind,
                target: op.target.clone(),
            });
        }

        // Re-read the instance: its capacity may have changed since the
        // share descriptor was cut.
        let instance = self.cloud.get_instance(&share.parent).await?;
        let share_total = self.share_capacity_total(&instance).await?;
        let needed = required_bytes.saturating_sub(share.capacity_bytes);
        if let Some(target) = capacity::expansion_target(
            instance.capacity_bytes,
            share_total,
            needed,
            capacity::step_bytes(&instance),
        ) {
            let mut instance = instance;
            instance.capacity_bytes = target;
            return self
                .start_instance_workflow(instance, OperationKind::InstanceUpdate, &ops)
                .await;
        }

        let mut share = share.clone();
        share.capacity_bytes = required_bytes;
        self.start_share_workflow(share, OperationKind::ShareUpdate, &ops)
            .await
    }

    /// Delete a share, joining an already running delete of it.
    pub async fn delete_share(&self, share: &Share) -> Result<Workflow, SvcError> {
        let _guard = self.lock.lock().await;
        let ops = self.registry.snapshot().await?;

        if let Some(op) = registry::share_op_of_kind(share, OperationKind::ShareDelete, &ops) {
            return Ok(Workflow {
                target: WorkflowTarget::Share(share.clone()),
                kind: op.kind,
                op: op.id.clone(),
            });
        }

        self.start_share_workflow(share.clone(), OperationKind::ShareDelete, &ops)
            .await
    }

    /// Delete or shrink an instance whose shares have drained.
    ///
    /// Returns `None` when there is nothing to do: the instance is gone,
    /// it is already at its aligned floor, or its shares still fill it.
    /// Not-found anywhere on this path reads as "already reconciled".
    pub async fn reconcile_instance(
        &self,
        instance: &MultishareInstance,
    ) -> Result<Option<Workflow>, SvcError> {
        let _guard = self.lock.lock().await;
        let ops = self.registry.snapshot().await?;

        if let Some(op) = registry::instance_or_child_op(instance, &ops) {
            return Err(SvcError::OpInProgress {
                op_id: op.id.clone(),
                kind: op.kind,
                target: op.target.clone(),
            });
        }

        let instance = match self.cloud.get_instance(instance).await {
            Ok(instance) => instance,
            Err(SvcError::NotFound { .. }) => return Ok(None),
            Err(error) => return Err(error),
        };

        let shares = match self.cloud.list_shares(&ListFilter::instance(&instance)).await {
            Ok(shares) => shares,
            Err(SvcError::NotFound { .. }) => return Ok(None),
            Err(error) => return Err(error),
        };

        if shares.is_empty() {
            tracing::info!(instance = %instance, "Instance drained, deleting");
            return swallow_not_found(
                self.start_instance_workflow(instance, OperationKind::InstanceDelete, &ops)
                    .await,
            );
        }

        let share_total = shares.iter().map(|share| share.capacity_bytes).sum();
        if let Some(target) = capacity::shrink_target(
            instance.capacity_bytes,
            share_total,
            capacity::step_bytes(&instance),
        ) {
            tracing::info!(instance = %instance, target, "Shrinking drained instance");
            let mut instance = instance;
            instance.capacity_bytes = target;
            return swallow_not_found(
                self.start_instance_workflow(instance, OperationKind::InstanceUpdate, &ops)
                    .await,
            );
        }

        Ok(None)
    }

    /// Sum of the share capacities currently carved from the instance.
    async fn share_capacity_total(&self, instance: &MultishareInstance) -> Result<u64, SvcError> {
        let shares = self.cloud.list_shares(&ListFilter::instance(instance)).await?;
        Ok(shares.iter().map(|share| share.capacity_bytes).sum())
    }
}

/// Idempotent delete/shrink: a resource vanishing mid-reconcile means the
/// state the caller wanted is already reached.
fn swallow_not_found(result: Result<Workflow, SvcError>) -> Result<Option<Workflow>, SvcError> {
    match result {
        Ok(workflow) => Ok(Some(workflow)),
        Err(SvcError::NotFound { .. }) => Ok(None),
        Err(error) => Err(error),
    }
}
