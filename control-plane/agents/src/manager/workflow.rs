use super::MultishareOpsManager;
use crate::{
    controller::registry,
    errors::{ResourceKind, SvcError},
};
use share_port::types::v0::transport::{
    MultishareInstance, OperationId, OperationInfo, OperationKind, Share,
};

/// The resource a dispatched operation mutates.
#[derive(Debug, Clone)]
pub enum WorkflowTarget {
    /// An instance level operation.
    Instance(MultishareInstance),
    /// A share level operation.
    Share(Share),
}

/// Binds a dispatched operation id to the resource it mutates.
///
/// The manager releases its lock as soon as the workflow is returned; the
/// caller polls the operation to completion.
#[derive(Debug, Clone)]
pub struct Workflow {
    /// The resource being mutated.
    pub target: WorkflowTarget,
    /// What the operation does to the resource.
    pub kind: OperationKind,
    /// The cloud operation to poll.
    pub op: OperationId,
}

impl Workflow {
    /// The instance being mutated, for instance level workflows.
    pub fn instance(&self) -> Option<&MultishareInstance> {
        match &self.target {
            WorkflowTarget::Instance(instance) => Some(instance),
            WorkflowTarget::Share(_) => None,
        }
    }

    /// The share being mutated, for share level workflows.
    pub fn share(&self) -> Option<&Share> {
        match &self.target {
            WorkflowTarget::Instance(_) => None,
            WorkflowTarget::Share(share) => Some(share),
        }
    }
}

fn in_progress(op: &OperationInfo) -> SvcError {
    SvcError::OpInProgress {
        op_id: op.id.clone(),
        kind: op.kind,
        target: op.target.clone(),
    }
}

impl MultishareOpsManager {
    /// Dispatch an instance level operation once the interlocks clear.
    ///
    /// An instance op conflicts with any running op on the instance or on
    /// any of its shares.
    pub(super) async fn start_instance_workflow(
        &self,
        instance: MultishareInstance,
        kind: OperationKind,
        ops: &[OperationInfo],
    ) -> Result<Workflow, SvcError> {
        if let Some(op) = registry::instance_or_child_op(&instance, ops) {
            return Err(in_progress(op));
        }

        let op = match kind {
            OperationKind::InstanceCreate => self.cloud.start_create_instance_op(&instance).await?,
            OperationKind::InstanceUpdate => self.cloud.start_resize_instance_op(&instance).await?,
            OperationKind::InstanceDelete => self.cloud.start_delete_instance_op(&instance).await?,
            kind => {
                return Err(SvcError::UnknownWorkflowKind {
                    resource: ResourceKind::Instance,
                    kind,
                })
            }
        };

        tracing::info!(op = %op.name, instance = %instance, %kind, "Started instance operation");
        Ok(Workflow {
            target: WorkflowTarget::Instance(instance),
            kind,
            op: op.name,
        })
    }

    /// Dispatch a share level operation once the interlocks clear.
    ///
    /// A share op conflicts with a running op on the hosting instance itself
    /// and with any running op on the same share; ops on sibling shares do
    /// not conflict.
    pub(super) async fn start_share_workflow(
        &self,
        share: Share,
        kind: OperationKind,
        ops: &[OperationInfo],
    ) -> Result<Workflow, SvcError> {
        if let Some(op) = registry::instance_op(&share.parent, ops) {
            return Err(in_progress(op));
        }
        if let Some(op) = registry::share_op(&share, ops) {
            return Err(in_progress(op));
        }

        let op = match kind {
            OperationKind::ShareCreate => self.cloud.start_create_share_op(&share).await?,
            OperationKind::ShareUpdate => self.cloud.start_resize_share_op(&share).await?,
            OperationKind::ShareDelete => self.cloud.start_delete_share_op(&share).await?,
            kind => {
                return Err(SvcError::UnknownWorkflowKind {
                    resource: ResourceKind::Share,
                    kind,
                })
            }
        };

        tracing::info!(op = %op.name, share = %share.name, instance = %share.parent, %kind, "Started share operation");
        Ok(Workflow {
            target: WorkflowTarget::Share(share),
            kind,
            op: op.name,
        })
    }
}
