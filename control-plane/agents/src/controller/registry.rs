use crate::{cloud::CloudFileApi, errors::SvcError};
use share_port::types::v0::transport::{
    is_instance_target, is_share_target, ListFilter, MultishareInstance, Operation, OperationInfo,
    OperationKind, OperationMetadata, Share, ShareName,
};
use std::sync::Arc;

/// Derives the set of in-flight instance and share operations from the
/// cloud's operation collection.
///
/// There is deliberately no caching: another driver replica may start ops at
/// any time, so every manager entry point takes a fresh snapshot.
#[derive(Clone)]
pub struct OperationRegistry {
    cloud: Arc<dyn CloudFileApi>,
    project: String,
}

impl OperationRegistry {
    /// A registry listing ops of the given project.
    pub fn new(cloud: Arc<dyn CloudFileApi>, project: impl Into<String>) -> Self {
        Self {
            cloud,
            project: project.into(),
        }
    }

    /// List every running instance and share operation in the project,
    /// across all locations.
    pub async fn snapshot(&self) -> Result<Vec<OperationInfo>, SvcError> {
        let ops = self
            .cloud
            .list_operations(&ListFilter::location(&self.project, ListFilter::ALL))
            .await?;
        Ok(classify_operations(ops))
    }
}

/// Classify raw operations into the records the interlocks inspect.
///
/// Completed ops and ops without usable metadata carry no interlock
/// information and are dropped; ops with an unrecognised verb are kept as
/// [`OperationKind::Unknown`] so they still block conflicting dispatches.
fn classify_operations(ops: Vec<Operation>) -> Vec<OperationInfo> {
    let mut running = Vec::with_capacity(ops.len());
    for op in ops {
        if op.done {
            continue;
        }
        let Some(metadata) = op.metadata else {
            continue;
        };
        let metadata = match serde_json::from_value::<OperationMetadata>(metadata) {
            Ok(metadata) => metadata,
            Err(error) => {
                tracing::error!(op = %op.name, %error, "Failed to parse operation metadata");
                continue;
            }
        };
        if is_instance_target(&metadata.target) {
            running.push(OperationInfo {
                id: op.name,
                kind: OperationKind::from_instance_verb(&metadata.verb),
                target: metadata.target,
            });
        } else if is_share_target(&metadata.target) {
            running.push(OperationInfo {
                id: op.name,
                kind: OperationKind::from_share_verb(&metadata.verb),
                target: metadata.target,
            });
        }
    }
    running
}

/// Any running op targeting the instance itself, by exact URI.
pub(crate) fn instance_op<'a>(
    instance: &MultishareInstance,
    ops: &'a [OperationInfo],
) -> Option<&'a OperationInfo> {
    let uri = instance.uri();
    ops.iter().find(|op| op.target == uri)
}

/// Any running op targeting the instance or one of its shares.
///
/// Share targets are matched against `uri + "/"` so that `inst-1` never
/// shadows `inst-10`.
pub(crate) fn instance_or_child_op<'a>(
    instance: &MultishareInstance,
    ops: &'a [OperationInfo],
) -> Option<&'a OperationInfo> {
    let uri = instance.uri();
    let children = format!("{uri}/");
    ops.iter()
        .find(|op| op.target == uri || op.target.starts_with(&children))
}

/// Any running op targeting the share, by exact URI.
pub(crate) fn share_op<'a>(share: &Share, ops: &'a [OperationInfo]) -> Option<&'a OperationInfo> {
    let uri = share.uri();
    ops.iter().find(|op| op.target == uri)
}

/// A running op of the given kind targeting the share, for idempotent joins.
pub(crate) fn share_op_of_kind<'a>(
    share: &Share,
    kind: OperationKind,
    ops: &'a [OperationInfo],
) -> Option<&'a OperationInfo> {
    let uri = share.uri();
    ops.iter().find(|op| op.kind == kind && op.target == uri)
}

/// A running share-create op whose target mentions the share name.
///
/// Share names are unique across the cluster, so a substring match over the
/// target URI is sufficient before any parent instance is known.
pub(crate) fn share_create_for_name<'a>(
    name: &ShareName,
    ops: &'a [OperationInfo],
) -> Option<&'a OperationInfo> {
    ops.iter()
        .find(|op| op.kind == OperationKind::ShareCreate && op.target.contains(name.as_str()))
}
