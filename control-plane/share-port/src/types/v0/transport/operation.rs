use super::OperationId;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// A raw long-running operation as listed from the cloud.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Opaque operation id.
    pub name: OperationId,
    /// Whether the operation has completed.
    pub done: bool,
    /// Metadata blob describing the target resource and verb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// The metadata blob attached to instance and share operations.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    /// URI of the resource the operation mutates.
    pub target: String,
    /// The verb the cloud reports for the mutation.
    pub verb: String,
}

/// Resource-level classification of an in-flight operation.
#[derive(Display, Debug, Clone, Copy, Eq, PartialEq)]
pub enum OperationKind {
    /// An instance is being created.
    InstanceCreate,
    /// An instance is being resized.
    InstanceUpdate,
    /// An instance is being deleted.
    InstanceDelete,
    /// A share is being created.
    ShareCreate,
    /// A share is being resized.
    ShareUpdate,
    /// A share is being deleted.
    ShareDelete,
    /// A verb the driver does not recognise; blocks interlocks, joins nothing.
    Unknown,
}

impl OperationKind {
    /// Classify the verb of an instance-targeted operation.
    ///
    /// The verb strings are the cloud's own; an unrecognised verb must never
    /// be folded into a known kind.
    pub fn from_instance_verb(verb: &str) -> Self {
        match verb {
            "create" => Self::InstanceCreate,
            "update" => Self::InstanceUpdate,
            "delete" => Self::InstanceDelete,
            _ => Self::Unknown,
        }
    }

    /// Classify the verb of a share-targeted operation.
    pub fn from_share_verb(verb: &str) -> Self {
        match verb {
            "create" => Self::ShareCreate,
            "update" => Self::ShareUpdate,
            "delete" => Self::ShareDelete,
            _ => Self::Unknown,
        }
    }
}

/// One in-flight operation, classified from a cloud listing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OperationInfo {
    /// Opaque operation id.
    pub id: OperationId,
    /// Resource-level classification.
    pub kind: OperationKind,
    /// URI of the target resource.
    pub target: String,
}

/// Whether the URI names an instance, i.e. matches
/// `projects/*/locations/*/instances/*` exactly.
pub fn is_instance_target(target: &str) -> bool {
    let segments = target.split('/').collect::<Vec<_>>();
    matches!(
        segments.as_slice(),
        ["projects", p, "locations", l, "instances", i]
            if !p.is_empty() && !l.is_empty() && !i.is_empty()
    )
}

/// Whether the URI names a share, i.e. matches
/// `projects/*/locations/*/instances/*/shares/*` exactly.
pub fn is_share_target(target: &str) -> bool {
    let segments = target.split('/').collect::<Vec<_>>();
    matches!(
        segments.as_slice(),
        ["projects", p, "locations", l, "instances", i, "shares", s]
            if !p.is_empty() && !l.is_empty() && !i.is_empty() && !s.is_empty()
    )
}
