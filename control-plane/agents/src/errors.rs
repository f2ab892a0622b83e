use share_port::{
    types::v0::transport::{OperationId, OperationKind, ShareName},
    ErrorChain,
};
use snafu::Snafu;
use strum_macros::Display;
use tonic::Code;

/// The kinds of resources the agents act on, for error reporting.
#[derive(Display, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResourceKind {
    /// A multishare instance.
    Instance,
    /// A share hosted by an instance.
    Share,
    /// A cloud long-running operation.
    Operation,
}

/// Common error type for the control-plane agents.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[allow(missing_docs)]
pub enum SvcError {
    #[snafu(display("Create for share '{}' already in progress under op '{}'", share, op_id))]
    ShareCreateInProgress { share: ShareName, op_id: OperationId },
    #[snafu(display(
        "Found running op '{}', type '{}', for target resource '{}'",
        op_id,
        kind,
        target
    ))]
    OpInProgress {
        op_id: OperationId,
        kind: OperationKind,
        target: String,
    },
    #[snafu(display("All eligible instances are busy.\n{}", summary))]
    InstancesBusy { summary: String },
    #[snafu(display("Zone '{}' is not of the form <geo>-<area>-<zone>", zone))]
    InvalidZone { zone: String },
    #[snafu(display("Invalid CIDR '{}'", cidr))]
    InvalidCidr {
        cidr: String,
        source: ipnetwork::IpNetworkError,
    },
    #[snafu(display("Label '{}' missing in target instance '{}'", label, instance))]
    MissingMatchLabel { label: String, instance: String },
    #[snafu(display(
        "With connect mode PRIVATE_SERVICE_ACCESS a reserved IP range must be a \
        named address range, not the CIDR '{}'",
        range
    ))]
    NamedRangeExpected { range: String },
    #[snafu(display("Instance '{}' reports unparseable address '{}'", instance, ip))]
    InvalidInstanceIp { instance: String, ip: String },
    #[snafu(display("For {} workflow, unknown op type '{}'", resource, kind))]
    UnknownWorkflowKind {
        resource: ResourceKind,
        kind: OperationKind,
    },
    #[snafu(display("{} '{}' not found", kind, id))]
    NotFound { kind: ResourceKind, id: String },
    #[snafu(display("Cloud request '{}' failed for {} '{}': {}", request, kind, id, details))]
    CloudRequest {
        request: String,
        kind: ResourceKind,
        id: String,
        details: String,
    },
    #[snafu(display("Internal error: {}", details))]
    Internal { details: String },
}

impl SvcError {
    /// The gRPC code the CSI frontend surfaces for this error.
    ///
    /// Only three codes ever reach the caller: `Aborted` is the "retry
    /// later" signal of the outer CSI loop, `InvalidArgument` is fatal for
    /// the request, and everything system-side, cloud not-found included,
    /// folds into `Internal`.
    pub fn tonic_code(&self) -> Code {
        match self {
            Self::ShareCreateInProgress { .. } => Code::Aborted,
            Self::OpInProgress { .. } => Code::Aborted,
            Self::InstancesBusy { .. } => Code::Aborted,
            Self::InvalidZone { .. } => Code::InvalidArgument,
            Self::InvalidCidr { .. } => Code::InvalidArgument,
            Self::MissingMatchLabel { .. } => Code::InvalidArgument,
            Self::NamedRangeExpected { .. } => Code::InvalidArgument,
            Self::NotFound { .. } => Code::Internal,
            Self::InvalidInstanceIp { .. } => Code::Internal,
            Self::UnknownWorkflowKind { .. } => Code::Internal,
            Self::CloudRequest { .. } => Code::Internal,
            Self::Internal { .. } => Code::Internal,
        }
    }
}

impl From<SvcError> for tonic::Status {
    fn from(error: SvcError) -> Self {
        tonic::Status::new(error.tonic_code(), error.full_string())
    }
}
