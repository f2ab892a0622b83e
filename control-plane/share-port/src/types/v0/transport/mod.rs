/// Multishare instance types.
pub mod instance;
/// Long-running operation types.
pub mod operation;
/// Share types and the create request handed over by the CSI frontend.
pub mod share;

pub use instance::*;
pub use operation::*;
pub use share::*;

use serde::{Deserialize, Serialize};

/// Implements a newtype over a plain string identifier.
macro_rules! transport_string_id {
    ($Name:ident, $Doc:literal) => {
        #[doc = $Doc]
        #[derive(Serialize, Deserialize, Default, Debug, Clone, Eq, PartialEq, Hash)]
        #[serde(transparent)]
        pub struct $Name(String);

        impl $Name {
            /// Build Self from anything which converts into a string id.
            pub fn new<T: Into<String>>(id: T) -> Self {
                $Name(id.into())
            }
            /// As a string slice.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $Name {
            fn from(id: &str) -> Self {
                $Name(id.to_string())
            }
        }
        impl From<String> for $Name {
            fn from(id: String) -> Self {
                $Name(id)
            }
        }
        impl From<$Name> for String {
            fn from(id: $Name) -> String {
                id.0
            }
        }
    };
}
pub(crate) use transport_string_id;

transport_string_id!(OperationId, "Opaque id of a cloud long-running operation");

/// Scope selector for cloud list calls.
///
/// A location or instance name of [`ListFilter::ALL`] selects every location
/// or every instance respectively.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    /// The cloud project to list in.
    pub project: String,
    /// The location to list in, or `"-"` for all locations.
    pub location: String,
    /// The owning instance, or `"-"` for all instances.
    pub instance_name: String,
}

impl ListFilter {
    /// Wildcard segment accepted by the cloud list endpoints.
    pub const ALL: &'static str = "-";

    /// Filter scoped to one location of a project.
    pub fn location(project: &str, location: &str) -> Self {
        Self {
            project: project.to_string(),
            location: location.to_string(),
            instance_name: Self::ALL.to_string(),
        }
    }

    /// Filter scoped to the shares of one instance.
    pub fn instance(instance: &MultishareInstance) -> Self {
        Self {
            project: instance.project.clone(),
            location: instance.location.clone(),
            instance_name: instance.name.clone(),
        }
    }
}
