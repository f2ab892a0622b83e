/// Static configuration the ops manager is created with.
#[derive(Debug, Clone)]
pub struct OpsManagerConfig {
    /// The cloud project all listings and mutations are scoped to.
    project: String,
    /// The zone the driver itself runs in, the placement fallback.
    zone: String,
    /// Honour per-instance share limits instead of the fixed fallback cap.
    configurable_max_shares: bool,
}

impl OpsManagerConfig {
    /// Config scoped to a project, with the driver running in `zone`.
    pub fn new(project: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            zone: zone.into(),
            configurable_max_shares: false,
        }
    }

    /// Honour the share limit each instance reports, rather than the fixed
    /// fallback cap.
    #[must_use]
    pub fn with_configurable_max_shares(mut self, enabled: bool) -> Self {
        self.configurable_max_shares = enabled;
        self
    }

    /// The cloud project all listings and mutations are scoped to.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The zone the driver runs in.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Whether per-instance share limits are honoured.
    pub(crate) fn configurable_max_shares(&self) -> bool {
        self.configurable_max_shares
    }
}
