use crate::inventory::domain::InstallRoot;

/// Concurrent remote lookups when nothing else is configured
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

/// InventoryRequest - Internal request DTO for the inventory use case
///
/// Roots are already resolved (explicit directories or interpreter discovery);
/// the use case performs no discovery of its own.
#[derive(Debug, Clone)]
pub struct InventoryRequest {
    /// Installation roots in the order they should be scanned
    pub roots: Vec<InstallRoot>,
    /// Whether to look up the latest released version of every package
    pub check_latest: bool,
    /// Whether to look up known vulnerabilities of every installed version
    pub check_vulnerabilities: bool,
    /// Upper bound on in-flight remote lookups
    pub max_concurrent_lookups: usize,
}

impl InventoryRequest {
    pub fn new(roots: Vec<InstallRoot>) -> Self {
        Self {
            roots,
            check_latest: false,
            check_vulnerabilities: false,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    pub fn with_latest_check(mut self, enabled: bool) -> Self {
        self.check_latest = enabled;
        self
    }

    pub fn with_vulnerability_check(mut self, enabled: bool) -> Self {
        self.check_vulnerabilities = enabled;
        self
    }

    /// Zero is treated as one.
    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = limit.max(1);
        self
    }

    pub fn needs_remote_facts(&self) -> bool {
        self.check_latest || self.check_vulnerabilities
    }
}
