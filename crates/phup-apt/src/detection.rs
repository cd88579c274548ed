use std::path::PathBuf;

use which::which;

/// Presence of the external tools the operations shell out to. Purely
/// informational: a missing tool surfaces later as a failed command in the
/// operation outcome, this just lets the frontend warn up front.
#[derive(Debug, Clone)]
pub struct HostTools {
    pub apt: Option<PathBuf>,
    pub add_apt_repository: Option<PathBuf>,
    pub update_alternatives: Option<PathBuf>,
}

impl HostTools {
    #[must_use]
    pub fn detect() -> Self {
        Self {
            apt: which("apt").ok(),
            add_apt_repository: which("add-apt-repository").ok(),
            update_alternatives: which("update-alternatives").ok(),
        }
    }

    /// Names of tools that were not found on the search path.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.apt.is_none() {
            missing.push("apt");
        }
        if self.add_apt_repository.is_none() {
            missing.push("add-apt-repository");
        }
        if self.update_alternatives.is_none() {
            missing.push("update-alternatives");
        }
        missing
    }
}
