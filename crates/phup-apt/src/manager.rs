use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, info};
use tokio::process::Command;
use tokio::sync::mpsc;

use phup_backend::{
    BackendError, OperationHandle, OperationRequest, PhpVersion, RuntimeManager, SequencingPolicy,
};

use crate::inventory::Inventory;
use crate::plan::{PHP_BIN_DIR, build_plan};
use crate::runner::run_sequence;

const ALTERNATIVES_PROGRAM: &str = "update-alternatives";
const ALTERNATIVES_LINK: &str = "/etc/alternatives/php";

/// apt-backed runtime manager: inventory scans, alternatives switching,
/// and orchestrated install/uninstall operations.
#[derive(Debug, Clone)]
pub struct AptManager {
    inventory: Inventory,
    policy: SequencingPolicy,
    alternatives_link: PathBuf,
}

impl AptManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inventory: Inventory::default(),
            policy: SequencingPolicy::default(),
            alternatives_link: PathBuf::from(ALTERNATIVES_LINK),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SequencingPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    fn switch_args(version: &PhpVersion) -> [String; 3] {
        [
            "--set".to_string(),
            "php".to_string(),
            format!("{PHP_BIN_DIR}/{}", version.base()),
        ]
    }
}

impl Default for AptManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuntimeManager for AptManager {
    fn name(&self) -> &'static str {
        "apt"
    }

    async fn list_installed(&self) -> Result<Vec<PhpVersion>, BackendError> {
        Ok(self.inventory.scan().await)
    }

    async fn active_version(&self) -> Result<Option<PhpVersion>, BackendError> {
        match tokio::fs::read_link(&self.alternatives_link).await {
            Ok(target) => Ok(target
                .file_name()
                .and_then(|name| name.to_str())
                .map(PhpVersion::apt)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn activate(&self, version: &PhpVersion) -> Result<(), BackendError> {
        let args = Self::switch_args(version);
        info!("switching global php: {ALTERNATIVES_PROGRAM} {}", args.join(" "));

        let output = Command::new(ALTERNATIVES_PROGRAM)
            .args(&args)
            .output()
            .await
            .map_err(|error| BackendError::spawn(ALTERNATIVES_PROGRAM, &error))?;

        debug!("{ALTERNATIVES_PROGRAM} exit status: {:?}", output.status);

        if output.status.success() {
            Ok(())
        } else {
            Err(BackendError::CommandFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn start(&self, request: OperationRequest) -> OperationHandle {
        let plan = build_plan(&request);
        info!("starting {request:?}: {} command(s)", plan.len());

        let (events, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_sequence(plan, self.policy, events));
        OperationHandle::new(receiver, task)
    }
}

#[cfg(test)]
mod tests {
    use phup_backend::PhpVersion;

    use super::AptManager;

    #[test]
    fn switch_args_target_the_binary_in_usr_bin() {
        let args = AptManager::switch_args(&PhpVersion::apt("php8.3"));
        assert_eq!(args, ["--set", "php", "/usr/bin/php8.3"]);
    }

    #[test]
    fn switch_args_strip_the_herd_annotation() {
        let args = AptManager::switch_args(&PhpVersion::herd_lite("php8.3"));
        assert_eq!(args[2], "/usr/bin/php8.3");

        // Even a caller-constructed composite identifier resolves to the
        // base binary, never a path with a space in it.
        let composite = AptManager::switch_args(&PhpVersion::apt("php8.3 laravel"));
        assert_eq!(composite[2], "/usr/bin/php8.3");
    }
}
