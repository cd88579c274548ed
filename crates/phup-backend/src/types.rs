use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How a discovered PHP toolchain got onto the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionSource {
    /// Installed through apt, living in `/usr/bin/phpX.Y`.
    Apt,
    /// The Laravel Herd standalone install under `~/.config/herd-lite`.
    HerdLite,
}

/// One installed PHP runtime, identified by its version-tagged binary name.
///
/// `name` is the base binary name (for example `php8.3`); the rendered
/// identifier carries a ` laravel` suffix for Herd installs so the two
/// sources stay distinguishable in listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhpVersion {
    pub name: String,
    pub source: VersionSource,
}

impl PhpVersion {
    #[must_use]
    pub fn apt(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: VersionSource::Apt,
        }
    }

    #[must_use]
    pub fn herd_lite(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: VersionSource::HerdLite,
        }
    }

    /// Base binary token used for package derivation and the alternatives
    /// target, with any annotation stripped.
    #[must_use]
    pub fn base(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

impl Ord for PhpVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lexicographic on the base name, apt before herd for equal names.
        // Matches the rendered-identifier sort order used in listings.
        self.name
            .cmp(&other.name)
            .then(self.source.cmp(&other.source))
    }
}

impl PartialOrd for PhpVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            VersionSource::Apt => write!(f, "{}", self.name),
            VersionSource::HerdLite => write!(f, "{} laravel", self.name),
        }
    }
}

impl FromStr for PhpVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_suffix(" laravel") {
            Some(base) => Ok(Self::herd_lite(base.trim_end())),
            None => Ok(Self::apt(s)),
        }
    }
}

/// One orchestrated action and its parameters. Built by the caller,
/// consumed once by [`crate::RuntimeManager::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    /// Register the PHP package repository and install `php<version>`.
    InstallVersion { version: String },
    /// Install `<base>-<extension>` packages for an installed version.
    /// `extensions` is the raw comma-separated user input.
    InstallExtensions {
        version: PhpVersion,
        extensions: String,
    },
    /// Download, verify, and install the Composer binary.
    InstallComposer,
    /// Purge all PHP packages and remove runtime and user config paths.
    UninstallAll,
}

/// How the orchestrator reacts to a failing command in a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequencingPolicy {
    /// Keep executing the remaining commands after a failure. This is the
    /// default and mirrors what the operations have always done.
    #[default]
    ContinueOnError,
    /// Stop the sequence at the first command that fails to run cleanly.
    AbortOnError,
}

/// One event observed on an in-flight operation's stream.
///
/// `Progress` carries the raw percentage scraped from subprocess output and
/// is not clamped at the source; display code clamps to `0..=100`.
/// `Completed` is guaranteed to be the last event, emitted exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationEvent {
    Progress(u32),
    Completed(OperationOutcome),
}

/// Terminal summary of one operation. The sequence always runs to its end
/// (under the default policy), so "completed" and "completed clean" are
/// different things; `failures` tells them apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationOutcome {
    pub failures: Vec<CommandFailure>,
}

impl OperationOutcome {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A command that exited non-zero or could not be spawned at all
/// (`exit_code` is `None` in the latter case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub program: String,
    pub exit_code: Option<i32>,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "{} exited with status {code}", self.program),
            None => write!(f, "{} could not be started", self.program),
        }
    }
}
