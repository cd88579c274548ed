use std::collections::BTreeSet;
use std::path::PathBuf;

use log::debug;

use phup_backend::PhpVersion;

use crate::plan::PHP_BIN_DIR;

/// Herd-lite bundles this PHP release; the marker path only tells us the
/// toolchain is present, not its version.
const HERD_LITE_BASE: &str = "php8.3";

/// Best-effort enumeration of installed PHP toolchains.
///
/// Scans the binary directory for version-tagged `php` binaries and probes
/// the Laravel Herd marker path. Results are recomputed on every call,
/// never cached.
#[derive(Debug, Clone)]
pub struct Inventory {
    bin_dir: PathBuf,
    herd_marker: PathBuf,
}

impl Inventory {
    #[must_use]
    pub fn new(bin_dir: PathBuf, herd_marker: PathBuf) -> Self {
        Self {
            bin_dir,
            herd_marker,
        }
    }

    /// Sorted, deduplicated list of discovered versions. A missing or
    /// unreadable binary directory yields an empty list, not an error.
    pub async fn scan(&self) -> Vec<PhpVersion> {
        let mut found = BTreeSet::new();

        match tokio::fs::read_dir(&self.bin_dir).await {
            Ok(mut entries) => {
                while let Ok(Some(entry)) = entries.next_entry().await {
                    if let Some(name) = entry.file_name().to_str()
                        && is_versioned_php_binary(name)
                    {
                        found.insert(PhpVersion::apt(name));
                    }
                }
            }
            Err(error) => {
                debug!(
                    "cannot list {}: {error}, reporting no installed versions",
                    self.bin_dir.display()
                );
            }
        }

        if self.herd_marker.exists() {
            found.insert(PhpVersion::herd_lite(HERD_LITE_BASE));
        }

        found.into_iter().collect()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        let herd_marker = dirs::home_dir()
            .map_or_else(
                || PathBuf::from("/nonexistent"),
                |home| home.join(".config/herd-lite"),
            )
            .join("bin/php");
        Self::new(PathBuf::from(PHP_BIN_DIR), herd_marker)
    }
}

/// `php` followed by a non-empty run of digits and `.` separators; anything
/// else in the suffix means an unrelated binary (`phpx`, `php-config8.1`).
fn is_versioned_php_binary(name: &str) -> bool {
    let Some(suffix) = name.strip_prefix("php") else {
        return false;
    };
    !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit() || c == '.')
}
