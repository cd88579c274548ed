use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppPathsError {
    #[error("Could not determine home directory")]
    HomeDirUnavailable,
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,
    #[error("Could not determine cache directory")]
    CacheDirUnavailable,
    #[error("Could not determine data directory")]
    DataDirUnavailable,
}

pub struct AppPaths {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Build application paths from the XDG base directories.
    ///
    /// # Errors
    /// Returns an error when a required base directory cannot be determined.
    pub fn new() -> Result<Self, AppPathsError> {
        Ok(Self {
            config_dir: dirs::config_dir()
                .ok_or(AppPathsError::ConfigDirUnavailable)?
                .join("phup"),
            cache_dir: dirs::cache_dir()
                .ok_or(AppPathsError::CacheDirUnavailable)?
                .join("phup"),
            data_dir: dirs::data_dir()
                .ok_or(AppPathsError::DataDirUnavailable)?
                .join("phup"),
        })
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("phup.log")
    }

    /// Ensure all application directories exist on disk.
    ///
    /// # Errors
    /// Returns an error if any directory cannot be created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::AppPaths;

    fn test_paths() -> AppPaths {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock should be after unix epoch")
            .as_nanos();
        let root = std::env::temp_dir().join(format!(
            "phup-platform-paths-test-{}-{}",
            std::process::id(),
            nonce
        ));
        AppPaths {
            config_dir: root.join("config"),
            cache_dir: root.join("cache"),
            data_dir: root.join("data"),
        }
    }

    #[test]
    fn log_file_lives_in_data_dir() {
        let paths = test_paths();
        assert!(
            paths
                .log_file()
                .ends_with(std::path::Path::new("data").join("phup.log"))
        );
    }

    #[test]
    fn ensure_dirs_creates_all_directories() {
        let paths = test_paths();
        let root = paths
            .config_dir
            .parent()
            .expect("config dir should have a parent")
            .to_path_buf();

        paths
            .ensure_dirs()
            .expect("ensure_dirs should create application directories");

        assert!(paths.config_dir.is_dir());
        assert!(paths.cache_dir.is_dir());
        assert!(paths.data_dir.is_dir());

        let _ = std::fs::remove_dir_all(root);
    }
}
