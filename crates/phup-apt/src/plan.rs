//! Fixed command plans for each orchestrated operation.
//!
//! Plans are pure data: deriving one never touches the system, which keeps
//! the package-name derivation and argument shapes testable without
//! spawning anything.

use std::fmt;
use std::path::Path;

use phup_backend::OperationRequest;

/// apt repository carrying the versioned `phpX.Y` packages.
pub const PHP_REPOSITORY: &str = "ppa:ondrej/php";

/// Where apt-managed `phpX.Y` binaries land and where the alternatives
/// switch points.
pub const PHP_BIN_DIR: &str = "/usr/bin";

const COMPOSER_INSTALLER_URL: &str = "https://getcomposer.org/installer";
const COMPOSER_SETUP_FILE: &str = "composer-setup.php";
const COMPOSER_INSTALL_PATH: &str = "/usr/local/bin/composer";

// SHA-384 of the getcomposer.org installer, pinned to the release the tool
// was validated against. TODO: fetch the current digest from
// https://composer.github.io/installer.sig instead of pinning.
const COMPOSER_INSTALLER_SHA384: &str = "dac665fdc30fdd8ec78b38b9800061b4150413ff2e3b6f88543c636f7cd84f6db9189d43a81e5503cda447da73c7e5b6";

/// Runtime directories and binaries removed by a full uninstall.
const RUNTIME_PURGE_PATHS: [&str; 6] = [
    "/etc/php",
    "/usr/bin/php",
    "/usr/local/bin/php",
    "/usr/lib/php",
    "/usr/share/php",
    "/var/lib/php",
];

/// Per-user state removed by a full uninstall, relative to the home dir.
const USER_PURGE_PATHS: [&str; 2] = [".composer", ".config/herd-lite"];

/// One planned external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    fn new(program: &str, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Derive the fixed command list for one operation request.
///
/// An empty plan is valid and means the operation completes immediately
/// (install-extensions with no usable extension tokens).
#[must_use]
pub fn build_plan(request: &OperationRequest) -> Vec<CommandSpec> {
    match request {
        OperationRequest::InstallVersion { version } => install_version_plan(version),
        OperationRequest::InstallExtensions {
            version,
            extensions,
        } => install_extensions_plan(version.base(), extensions),
        OperationRequest::InstallComposer => install_composer_plan(),
        OperationRequest::UninstallAll => uninstall_plan(dirs::home_dir().as_deref()),
    }
}

fn install_version_plan(version: &str) -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("add-apt-repository", [PHP_REPOSITORY, "-y"]),
        CommandSpec::new("apt", ["update"]),
        CommandSpec::new("apt", ["install".to_string(), format!("php{version}"), "-y".to_string()]),
    ]
}

fn install_extensions_plan(base: &str, extensions: &str) -> Vec<CommandSpec> {
    let packages = derive_extension_packages(base, extensions);
    if packages.is_empty() {
        return Vec::new();
    }

    let mut install_args = vec!["install".to_string(), "-y".to_string()];
    install_args.extend(packages);

    vec![
        CommandSpec::new("apt", ["update"]),
        CommandSpec::new("apt", install_args),
    ]
}

/// Turn `"curl, xml,,mysql"` into `["php8.3-curl", "php8.3-xml",
/// "php8.3-mysql"]`: whitespace trimmed, empty tokens dropped, order kept.
#[must_use]
pub fn derive_extension_packages(base: &str, extensions: &str) -> Vec<String> {
    extensions
        .split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!("{base}-{ext}"))
        .collect()
}

fn install_composer_plan() -> Vec<CommandSpec> {
    let verify_script = format!(
        "if (hash_file(\"sha384\", \"{COMPOSER_SETUP_FILE}\") === \"{COMPOSER_INSTALLER_SHA384}\") \
         {{ echo \"Installer verified 100%\"; }} else {{ echo \"Installer corrupt 0%\"; \
         unlink(\"{COMPOSER_SETUP_FILE}\"); }} echo PHP_EOL;"
    );

    vec![
        CommandSpec::new(
            "php",
            [
                "-r".to_string(),
                format!("copy(\"{COMPOSER_INSTALLER_URL}\", \"{COMPOSER_SETUP_FILE}\");"),
            ],
        ),
        CommandSpec::new("php", ["-r".to_string(), verify_script]),
        CommandSpec::new("php", [COMPOSER_SETUP_FILE]),
        CommandSpec::new(
            "php",
            [
                "-r".to_string(),
                format!("unlink(\"{COMPOSER_SETUP_FILE}\");"),
            ],
        ),
        CommandSpec::new("mv", ["composer.phar", COMPOSER_INSTALL_PATH]),
    ]
}

fn uninstall_plan(home: Option<&Path>) -> Vec<CommandSpec> {
    let mut plan = vec![
        CommandSpec::new("apt", ["purge", "php*", "-y"]),
        CommandSpec::new(
            "rm",
            ["-rf"].into_iter().chain(RUNTIME_PURGE_PATHS),
        ),
    ];

    // User-level state needs a resolvable home; without one there is
    // nothing user-level to remove.
    if let Some(home) = home {
        let mut args = vec!["-rf".to_string()];
        args.extend(
            USER_PURGE_PATHS
                .iter()
                .map(|rel| home.join(rel).to_string_lossy().into_owned()),
        );
        plan.push(CommandSpec::new("rm", args));
    }

    plan
}
