use log::info;

use phup_backend::{OperationOutcome, OperationRequest, PhpVersion, RuntimeManager};

use crate::cli::Command;
use crate::error::AppError;
use crate::progress;

pub async fn run(manager: &dyn RuntimeManager, command: Command) -> Result<(), AppError> {
    match command {
        Command::List { json } => list(manager, json).await,
        Command::Use { version } => use_version(manager, &version).await,
        Command::Install { version } => install(manager, version).await,
        Command::Extensions {
            version,
            extensions,
        } => install_extensions(manager, &version, extensions).await,
        Command::Composer => install_composer(manager).await,
        Command::Uninstall { yes } => uninstall_all(manager, yes).await,
    }
}

async fn list(manager: &dyn RuntimeManager, json: bool) -> Result<(), AppError> {
    let versions = manager.list_installed().await?;
    let active = manager.active_version().await.unwrap_or_default();

    if json {
        let payload: Vec<_> = versions
            .iter()
            .map(|version| {
                serde_json::json!({
                    "identifier": version.to_string(),
                    "name": version.name,
                    "source": version.source,
                    "active": is_active(active.as_ref(), version),
                })
            })
            .collect();
        println!("{:#}", serde_json::Value::Array(payload));
        return Ok(());
    }

    if versions.is_empty() {
        println!("No PHP versions installed.");
        return Ok(());
    }

    for version in &versions {
        let marker = if is_active(active.as_ref(), version) {
            "*"
        } else {
            " "
        };
        println!("{marker} {version}");
    }
    Ok(())
}

fn is_active(active: Option<&PhpVersion>, version: &PhpVersion) -> bool {
    active.is_some_and(|active| active.name == version.base())
}

async fn use_version(manager: &dyn RuntimeManager, input: &str) -> Result<(), AppError> {
    let version = find_installed(manager, input).await?;
    manager.activate(&version).await?;

    // Re-scan after switching; the alternatives link is the truth now.
    match manager.active_version().await {
        Ok(Some(active)) => println!("Global PHP version is now {active}"),
        _ => println!("Switched global PHP version to {version}"),
    }
    Ok(())
}

async fn find_installed(
    manager: &dyn RuntimeManager,
    input: &str,
) -> Result<PhpVersion, AppError> {
    let versions = manager.list_installed().await?;
    if versions.is_empty() {
        return Err(AppError::NoVersionsInstalled);
    }

    let requested: PhpVersion = input.parse().unwrap_or_else(|never| match never {});
    versions
        .into_iter()
        .find(|v| v.to_string() == input.trim() || v.base() == requested.base())
        .ok_or_else(|| AppError::UnknownVersion {
            version: input.trim().to_string(),
        })
}

async fn install(manager: &dyn RuntimeManager, version: String) -> Result<(), AppError> {
    let version = version.trim().to_string();
    if version.is_empty() {
        return Err(AppError::UnknownVersion { version });
    }

    info!("installing php{version} from the package repository");
    let handle = manager.start(OperationRequest::InstallVersion { version });
    finalize(progress::drive(handle).await)?;
    println!("Done. Run `phup list` to see the installed versions.");
    Ok(())
}

async fn install_extensions(
    manager: &dyn RuntimeManager,
    version: &str,
    extensions: String,
) -> Result<(), AppError> {
    // Extensions attach to an installed version, so the identifier must
    // resolve against the inventory first.
    let version = find_installed(manager, version).await?;

    info!("installing extensions [{extensions}] for {version}");
    let handle = manager.start(OperationRequest::InstallExtensions {
        version,
        extensions,
    });
    finalize(progress::drive(handle).await)?;
    println!("Done.");
    Ok(())
}

async fn install_composer(manager: &dyn RuntimeManager) -> Result<(), AppError> {
    info!("installing composer from getcomposer.org");
    let handle = manager.start(OperationRequest::InstallComposer);
    finalize(progress::drive(handle).await)?;
    println!("Composer installed to /usr/local/bin/composer.");
    Ok(())
}

async fn uninstall_all(manager: &dyn RuntimeManager, yes: bool) -> Result<(), AppError> {
    if !yes {
        let confirmed = inquire::Confirm::new(
            "Completely remove PHP, Composer, and Laravel Herd from this system?",
        )
        .with_default(false)
        .prompt()
        .map_err(|error| AppError::Prompt(error.to_string()))?;

        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    info!("uninstalling php, composer, and herd-lite");
    let handle = manager.start(OperationRequest::UninstallAll);
    finalize(progress::drive(handle).await)?;
    println!("PHP, Composer, and Laravel Herd have been removed.");
    Ok(())
}

fn finalize(outcome: Option<OperationOutcome>) -> Result<(), AppError> {
    let outcome = outcome.ok_or(AppError::WorkerStopped)?;
    if outcome.is_clean() {
        return Ok(());
    }

    let summary = outcome
        .failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(AppError::OperationFailed { summary })
}
