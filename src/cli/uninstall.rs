use wharf::config::Config;
use wharf::di::ServiceContainer;
use wharf::project::Project;
use wharf::routines::uninstall::{do_uninstall, UninstallOptions, UninstallOutcome};
use wharf::{WharfError, WharfResult};

pub fn run(options: UninstallOptions) -> WharfResult<()> {
    let config = Config::load()?;
    let mut project = Project::locate(config)?;
    let container = ServiceContainer::new(&project)?;

    let outcome = do_uninstall(
        &mut project,
        container.environment(),
        container.resolver(),
        &options,
    )?;

    match exit_error(&outcome) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Map the environment-removal outcome to the process exit status.
///
/// Manifest and lockfile edits are already committed at this point; a
/// failed environment removal only changes the exit code.
fn exit_error(outcome: &UninstallOutcome) -> Option<WharfError> {
    if !outcome.failed() {
        return None;
    }
    eprintln!(
        "Failed to remove from the environment: {}",
        outcome.failed_removals.join(", ")
    );
    Some(WharfError::SubprocessExit(1))
}
