use wharf::config::Config;
use wharf::di::ServiceContainer;
use wharf::project::Project;
use wharf::routines::purge::{do_purge, PurgeOptions};
use wharf::WharfResult;

pub fn run(options: PurgeOptions) -> WharfResult<()> {
    let config = Config::load()?;
    let project = Project::locate(config)?;
    let container = ServiceContainer::new(&project)?;

    do_purge(&project, container.environment(), &options)?;
    Ok(())
}
