use wharf::config::Config;
use wharf::di::ServiceContainer;
use wharf::project::Project;
use wharf::routines::lock::{do_lock, LockOptions};
use wharf::WharfResult;

pub fn run(options: LockOptions) -> WharfResult<()> {
    let config = Config::load()?;
    let project = Project::locate(config)?;
    let container = ServiceContainer::new(&project)?;

    do_lock(&project, container.resolver(), &options)?;
    Ok(())
}
