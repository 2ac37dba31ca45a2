//! Service container for dependency injection
//!
//! Holds the two external collaborators behind `Arc<dyn Trait>` so tests
//! can swap in the mocks from [`crate::di::mocks`]. The vtable indirection
//! is noise next to the subprocess calls behind it.

use super::traits::{EnvironmentProvider, ResolverProvider};
use crate::project::Project;
use crate::resolver::CommandResolver;
use crate::venv::VirtualEnv;
use std::sync::Arc;
use wharf_core::WharfResult;

#[derive(Clone)]
pub struct ServiceContainer {
    pub environment: Arc<dyn EnvironmentProvider>,
    pub resolver: Arc<dyn ResolverProvider>,
}

impl ServiceContainer {
    /// Create a container with production implementations: the project's
    /// virtualenv driver and the configured resolver command.
    pub fn new(project: &Project) -> WharfResult<Self> {
        let resolver_command = project.config().resolver_command()?;
        Ok(Self {
            environment: Arc::new(VirtualEnv::new(project)),
            resolver: Arc::new(CommandResolver::new(resolver_command)),
        })
    }

    /// Create a container with custom provider implementations, primarily
    /// for testing.
    pub fn with_providers(
        environment: Arc<dyn EnvironmentProvider>,
        resolver: Arc<dyn ResolverProvider>,
    ) -> Self {
        Self {
            environment,
            resolver,
        }
    }

    pub fn environment(&self) -> &dyn EnvironmentProvider {
        self.environment.as_ref()
    }

    pub fn resolver(&self) -> &dyn ResolverProvider {
        self.resolver.as_ref()
    }
}
