//! Build registrar trait and in-process registrars.
//!
//! A registrar is the build orchestrator's side of the contract: it receives
//! one fully merged [`BuildDescriptor`] per declared build variant.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::descriptor::BuildDescriptor;
use crate::gem::{GemRef, GemSource};
use crate::{Error, Result};

/// Trait for build registration targets.
pub trait BuildRegistrar {
    /// Name of this registrar.
    fn name(&self) -> &'static str;

    /// Register a build target.
    fn register(&mut self, descriptor: BuildDescriptor) -> Result<()>;
}

/// Collects descriptors in registration order.
#[derive(Debug, Default)]
pub struct MemoryRegistrar {
    builds: Vec<BuildDescriptor>,
}

impl MemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builds(&self) -> &[BuildDescriptor] {
        &self.builds
    }

    pub fn get(&self, name: &str) -> Option<&BuildDescriptor> {
        self.builds.iter().find(|b| b.name == name)
    }

    pub fn into_builds(self) -> Vec<BuildDescriptor> {
        self.builds
    }
}

impl BuildRegistrar for MemoryRegistrar {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn register(&mut self, descriptor: BuildDescriptor) -> Result<()> {
        if self.get(&descriptor.name).is_some() {
            return Err(Error::Conflict(format!(
                "build '{}' is already registered",
                descriptor.name
            )));
        }
        self.builds.push(descriptor);
        Ok(())
    }
}

/// Checks that locally resolvable gems exist before forwarding.
///
/// `core` gems are looked up as `<gem_root>/<name>`; `path` gems relative to
/// the descriptor's self module directory. Remote gems pass through.
pub struct ResolvingRegistrar<R> {
    gem_root: PathBuf,
    inner: R,
}

impl<R: BuildRegistrar> ResolvingRegistrar<R> {
    pub fn new(gem_root: impl Into<PathBuf>, inner: R) -> Self {
        Self {
            gem_root: gem_root.into(),
            inner,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn resolve(&self, gem: &GemRef, base: &Path) -> Result<()> {
        let dir = match gem.source {
            GemSource::Core => self.gem_root.join(&gem.location),
            GemSource::Path => base.join(&gem.location),
            _ => return Ok(()),
        };
        if !dir.is_dir() {
            return Err(Error::UnresolvedGem(format!(
                "{} (looked in {})",
                gem,
                dir.display()
            )));
        }
        debug!(gem = %gem, dir = %dir.display(), "Resolved gem");
        Ok(())
    }
}

impl<R: BuildRegistrar> BuildRegistrar for ResolvingRegistrar<R> {
    fn name(&self) -> &'static str {
        "resolving"
    }

    fn register(&mut self, descriptor: BuildDescriptor) -> Result<()> {
        for gem in &descriptor.gems {
            self.resolve(gem, &descriptor.self_module.dir)?;
        }
        self.inner.register(descriptor)
    }
}
