//! Evaluation pass: resolve every build and hand it to a registrar.

use crate::document::ConfigDocument;
use crate::merge::resolve_build;
use crate::{ConfigError, ConfigResult};
use buildmatrix_core::{BuildDescriptor, BuildRegistrar, MemoryRegistrar};
use tracing::{debug, info, info_span};

/// Caller-supplied inputs that are not part of the document.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    /// Compiler command used when neither the build nor common settings set `cc`.
    pub cc_override: Option<String>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc_override = Some(cc.into());
        self
    }
}

/// Register every build in declaration order.
///
/// Stops at the first registrar failure. Returns the number of builds registered.
pub fn evaluate<R: BuildRegistrar>(
    doc: &ConfigDocument,
    ctx: &EvalContext,
    registrar: &mut R,
) -> ConfigResult<usize> {
    info!(
        builds = doc.builds.len(),
        registrar = registrar.name(),
        "Evaluating build matrix"
    );

    for entry in &doc.builds {
        let _span = info_span!("build", name = %entry.name).entered();

        let descriptor = resolve_build(
            &doc.common,
            entry,
            &doc.source_dir,
            ctx.cc_override.as_deref(),
        );
        debug!(
            toolchain = %descriptor.toolchain,
            cc = %descriptor.cc_command,
            build_dir = %descriptor.build_dir.display(),
            gems = descriptor.gems.len(),
            "Registering build"
        );

        registrar.register(descriptor)?;
    }

    Ok(doc.builds.len())
}

/// Resolve every build into descriptors without an external registrar.
pub fn resolve_all(
    doc: &ConfigDocument,
    ctx: &EvalContext,
) -> ConfigResult<Vec<BuildDescriptor>> {
    let mut registrar = MemoryRegistrar::new();
    evaluate(doc, ctx, &mut registrar)?;
    Ok(registrar.into_builds())
}

/// Resolve a single named build.
pub fn resolve_one(
    doc: &ConfigDocument,
    ctx: &EvalContext,
    name: &str,
) -> ConfigResult<BuildDescriptor> {
    let entry = doc
        .build(name)
        .ok_or_else(|| ConfigError::UnknownBuild(name.to_string()))?;
    Ok(resolve_build(
        &doc.common,
        entry,
        &doc.source_dir,
        ctx.cc_override.as_deref(),
    ))
}
