//! Merging common settings with per-build overrides.
//!
//! Merge semantics:
//! - Lists (defines, cflags, gems): concatenate, common first, no de-duplication
//! - Scalars (toolchain, cc, debug, test, c++abi): override wins when set
//! - build_dir: per build only, defaults to the build name

use crate::document::{BuildEntry, Settings};
use crate::patch::self_module_flags;
use buildmatrix_core::{BuildDescriptor, ModuleBuild};
use std::path::Path;

/// Merge two settings records, `overlay` on top of `base`.
pub fn merge_settings(base: &Settings, overlay: &Settings) -> Settings {
    Settings {
        toolchain: overlay.toolchain.or(base.toolchain),
        cc: overlay.cc.clone().or_else(|| base.cc.clone()),
        defines: concat(&base.defines, &overlay.defines),
        cflags: concat(&base.cflags, &overlay.cflags),
        gems: concat(&base.gems, &overlay.gems),
        build_dir: overlay.build_dir.clone(),
        cxx_abi: overlay.cxx_abi.or(base.cxx_abi),
        debug: overlay.debug.or(base.debug),
        test: overlay.test.or(base.test),
    }
}

fn concat<T: Clone>(base: &[T], overlay: &[T]) -> Vec<T> {
    base.iter().chain(overlay).cloned().collect()
}

/// Resolve one build into the descriptor handed to a registrar.
///
/// The compiler command is the merged `cc` setting, then `cc_override`, then
/// the toolchain's default command.
pub fn resolve_build(
    common: &Settings,
    entry: &BuildEntry,
    source_dir: &Path,
    cc_override: Option<&str>,
) -> BuildDescriptor {
    let merged = merge_settings(common, &entry.settings);

    let toolchain = merged.toolchain.unwrap_or_default();
    let cc_command = merged
        .cc
        .or_else(|| cc_override.map(str::to_string))
        .unwrap_or_else(|| toolchain.default_cc_command().to_string());
    let cxx_abi = merged.cxx_abi.unwrap_or(false);

    let dir_name = merged.build_dir.as_deref().unwrap_or(&entry.name);
    let build_dir = BuildDescriptor::output_dir(dir_name);

    let mut module_cflags = merged.cflags.clone();
    module_cflags.extend(self_module_flags(&cc_command, cxx_abi));

    BuildDescriptor {
        name: entry.name.clone(),
        toolchain,
        cc_command,
        build_dir,
        debug: merged.debug.unwrap_or(true),
        test: merged.test.unwrap_or(true),
        cxx_abi,
        defines: merged.defines,
        cflags: merged.cflags,
        gems: merged.gems,
        self_module: ModuleBuild {
            dir: source_dir.to_path_buf(),
            cflags: module_cflags,
        },
    }
}
