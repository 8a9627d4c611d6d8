//! Build descriptors handed to a registrar.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::gem::GemRef;
use crate::toolchain::Toolchain;

/// Root directory under which every build's output directory is placed.
pub const BUILD_ROOT: &str = "build";

/// Fully merged description of one build variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    /// Build name (unique within a document).
    pub name: String,
    /// Toolchain used to compile the build.
    pub toolchain: Toolchain,
    /// Compiler command the toolchain runs.
    pub cc_command: String,
    /// Output directory, always under [`BUILD_ROOT`].
    pub build_dir: PathBuf,
    /// Compile with debug information.
    pub debug: bool,
    /// Build and run the test suite.
    pub test: bool,
    /// Link with C++ ABI.
    pub cxx_abi: bool,
    /// Preprocessor defines, common first.
    pub defines: Vec<String>,
    /// Compiler flags, common first.
    pub cflags: Vec<String>,
    /// Gems to include, common first.
    pub gems: Vec<GemRef>,
    /// The module living next to the configuration document.
    pub self_module: ModuleBuild,
}

/// Compiler settings for a single module inside a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBuild {
    /// Module directory.
    pub dir: PathBuf,
    /// Effective compiler flags for the module.
    pub cflags: Vec<String>,
}

impl BuildDescriptor {
    /// Output directory for a build, `build/<dir>`.
    ///
    /// Root, prefix, `.` and `..` components of `dir` are dropped so the
    /// result never leaves [`BUILD_ROOT`].
    pub fn output_dir(dir: &str) -> PathBuf {
        let mut path = PathBuf::from(BUILD_ROOT);
        for component in Path::new(dir).components() {
            if let Component::Normal(part) = component {
                path.push(part);
            }
        }
        path
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable multi-line summary.
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} ({})\n", self.name, self.build_dir.display()));
        out.push_str(&format!(
            "  Toolchain: {} [{}]\n",
            self.toolchain, self.cc_command
        ));
        out.push_str(&format!(
            "  Debug: {}  Test: {}  C++ ABI: {}\n",
            self.debug, self.test, self.cxx_abi
        ));
        if !self.defines.is_empty() {
            out.push_str(&format!("  Defines: {}\n", self.defines.join(" ")));
        }
        if !self.cflags.is_empty() {
            out.push_str(&format!("  Flags: {}\n", self.cflags.join(" ")));
        }
        if !self.gems.is_empty() {
            let gems: Vec<String> = self.gems.iter().map(|g| g.to_string()).collect();
            out.push_str(&format!("  Gems: {}\n", gems.join(", ")));
        }
        out.push_str(&format!(
            "  Module {}: {}\n",
            self.self_module.dir.display(),
            self.self_module.cflags.join(" ")
        ));
        out
    }
}
