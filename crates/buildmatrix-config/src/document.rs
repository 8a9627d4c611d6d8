//! Build matrix document parsing.

use crate::{ConfigError, ConfigResult};
use buildmatrix_core::{GemRef, GemSource, Toolchain};
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// The document built into the binary, used when no file is given.
pub const DEFAULT_CONFIG: &str = include_str!("../builds.kdl");

/// Settings shared by all builds or overridden by one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Toolchain name.
    pub toolchain: Option<Toolchain>,
    /// Explicit compiler command.
    pub cc: Option<String>,
    /// Preprocessor define tokens.
    pub defines: Vec<String>,
    /// Compiler flag tokens.
    pub cflags: Vec<String>,
    /// Gem references.
    pub gems: Vec<GemRef>,
    /// Output directory name (per-build only).
    pub build_dir: Option<String>,
    /// Link with C++ ABI.
    pub cxx_abi: Option<bool>,
    /// Compile with debug information.
    pub debug: Option<bool>,
    /// Build and run the test suite.
    pub test: Option<bool>,
}

/// A named build variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEntry {
    pub name: String,
    pub settings: Settings,
}

/// A parsed build matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Settings applied to every build.
    pub common: Settings,
    /// Build variants in declaration order.
    pub builds: Vec<BuildEntry>,
    /// Directory the document was loaded from.
    pub source_dir: PathBuf,
}

impl ConfigDocument {
    pub fn build(&self, name: &str) -> Option<&BuildEntry> {
        self.builds.iter().find(|b| b.name == name)
    }

    pub fn build_names(&self) -> impl Iterator<Item = &str> {
        self.builds.iter().map(|b| b.name.as_str())
    }
}

/// Parse the built-in document.
pub fn default_document() -> ConfigResult<ConfigDocument> {
    parse_document(DEFAULT_CONFIG)
}

/// Load a document from a file. Its directory becomes the self module directory.
pub fn load_document(path: &Path) -> ConfigResult<ConfigDocument> {
    let content = std::fs::read_to_string(path)?;
    let mut doc = parse_document(&content)?;
    doc.source_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    debug!(path = %path.display(), builds = doc.builds.len(), "Loaded build matrix");
    Ok(doc)
}

/// Parse a build matrix from KDL text.
pub fn parse_document(kdl: &str) -> ConfigResult<ConfigDocument> {
    let doc: KdlDocument = kdl.parse()?;

    let mut common = None;
    let mut builds = None;

    for node in doc.nodes() {
        match node.name().value() {
            "common" => {
                if common.is_some() {
                    return Err(ConfigError::Duplicate("common section".to_string()));
                }
                let settings = parse_settings(node, "common")?;
                if settings.build_dir.is_some() {
                    return Err(ConfigError::InvalidValue {
                        field: "common.build_dir".to_string(),
                        message: "build_dir can only be set per build".to_string(),
                    });
                }
                common = Some(settings);
            }
            "builds" => {
                if builds.is_some() {
                    return Err(ConfigError::Duplicate("builds section".to_string()));
                }
                builds = Some(parse_builds(node)?);
            }
            other => {
                warn!(node = %other, "Ignoring unknown top-level node");
            }
        }
    }

    let builds = builds.ok_or_else(|| ConfigError::MissingField("builds".to_string()))?;

    Ok(ConfigDocument {
        common: common.unwrap_or_default(),
        builds,
        source_dir: PathBuf::from("."),
    })
}

fn parse_builds(node: &KdlNode) -> ConfigResult<Vec<BuildEntry>> {
    let mut builds = Vec::new();
    let mut seen = HashSet::new();

    let Some(children) = node.children() else {
        return Ok(builds);
    };

    for child in children.nodes() {
        let name = child.name().value().to_string();
        check_relative_dir(&name, &format!("build name '{}'", name))?;
        if !seen.insert(name.clone()) {
            return Err(ConfigError::Duplicate(format!("build '{}'", name)));
        }
        let settings = parse_settings(child, &name)?;
        builds.push(BuildEntry { name, settings });
    }

    Ok(builds)
}

fn parse_settings(node: &KdlNode, context: &str) -> ConfigResult<Settings> {
    let mut settings = Settings::default();

    let Some(children) = node.children() else {
        return Ok(settings);
    };

    for child in children.nodes() {
        let key = child.name().value();
        let field = || format!("{}.{}", context, key);
        match key {
            "toolchain" => {
                let name = get_first_string_arg(child)
                    .ok_or_else(|| ConfigError::MissingField(field()))?;
                let toolchain = name
                    .parse::<Toolchain>()
                    .map_err(|e| ConfigError::InvalidValue {
                        field: field(),
                        message: e.to_string(),
                    })?;
                settings.toolchain = Some(toolchain);
            }
            "cc" => {
                settings.cc = Some(
                    get_first_string_arg(child)
                        .ok_or_else(|| ConfigError::MissingField(field()))?,
                );
            }
            "defines" => settings.defines.extend(get_string_args(child, &field())?),
            "cflags" => settings.cflags.extend(get_string_args(child, &field())?),
            "gems" => settings.gems.extend(parse_gems(child, context)?),
            "build_dir" | "build-dir" => {
                let dir = get_first_string_arg(child)
                    .ok_or_else(|| ConfigError::MissingField(field()))?;
                check_relative_dir(&dir, &field())?;
                settings.build_dir = Some(dir);
            }
            "c++abi" => settings.cxx_abi = Some(get_bool_arg(child, &field())?),
            "debug" => settings.debug = Some(get_bool_arg(child, &field())?),
            "test" => settings.test = Some(get_bool_arg(child, &field())?),
            other => {
                warn!(setting = %other, context = %context, "Ignoring unknown setting");
            }
        }
    }

    Ok(settings)
}

// Build names and build_dir values end up under the build root, so they must
// be plain relative paths.
fn check_relative_dir(value: &str, field: &str) -> ConfigResult<()> {
    let invalid = |message: &str| ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    };
    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !Path::new(value)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(invalid("must be a relative path without '.' or '..' components"));
    }
    Ok(())
}

fn parse_gems(node: &KdlNode, context: &str) -> ConfigResult<Vec<GemRef>> {
    let mut gems = Vec::new();

    if node.entries().iter().any(|e| e.name().is_none()) {
        return Err(ConfigError::InvalidValue {
            field: format!("{}.gems", context),
            message: "gems are child nodes tagged by source, e.g. `gems { core \"mruby-io\" }`"
                .to_string(),
        });
    }

    let Some(children) = node.children().filter(|c| !c.nodes().is_empty()) else {
        warn!(context = %context, "Empty gems node");
        return Ok(gems);
    };

    for child in children.nodes() {
        let tag = child.name().value();
        let source: GemSource = tag.parse().map_err(|_| ConfigError::UnknownGemSource {
            source_tag: tag.to_string(),
            context: context.to_string(),
        })?;
        let location = get_first_string_arg(child)
            .ok_or_else(|| ConfigError::MissingField(format!("{}.gems.{}", context, tag)))?;

        let mut gem = GemRef::new(source, location);
        if let Some(branch) = get_string_prop(child, "branch") {
            gem = gem.with_branch(branch);
        }
        gems.push(gem);
    }

    Ok(gems)
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_string_args(node: &KdlNode, field: &str) -> ConfigResult<Vec<String>> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .map(|e| {
            e.value()
                .as_string()
                .map(|s| s.to_string())
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("expected a string, got {}", e.value()),
                })
        })
        .collect()
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

fn get_bool_arg(node: &KdlNode, field: &str) -> ConfigResult<bool> {
    let value = node
        .entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
        .ok_or_else(|| ConfigError::MissingField(field.to_string()))?;

    match value {
        KdlValue::Bool(b) => Ok(*b),
        other => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a boolean, got {}", other),
        }),
    }
}
