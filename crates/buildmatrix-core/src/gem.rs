//! Feature module ("gem") references.
//!
//! A gem reference is a tagged identifier. The build system resolves it into
//! an importable unit; this crate only carries the tag and its arguments.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// Where a gem comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum GemSource {
    /// Bundled with the runtime, looked up by name.
    #[display("core")]
    Core,
    /// A directory on disk.
    #[display("path")]
    Path,
    /// A GitHub repository (`owner/repo`).
    #[display("github")]
    Github,
    /// An arbitrary git URL.
    #[display("git")]
    Git,
    /// A package index name.
    #[display("mgem")]
    Mgem,
}

impl GemSource {
    /// Whether the reference names something fetched over the network.
    pub fn is_remote(&self) -> bool {
        matches!(self, GemSource::Github | GemSource::Git | GemSource::Mgem)
    }
}

impl FromStr for GemSource {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "core" => Ok(GemSource::Core),
            "path" => Ok(GemSource::Path),
            "github" => Ok(GemSource::Github),
            "git" => Ok(GemSource::Git),
            "mgem" => Ok(GemSource::Mgem),
            other => Err(Error::InvalidInput(format!("unknown gem source: {}", other))),
        }
    }
}

/// A reference to a gem to include in a build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GemRef {
    pub source: GemSource,
    /// Gem name, directory, `owner/repo` or URL depending on `source`.
    pub location: String,
    /// Branch to check out for git-based sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl GemRef {
    pub fn new(source: GemSource, location: impl Into<String>) -> Self {
        Self {
            source,
            location: location.into(),
            branch: None,
        }
    }

    pub fn core(name: impl Into<String>) -> Self {
        Self::new(GemSource::Core, name)
    }

    pub fn path(dir: impl Into<String>) -> Self {
        Self::new(GemSource::Path, dir)
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

impl std::fmt::Display for GemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.location)?;
        if let Some(branch) = &self.branch {
            write!(f, "@{}", branch)?;
        }
        Ok(())
    }
}
