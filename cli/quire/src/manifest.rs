//! `quire.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The top-level manifest structure for a quire project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuireManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Store configuration.
    #[serde(default)]
    pub store: Option<StoreConfig>,
    /// Resolver configuration.
    #[serde(default)]
    pub resolver: Option<ResolverConfig>,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required).
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Store configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreConfig {
    /// Store directory relative to the project root.
    #[serde(default)]
    pub root: Option<String>,
    /// Document file extension.
    #[serde(default)]
    pub extension: Option<String>,
}

/// Resolver configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Maximum inclusion nesting depth.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl QuireManifest {
    /// Search upward from `start_dir` for a `quire.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join("quire.toml");
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: QuireManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing quire.toml")
    }

    /// The store directory relative to the project root.
    pub fn store_root(&self) -> &str {
        self.store
            .as_ref()
            .and_then(|s| s.root.as_deref())
            .unwrap_or("docs")
    }

    /// The document file extension.
    pub fn extension(&self) -> &str {
        self.store
            .as_ref()
            .and_then(|s| s.extension.as_deref())
            .unwrap_or("qd")
    }

    /// The maximum inclusion nesting depth.
    pub fn max_depth(&self) -> usize {
        self.resolver
            .as_ref()
            .and_then(|r| r.max_depth)
            .unwrap_or(quire_resolve::DEFAULT_MAX_DEPTH)
    }

    /// Generate the default template for `quire init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"

[store]
root = "docs"
extension = "qd"

[resolver]
max-depth = 64
"#
        )
    }
}
