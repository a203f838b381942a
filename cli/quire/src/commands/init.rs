//! `quire init` — project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::QuireManifest;

/// Create a new quire project at the given path.
///
/// `name` is the project name. The directory `name` is created relative to cwd.
pub fn run(name: &str) -> Result<()> {
    let project_dir = Path::new(name);
    create_project(project_dir, name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir.join("docs")).context("creating docs/ directory")?;

    let manifest_content = QuireManifest::template(name);
    fs::write(project_dir.join("quire.toml"), &manifest_content)
        .context("writing quire.toml")?;

    // A starter document: two input fields with form-declared defaults.
    let sample = "'Sample worksheet\nwidth = ? {10}\nheight = ? {4}\narea = width * height\n\u{000B}dims\t10;4\n";
    fs::write(project_dir.join("docs").join("sample.qd"), sample)
        .context("writing docs/sample.qd")?;

    println!("Created project '{name}'");
    println!("  {name}/quire.toml");
    println!("  {name}/docs/sample.qd");

    Ok(())
}
