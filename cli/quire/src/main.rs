//! Quire CLI — assemble and validate calculation documents.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use quire_store::DirStore;

use manifest::QuireManifest;

#[derive(Parser)]
#[command(name = "quire", version, about = "Document inclusion and input-field engine")]
struct Cli {
    /// Store directory (overrides quire.toml)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new quire project
    Init {
        /// Project name
        name: String,
    },
    /// Import a document into the store, validating its include edges
    Add {
        /// Source file
        file: PathBuf,
        /// Identifier to store under (default: the file stem)
        #[arg(long)]
        id: Option<String>,
    },
    /// Expand a document to its flat text
    Expand {
        /// Document identifier
        id: String,
        /// Values for one positional field, `;`-joined (repeatable)
        #[arg(long = "values")]
        values: Vec<String>,
        /// Skip the substitution pass at every nesting level
        #[arg(long)]
        raw: bool,
    },
    /// Check whether proposed include edges would create a cycle
    Check {
        /// Subject document identifier
        id: String,
        /// Proposed outgoing include identifier (repeatable)
        #[arg(long = "include")]
        includes: Vec<String>,
    },
    /// List stored documents and their include edges
    List {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Add { file, id } => {
            let (store, _) = open_store(&cwd, cli.store.as_deref())?;
            commands::add::run(&store, &file, id.as_deref())
        }

        Commands::Expand { id, values, raw } => {
            let (store, max_depth) = open_store(&cwd, cli.store.as_deref())?;
            commands::expand::run(&store, max_depth, &id, &values, raw)
        }

        Commands::Check { id, includes } => {
            let (store, _) = open_store(&cwd, cli.store.as_deref())?;
            commands::check::run(&store, &id, &includes)
        }

        Commands::List { json } => {
            let (store, _) = open_store(&cwd, cli.store.as_deref())?;
            commands::list::run(&store, json)
        }
    }
}

/// Resolve the store from the `--store` flag or the nearest `quire.toml`.
fn open_store(cwd: &Path, flag: Option<&Path>) -> anyhow::Result<(DirStore, usize)> {
    if let Some(root) = flag {
        return Ok((DirStore::new(root), quire_resolve::DEFAULT_MAX_DEPTH));
    }
    match QuireManifest::find_and_load(cwd)? {
        Some((manifest, project_dir)) => {
            let store = DirStore::with_extension(
                project_dir.join(manifest.store_root()),
                manifest.extension(),
            );
            Ok((store, manifest.max_depth()))
        }
        None => anyhow::bail!("no quire.toml found and no --store given (run `quire init` first)"),
    }
}
