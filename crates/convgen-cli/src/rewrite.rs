//! The `convgen -w <FILE>` command.

use crate::{config, splice};
use anyhow::{Context, Result};
use convgen_core::Generator;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for one run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Source file to rewrite.
    pub target: PathBuf,

    /// Write `<target>.out` instead of overwriting `target`.
    pub debug: bool,

    /// Explicit config file.
    pub config: Option<PathBuf>,
}

impl Options {
    /// Where the result goes.
    pub fn destination(&self) -> PathBuf {
        if self.debug {
            let mut name = self.target.as_os_str().to_owned();
            name.push(".out");
            PathBuf::from(name)
        } else {
            self.target.clone()
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to write: no marked functions, or identical output.
    Unchanged,

    /// The result was written to this path.
    Written(PathBuf),
}

/// Rewrite the marked functions of `options.target`.
///
/// Nothing is written when generation fails or the output would be
/// byte-identical to what is already at the destination.
pub fn run(options: &Options) -> Result<Outcome> {
    let target = &options.target;
    let config = config::load(options.config.as_deref(), target)?;
    let generator = Generator::from_config(&config)?;

    let source = fs::read_to_string(target)
        .with_context(|| format!("Failed to read source file: {:?}", target))?;
    let mut file =
        syn::parse_file(&source).with_context(|| format!("Failed to parse {:?}", target))?;

    let generation = generator
        .generate(&mut file)
        .with_context(|| format!("Failed to generate conversions for {:?}", target))?;

    if !generation.has_changed() {
        tracing::info!(path = %target.display(), "no marked functions");
        return Ok(Outcome::Unchanged);
    }

    let output = splice::splice(&source, &generation.rewrites)
        .with_context(|| format!("Failed to splice generated code into {:?}", target))?;

    if !generation.requires.is_empty() {
        let requires: Vec<&str> = generation.requires.iter().map(String::as_str).collect();
        tracing::warn!(
            path = %target.display(),
            requires = %requires.join(", "),
            "generated code needs these paths in scope"
        );
    }

    let destination = options.destination();
    if fs::read(&destination).is_ok_and(|existing| existing == output.as_bytes()) {
        tracing::info!(path = %destination.display(), "output unchanged");
        return Ok(Outcome::Unchanged);
    }
    write_preserving_permissions(&destination, &output)?;

    tracing::info!(
        path = %destination.display(),
        functions = generation.rewrites.len(),
        "wrote conversions"
    );
    Ok(Outcome::Written(destination))
}

/// Write `contents`, restoring the permissions `path` had before.
fn write_preserving_permissions(path: &Path, contents: &str) -> Result<()> {
    let permissions = fs::metadata(path).ok().map(|metadata| metadata.permissions());

    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;

    if let Some(permissions) = permissions {
        fs::set_permissions(path, permissions)
            .with_context(|| format!("Failed to restore permissions of {:?}", path))?;
    }
    Ok(())
}
