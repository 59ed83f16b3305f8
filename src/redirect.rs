//! Output redirection for a single command.
//!
//! Grammar, at most one operator per command:
//!
//! - `cmd > file`: create `file`; refuses to touch a file that already exists.
//! - `cmd >> file`: append to `file`, creating it when absent.
//! - `cmd >+ file`: put the new output in front of what `file` holds, creating it when absent.

use crate::error::ShellError;
use crate::strutil::{self, WHITESPACE};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

pub const PREPEND_OPERATOR: &str = ">+";
pub const APPEND_OPERATOR: &str = ">>";
pub const OVERWRITE_OPERATOR: &str = ">";

/// Where a command's standard output ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Standard,
    Overwrite,
    Prepend,
    Append,
}

impl RedirectMode {
    pub fn operator(self) -> Option<&'static str> {
        match self {
            RedirectMode::Standard => None,
            RedirectMode::Overwrite => Some(OVERWRITE_OPERATOR),
            RedirectMode::Prepend => Some(PREPEND_OPERATOR),
            RedirectMode::Append => Some(APPEND_OPERATOR),
        }
    }
}

/// Outcome of checking whether a path can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProbe {
    Exists,
    MissingButCreatable,
    ParentInvalid,
}

/// The file standard output goes to. Dropping it closes the descriptor.
#[derive(Debug)]
pub enum Destination {
    Terminal,
    File(File),
}

impl Destination {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Destination::Terminal)
    }
}

/// A command with its redirection stripped off and its destination opened.
///
/// `destination` is a [`Destination::File`] exactly when `mode` is not `Standard`.
#[derive(Debug)]
pub struct ResolvedCommand {
    pub command: String,
    pub destination: Destination,
    pub mode: RedirectMode,
}

/// Decide which operator a command uses. `>+` is checked before `>>`, and both before `>`.
pub fn classify(raw: &str) -> RedirectMode {
    [
        RedirectMode::Prepend,
        RedirectMode::Append,
        RedirectMode::Overwrite,
    ]
    .into_iter()
    .find(|mode| {
        mode.operator()
            .is_some_and(|op| strutil::split(raw, op).len() > 1)
    })
    .unwrap_or(RedirectMode::Standard)
}

/// Check `path` without leaving anything behind.
///
/// A successful read-only open means the file exists. Otherwise the file is
/// created exclusively and removed again; failing that, some directory on the
/// way is missing or unusable.
pub fn probe(path: &Path) -> PathProbe {
    if File::open(path).is_ok() {
        return PathProbe::Exists;
    }
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => {
            drop(file);
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!("could not remove probe file {}: {e}", path.display());
            }
            PathProbe::MissingButCreatable
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => PathProbe::Exists,
        Err(_) => PathProbe::ParentInvalid,
    }
}

/// Strip the redirection from `raw` and open its target.
///
/// Missing targets of `>>` and `>+` are created and the mode becomes `Overwrite`.
/// An operator with no command in front of it is rejected before anything is opened.
pub fn resolve(raw: &str) -> anyhow::Result<ResolvedCommand> {
    let mode = classify(raw);
    let Some(operator) = mode.operator() else {
        // `ls >` and `> out` split into a single field but still try to redirect.
        if raw.contains(OVERWRITE_OPERATOR) {
            return Err(ShellError::ExpectedOneFile.into());
        }
        return Ok(ResolvedCommand {
            command: raw.to_string(),
            destination: Destination::Terminal,
            mode,
        });
    };

    let mut segments = strutil::split(raw, operator);
    if segments.len() > 2 {
        return Err(ShellError::MultipleRedirection.into());
    }
    if strutil::trim(&segments[0]).is_empty() {
        return Err(ShellError::ExpectedOneFile.into());
    }
    let target = strutil::trim(&segments[1]).to_string();
    if target.is_empty() || strutil::split_any(&target, WHITESPACE).len() > 1 {
        return Err(ShellError::ExpectedOneFile.into());
    }

    let path = Path::new(&target);
    let (file, mode) = match (probe(path), mode) {
        (PathProbe::ParentInvalid, _) => return Err(ShellError::DirectoryDoesNotExist.into()),
        (PathProbe::Exists, RedirectMode::Overwrite) => {
            return Err(ShellError::DirectoryDoesNotExist.into());
        }
        (PathProbe::MissingButCreatable, _) => (create(path)?, RedirectMode::Overwrite),
        (PathProbe::Exists, RedirectMode::Prepend) => (
            OpenOptions::new().read(true).write(true).open(path)?,
            RedirectMode::Prepend,
        ),
        (PathProbe::Exists, _) => (
            OpenOptions::new().append(true).open(path)?,
            RedirectMode::Append,
        ),
    };
    tracing::debug!("redirecting to {target} as {mode:?}");

    Ok(ResolvedCommand {
        command: segments.swap_remove(0),
        destination: Destination::File(file),
        mode,
    })
}

fn create(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
