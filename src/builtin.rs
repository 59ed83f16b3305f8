use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Factory};
use crate::env::Environment;
use crate::error::ShellError;
use crate::redirect::{Destination, RedirectMode};
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Commands run inside the shell process.
///
/// Arguments go through [`argh`] once the count and the redirection mode pass.
/// None of them accept redirection.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "pwd".
    fn name() -> &'static str;

    /// Most positional arguments the command takes.
    fn max_args() -> usize;

    /// Error raised when more than [`BuiltinCommand::max_args`] arguments are given.
    fn too_many_args() -> ShellError {
        match Self::max_args() {
            0 => ShellError::NoOptions(Self::name()),
            n => ShellError::TooManyParameters(Self::name(), n),
        }
    }

    /// Run with output going to `stdout`.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        _destination: &Destination,
        _mode: RedirectMode,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        tracing::debug!("running builtin {}", T::name());
        let mut stdout = io::stdout().lock();
        let code = <T as BuiltinCommand>::execute(*self, &mut stdout, env)?;
        stdout.flush()?;
        Ok(code)
    }
}

/// A builtin invoked with arguments or redirection it does not accept.
struct Rejected(ShellError);

impl ExecutableCommand for Rejected {
    fn execute(
        self: Box<Self>,
        _destination: &Destination,
        _mode: RedirectMode,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        Err(self.0.into())
    }
}

/// Help text or a parse failure produced by `argh`.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _destination: &Destination,
        _mode: RedirectMode,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", self.output)?;
        Ok(i32::from(self.is_error))
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
        mode: RedirectMode,
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        if args.len() > T::max_args() {
            return Some(Box::new(Rejected(T::too_many_args())));
        }
        if mode != RedirectMode::Standard {
            return Some(Box::new(Rejected(ShellError::NoRedirection(T::name()))));
        }
        // Everything after the name is positional: `cd -x` names a directory.
        let positional: Vec<&str> = std::iter::once("--").chain(args.iter().copied()).collect();
        Some(match T::from_args(&[name], &positional) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

#[derive(FromArgs)]
/// Print the working directory.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn max_args() -> usize {
        0
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", env.current_dir.display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the working directory, or go home when no target is given.
pub struct Cd {
    #[argh(positional)]
    /// target directory, relative paths start from the working directory
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn max_args() -> usize {
        1
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match self.target {
            Some(t) => PathBuf::from(t),
            None => env.home.clone().ok_or(ShellError::ChangeDirectory)?,
        };

        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let resolved = fs::canonicalize(&new_dir)
            .and_then(|dir| env::set_current_dir(&dir).map(|()| dir))
            .map_err(|e| {
                tracing::debug!("cd: {}: {e}", new_dir.display());
                ShellError::ChangeDirectory
            })?;
        env.current_dir = resolved;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn max_args() -> usize {
        0
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}
