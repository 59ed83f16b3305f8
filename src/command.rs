use crate::env::Environment;
use crate::redirect::{Destination, RedirectMode};
use anyhow::Result;

/// Status a command finishes with: 0 on success.
///
/// Children killed by a signal report `128 + signal`.
pub type ExitCode = i32;

/// A parsed command ready to run, either a builtin or a program to spawn.
pub trait ExecutableCommand {
    /// Executes the command with standard output bound to `destination`.
    ///
    /// The destination stays owned by the caller, which closes it afterwards.
    fn execute(
        self: Box<Self>,
        destination: &Destination,
        mode: RedirectMode,
        env: &mut Environment,
    ) -> Result<ExitCode>;
}

/// Turns an argument vector into a runnable command.
///
/// Returns `None` for names the factory does not handle. A recognized
/// name with unacceptable arguments or redirection still yields a command,
/// one that reports the problem instead of running.
pub trait CommandFactory {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
        mode: RedirectMode,
    ) -> Option<Box<dyn ExecutableCommand>>;
}

/// Dispatch entry for one command type defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}
