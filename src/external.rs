use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Factory};
use crate::env::Environment;
use crate::error::ShellError;
use crate::redirect::{Destination, RedirectMode};
use anyhow::Result;
use nix::libc;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::process::{Command, ExitStatus, Stdio};

/// A program looked up on `PATH` and run as a child process.
pub struct ExternalCommand {
    name: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(name: OsString, args: Vec<OsString>) -> Self {
        Self { name, args }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    /// Accepts any name; whether a program exists is only known once it is spawned.
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
        _mode: RedirectMode,
    ) -> Option<Box<dyn ExecutableCommand>> {
        Some(Box::new(ExternalCommand::new(
            name.into(),
            args.iter().map(|x| x.into()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        destination: &Destination,
        mode: RedirectMode,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        // Prepended output is collected aside and merged in front once the child is done.
        let mut capture = match (mode, destination) {
            (RedirectMode::Prepend, Destination::File(_)) => Some(tempfile::tempfile()?),
            _ => None,
        };
        let stdout = match (&capture, destination) {
            (Some(tmp), _) => Stdio::from(tmp.try_clone()?),
            (None, Destination::File(file)) => Stdio::from(file.try_clone()?),
            (None, Destination::Terminal) => Stdio::inherit(),
        };

        io::stdout().flush()?;
        let mut child = Command::new(&self.name)
            .args(&self.args)
            .stdout(stdout)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .spawn()
            .map_err(spawn_error)?;

        let exit_status = {
            let _tracked = env.child.track(child.id() as i32);
            tracing::debug!("waiting for {:?} (pid {})", self.name, child.id());
            child.wait()?
        };
        tracing::debug!("{:?} finished with {exit_status}", self.name);

        if let (Some(tmp), Destination::File(file)) = (capture.as_mut(), destination) {
            let mut target: &File = file;
            merge_prepend(tmp, &mut target)?;
            tracing::trace!("merged prepended output");
        }

        Ok(match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        })
    }
}

fn spawn_error(e: io::Error) -> ShellError {
    tracing::debug!("spawn failed: {e}");
    match e.raw_os_error() {
        Some(libc::EAGAIN) | Some(libc::ENOMEM) => ShellError::ForkFailed,
        _ => ShellError::CommandNotFound,
    }
}

fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

/// Rewrite `dest` as the contents of `capture` followed by the original contents of `dest`.
///
/// `capture` is left holding the merged result.
pub fn merge_prepend<C, D>(capture: &mut C, dest: &mut D) -> io::Result<()>
where
    C: Read + Write + Seek,
    D: Read + Write + Seek,
{
    capture.seek(SeekFrom::End(0))?;
    dest.seek(SeekFrom::Start(0))?;
    io::copy(dest, capture)?;

    capture.seek(SeekFrom::Start(0))?;
    dest.seek(SeekFrom::Start(0))?;
    io::copy(capture, dest)?;
    dest.flush()
}
