use std::fmt::Display;
use std::io::{self, Write};
use thiserror::Error;

const RED: &str = "\x1B[31m";
const RESET: &str = "\x1B[0m";

/// Everything the shell reports to the user.
///
/// None of these are fatal: the offending command is skipped and the loop
/// carries on with the next one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("Multiple redirection not supported.")]
    MultipleRedirection,
    #[error("Expected one file to redirect to.")]
    ExpectedOneFile,
    #[error("Directory does not exist.")]
    DirectoryDoesNotExist,

    #[error("{0} does not support command line options.")]
    NoOptions(&'static str),
    #[error("{0} only takes {1} parameter.")]
    TooManyParameters(&'static str, usize),
    #[error("{0} does not support redirection operations.")]
    NoRedirection(&'static str),
    #[error("Could not change working directory.")]
    ChangeDirectory,

    #[error("Command does not exist.")]
    CommandNotFound,
    #[error("Process could not be forked. Command will not be executed.")]
    ForkFailed,

    #[error("vsh does not support parameters. Exiting...")]
    UnexpectedParameters,
}

/// Write a diagnostic line: a red `vsh ERROR` tag, the message and a newline.
pub fn write_diagnostic(out: &mut dyn Write, err: impl Display) -> io::Result<()> {
    writeln!(out, "{RED}vsh ERROR{RESET}: {err}")?;
    out.flush()
}

/// Report `err` on standard output.
pub fn report(err: impl Display) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = write_diagnostic(&mut stdout, err) {
        tracing::warn!("could not write diagnostic: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_format() {
        let mut out = Vec::new();
        write_diagnostic(&mut out, ShellError::MultipleRedirection).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1B[31mvsh ERROR\x1B[0m: Multiple redirection not supported.\n"
        );
    }

    #[test]
    fn test_builtin_messages_name_the_command() {
        assert_eq!(
            ShellError::NoRedirection("pwd").to_string(),
            "pwd does not support redirection operations."
        );
        assert_eq!(
            ShellError::TooManyParameters("cd", 1).to_string(),
            "cd only takes 1 parameter."
        );
        assert_eq!(
            ShellError::NoOptions("exit").to_string(),
            "exit does not support command line options."
        );
    }

    #[test]
    fn test_anyhow_keeps_the_message() {
        let err = anyhow::Error::from(ShellError::CommandNotFound);
        assert_eq!(err.to_string(), "Command does not exist.");
        assert_eq!(
            err.downcast_ref::<ShellError>(),
            Some(&ShellError::CommandNotFound)
        );
    }
}
