use argh::FromArgs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vsh::Interpreter;
use vsh::error::{self, ShellError};
use vsh::signal;

/// Variable holding a `tracing` filter directive, e.g. `VSH_LOG=debug`.
const LOG_ENV: &str = "VSH_LOG";

#[derive(FromArgs)]
/// Interactive shell supporting `>`, `>>` and `>+` output redirection.
struct Args {
    #[argh(positional, greedy)]
    /// not accepted; the shell only runs interactively
    params: Vec<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let args: Args = argh::from_env();
    if !args.params.is_empty() {
        error::report(ShellError::UnexpectedParameters);
        return ExitCode::FAILURE;
    }

    if let Err(e) = signal::install_interrupt_handler() {
        error::report(format!("cannot install interrupt handler: {e}"));
        return ExitCode::FAILURE;
    }

    let mut sh = Interpreter::default();
    sh.env_mut().enter_home();

    match sh.repl() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error::report(e);
            ExitCode::FAILURE
        }
    }
}
