use crate::signal::ActiveChild;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

const CYAN: &str = "\x1B[36m";
const YELLOW: &str = "\x1B[33m";
const RESET: &str = "\x1B[0m";

/// Mutable view of the process state the interpreter works against.
///
/// - `vars`: environment variables handed to spawned programs.
/// - `home`, `user`, `host`: identity captured once at startup for `cd` and the prompt.
/// - `current_dir`: the working directory, kept in sync with the process by `cd`.
/// - `should_exit`: set by `exit`; the loop stops once it sees it.
/// - `child`: the slot the executor uses to publish the running child to the signal handler.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub home: Option<PathBuf>,
    pub user: String,
    pub host: String,
    pub current_dir: PathBuf,
    pub should_exit: bool,
    pub child: &'static ActiveChild,
}

impl Environment {
    /// Capture the current process state, publishing children through `child`.
    pub fn new(child: &'static ActiveChild) -> Self {
        let vars: HashMap<String, String> = stdenv::vars().collect();
        let home = vars.get("HOME").map(PathBuf::from);
        let user = vars.get("USER").cloned().unwrap_or_default();
        let host = nix::unistd::gethostname()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_default();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            home,
            user,
            host,
            current_dir,
            should_exit: false,
            child,
        }
    }

    /// Move the process into the home directory, wherever the shell was started from.
    ///
    /// Leaves the working directory alone when `HOME` is unset or unusable.
    pub fn enter_home(&mut self) {
        let Some(home) = self.home.clone() else {
            tracing::debug!("HOME is not set; staying in {}", self.current_dir.display());
            return;
        };
        match stdenv::set_current_dir(&home) {
            Ok(()) => self.current_dir = stdenv::current_dir().unwrap_or(home),
            Err(e) => tracing::debug!("cannot enter {}: {e}", home.display()),
        }
    }

    /// `(vsh) user@host:cwd > ` with the identity in cyan and the directory in yellow.
    pub fn prompt(&self) -> String {
        format!(
            "(vsh) {CYAN}{}@{}{RESET}:{YELLOW}{}{RESET} > ",
            self.user,
            self.host,
            self.current_dir.display()
        )
    }
}
