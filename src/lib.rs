//! `vsh`: a small interactive shell with output redirection.
//!
//! A line is split on `;` and every piece runs on its own: its redirection is
//! resolved first (`>`, `>>` or `>+`), then it is either handled in-process
//! (`exit`, `cd`, `pwd`) or spawned as an external program. While a program
//! runs, Ctrl-C goes to it rather than to the shell.
//!
//! The main entry point is [`Interpreter`]. The public modules expose the pieces
//! it is built from: [`redirect`] for parsing and opening redirection targets,
//! [`strutil`] for the splitting rules, [`signal`] for interrupt routing,
//! [`command`] and [`env`] for implementing commands against the shell state.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod redirect;
pub mod signal;
pub mod strutil;

pub use interpreter::Interpreter;
