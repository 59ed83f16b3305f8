use crate::command::{CommandFactory, ExitCode, Factory};
use crate::env::Environment;
use crate::error::{self, ShellError};
use crate::redirect::{self, Destination, RedirectMode, ResolvedCommand};
use crate::signal::{ACTIVE_CHILD, EXIT_NOTICE};
use crate::strutil;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Separates independent commands on one input line.
pub const COMMAND_SEPARATOR: &str = ";";

/// Reads lines, splits them into commands and dispatches each one.
///
/// Commands are looked up by asking every [`CommandFactory`] in order; the first
/// one that recognizes the name wins. [`Default`] lists the stock set.
///
/// Example
/// ```
/// use vsh::Interpreter;
/// let mut sh = Interpreter::default();
/// let code = sh.run_command("true").unwrap();
/// assert_eq!(code, 0);
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom environment and set of command factories.
    pub fn new(env: Environment, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { env, commands }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Run `name` with `args`, standard output bound to `destination`.
    pub fn run(
        &mut self,
        name: &str,
        args: &[&str],
        destination: &Destination,
        mode: RedirectMode,
    ) -> anyhow::Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args, mode) {
                return cmd.execute(destination, mode, &mut self.env);
            }
        }
        Err(ShellError::CommandNotFound.into())
    }

    /// Resolve the redirection of one command, run it, and close its destination.
    pub fn run_command(&mut self, raw: &str) -> anyhow::Result<ExitCode> {
        let ResolvedCommand {
            command,
            destination,
            mode,
        } = redirect::resolve(raw)?;

        let argv = strutil::words(&command);
        let Some((name, args)) = argv.split_first() else {
            return Ok(0);
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let result = self.run(name, &args, &destination, mode);
        drop(destination);
        result
    }

    /// Run every `;`-separated command of `line`, reporting failures as they happen.
    ///
    /// Returns the exit code of the last command that ran. Stops early after `exit`.
    pub fn run_line(&mut self, line: &str) -> ExitCode {
        let mut last = 0;
        for raw in strutil::split(line, COMMAND_SEPARATOR) {
            last = match self.run_command(&raw) {
                Ok(code) => code,
                Err(e) => {
                    error::report(&e);
                    1
                }
            };
            tracing::trace!("{raw:?} exited with {last}");
            if self.env.should_exit {
                break;
            }
        }
        last
    }

    /// Read-Eval-Print Loop: prompt, read a line, run it, until `exit`, Ctrl-C or end of input.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            match rl.readline(&self.env.prompt()) {
                Ok(line) => {
                    self.run_line(&line);
                }
                // The editor swallows Ctrl-C while reading; treat it as an idle interrupt.
                Err(ReadlineError::Interrupted) => {
                    print!("{EXIT_NOTICE}");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter over the process environment with the default commands:
    /// - built-ins: `exit`, `cd`, `pwd`
    /// - external program launcher, which accepts every other name
    fn default() -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(
            Environment::new(&ACTIVE_CHILD),
            vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Pwd>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
        )
    }
}
