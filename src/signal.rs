//! Interrupt routing between the shell and the external program it is waiting on.
//!
//! While a child runs, `SIGINT` is forwarded to it and the shell keeps waiting.
//! When nothing runs, `SIGINT` ends the shell.
//!
//! Only the spawn/wait path writes [`ActiveChild`]; the handler reads it.

use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Written to stdout when an idle interrupt ends the shell.
pub const EXIT_NOTICE: &str = "\nvsh: Exiting...\n";

/// The child currently being waited on, if any.
///
/// `pid` is published before `running` is raised and only read after `running`
/// was observed, so a reader never sees a stale identifier.
#[derive(Debug)]
pub struct ActiveChild {
    running: AtomicBool,
    pid: AtomicI32,
}

impl ActiveChild {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            pid: AtomicI32::new(0),
        }
    }

    /// Mark `pid` as the running child until the returned guard is dropped.
    pub fn track(&self, pid: i32) -> ChildGuard<'_> {
        self.pid.store(pid, Ordering::Release);
        self.running.store(true, Ordering::Release);
        ChildGuard { slot: self }
    }

    /// Identifier of the running child, or `None` when the shell is idle.
    pub fn current(&self) -> Option<i32> {
        if self.running.load(Ordering::Acquire) {
            Some(self.pid.load(Ordering::Acquire))
        } else {
            None
        }
    }

    fn clear(&self) {
        self.running.store(false, Ordering::Release);
        self.pid.store(0, Ordering::Release);
    }
}

impl Default for ActiveChild {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the [`ActiveChild`] slot once waiting is over.
pub struct ChildGuard<'a> {
    slot: &'a ActiveChild,
}

impl Drop for ChildGuard<'_> {
    fn drop(&mut self) {
        self.slot.clear();
    }
}

/// Slot read by the installed handler.
pub static ACTIVE_CHILD: ActiveChild = ActiveChild::new();

/// What an interrupt should do given the current child state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Terminate,
    Forward(i32),
}

pub fn route(child: &ActiveChild) -> Route {
    match child.current() {
        Some(pid) => Route::Forward(pid),
        None => Route::Terminate,
    }
}

extern "C" fn on_interrupt(_signo: libc::c_int) {
    match route(&ACTIVE_CHILD) {
        Route::Forward(pid) => {
            let _ = signal::kill(Pid::from_raw(pid), Signal::SIGINT);
        }
        Route::Terminate => unsafe {
            // write(2) and _exit(2) are async-signal-safe; stdout's lock is not.
            libc::write(
                libc::STDOUT_FILENO,
                EXIT_NOTICE.as_ptr().cast(),
                EXIT_NOTICE.len(),
            );
            libc::_exit(0);
        },
    }
}

/// Install the `SIGINT` handler for the whole process.
pub fn install_interrupt_handler() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    // SAFETY: the handler only loads atomics and calls async-signal-safe functions.
    unsafe { signal::sigaction(Signal::SIGINT, &action) }?;
    tracing::debug!("SIGINT handler installed");
    Ok(())
}
