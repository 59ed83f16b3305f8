use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

struct Session {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    home: TempDir,
}

impl Session {
    fn start() -> Self {
        let home = tempfile::tempdir().unwrap();
        let mut child = Command::new(env!("CARGO_BIN_EXE_vsh"))
            .env("HOME", home.path())
            .env_remove("VSH_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to start vsh");
        let stdin = child.stdin.take();
        let stdout = BufReader::new(child.stdout.take().unwrap());
        Session {
            child,
            stdin,
            stdout,
            home,
        }
    }

    fn home(&self) -> PathBuf {
        fs::canonicalize(self.home.path()).unwrap()
    }

    fn send(&mut self, line: &str) {
        let stdin = self.stdin.as_mut().expect("input already closed");
        writeln!(stdin, "{line}").unwrap();
        stdin.flush().unwrap();
    }

    fn close_input(&mut self) {
        self.stdin.take();
    }

    /// Read output until a line containing `needle` shows up.
    fn expect_output(&mut self, needle: &str) -> String {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.stdout.read_line(&mut line).unwrap();
            assert!(n > 0, "vsh closed its output before printing {needle:?}");
            if line.contains(needle) {
                return line;
            }
        }
    }

    fn interrupt(&self) {
        kill(Pid::from_raw(self.child.id() as i32), Signal::SIGINT).unwrap();
    }

    fn finish(&mut self) -> (ExitStatus, String) {
        let status = self.child.wait().unwrap();
        let mut rest = String::new();
        self.stdout.read_to_string(&mut rest).unwrap();
        (status, rest)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn test_rejects_startup_parameters() {
    let output = Command::new(env!("CARGO_BIN_EXE_vsh"))
        .arg("script.sh")
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vsh does not support parameters. Exiting..."));
}

#[test]
fn test_starts_in_home_and_exits_cleanly() {
    let mut sh = Session::start();
    let home = sh.home();

    sh.send("pwd");
    sh.expect_output(&home.display().to_string());
    sh.send("exit");

    let (status, _) = sh.finish();
    assert_eq!(status.code(), Some(0));
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let mut sh = Session::start();
    sh.close_input();

    let (status, _) = sh.finish();
    assert_eq!(status.code(), Some(0));
}

#[test]
fn test_redirections_relative_to_home() {
    let mut sh = Session::start();
    let home = sh.home();

    sh.send("echo one > notes; echo zero >+ notes; echo two >> notes; exit");
    let (status, _) = sh.finish();

    assert_eq!(status.code(), Some(0));
    assert_eq!(fs::read_to_string(home.join("notes")).unwrap(), "zero\none\ntwo\n");
}

#[test]
fn test_diagnostics_go_to_stdout() {
    let mut sh = Session::start();

    sh.send("ls > a > b");
    sh.expect_output("vsh ERROR");
    sh.send("cd a b");
    sh.expect_output("cd only takes 1 parameter.");
    sh.send("no_such_program_vsh_test");
    sh.expect_output("Command does not exist.");
    sh.send("exit");

    let home = sh.home();
    let (status, _) = sh.finish();
    assert_eq!(status.code(), Some(0));
    assert!(!home.join("a").exists());
}

#[test]
fn test_idle_interrupt_terminates_the_shell() {
    let mut sh = Session::start();
    let home = sh.home();

    sh.send("pwd");
    sh.expect_output(&home.display().to_string());
    sh.interrupt();

    let (status, rest) = sh.finish();
    assert_eq!(status.code(), Some(0));
    assert!(rest.contains("vsh: Exiting..."));
}

#[test]
fn test_interrupt_reaches_only_the_running_child() {
    let mut sh = Session::start();
    let home = sh.home();

    sh.send("echo started; sleep 30");
    sh.expect_output("started");
    thread::sleep(Duration::from_millis(500));

    let interrupted_at = Instant::now();
    sh.interrupt();
    sh.send("pwd");
    sh.expect_output(&home.display().to_string());
    assert!(interrupted_at.elapsed() < Duration::from_secs(20));

    sh.send("exit");
    let (status, _) = sh.finish();
    assert_eq!(status.code(), Some(0));
}
