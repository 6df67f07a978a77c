use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;

use crate::error::{LayerError, LayerResult};
use crate::interrupt;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A child process invocation, described before it is spawned.
///
/// Output is always captured; callers decide what to show the user.
#[derive(Debug)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Shell-ish rendering for logs.
    pub fn display(&self) -> String {
        let mut rendered = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }
}

#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, or -1 when the child was killed by a signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /// stdout followed by stderr, trimmed.
    pub fn combined_text(&self) -> String {
        let stdout = String::from_utf8_lossy(&self.stdout);
        let stderr = String::from_utf8_lossy(&self.stderr);
        let parts = [stdout.trim(), stderr.trim()];
        parts
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run the command to completion, capturing both streams.
///
/// If an interrupt arrives first the child is killed and
/// [`LayerError::Interrupted`] is returned without waiting for its output.
pub fn run(spec: &CommandSpec) -> LayerResult<CommandOutput> {
    tracing::debug!(command = %spec.display(), "spawning");
    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn `{}`", spec.program.to_string_lossy()))?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = loop {
        if let Some(status) = child
            .try_wait()
            .with_context(|| format!("failed to wait for `{}`", spec.display()))?
        {
            break status;
        }
        if interrupt::requested() {
            tracing::warn!(command = %spec.display(), "interrupted; stopping child");
            if let Err(err) = child.kill() {
                tracing::debug!(%err, "child already gone");
            }
            let _ = child.wait();
            return Err(LayerError::Interrupted);
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(CommandOutput {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

fn drain<R: Read + Send + 'static>(source: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut source) = source {
            let _ = source.read_to_end(&mut buf);
        }
        buf
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_both_streams() {
        let spec = CommandSpec::new("/bin/sh")
            .arg("-c")
            .arg("echo out; echo err >&2; exit 3");
        let output = run(&spec).unwrap();
        assert!(!output.success());
        assert_eq!(output.code(), 3);
        assert_eq!(output.combined_text(), "out\nerr");
        assert_eq!(output.stderr_text(), "err");
    }

    #[test]
    fn display_joins_program_and_args() {
        let spec = CommandSpec::new("pip").args(["install", "--target", "/tmp/x"]);
        assert_eq!(spec.display(), "pip install --target /tmp/x");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let spec = CommandSpec::new("/definitely/not/here/layergen-missing");
        let err = run(&spec).unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[test]
    fn large_output_does_not_block_the_child() {
        let spec = CommandSpec::new("/bin/sh")
            .arg("-c")
            .arg("i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done");
        let output = run(&spec).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout_text().lines().count(), 20000);
    }
}
