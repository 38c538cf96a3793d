// src/trigger.rs

//! Shell-command trigger used by the CLI.

use std::io;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Build a shell command appropriate for the platform.
fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Run `cmd` to completion. Its stdout is sent to our stderr: stdout carries
/// only the matched result.
///
/// Failing to start the command is an error. A non-zero exit status is only
/// logged: the log file may still report what happened.
pub fn run_shell_trigger(cmd: &str) -> Result<()> {
    info!(cmd = %cmd, "running trigger command");

    let status = shell_command(cmd)
        .stdout(Stdio::from(io::stderr()))
        .status()
        .with_context(|| format!("spawning trigger command `{cmd}`"))?;

    if status.success() {
        info!(cmd = %cmd, "trigger command finished");
    } else {
        warn!(cmd = %cmd, %status, "trigger command exited unsuccessfully; still waiting");
    }
    Ok(())
}
