//! Process launcher.
//!
//! Starts the external program with stdout/stderr piped, stdin piped only when
//! the session forwards input to it, and kill-on-drop set so a dropped handle can never
//! leave a live child behind.

use std::io;
use std::process::Stdio;

use gitaide_core::{Invocation, SessionError};
use tokio::process::{Child, Command};
use tracing::debug;

/// Hint used when the invocation does not carry its own.
const GENERIC_INSTALL_HINT: &str = "Make sure it is installed and on your PATH.";

/// Spawn the process described by `invocation`.
///
/// On Unix the child becomes the leader of a new process group so that
/// termination signals also reach anything it spawns.
///
/// # Errors
///
/// - `SessionError::Launch` if the executable cannot be found
/// - `SessionError::Spawn` for every other failure, including a missing
///   working directory
pub fn spawn(invocation: &Invocation, pipe_stdin: bool) -> Result<Child, SessionError> {
    let working_dir = invocation.working_dir();
    if !working_dir.is_dir() {
        return Err(SessionError::Spawn {
            program: invocation.program.clone(),
            source: io::Error::new(
                io::ErrorKind::NotFound,
                format!("working directory {} does not exist", working_dir.display()),
            ),
        });
    }

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .current_dir(working_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if pipe_stdin {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .kill_on_drop(true);

    for (key, value) in &invocation.env {
        cmd.env(key, value);
    }

    #[cfg(unix)]
    cmd.process_group(0);

    debug!(command = %invocation, pipe_stdin, "spawning process");

    cmd.spawn().map_err(|e| classify_spawn_error(invocation, e))
}

fn classify_spawn_error(invocation: &Invocation, error: io::Error) -> SessionError {
    if error.kind() == io::ErrorKind::NotFound {
        SessionError::Launch {
            program: invocation.program.clone(),
            hint: invocation
                .install_hint
                .clone()
                .unwrap_or_else(|| GENERIC_INSTALL_HINT.to_string()),
        }
    } else {
        SessionError::Spawn {
            program: invocation.program.clone(),
            source: error,
        }
    }
}
