//! Termination state machine for a `tokio::process::Child`.
//!
//! `Running → InterruptSent → TerminateSent → Killed → Exited`. Every step is
//! skipped once the process is gone, and "no such process" while signalling
//! counts as success. The sequence always finishes within the policy's worst
//! case and never returns an error: failures are logged.

use std::process::ExitStatus;
use std::time::Duration;

use gitaide_core::{EscalationPolicy, TerminationStage};
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// What one call to [`Terminator::terminate`] achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationOutcome {
    /// Strongest step taken; `Running` when nothing had to be sent.
    pub escalation: TerminationStage,
    /// Exit status once reaped; `None` if death could not be confirmed.
    pub status: Option<ExitStatus>,
}

impl EscalationOutcome {
    pub const fn exited(&self) -> bool {
        self.status.is_some()
    }
}

/// Drives one child through the escalating termination sequence.
///
/// The child must lead its own process group: signals go to the group, and
/// once a signal has been sent any members left behind by the leader are
/// killed before [`terminate`](Self::terminate) returns.
#[derive(Debug)]
pub struct Terminator {
    policy: EscalationPolicy,
    stage: TerminationStage,
    peak: TerminationStage,
    status: Option<ExitStatus>,
    group: Option<u32>,
}

impl Terminator {
    pub const fn new(policy: EscalationPolicy) -> Self {
        Self {
            policy,
            stage: TerminationStage::Running,
            peak: TerminationStage::Running,
            status: None,
            group: None,
        }
    }

    /// Current state of the machine.
    pub const fn stage(&self) -> TerminationStage {
        self.stage
    }

    /// Stop `child`, escalating as needed.
    ///
    /// Once `Exited` is reached further calls return the recorded outcome
    /// without touching the process.
    pub async fn terminate(&mut self, child: &mut Child) -> EscalationOutcome {
        if self.stage == TerminationStage::Exited {
            debug!("termination already completed; ignoring repeated request");
            return self.outcome();
        }

        // The group id is the leader's pid, which `Child` forgets once reaped
        if self.group.is_none() {
            self.group = child.id();
        }

        if self.reap_if_exited(child) {
            return self.outcome();
        }

        if !self.escalate(child).await {
            error!(
                pid = ?self.group,
                "process did not exit after SIGKILL; it may still be running"
            );
        }
        kill_remaining_members(self.group);
        self.outcome()
    }

    /// Run the phases still ahead of the current stage. True once reaped.
    async fn escalate(&mut self, child: &mut Child) -> bool {
        // Without SIGINT/SIGTERM there is nothing to wait for; go straight to
        // the kill step.
        #[cfg(unix)]
        {
            // Phase 1: polite interrupt
            if self.stage < TerminationStage::InterruptSent {
                self.advance(child, TerminationStage::InterruptSent);
                if self.wait_for_exit(child, self.policy.interrupt_grace).await {
                    return true;
                }
            }

            // Phase 2: terminate
            if self.stage < TerminationStage::TerminateSent {
                self.advance(child, TerminationStage::TerminateSent);
                if self.wait_for_exit(child, self.policy.terminate_grace).await {
                    return true;
                }
            }
        }

        // Phase 3: unconditional kill
        self.advance(child, TerminationStage::Killed);
        self.wait_for_exit(child, self.policy.kill_grace).await
    }

    const fn outcome(&self) -> EscalationOutcome {
        EscalationOutcome {
            escalation: self.peak,
            status: self.status,
        }
    }

    fn reap_if_exited(&mut self, child: &mut Child) -> bool {
        match child.try_wait() {
            Ok(Some(status)) => {
                self.mark_exited(status);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "failed to poll process status");
                false
            }
        }
    }

    fn mark_exited(&mut self, status: ExitStatus) {
        debug!(?status, escalation = %self.peak, "process exited");
        self.stage = TerminationStage::Exited;
        self.status = Some(status);
    }

    async fn wait_for_exit(&mut self, child: &mut Child, grace: Duration) -> bool {
        match timeout(grace, child.wait()).await {
            Ok(Ok(status)) => {
                self.mark_exited(status);
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "failed waiting for process exit");
                false
            }
            Err(_) => false,
        }
    }

    /// Send the signal belonging to `next` and record the new stage.
    fn advance(&mut self, child: &mut Child, next: TerminationStage) {
        self.stage = next;
        self.peak = next;

        let Some(pid) = child.id() else {
            debug!(stage = %next, "process already reaped; nothing to signal");
            return;
        };
        info!(pid, stage = %next, "escalating process termination");

        if next == TerminationStage::Killed {
            deliver_kill(child, pid);
        } else {
            #[cfg(unix)]
            deliver_signal(pid, next);
        }
    }
}

#[cfg(unix)]
fn deliver_signal(pid: u32, stage: TerminationStage) {
    let sig = match stage {
        TerminationStage::InterruptSent => Signal::SIGINT,
        TerminationStage::TerminateSent => Signal::SIGTERM,
        _ => return,
    };
    let Ok(raw) = i32::try_from(pid) else {
        warn!(pid, "pid out of range; cannot signal");
        return;
    };

    // The child leads its own process group, so signal the whole group.
    match signal::killpg(Pid::from_raw(raw), sig) {
        Ok(()) => {}
        Err(Errno::ESRCH) => debug!(pid, ?sig, "process group already gone"),
        Err(e) => warn!(pid, ?sig, error = %e, "failed to deliver signal"),
    }
}

fn deliver_kill(child: &mut Child, pid: u32) {
    #[cfg(unix)]
    if let Ok(raw) = i32::try_from(pid) {
        match signal::killpg(Pid::from_raw(raw), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => warn!(pid, error = %e, "failed to SIGKILL process group"),
        }
    }

    // Covers the leader itself and platforms without process groups
    if let Err(e) = child.start_kill() {
        debug!(pid, error = %e, "kill failed; process likely already exited");
    }
}

/// SIGKILL whatever is left of the group after its leader exited.
///
/// Background jobs of a non-interactive shell ignore SIGINT, so they can
/// outlive a leader that stopped at the first signal.
#[cfg(unix)]
fn kill_remaining_members(group: Option<u32>) {
    let Some(raw) = group.and_then(|pgid| i32::try_from(pgid).ok()) else {
        return;
    };
    match signal::killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) => debug!(pgid = raw, "killed remaining process group members"),
        Err(Errno::ESRCH) => {}
        Err(e) => warn!(pgid = raw, error = %e, "failed to kill remaining group members"),
    }
}

#[cfg(not(unix))]
const fn kill_remaining_members(_group: Option<u32>) {}
