use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// Polite request (SIGTERM); the process may clean up or ignore it.
    Term,
    /// Non-ignorable kill (SIGKILL).
    Kill,
}

impl TerminationSignal {
    pub fn label(self) -> &'static str {
        match self {
            TerminationSignal::Term => "SIGTERM",
            TerminationSignal::Kill => "SIGKILL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TerminationReason {
    Success,
    NotFound,
    PermissionDenied,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminationOutcome {
    pub pid: u32,
    pub succeeded: bool,
    pub reason: TerminationReason,
}

impl TerminationOutcome {
    pub fn new(pid: u32, reason: TerminationReason) -> Self {
        TerminationOutcome {
            pid,
            succeeded: reason == TerminationReason::Success,
            reason,
        }
    }

    pub fn message(&self) -> String {
        let pid = self.pid;
        match &self.reason {
            TerminationReason::Success => format!("Process {pid} terminated successfully."),
            TerminationReason::NotFound => format!("Process {pid} does not exist."),
            TerminationReason::PermissionDenied => {
                format!("Permission denied to terminate process {pid}.")
            }
            TerminationReason::Other(err) => format!("Failed to terminate process {pid}: {err}"),
        }
    }
}

/// Issues termination requests and classifies the result.
///
/// Signals are fire-and-forget: `Success` means the signal was delivered,
/// not that the process has exited. Nothing is retried.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessController;

impl ProcessController {
    pub fn new() -> Self {
        ProcessController
    }

    pub fn terminate(&self, pid: u32) -> TerminationOutcome {
        self.signal(pid, TerminationSignal::Term)
    }

    pub fn force_kill(&self, pid: u32) -> TerminationOutcome {
        self.signal(pid, TerminationSignal::Kill)
    }

    pub fn signal(&self, pid: u32, signal: TerminationSignal) -> TerminationOutcome {
        let reason = send_signal(pid, signal);
        let outcome = TerminationOutcome::new(pid, reason);
        info!(
            pid,
            signal = signal.label(),
            succeeded = outcome.succeeded,
            reason = ?outcome.reason,
            "termination requested"
        );
        outcome
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: TerminationSignal) -> TerminationReason {
    // Zero and negative pids address process groups, never a single process.
    let raw = match libc::pid_t::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => return TerminationReason::NotFound,
    };
    let signum = match signal {
        TerminationSignal::Term => libc::SIGTERM,
        TerminationSignal::Kill => libc::SIGKILL,
    };

    // SAFETY: kill(2) takes plain integers and has no memory-safety
    // preconditions.
    let rc = unsafe { libc::kill(raw, signum) };
    if rc == 0 {
        return TerminationReason::Success;
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => TerminationReason::NotFound,
        Some(libc::EPERM) => TerminationReason::PermissionDenied,
        _ => TerminationReason::Other(err.to_string()),
    }
}

#[cfg(not(unix))]
fn send_signal(pid: u32, signal: TerminationSignal) -> TerminationReason {
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

    if pid == 0 {
        return TerminationReason::NotFound;
    }
    let sys_pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sys_pid]),
        true,
        ProcessRefreshKind::nothing(),
    );
    let Some(process) = sys.process(sys_pid) else {
        return TerminationReason::NotFound;
    };

    let sys_signal = match signal {
        TerminationSignal::Term => Signal::Term,
        TerminationSignal::Kill => Signal::Kill,
    };
    match process.kill_with(sys_signal) {
        Some(true) => TerminationReason::Success,
        Some(false) => {
            TerminationReason::Other(format!("failed to send {}", signal.label()))
        }
        // Signal not supported on this platform, fall back to kill()
        None if process.kill() => TerminationReason::Success,
        None => TerminationReason::Other("the operating system refused the request".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_succeeded_tracks_reason() {
        assert!(TerminationOutcome::new(1, TerminationReason::Success).succeeded);
        assert!(!TerminationOutcome::new(1, TerminationReason::NotFound).succeeded);
        assert!(!TerminationOutcome::new(1, TerminationReason::Other("x".into())).succeeded);
    }

    #[test]
    fn messages_name_the_pid() {
        let cases = [
            (TerminationReason::Success, "Process 42 terminated successfully."),
            (TerminationReason::NotFound, "Process 42 does not exist."),
            (
                TerminationReason::PermissionDenied,
                "Permission denied to terminate process 42.",
            ),
            (
                TerminationReason::Other("boom".into()),
                "Failed to terminate process 42: boom",
            ),
        ];
        for (reason, expected) in cases {
            assert_eq!(TerminationOutcome::new(42, reason).message(), expected);
        }
    }

    #[test]
    fn pid_zero_is_never_signalled() {
        let outcome = ProcessController::new().terminate(0);
        assert_eq!(outcome.reason, TerminationReason::NotFound);
    }

    #[test]
    fn pid_outside_platform_range_is_not_found() {
        let outcome = ProcessController::new().terminate(u32::MAX);
        assert_eq!(outcome.reason, TerminationReason::NotFound);
        assert!(!outcome.succeeded);
    }
}
