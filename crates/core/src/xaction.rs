//! Xaction completion state machine
//!
//! An asynchronous cluster operation is submitted, then polled until
//! terminal. The transition function here is pure: it maps one polled
//! observation to the next phase and knows nothing about timing, so the
//! machine is testable without a cluster. The polling loop in `ac-client`
//! owns deadlines and applies `TimedOut` itself.

use crate::types::XactStatus;

/// Phase of one tracked xaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XactPhase {
    /// Accepted by the cluster, no status observed yet
    Submitted,
    /// Status observed, not yet terminal
    Pending,
    /// Terminal: ran to completion
    Succeeded,
    /// Terminal: aborted or finished with an error
    Failed,
    /// Terminal: the waiter's deadline elapsed first
    TimedOut,
    /// Terminal: the cluster does not recognize the id
    UnknownId,
}

impl XactPhase {
    /// Terminal phases are absorbing: once observed, re-polling the same id
    /// keeps reporting the same outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            XactPhase::Succeeded | XactPhase::Failed | XactPhase::TimedOut | XactPhase::UnknownId
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, XactPhase::Succeeded)
    }
}

impl std::fmt::Display for XactPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            XactPhase::Submitted => "submitted",
            XactPhase::Pending => "pending",
            XactPhase::Succeeded => "succeeded",
            XactPhase::Failed => "failed",
            XactPhase::TimedOut => "timed-out",
            XactPhase::UnknownId => "unknown-id",
        };
        f.write_str(s)
    }
}

/// Result of one status poll, as seen by the state machine
#[derive(Debug, Clone)]
pub enum PollObservation {
    /// The cluster reported a status for the id
    Reported(XactStatus),
    /// The cluster does not know the id (e.g. expired from its history)
    Missing,
    /// The poll itself failed transiently; no information either way
    Unreachable,
}

/// Map one observation to the next phase.
///
/// Terminal phases absorb every observation. `Unreachable` never advances
/// the machine; the polling loop decides how many misses to tolerate.
pub fn next_phase(current: XactPhase, observation: &PollObservation) -> XactPhase {
    if current.is_terminal() {
        return current;
    }
    match observation {
        PollObservation::Reported(status) if !status.finished() => XactPhase::Pending,
        PollObservation::Reported(status) if status.failed() => XactPhase::Failed,
        PollObservation::Reported(_) => XactPhase::Succeeded,
        PollObservation::Missing => XactPhase::UnknownId,
        PollObservation::Unreachable => current,
    }
}
