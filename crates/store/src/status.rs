//! Job status enumeration and transition rules.
//!
//! Statuses advance monotonically along one of two chains:
//!
//! ```text
//! queued -> running -> building  -> signing        -> done     (local)
//! queued -> running -> triggering -> dispatched
//!                                 -> running-remote -> done     (remote)
//! ```
//!
//! `error` is reachable from any non-`done` state and is absorbing.
//! `RemoteRunning` is a distinct internal state ("the remote workflow run
//! is executing") but renders externally as `"running"`, matching the
//! wire format of the original service.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Created, pipeline not yet started.
    Queued,
    /// Picked up by the orchestrator.
    Running,
    /// Local toolchain: external build command executing.
    Building,
    /// Local toolchain: signer executing.
    Signing,
    /// Remote toolchain: dispatch request in flight.
    Triggering,
    /// Remote toolchain: dispatch accepted, run not yet discovered.
    Dispatched,
    /// Remote toolchain: the workflow run is executing.
    RemoteRunning,
    /// Terminal success.
    Done,
    /// Terminal failure. Absorbing: no transition leaves this state.
    Error,
}

impl JobStatus {
    /// External label. `RemoteRunning` renders as `"running"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running | Self::RemoteRunning => "running",
            Self::Building => "building",
            Self::Signing => "signing",
            Self::Triggering => "triggering",
            Self::Dispatched => "dispatched",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Position along the forward chains. Stages of the two toolchain
    /// variants share ranks; a single job only ever walks one chain.
    fn rank(self) -> u8 {
        match self {
            Self::Queued => 0,
            Self::Running => 1,
            Self::Building | Self::Triggering => 2,
            Self::Signing | Self::Dispatched => 3,
            Self::RemoteRunning => 4,
            Self::Done => 5,
            Self::Error => 6,
        }
    }

    /// Whether a transition from `self` to `to` is allowed.
    ///
    /// Forward-only: the target must rank strictly higher, except that
    /// `error` is reachable from every non-terminal state.
    pub fn can_advance(self, to: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == Self::Error {
            return true;
        }
        to.rank() > self.rank()
    }
}

impl Serialize for JobStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::JobStatus::*;

    // -- chains ---------------------------------------------------------------

    #[test]
    fn local_chain_is_valid() {
        assert!(Queued.can_advance(Running));
        assert!(Running.can_advance(Building));
        assert!(Building.can_advance(Signing));
        assert!(Signing.can_advance(Done));
    }

    #[test]
    fn remote_chain_is_valid() {
        assert!(Queued.can_advance(Running));
        assert!(Running.can_advance(Triggering));
        assert!(Triggering.can_advance(Dispatched));
        assert!(Dispatched.can_advance(RemoteRunning));
        assert!(RemoteRunning.can_advance(Done));
    }

    #[test]
    fn backward_transitions_rejected() {
        assert!(!Building.can_advance(Running));
        assert!(!Signing.can_advance(Building));
        assert!(!RemoteRunning.can_advance(Dispatched));
        assert!(!Running.can_advance(Queued));
    }

    // -- error ----------------------------------------------------------------

    #[test]
    fn error_reachable_from_any_non_terminal_state() {
        for from in [Queued, Running, Building, Signing, Triggering, Dispatched, RemoteRunning] {
            assert!(from.can_advance(Error), "{from:?} -> error must be allowed");
        }
    }

    #[test]
    fn error_is_absorbing() {
        for to in [Queued, Running, Building, Done, Error] {
            assert!(!Error.can_advance(to), "error -> {to:?} must be rejected");
        }
    }

    #[test]
    fn done_is_terminal() {
        assert!(!Done.can_advance(Error));
        assert!(!Done.can_advance(Running));
    }

    // -- rendering ------------------------------------------------------------

    #[test]
    fn remote_running_renders_as_running() {
        assert_eq!(RemoteRunning.as_str(), "running");
        assert_eq!(Running.as_str(), "running");
        // The variants stay distinct internally.
        assert_ne!(Running, RemoteRunning);
    }

    #[test]
    fn serializes_to_external_label() {
        let s = serde_json::to_string(&Dispatched).unwrap();
        assert_eq!(s, "\"dispatched\"");
    }
}
