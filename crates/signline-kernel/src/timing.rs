//! Timing resolution: which view of a sign an access goes through.
//!
//! While a sign-change event is being processed the new lines live in the
//! event (the transient view) and have not reached the sign yet. A binding's
//! timing hint, together with the shape of the access, decides whether the
//! access goes to that transient view, to the sign's persisted state, or to
//! the persisted state as it stood before the change.

use serde::{Deserialize, Serialize};

/// Static timing attached to a binding when it is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingHint {
    /// No event-relative resolution; always the persisted object.
    #[default]
    Unset,
    /// The state before the pending change. Read-only.
    Before,
    /// The present (0) or a later point of the event.
    AtOrAfter(u32),
}

impl TimingHint {
    /// Map a host's signed time value: negative is the past, zero the
    /// present, positive the future.
    pub fn from_time(time: i64) -> Self {
        if time < 0 {
            Self::Before
        } else {
            Self::AtOrAfter(u32::try_from(time).unwrap_or(u32::MAX))
        }
    }

    pub fn present() -> Self {
        Self::AtOrAfter(0)
    }

    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl std::fmt::Display for TimingHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Before => write!(f, "past"),
            Self::AtOrAfter(0) => write!(f, "present"),
            Self::AtOrAfter(n) => write!(f, "future({n})"),
        }
    }
}

/// The view an access resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// The persisted state as it stood before the pending change. Writes in
    /// this mode are ignored.
    ReadPersistedSnapshot,
    /// The pending lines carried by the event.
    Transient,
    /// The persisted object, committed after writes.
    Direct,
}

impl ResolutionMode {
    pub fn is_writable(self) -> bool {
        !matches!(self, Self::ReadPersistedSnapshot)
    }
}

/// Everything the timing decision looks at for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingInputs {
    pub timing: TimingHint,
    /// The target expression is the implicit current object.
    pub is_default_target: bool,
    /// The current event is the lifecycle event of this target.
    pub event_matches_target: bool,
    /// No deferral has elapsed inside the handler yet.
    pub lifecycle_open: bool,
}

/// Decide the resolution mode.
///
/// | timing    | default | matches | open | mode                  |
/// |-----------|---------|---------|------|-----------------------|
/// | Before    | -       | -       | -    | ReadPersistedSnapshot |
/// | AtOrAfter | yes     | yes     | yes  | Transient             |
/// | AtOrAfter | otherwise               || Direct                |
/// | Unset     | -       | -       | -    | Direct                |
pub fn resolve_mode(inputs: TimingInputs) -> ResolutionMode {
    match inputs.timing {
        TimingHint::Before => ResolutionMode::ReadPersistedSnapshot,
        TimingHint::AtOrAfter(_)
            if inputs.is_default_target && inputs.event_matches_target && inputs.lifecycle_open =>
        {
            ResolutionMode::Transient
        }
        TimingHint::AtOrAfter(_) | TimingHint::Unset => ResolutionMode::Direct,
    }
}
