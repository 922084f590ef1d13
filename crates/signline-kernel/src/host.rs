//! Host interfaces.
//!
//! The kernel never sees a concrete block, sign or event. The host provides:
//!
//! 1. **SignWorld**: turns an opaque handle into a live sign state and
//!    answers whether a handle is a sign at all.
//! 2. **PersistedSign**: the sign's own state. Mutations only become visible
//!    after a commit, and the commit exists in two call shapes depending on
//!    the host version.
//! 3. **EventContext**: the event currently being handled. During a
//!    sign-change event it carries the pending lines (the transient view).
//!
//! Handles are compared for equality to decide whether the event concerns a
//! given target; hosts must make that comparison cheap.

use crate::lines::{LineIndex, LineSet};
use std::fmt::Debug;

/// The host has no extended commit shape.
///
/// This is a binding-resolution failure reported by the host when the call
/// is made, not a validation error about the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("extended commit shape is not available on this host")]
pub struct CommitShapeUnavailable;

/// A sign's persisted state, as returned by the world for one access.
pub trait PersistedSign {
    /// The four lines as currently held by this state.
    fn lines(&self) -> LineSet;

    /// One line.
    fn line(&self, index: LineIndex) -> String {
        self.lines().get(index).to_string()
    }

    /// Stage a new value for one line. Not visible until committed.
    fn set_line(&mut self, index: LineIndex, text: &str);

    /// Publish staged lines without forcing a re-render and without
    /// dropping custom formatting.
    ///
    /// Hosts that predate this shape return [`CommitShapeUnavailable`] and
    /// must leave the staged lines untouched.
    fn commit_extended(
        &mut self,
        force: bool,
        apply_physics: bool,
    ) -> Result<(), CommitShapeUnavailable>;

    /// Publish staged lines with the original no-argument shape.
    fn commit_legacy(&mut self);
}

/// The world-query layer.
pub trait SignWorld {
    type Handle: Clone + PartialEq + Debug;
    type Sign: PersistedSign;

    /// Whether the handle denotes a sign.
    fn is_sign(&self, handle: &Self::Handle) -> bool;

    /// A fresh state for the sign behind `handle`, or `None` if the handle
    /// no longer resolves to one.
    fn sign_state(&self, handle: &Self::Handle) -> Option<Self::Sign>;
}

/// Pending lines of a sign-change event.
pub trait TransientLines {
    fn line(&self, index: LineIndex) -> String {
        self.lines().get(index).to_string()
    }

    fn set_line(&mut self, index: LineIndex, text: &str);

    fn lines(&self) -> LineSet;
}

/// The event being handled when a binding is evaluated.
pub trait EventContext<H> {
    /// The object whose lifecycle event this is, if it is one.
    fn lifecycle_subject(&self) -> Option<&H>;

    /// Whether this event is the lifecycle event of `handle`.
    fn is_lifecycle_event_for(&self, handle: &H) -> bool
    where
        H: PartialEq,
    {
        self.lifecycle_subject() == Some(handle)
    }

    /// False once a deferral has elapsed inside the handler; from then on the
    /// transient view is stale.
    fn is_lifecycle_open(&self) -> bool;

    /// The pending lines, during a lifecycle event.
    fn transient(&self) -> Option<&dyn TransientLines>;

    fn transient_mut(&mut self) -> Option<&mut dyn TransientLines>;
}
