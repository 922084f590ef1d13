//! The sign text property: one binding covering "line N of X", "the Nth
//! line of X" and "all lines of X".
//!
//! A binding is built once from an addressing mode, a target set and a
//! timing hint, then evaluated any number of times against the event being
//! handled. Reads return an ordered list of strings; writes accept a single
//! replacement string. Neither ever fails: an unusable address gives an
//! empty read or a no-op write, and a target that is not a sign is skipped
//! without affecting the others.

use crate::address::{AddressingMode, LineAddress};
use crate::commit::{CommitShape, CommitShim};
use crate::error::SignLineError;
use crate::host::{EventContext, PersistedSign, SignWorld};
use crate::target::TargetSet;
use crate::timing::{ResolutionMode, TimingHint, TimingInputs, resolve_mode};
use serde::{Deserialize, Serialize};

/// The generic change modes a host may ask a property about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeMode {
    Set,
    Delete,
    Add,
    Remove,
    RemoveAll,
    Reset,
}

impl std::fmt::Display for ChangeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Set => "set",
            Self::Delete => "delete",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::RemoveAll => "remove all",
            Self::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// A change the property accepted at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineChange {
    /// Replace every addressed slot with the given text.
    Set,
    /// Same as setting the empty string.
    Delete,
}

/// What one `change` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    /// Targets written through the event's pending lines.
    pub transient_writes: usize,
    /// Targets written on their persisted state.
    pub persisted_writes: usize,
    pub extended_commits: usize,
    pub legacy_commits: usize,
    /// Targets that were not signs.
    pub skipped: usize,
}

impl ChangeReport {
    pub fn commits(&self) -> usize {
        self.extended_commits + self.legacy_commits
    }

    pub fn is_noop(&self) -> bool {
        self.transient_writes == 0 && self.persisted_writes == 0
    }
}

/// A bound sign text property.
pub struct TextLineProperty<E, H> {
    addressing: AddressingMode<E>,
    targets: TargetSet<E, H>,
    timing: TimingHint,
    commit: CommitShim,
}

impl<E, H> TextLineProperty<E, H> {
    /// Bind with no timing hint, committing through the process-wide shim.
    pub fn new(addressing: AddressingMode<E>, targets: TargetSet<E, H>) -> Self {
        Self {
            addressing,
            targets,
            timing: TimingHint::Unset,
            commit: CommitShim::process(),
        }
    }

    pub fn with_commit_shim(mut self, commit: CommitShim) -> Self {
        self.commit = commit;
        self
    }

    /// Attach a timing hint.
    ///
    /// Any hint other than `Unset` needs an event type that carries pending
    /// sign lines (`event_has_lifecycle`) and a target that is the event's
    /// own object.
    pub fn set_timing(
        &mut self,
        timing: TimingHint,
        event_has_lifecycle: bool,
    ) -> Result<(), SignLineError> {
        if timing.is_set() {
            if !event_has_lifecycle {
                return Err(SignLineError::TimingNotApplicable {
                    reason: format!("{timing} {self} is only meaningful in a sign change event"),
                });
            }
            if !self.targets.is_default() {
                return Err(SignLineError::TimingNotApplicable {
                    reason: format!("{} is not the sign of the event", self.targets),
                });
            }
        }
        self.timing = timing;
        Ok(())
    }

    pub fn with_timing(
        mut self,
        timing: TimingHint,
        event_has_lifecycle: bool,
    ) -> Result<Self, SignLineError> {
        self.set_timing(timing, event_has_lifecycle)?;
        Ok(self)
    }

    /// Whether a read yields at most one value.
    pub fn is_single(&self) -> bool {
        !self.addressing.is_all() && self.targets.is_single()
    }

    /// Map a host change mode to one this property supports.
    pub fn accept_change(&self, mode: ChangeMode) -> Result<LineChange, SignLineError> {
        match mode {
            ChangeMode::Set => Ok(LineChange::Set),
            ChangeMode::Delete => Ok(LineChange::Delete),
            ChangeMode::Add | ChangeMode::Remove | ChangeMode::RemoveAll | ChangeMode::Reset => {
                Err(SignLineError::UnsupportedChange { mode })
            }
        }
    }
}

impl<E, H: PartialEq + std::fmt::Debug> TextLineProperty<E, H> {
    fn mode_for(&self, event: &E, handle: &H) -> ResolutionMode
    where
        E: EventContext<H>,
    {
        resolve_mode(TimingInputs {
            timing: self.timing,
            is_default_target: self.targets.is_default(),
            event_matches_target: event.is_lifecycle_event_for(handle),
            lifecycle_open: event.is_lifecycle_open(),
        })
    }

    /// Read the addressed line(s).
    pub fn get<W>(&self, world: &W, event: &E) -> Vec<String>
    where
        W: SignWorld<Handle = H>,
        E: EventContext<H>,
    {
        let addressed = self.addressing.resolve(event);
        let Some(address) = addressed.lines() else {
            tracing::debug!(?addressed, "{self}: no line to read");
            return Vec::new();
        };

        let handles = self.targets.resolve(event);

        if self.timing == TimingHint::Before {
            // The pending lines are still in the event, so the sign's own
            // state is what it looked like before the change.
            return read_persisted(world, &handles, address);
        }

        if let [handle] = handles.as_slice()
            && self.targets.is_single()
            && self.mode_for(event, handle) == ResolutionMode::Transient
            && let Some(pending) = event.transient()
        {
            return match address {
                LineAddress::Index(index) => vec![pending.line(index)],
                LineAddress::All => pending.lines().into_vec(),
            };
        }

        read_persisted(world, &handles, address)
    }

    /// Apply `change` to the addressed line(s) of every target.
    ///
    /// `text` is the replacement for [`LineChange::Set`]; it is ignored for
    /// [`LineChange::Delete`]. A set without a value does nothing.
    pub fn change<W>(
        &self,
        world: &W,
        event: &mut E,
        change: LineChange,
        text: Option<&str>,
    ) -> ChangeReport
    where
        W: SignWorld<Handle = H>,
        E: EventContext<H>,
    {
        let mut report = ChangeReport::default();

        let text = match (change, text) {
            (LineChange::Set, Some(text)) => text,
            (LineChange::Set, None) => {
                tracing::debug!("{self}: set without a value");
                return report;
            }
            (LineChange::Delete, _) => "",
        };

        let addressed = self.addressing.resolve(event);
        let Some(address) = addressed.lines() else {
            tracing::debug!(?addressed, "{self}: no line to write");
            return report;
        };

        for handle in self.targets.resolve(event) {
            let mode = self.mode_for(event, &handle);
            if !mode.is_writable() {
                tracing::debug!(?handle, "{self}: the pre-change view is read-only");
                continue;
            }

            if mode == ResolutionMode::Transient
                && let Some(pending) = event.transient_mut()
            {
                for slot in address.slots() {
                    pending.set_line(slot, text);
                }
                report.transient_writes += 1;
                continue;
            }

            if !world.is_sign(&handle) {
                tracing::debug!(?handle, "{self}: target is not a sign");
                report.skipped += 1;
                continue;
            }
            let Some(mut sign) = world.sign_state(&handle) else {
                tracing::debug!(?handle, "{self}: sign state unavailable");
                report.skipped += 1;
                continue;
            };

            for slot in address.slots() {
                sign.set_line(slot, text);
            }
            report.persisted_writes += 1;

            match self.commit.commit(&mut sign) {
                CommitShape::Extended => report.extended_commits += 1,
                CommitShape::Legacy => report.legacy_commits += 1,
            }
        }

        report
    }
}

/// Read the addressed slot(s) of every sign among `handles`, in order.
fn read_persisted<W: SignWorld>(
    world: &W,
    handles: &[W::Handle],
    address: LineAddress,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(handles.len() * address.width());
    for handle in handles {
        if !world.is_sign(handle) {
            tracing::debug!(?handle, "skipping target that is not a sign");
            continue;
        }
        let Some(sign) = world.sign_state(handle) else {
            continue;
        };
        match address {
            LineAddress::Index(index) => lines.push(sign.line(index)),
            LineAddress::All => lines.extend(sign.lines().into_vec()),
        }
    }
    lines
}

impl<E, H> std::fmt::Debug for TextLineProperty<E, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLineProperty")
            .field("addressing", &self.addressing)
            .field("targets", &self.targets)
            .field("timing", &self.timing)
            .finish()
    }
}

impl<E, H> std::fmt::Display for TextLineProperty<E, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.addressing, self.targets)
    }
}
