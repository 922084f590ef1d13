//! Commit shim over the host's two commit call shapes.
//!
//! Newer hosts accept an extended commit taking two flags; older ones only
//! know the no-argument form. The first call tries the extended shape. If
//! the host reports it missing, the process-wide capability flips to
//! `Unsupported` and every later commit goes straight to the legacy form.
//! The first outcome is final.

use crate::host::PersistedSign;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

const UNKNOWN: u8 = 0;
const SUPPORTED: u8 = 1;
const UNSUPPORTED: u8 = 2;

/// Whether the host supports the extended commit shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Support {
    Unknown,
    Supported,
    Unsupported,
}

/// Cached extended-commit support.
///
/// All outcomes are idempotent, so racing first calls are harmless: whichever
/// lands first is kept.
#[derive(Debug)]
pub struct CommitCapability(AtomicU8);

fn process_capability() -> &'static Arc<CommitCapability> {
    static CAPABILITY: OnceLock<Arc<CommitCapability>> = OnceLock::new();
    CAPABILITY.get_or_init(|| Arc::new(CommitCapability::new()))
}

impl CommitCapability {
    pub const fn new() -> Self {
        Self(AtomicU8::new(UNKNOWN))
    }

    pub fn get(&self) -> Support {
        match self.0.load(Ordering::Acquire) {
            SUPPORTED => Support::Supported,
            UNSUPPORTED => Support::Unsupported,
            _ => Support::Unknown,
        }
    }

    /// Record the host's answer. Returns true if this call settled the flag.
    fn settle(&self, outcome: Support) -> bool {
        let value = match outcome {
            Support::Supported => SUPPORTED,
            Support::Unsupported => UNSUPPORTED,
            Support::Unknown => return false,
        };
        self.0
            .compare_exchange(UNKNOWN, value, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for CommitCapability {
    fn default() -> Self {
        Self::new()
    }
}

/// Which call shape published a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitShape {
    Extended,
    Legacy,
}

/// Publishes staged sign mutations through whichever shape the host has.
#[derive(Debug, Clone)]
pub struct CommitShim {
    capability: Arc<CommitCapability>,
}

impl CommitShim {
    /// A shim backed by the capability shared by every binding in the
    /// process.
    pub fn process() -> Self {
        Self::with_capability(Arc::clone(process_capability()))
    }

    /// A shim backed by a caller-owned capability.
    pub fn with_capability(capability: Arc<CommitCapability>) -> Self {
        Self { capability }
    }

    /// A shim with a capability of its own, for a host that is not the one
    /// this process talks to (simulations, tests).
    pub fn isolated() -> Self {
        Self::with_capability(Arc::new(CommitCapability::new()))
    }

    pub fn support(&self) -> Support {
        self.capability.get()
    }

    /// Commit the staged lines of `sign`.
    pub fn commit<S: PersistedSign + ?Sized>(&self, sign: &mut S) -> CommitShape {
        if self.capability.get() == Support::Unsupported {
            sign.commit_legacy();
            return CommitShape::Legacy;
        }

        match sign.commit_extended(false, false) {
            Ok(()) => {
                if self.capability.settle(Support::Supported) {
                    tracing::debug!("extended sign commit available");
                }
                CommitShape::Extended
            }
            Err(err) => {
                if self.capability.settle(Support::Unsupported) {
                    tracing::warn!("{err}; falling back to legacy sign commits");
                }
                sign.commit_legacy();
                CommitShape::Legacy
            }
        }
    }
}

impl Default for CommitShim {
    fn default() -> Self {
        Self::process()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CommitShapeUnavailable;
    use crate::lines::{LineIndex, LineSet};

    #[derive(Default)]
    struct StagedSign {
        extended_available: bool,
        staged: LineSet,
        published: LineSet,
        extended_attempts: usize,
        legacy_calls: usize,
    }

    impl PersistedSign for StagedSign {
        fn lines(&self) -> LineSet {
            self.staged.clone()
        }

        fn set_line(&mut self, index: LineIndex, text: &str) {
            self.staged.set(index, text);
        }

        fn commit_extended(
            &mut self,
            _force: bool,
            _apply_physics: bool,
        ) -> Result<(), CommitShapeUnavailable> {
            self.extended_attempts += 1;
            if !self.extended_available {
                return Err(CommitShapeUnavailable);
            }
            self.published = self.staged.clone();
            Ok(())
        }

        fn commit_legacy(&mut self) {
            self.legacy_calls += 1;
            self.published = self.staged.clone();
        }
    }

    #[test]
    fn extended_shape_is_used_when_available() {
        let shim = CommitShim::isolated();
        let mut sign = StagedSign {
            extended_available: true,
            ..Default::default()
        };

        sign.set_line(LineIndex::FIRST, "hi");
        assert_eq!(shim.commit(&mut sign), CommitShape::Extended);
        assert_eq!(shim.support(), Support::Supported);
        assert_eq!(sign.published.get(LineIndex::FIRST), "hi");
        assert_eq!(sign.legacy_calls, 0);
    }

    #[test]
    fn missing_extended_shape_is_tried_once() {
        let shim = CommitShim::isolated();

        let mut first = StagedSign::default();
        first.set_line(LineIndex::LAST, "one");
        assert_eq!(shim.commit(&mut first), CommitShape::Legacy);
        assert_eq!(first.extended_attempts, 1);
        assert_eq!(first.published.get(LineIndex::LAST), "one");
        assert_eq!(shim.support(), Support::Unsupported);

        for _ in 0..3 {
            let mut next = StagedSign::default();
            next.set_line(LineIndex::FIRST, "two");
            assert_eq!(shim.commit(&mut next), CommitShape::Legacy);
            assert_eq!(next.extended_attempts, 0);
            assert_eq!(next.legacy_calls, 1);
            assert_eq!(next.published.get(LineIndex::FIRST), "two");
        }
    }

    #[test]
    fn clones_share_the_capability() {
        let shim = CommitShim::isolated();
        let clone = shim.clone();
        let mut sign = StagedSign::default();
        shim.commit(&mut sign);
        assert_eq!(clone.support(), Support::Unsupported);
        assert_eq!(CommitShim::isolated().support(), Support::Unknown);
    }

    #[test]
    fn process_shims_share_one_capability() {
        let process = CommitShim::process();
        let default = CommitShim::default();
        assert!(Arc::ptr_eq(&process.capability, &default.capability));
        assert!(!Arc::ptr_eq(
            &process.capability,
            &CommitShim::isolated().capability
        ));
    }

    #[test]
    fn first_outcome_is_final() {
        let capability = CommitCapability::new();
        assert!(capability.settle(Support::Supported));
        assert!(!capability.settle(Support::Unsupported));
        assert_eq!(capability.get(), Support::Supported);
    }
}
