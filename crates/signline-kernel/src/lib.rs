//! # Signline Kernel
//!
//! Reading and writing the text lines of a sign from a scripting layer.
//!
//! The lines themselves are trivial. What is not trivial is *which* lines an
//! access sees: while a sign-change event is being handled, the new text
//! lives in the event and has not reached the sign, and after the handler
//! defers, that pending text is stale. This crate decides, for every access,
//! whether to go through the event's pending lines or through the sign's own
//! state, and commits the latter through whichever commit shape the host
//! supports.
//!
//! ## Architecture
//!
//! ```text
//! TextLineProperty      ← get / change, one binding per surface form
//!     │
//! TargetSet             ← which signs, single or plural, default or explicit
//!     │
//! TimingPolicy          ← snapshot / transient / direct
//!     │
//! LineAddress           ← line N (1-based) or all lines
//!     │
//! CommitShim            ← extended or legacy commit, tried once per process
//!     │
//! host traits           ← SignWorld, PersistedSign, EventContext
//! ```
//!
//! The crate is host-agnostic: blocks, signs and events are reached only
//! through the traits in [`host`].

pub mod address;
pub mod commit;
pub mod config;
pub mod error;
pub mod host;
pub mod lines;
pub mod property;
pub mod target;
pub mod timing;

pub use address::{Addressed, AddressingMode, LineAddress};
pub use commit::{CommitCapability, CommitShape, CommitShim, Support};
pub use config::{BindingConfig, BindingTable, LineSelector, LineSpec, TargetSpec, TimingSpec};
pub use error::SignLineError;
pub use host::{CommitShapeUnavailable, EventContext, PersistedSign, SignWorld, TransientLines};
pub use lines::{LINE_COUNT, LineIndex, LineSet};
pub use property::{ChangeMode, ChangeReport, LineChange, TextLineProperty};
pub use target::{Cardinality, TargetSet};
pub use timing::{ResolutionMode, TimingHint, TimingInputs, resolve_mode};
