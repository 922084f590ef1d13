//! Events delivered to bindings in the memory world.

use crate::world::BlockId;
use serde::{Deserialize, Serialize};
use signline_kernel::{EventContext, LineSet, TransientLines};

/// The event a handler is running for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldEvent {
    /// A player finished editing a sign; `lines` are not on the sign yet.
    SignChange {
        block: BlockId,
        lines: LineSet,
        /// A wait has elapsed inside the handler.
        #[serde(default)]
        delayed: bool,
    },
    /// A player clicked a block. No lifecycle; the clicked block is the
    /// default target.
    Click { block: BlockId },
    /// An event with no block of its own.
    Tick,
}

impl WorldEvent {
    pub fn sign_change(block: impl Into<String>, lines: LineSet) -> Self {
        Self::SignChange {
            block: BlockId::new(block),
            lines,
            delayed: false,
        }
    }

    pub fn click(block: impl Into<String>) -> Self {
        Self::Click {
            block: BlockId::new(block),
        }
    }

    /// The implicit current object for default targets.
    pub fn event_block(&self) -> Option<&BlockId> {
        match self {
            Self::SignChange { block, .. } | Self::Click { block } => Some(block),
            Self::Tick => None,
        }
    }

    /// Whether this event type carries pending sign lines.
    pub fn has_lifecycle(&self) -> bool {
        matches!(self, Self::SignChange { .. })
    }

    /// Mark that a wait elapsed; pending lines are stale from here on.
    pub fn delay(&mut self) {
        if let Self::SignChange { delayed, .. } = self {
            *delayed = true;
        }
    }

    pub fn is_delayed(&self) -> bool {
        matches!(self, Self::SignChange { delayed: true, .. })
    }

    /// The pending lines of a sign-change event.
    pub fn pending_lines(&self) -> Option<&LineSet> {
        match self {
            Self::SignChange { lines, .. } => Some(lines),
            Self::Click { .. } | Self::Tick => None,
        }
    }
}

impl EventContext<BlockId> for WorldEvent {
    fn lifecycle_subject(&self) -> Option<&BlockId> {
        match self {
            Self::SignChange { block, .. } => Some(block),
            Self::Click { .. } | Self::Tick => None,
        }
    }

    fn is_lifecycle_open(&self) -> bool {
        !self.is_delayed()
    }

    fn transient(&self) -> Option<&dyn TransientLines> {
        match self {
            Self::SignChange { lines, .. } => Some(lines),
            Self::Click { .. } | Self::Tick => None,
        }
    }

    fn transient_mut(&mut self) -> Option<&mut dyn TransientLines> {
        match self {
            Self::SignChange { lines, .. } => Some(lines),
            Self::Click { .. } | Self::Tick => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sign_change_has_a_lifecycle() {
        let change = WorldEvent::sign_change("a", LineSet::default());
        let click = WorldEvent::click("a");
        let a = BlockId::new("a");

        assert!(change.is_lifecycle_event_for(&a));
        assert!(!click.is_lifecycle_event_for(&a));
        assert_eq!(click.event_block(), Some(&a));
        assert!(WorldEvent::Tick.event_block().is_none());
    }

    #[test]
    fn delay_closes_the_lifecycle() {
        let mut change = WorldEvent::sign_change("a", LineSet::default());
        assert!(change.is_lifecycle_open());
        change.delay();
        assert!(!change.is_lifecycle_open());
        assert!(change.transient().is_some());
    }

    #[test]
    fn parses_from_json() {
        let event: WorldEvent = serde_json::from_value(serde_json::json!({
            "sign_change": { "block": "a", "lines": ["1", "2", "3", "4"] }
        }))
        .expect("sign change should parse");
        assert!(!event.is_delayed());
        assert_eq!(
            event.pending_lines().unwrap().to_vec(),
            vec!["1", "2", "3", "4"]
        );

        let tick: WorldEvent = serde_json::from_value(serde_json::json!("tick")).unwrap();
        assert_eq!(tick, WorldEvent::Tick);
    }
}
