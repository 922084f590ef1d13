//! Canonical in-memory world of blocks.
//!
//! Blocks are addressed by name. Sign blocks carry four lines; any other
//! block kind carries none and fails the sign predicate. A sign state handed
//! out by [`MemoryWorld::sign_state`] is a copy: edits to it stay staged
//! until committed, as on a real host.
//!
//! The world can be told to behave like a host that predates the extended
//! commit shape. It counts every commit attempt so callers can check which
//! shape the shim used.

use serde::{Deserialize, Serialize};
use signline_kernel::{CommitShapeUnavailable, LineIndex, LineSet, PersistedSign, SignWorld};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Name of a block; the handle type of the memory world.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What occupies a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Sign(LineSet),
    /// Any non-sign block, by kind name.
    Other(String),
}

/// Which commit shapes the simulated host offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostVersion {
    /// Offers the extended two-flag commit.
    #[default]
    Current,
    /// Only the no-argument commit.
    Legacy,
}

/// Commit calls observed by the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    /// Calls to the extended shape, including ones the host rejected.
    pub extended_attempts: usize,
    pub extended: usize,
    pub legacy: usize,
}

impl CommitStats {
    pub fn published(&self) -> usize {
        self.extended + self.legacy
    }
}

#[derive(Debug, Default)]
struct WorldState {
    blocks: BTreeMap<BlockId, Block>,
    host: HostVersion,
    stats: CommitStats,
}

/// Shared, single-threaded world. Clones see the same blocks.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorld {
    state: Rc<RefCell<WorldState>>,
}

impl MemoryWorld {
    pub fn new(host: HostVersion) -> Self {
        let world = Self::default();
        world.state.borrow_mut().host = host;
        world
    }

    /// Place a block, replacing whatever was there.
    pub fn place(&self, id: BlockId, block: Block) -> Option<Block> {
        self.state.borrow_mut().blocks.insert(id, block)
    }

    pub fn place_sign(&self, id: impl Into<String>, lines: LineSet) {
        self.place(BlockId::new(id), Block::Sign(lines));
    }

    pub fn place_other(&self, id: impl Into<String>, kind: impl Into<String>) {
        self.place(BlockId::new(id), Block::Other(kind.into()));
    }

    pub fn block(&self, id: &BlockId) -> Option<Block> {
        self.state.borrow().blocks.get(id).cloned()
    }

    /// The published lines of a sign.
    pub fn sign_lines(&self, id: &BlockId) -> Option<LineSet> {
        match self.state.borrow().blocks.get(id)? {
            Block::Sign(lines) => Some(lines.clone()),
            Block::Other(_) => None,
        }
    }

    pub fn stats(&self) -> CommitStats {
        self.state.borrow().stats
    }

    fn publish(&self, id: &BlockId, lines: &LineSet) {
        let mut state = self.state.borrow_mut();
        // A sign broken between read and commit stays broken.
        if let Some(Block::Sign(current)) = state.blocks.get_mut(id) {
            *current = lines.clone();
        }
    }
}

/// A staged copy of one sign's lines.
#[derive(Debug)]
pub struct MemorySign {
    world: MemoryWorld,
    id: BlockId,
    staged: LineSet,
}

impl PersistedSign for MemorySign {
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
        let host = {
            let mut state = self.world.state.borrow_mut();
            state.stats.extended_attempts += 1;
            state.host
        };
        match host {
            HostVersion::Current => {
                self.world.state.borrow_mut().stats.extended += 1;
                self.world.publish(&self.id, &self.staged);
                Ok(())
            }
            HostVersion::Legacy => Err(CommitShapeUnavailable),
        }
    }

    fn commit_legacy(&mut self) {
        self.world.state.borrow_mut().stats.legacy += 1;
        self.world.publish(&self.id, &self.staged);
    }
}

impl SignWorld for MemoryWorld {
    type Handle = BlockId;
    type Sign = MemorySign;

    fn is_sign(&self, handle: &BlockId) -> bool {
        matches!(self.state.borrow().blocks.get(handle), Some(Block::Sign(_)))
    }

    fn sign_state(&self, handle: &BlockId) -> Option<MemorySign> {
        let staged = self.sign_lines(handle)?;
        Some(MemorySign {
            world: self.clone(),
            id: handle.clone(),
            staged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_lines_publish_on_commit() {
        let world = MemoryWorld::new(HostVersion::Current);
        world.place_sign("a", LineSet::from(["1", "2", "3", "4"]));
        let id = BlockId::new("a");

        let mut sign = world.sign_state(&id).expect("a is a sign");
        sign.set_line(LineIndex::FIRST, "x");
        assert_eq!(world.sign_lines(&id).unwrap().get(LineIndex::FIRST), "1");

        sign.commit_extended(false, false).expect("current host");
        assert_eq!(world.sign_lines(&id).unwrap().get(LineIndex::FIRST), "x");
        assert_eq!(world.stats().extended, 1);
    }

    #[test]
    fn legacy_host_rejects_extended_commit() {
        let world = MemoryWorld::new(HostVersion::Legacy);
        world.place_sign("a", LineSet::default());
        let id = BlockId::new("a");

        let mut sign = world.sign_state(&id).unwrap();
        sign.set_line(LineIndex::LAST, "y");
        assert_eq!(
            sign.commit_extended(false, false),
            Err(CommitShapeUnavailable)
        );
        assert_eq!(world.sign_lines(&id).unwrap().get(LineIndex::LAST), "");

        sign.commit_legacy();
        assert_eq!(world.sign_lines(&id).unwrap().get(LineIndex::LAST), "y");
        assert_eq!(
            world.stats(),
            CommitStats {
                extended_attempts: 1,
                extended: 0,
                legacy: 1
            }
        );
    }

    #[test]
    fn non_sign_blocks_have_no_state() {
        let world = MemoryWorld::default();
        world.place_other("rock", "stone");
        let id = BlockId::new("rock");
        assert!(!world.is_sign(&id));
        assert!(world.sign_state(&id).is_none());
        assert!(!world.is_sign(&BlockId::new("missing")));
    }

    #[test]
    fn commit_to_broken_sign_is_dropped() {
        let world = MemoryWorld::default();
        world.place_sign("a", LineSet::default());
        let id = BlockId::new("a");
        let mut sign = world.sign_state(&id).unwrap();
        world.place_other("a", "air");

        sign.set_line(LineIndex::FIRST, "late");
        sign.commit_legacy();
        assert_eq!(world.block(&id), Some(Block::Other("air".to_string())));
    }
}
