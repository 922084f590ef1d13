//! The four text slots of a sign.
//!
//! Hosts hand lines around as plain string arrays; the property returns them
//! as an ordered `Vec<String>`. `LineSet` sits between the two and keeps the
//! slot count fixed at [`LINE_COUNT`].

use crate::host::TransientLines;
use serde::{Deserialize, Serialize};

/// Number of text slots on every sign.
pub const LINE_COUNT: usize = 4;

/// A validated 0-based slot index in `0..LINE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct LineIndex(u8);

impl LineIndex {
    pub const FIRST: Self = Self(0);
    pub const LAST: Self = Self(LINE_COUNT as u8 - 1);

    /// Index from a 0-based slot number.
    pub fn new(slot: usize) -> Option<Self> {
        (slot < LINE_COUNT).then_some(Self(slot as u8))
    }

    /// Index from a 1-based line number, as scripts write it.
    pub fn from_line_number(number: usize) -> Option<Self> {
        number.checked_sub(1).and_then(Self::new)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// The 1-based line number for display.
    pub fn line_number(self) -> usize {
        self.get() + 1
    }

    /// All slots in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..LINE_COUNT as u8).map(Self)
    }
}

impl TryFrom<usize> for LineIndex {
    type Error = String;

    fn try_from(slot: usize) -> Result<Self, Self::Error> {
        Self::new(slot).ok_or_else(|| format!("line slot {slot} is outside 0..{LINE_COUNT}"))
    }
}

impl From<LineIndex> for usize {
    fn from(index: LineIndex) -> Self {
        index.get()
    }
}

impl std::fmt::Display for LineIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.line_number())
    }
}

/// Exactly four ordered lines of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSet([String; LINE_COUNT]);

impl LineSet {
    pub fn new(lines: [String; LINE_COUNT]) -> Self {
        Self(lines)
    }

    /// A set with every slot holding `text`.
    pub fn filled(text: &str) -> Self {
        Self(std::array::from_fn(|_| text.to_string()))
    }

    /// Build from a host string array.
    ///
    /// Hosts are not always strict about the array length: missing slots
    /// become empty and extra entries are dropped.
    pub fn from_slice<S: AsRef<str>>(lines: &[S]) -> Self {
        Self(std::array::from_fn(|i| {
            lines
                .get(i)
                .map(|line| line.as_ref().to_string())
                .unwrap_or_default()
        }))
    }

    pub fn get(&self, index: LineIndex) -> &str {
        &self.0[index.get()]
    }

    pub fn set(&mut self, index: LineIndex, text: impl Into<String>) {
        self.0[index.get()] = text.into();
    }

    /// Overwrite every slot with `text`.
    pub fn fill(&mut self, text: &str) {
        for slot in &mut self.0 {
            slot.clear();
            slot.push_str(text);
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into()
    }
}

/// A bare line set is the simplest transient view: hosts that keep pending
/// lines in an array can hand it out directly.
impl TransientLines for LineSet {
    fn line(&self, index: LineIndex) -> String {
        self.get(index).to_string()
    }

    fn set_line(&mut self, index: LineIndex, text: &str) {
        self.set(index, text);
    }

    fn lines(&self) -> LineSet {
        self.clone()
    }
}

impl From<[&str; LINE_COUNT]> for LineSet {
    fn from(lines: [&str; LINE_COUNT]) -> Self {
        Self(lines.map(str::to_string))
    }
}

impl From<LineSet> for Vec<String> {
    fn from(lines: LineSet) -> Self {
        lines.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_index_bounds() {
        assert_eq!(LineIndex::new(3), Some(LineIndex::LAST));
        assert_eq!(LineIndex::new(4), None);
        assert_eq!(LineIndex::from_line_number(1), Some(LineIndex::FIRST));
        assert_eq!(LineIndex::from_line_number(0), None);
        assert_eq!(LineIndex::from_line_number(5), None);
    }

    #[test]
    fn from_slice_pads_and_truncates() {
        let short = LineSet::from_slice(&["a", "b"]);
        assert_eq!(short.to_vec(), vec!["a", "b", "", ""]);

        let long = LineSet::from_slice(&["1", "2", "3", "4", "5"]);
        assert_eq!(long.to_vec(), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn fill_overwrites_every_slot() {
        let mut lines = LineSet::from(["a", "b", "c", "d"]);
        lines.fill("x");
        assert_eq!(lines, LineSet::filled("x"));
    }

    #[test]
    fn line_index_serde_rejects_out_of_range() {
        let ok: LineIndex = serde_json::from_str("2").expect("slot 2 should parse");
        assert_eq!(ok.line_number(), 3);
        assert!(serde_json::from_str::<LineIndex>("4").is_err());
    }
}
