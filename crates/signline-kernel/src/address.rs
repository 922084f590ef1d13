//! Which line (or lines) a request denotes.
//!
//! Scripts count lines from 1. A requested number is truncated toward zero
//! and must land in `1..=4`; anything else is out of range, which is an
//! ordinary outcome rather than an error: reads come back empty and writes do
//! nothing.

use crate::error::SignLineError;
use crate::lines::{LINE_COUNT, LineIndex, LineSet};

/// A resolved line address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineAddress {
    /// One slot.
    Index(LineIndex),
    /// All four slots, in order.
    All,
}

impl LineAddress {
    /// Resolve a 1-based line number.
    pub fn from_number(requested: f64) -> Addressed {
        if !requested.is_finite() {
            return Addressed::OutOfRange(requested);
        }
        let line = requested.trunc();
        if line < 1.0 || line > LINE_COUNT as f64 {
            return Addressed::OutOfRange(requested);
        }
        match LineIndex::from_line_number(line as usize) {
            Some(index) => Addressed::Lines(Self::Index(index)),
            None => Addressed::OutOfRange(requested),
        }
    }

    /// Number of values a read through this address yields per target.
    pub fn width(self) -> usize {
        match self {
            Self::Index(_) => 1,
            Self::All => LINE_COUNT,
        }
    }

    /// Read the addressed slot(s) out of a line set.
    pub fn read(self, lines: &LineSet) -> Vec<String> {
        match self {
            Self::Index(index) => vec![lines.get(index).to_string()],
            Self::All => lines.to_vec(),
        }
    }

    /// The slots this address touches.
    pub fn slots(self) -> Vec<LineIndex> {
        match self {
            Self::Index(index) => vec![index],
            Self::All => LineIndex::all().collect(),
        }
    }
}

/// Outcome of resolving an address for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Addressed {
    Lines(LineAddress),
    /// The requested number is not a line of a sign.
    OutOfRange(f64),
    /// The index expression had no value for the current event.
    Missing,
}

impl Addressed {
    pub fn lines(self) -> Option<LineAddress> {
        match self {
            Self::Lines(address) => Some(address),
            Self::OutOfRange(_) | Self::Missing => None,
        }
    }
}

type LineNumberFn<E> = Box<dyn Fn(&E) -> Option<f64> + Send + Sync>;

/// How a binding picks its line, fixed when the binding is built.
pub enum AddressingMode<E> {
    /// A number expression evaluated against the current event.
    Number {
        value: LineNumberFn<E>,
        label: String,
    },
    /// A literal ordinal ("second line"), validated at bind time.
    Ordinal(LineIndex),
    /// Every line.
    All,
}

impl<E> AddressingMode<E> {
    /// Address by a number expression. `label` is used when describing the
    /// binding.
    pub fn number(
        label: impl Into<String>,
        value: impl Fn(&E) -> Option<f64> + Send + Sync + 'static,
    ) -> Self {
        Self::Number {
            value: Box::new(value),
            label: label.into(),
        }
    }

    /// Address by a constant line number, written as an expression that
    /// always yields `line`.
    pub fn fixed(line: f64) -> Self
    where
        E: 'static,
    {
        Self::number(format_number(line), move |_| Some(line))
    }

    /// Address by an ordinal literal, `1..=4`.
    pub fn ordinal(ordinal: i64) -> Result<Self, SignLineError> {
        usize::try_from(ordinal)
            .ok()
            .and_then(LineIndex::from_line_number)
            .map(Self::Ordinal)
            .ok_or(SignLineError::InvalidOrdinal(ordinal))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Resolve the address for one evaluation.
    pub fn resolve(&self, event: &E) -> Addressed {
        match self {
            Self::Number { value, .. } => match value(event) {
                Some(requested) => LineAddress::from_number(requested),
                None => Addressed::Missing,
            },
            Self::Ordinal(index) => Addressed::Lines(LineAddress::Index(*index)),
            Self::All => Addressed::Lines(LineAddress::All),
        }
    }
}

impl<E> std::fmt::Debug for AddressingMode<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number { label, .. } => f.debug_tuple("Number").field(label).finish(),
            Self::Ordinal(index) => f.debug_tuple("Ordinal").field(index).finish(),
            Self::All => write!(f, "All"),
        }
    }
}

impl<E> std::fmt::Display for AddressingMode<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number { label, .. } => write!(f, "line {label}"),
            Self::Ordinal(index) => write!(f, "line {index}"),
            Self::All => write!(f, "all lines"),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
