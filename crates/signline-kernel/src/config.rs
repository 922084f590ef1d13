//! Declarative binding configuration.
//!
//! A binding's static surface (which line, which timing, which target, which
//! changes the script performs) can be written down in TOML or JSON instead
//! of being assembled in code:
//!
//! ```toml
//! [[binding]]
//! name = "greeting"
//! line = "second"
//! timing = "present"
//! target = "default"
//! changes = ["set", "delete"]
//! ```
//!
//! `line` is a number, an ordinal word (`first`/`1st` … `fourth`/`4th`) or
//! `"all"`. `timing` is `unset`, `past`/`before`, `present`, `future`, or a
//! signed host time value; when omitted it is `present` wherever a timing is
//! applicable and `unset` elsewhere. Targets other than `default` name host
//! objects and are mapped to handles by the host.

use crate::address::AddressingMode;
use crate::error::SignLineError;
use crate::property::{ChangeMode, TextLineProperty};
use crate::target::TargetSet;
use crate::timing::TimingHint;
use serde::{Deserialize, Serialize};

/// Static description of one binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub line: LineSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingSpec>,

    #[serde(default)]
    pub target: TargetSpec,

    /// Change modes the script applies to this binding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<ChangeMode>,
}

/// The `line` field as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineSpec {
    Number(f64),
    Word(String),
}

/// The `timing` field as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimingSpec {
    Time(i64),
    Word(String),
}

/// The `target` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpec {
    /// The event's own object.
    #[default]
    Default,
    /// One named object.
    Block(String),
    /// Several named objects.
    Blocks(Vec<String>),
}

impl TargetSpec {
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// A file of bindings, as read from TOML (`[[binding]]` tables).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingTable {
    #[serde(default, rename = "binding")]
    pub bindings: Vec<BindingConfig>,
}

impl BindingTable {
    pub fn from_toml_str(input: &str) -> Result<Self, SignLineError> {
        Ok(toml::from_str(input)?)
    }
}

/// How the `line` field addresses a sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSelector {
    Number(f64),
    Ordinal(i64),
    All,
}

impl LineSpec {
    pub fn selector(&self) -> Result<LineSelector, SignLineError> {
        match self {
            Self::Number(number) => Ok(LineSelector::Number(*number)),
            Self::Word(word) => parse_line_word(word),
        }
    }
}

fn parse_line_word(word: &str) -> Result<LineSelector, SignLineError> {
    let word = word.trim().to_lowercase();
    let ordinal = match word.as_str() {
        "all" => return Ok(LineSelector::All),
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        other => {
            let digits = other
                .strip_suffix("st")
                .or_else(|| other.strip_suffix("nd"))
                .or_else(|| other.strip_suffix("rd"))
                .or_else(|| other.strip_suffix("th"));
            match digits.map(str::parse::<i64>) {
                Some(Ok(ordinal)) => ordinal,
                _ => {
                    return Err(SignLineError::Config(format!(
                        "line must be a number, an ordinal or \"all\", got {word:?}"
                    )));
                }
            }
        }
    };
    if !(1..=4).contains(&ordinal) {
        return Err(SignLineError::InvalidOrdinal(ordinal));
    }
    Ok(LineSelector::Ordinal(ordinal))
}

impl TimingSpec {
    pub fn hint(&self) -> Result<TimingHint, SignLineError> {
        match self {
            Self::Time(time) => Ok(TimingHint::from_time(*time)),
            Self::Word(word) => match word.trim().to_lowercase().as_str() {
                "unset" | "none" => Ok(TimingHint::Unset),
                "past" | "before" => Ok(TimingHint::Before),
                "present" | "now" => Ok(TimingHint::present()),
                "future" | "after" => Ok(TimingHint::AtOrAfter(1)),
                other => Err(SignLineError::Config(format!("unknown timing {other:?}"))),
            },
        }
    }
}

impl BindingConfig {
    /// Parse a single binding from a TOML table.
    pub fn from_toml_str(input: &str) -> Result<Self, SignLineError> {
        Ok(toml::from_str(input)?)
    }

    /// Parse a single binding from JSON.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SignLineError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Human-readable name for diagnostics.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => match &self.line {
                LineSpec::Number(number) => format!("line {number}"),
                LineSpec::Word(word) => format!("line {word}"),
            },
        }
    }

    pub fn addressing<E: 'static>(&self) -> Result<AddressingMode<E>, SignLineError> {
        match self.line.selector()? {
            LineSelector::Number(number) => Ok(AddressingMode::fixed(number)),
            LineSelector::Ordinal(ordinal) => AddressingMode::ordinal(ordinal),
            LineSelector::All => Ok(AddressingMode::All),
        }
    }

    /// The timing hint this binding gets in an event type with or without a
    /// lifecycle.
    pub fn timing_hint(&self, event_has_lifecycle: bool) -> Result<TimingHint, SignLineError> {
        match &self.timing {
            Some(spec) => spec.hint(),
            None if event_has_lifecycle && self.target.is_default() => Ok(TimingHint::present()),
            None => Ok(TimingHint::Unset),
        }
    }

    /// Build the property over host-resolved `targets`.
    pub fn bind<E: 'static, H>(
        &self,
        targets: TargetSet<E, H>,
        event_has_lifecycle: bool,
    ) -> Result<TextLineProperty<E, H>, SignLineError> {
        let property = TextLineProperty::new(self.addressing()?, targets);
        for mode in &self.changes {
            property.accept_change(*mode)?;
        }
        property.with_timing(self.timing_hint(event_has_lifecycle)?, event_has_lifecycle)
    }

    /// Run every construction-time check without a host.
    pub fn validate(&self, event_has_lifecycle: bool) -> Result<(), SignLineError> {
        let timing = self.timing_hint(event_has_lifecycle)?;
        self.addressing::<()>()?;
        if timing.is_set() && !event_has_lifecycle {
            return Err(SignLineError::TimingNotApplicable {
                reason: format!(
                    "{} uses {timing} timing outside a sign change event",
                    self.label()
                ),
            });
        }
        if timing.is_set() && !self.target.is_default() {
            return Err(SignLineError::TimingNotApplicable {
                reason: format!(
                    "{} uses {timing} timing on an explicit target",
                    self.label()
                ),
            });
        }
        for mode in &self.changes {
            if !matches!(mode, ChangeMode::Set | ChangeMode::Delete) {
                return Err(SignLineError::UnsupportedChange { mode: *mode });
            }
        }
        Ok(())
    }
}
