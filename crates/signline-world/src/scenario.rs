//! JSON scenarios over the memory world.
//!
//! A scenario sets up blocks and the current event, then runs steps against
//! bindings declared with [`BindingConfig`]. Each step may carry an
//! expectation; the runner records every outcome and whether it matched, so
//! a scenario file doubles as a conformance vector.
//!
//! ```json
//! {
//!   "name": "set third line",
//!   "host": "legacy",
//!   "blocks": { "signA": { "sign": ["A", "B", "C", "D"] } },
//!   "event": { "click": { "block": "signA" } },
//!   "steps": [
//!     { "op": "set", "binding": { "line": 3 }, "value": "X",
//!       "expect": { "persisted_writes": 1, "commits": 1 } },
//!     { "op": "get", "binding": { "line": "all" },
//!       "expect": ["A", "B", "X", "D"] }
//!   ]
//! }
//! ```

use crate::event::WorldEvent;
use crate::world::{Block, BlockId, CommitStats, HostVersion, MemoryWorld};
use serde::{Deserialize, Serialize};
use signline_kernel::{
    BindingConfig, ChangeMode, ChangeReport, CommitShim, LineSet, SignLineError, TargetSet,
    TargetSpec, TextLineProperty,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors that stop a scenario from running at all.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("step {step}: {source}")]
    Binding { step: usize, source: SignLineError },
}

/// A scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,

    #[serde(default)]
    pub host: HostVersion,

    #[serde(default)]
    pub blocks: BTreeMap<BlockId, Block>,

    #[serde(default = "default_event")]
    pub event: WorldEvent,

    pub steps: Vec<Step>,
}

fn default_event() -> WorldEvent {
    WorldEvent::Tick
}

/// One step of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Read through a binding.
    Get {
        binding: BindingConfig,
        #[serde(default)]
        expect: Option<Vec<String>>,
    },
    /// Set through a binding. A missing `value` models an expression that
    /// had no value.
    Set {
        binding: BindingConfig,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        expect: Option<ExpectedChange>,
    },
    /// Delete through a binding.
    Delete {
        binding: BindingConfig,
        #[serde(default)]
        expect: Option<ExpectedChange>,
    },
    /// A wait elapses inside the handler.
    Delay,
    /// Check the published lines of a sign.
    AssertSign { block: BlockId, lines: LineSet },
    /// Check the pending lines of the current event.
    AssertPending { lines: LineSet },
    /// Check the commit calls the host has seen so far.
    AssertCommits(CommitStats),
}

/// Expected fields of a change report; omitted fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedChange {
    #[serde(default)]
    pub transient_writes: Option<usize>,
    #[serde(default)]
    pub persisted_writes: Option<usize>,
    #[serde(default)]
    pub commits: Option<usize>,
    #[serde(default)]
    pub skipped: Option<usize>,
}

impl ExpectedChange {
    fn matches(&self, report: &ChangeReport) -> bool {
        let field = |expected: Option<usize>, actual: usize| expected.is_none_or(|e| e == actual);
        field(self.transient_writes, report.transient_writes)
            && field(self.persisted_writes, report.persisted_writes)
            && field(self.commits, report.commits())
            && field(self.skipped, report.skipped)
    }
}

/// What a step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    Read { lines: Vec<String> },
    Changed { report: ChangeReport },
    Delayed,
    Sign { lines: Option<LineSet> },
    Pending { lines: Option<LineSet> },
    Commits { stats: CommitStats },
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub index: usize,
    pub description: String,
    pub outcome: StepOutcome,
    /// False only when an expectation was given and not met.
    pub passed: bool,
}

/// Result of a whole scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepResult>,
    pub stats: CommitStats,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| step.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|step| !step.passed)
    }
}

impl Scenario {
    pub fn from_json_str(input: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&input)
    }

    /// Build the world this scenario starts from.
    pub fn world(&self) -> MemoryWorld {
        let world = MemoryWorld::new(self.host);
        for (id, block) in &self.blocks {
            world.place(id.clone(), block.clone());
        }
        world
    }

    /// Run every step against a fresh world.
    ///
    /// The scenario's host is a separate process from the one running this
    /// code, so it gets a commit capability of its own.
    pub fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let mut runner = Runner {
            world: self.world(),
            event: self.event.clone(),
            commit: CommitShim::isolated(),
        };

        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let result = runner
                .step(index, step)
                .map_err(|source| ScenarioError::Binding {
                    step: index,
                    source,
                })?;
            if !result.passed {
                tracing::warn!(
                    scenario = %self.name,
                    step = index,
                    "{}: expectation not met",
                    result.description
                );
            }
            steps.push(result);
        }

        Ok(ScenarioReport {
            name: self.name.clone(),
            steps,
            stats: runner.world.stats(),
        })
    }
}

struct Runner {
    world: MemoryWorld,
    event: WorldEvent,
    commit: CommitShim,
}

type WorldProperty = TextLineProperty<WorldEvent, BlockId>;

impl Runner {
    fn bind(&self, config: &BindingConfig) -> Result<WorldProperty, SignLineError> {
        let targets = match &config.target {
            TargetSpec::Default => {
                TargetSet::default_target("the event-block", |event: &WorldEvent| {
                    event.event_block().cloned()
                })
            }
            TargetSpec::Block(id) => {
                let id = BlockId::new(id.clone());
                TargetSet::single(id.to_string(), move |_: &WorldEvent| Some(id.clone()))
            }
            TargetSpec::Blocks(ids) => {
                let ids: Vec<BlockId> = ids.iter().cloned().map(BlockId::new).collect();
                let label = ids
                    .iter()
                    .map(BlockId::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                TargetSet::multiple(label, move |_: &WorldEvent| ids.clone())
            }
        };
        Ok(config
            .bind(targets, self.event.has_lifecycle())?
            .with_commit_shim(self.commit.clone()))
    }

    fn step(&mut self, index: usize, step: &Step) -> Result<StepResult, SignLineError> {
        let (description, outcome, passed) = match step {
            Step::Get { binding, expect } => {
                let property = self.bind(binding)?;
                let lines = property.get(&self.world, &self.event);
                let passed = expect.as_ref().is_none_or(|expect| *expect == lines);
                (
                    format!("get {property}"),
                    StepOutcome::Read { lines },
                    passed,
                )
            }
            Step::Set {
                binding,
                value,
                expect,
            } => {
                let property = self.bind(binding)?;
                let change = property.accept_change(ChangeMode::Set)?;
                let report =
                    property.change(&self.world, &mut self.event, change, value.as_deref());
                let passed = expect.as_ref().is_none_or(|expect| expect.matches(&report));
                (
                    format!("set {property}"),
                    StepOutcome::Changed { report },
                    passed,
                )
            }
            Step::Delete { binding, expect } => {
                let property = self.bind(binding)?;
                let change = property.accept_change(ChangeMode::Delete)?;
                let report = property.change(&self.world, &mut self.event, change, None);
                let passed = expect.as_ref().is_none_or(|expect| expect.matches(&report));
                (
                    format!("delete {property}"),
                    StepOutcome::Changed { report },
                    passed,
                )
            }
            Step::Delay => {
                self.event.delay();
                ("wait".to_string(), StepOutcome::Delayed, true)
            }
            Step::AssertSign { block, lines } => {
                let actual = self.world.sign_lines(block);
                let passed = actual.as_ref() == Some(lines);
                (
                    format!("sign {block}"),
                    StepOutcome::Sign { lines: actual },
                    passed,
                )
            }
            Step::AssertPending { lines } => {
                let actual = self.event.pending_lines().cloned();
                let passed = actual.as_ref() == Some(lines);
                (
                    "pending lines".to_string(),
                    StepOutcome::Pending { lines: actual },
                    passed,
                )
            }
            Step::AssertCommits(expected) => {
                let stats = self.world.stats();
                (
                    "commits".to_string(),
                    StepOutcome::Commits { stats },
                    stats == *expected,
                )
            }
        };

        tracing::debug!(step = index, passed, "{description}");
        Ok(StepResult {
            index,
            description,
            outcome,
            passed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_inline_scenario() {
        let scenario = Scenario::from_json_str(
            r#"{
                "name": "inline",
                "host": "legacy",
                "blocks": { "signA": { "sign": ["A", "B", "C", "D"] } },
                "event": { "click": { "block": "signA" } },
                "steps": [
                    { "op": "set", "binding": { "line": 3 }, "value": "X",
                      "expect": { "persisted_writes": 1, "commits": 1 } },
                    { "op": "get", "binding": { "line": "all" },
                      "expect": ["A", "B", "X", "D"] },
                    { "op": "assert_commits",
                      "extended_attempts": 1, "extended": 0, "legacy": 1 }
                ]
            }"#,
        )
        .expect("scenario should parse");

        let report = scenario.run().expect("scenario should run");
        assert!(report.passed(), "{report:#?}");
        assert_eq!(
            report.steps[1].description,
            "get all lines of the event-block"
        );
    }

    #[test]
    fn failed_expectation_is_reported_not_raised() {
        let scenario = Scenario::from_json_str(
            r#"{
                "name": "wrong",
                "blocks": { "a": { "sign": ["A", "B", "C", "D"] } },
                "event": { "click": { "block": "a" } },
                "steps": [ { "op": "get", "binding": { "line": 1 }, "expect": ["Z"] } ]
            }"#,
        )
        .unwrap();

        let report = scenario.run().unwrap();
        assert!(!report.passed());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn bad_binding_stops_the_run() {
        let scenario = Scenario::from_json_str(
            r#"{
                "name": "past outside lifecycle",
                "event": { "click": { "block": "a" } },
                "steps": [ { "op": "get", "binding": { "line": 1, "timing": "past" } } ]
            }"#,
        )
        .unwrap();

        assert!(matches!(
            scenario.run(),
            Err(ScenarioError::Binding {
                step: 0,
                source: SignLineError::TimingNotApplicable { .. }
            })
        ));
    }

    #[test]
    fn unknown_scenario_fields_are_rejected() {
        let parsed = Scenario::from_json_str(r#"{ "name": "x", "steps": [], "seconds": 3 }"#);
        assert!(matches!(parsed, Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn host_defaults_to_current() {
        let scenario = Scenario::from_json_str(r#"{ "name": "x", "steps": [] }"#).unwrap();
        assert_eq!(scenario.host, HostVersion::Current);
        assert_eq!(HostVersion::default(), HostVersion::Current);
    }
}
