//! Integration tests: run the scenario vectors in tests/fixtures/.
//!
//! Each fixture is a complete scenario whose steps carry their own
//! expectations. A fixture passes when every step's expectation is met.

use signline_kernel::{
    AddressingMode, ChangeMode, CommitShim, LineIndex, LineSet, TargetSet, TextLineProperty,
    TimingHint,
};
use signline_world::{BlockId, HostVersion, MemoryWorld, Scenario, WorldEvent};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
}

fn run_fixture(name: &str) {
    let path = fixtures_dir().join(format!("{name}.json"));
    let scenario = Scenario::load(&path)
        .unwrap_or_else(|e| panic!("failed to load {}: {e}", path.display()));
    let report = scenario
        .run()
        .unwrap_or_else(|e| panic!("scenario {name} did not run: {e}"));

    let failures: Vec<_> = report.failures().collect();
    assert!(
        failures.is_empty(),
        "\n\nFixture: {name}\n\nFailed steps:\n{}\n",
        serde_json::to_string_pretty(&failures).unwrap(),
    );
}

#[test]
fn direct_all_lines_read() {
    run_fixture("direct_all_lines_read");
}

#[test]
fn direct_set_third_line() {
    run_fixture("direct_set_third_line");
}

#[test]
fn transient_write_without_commit() {
    run_fixture("transient_write_without_commit");
}

#[test]
fn deferral_routes_to_direct() {
    run_fixture("deferral_routes_to_direct");
}

#[test]
fn before_reads_persisted_state() {
    run_fixture("before_reads_persisted_state");
}

#[test]
fn legacy_host_falls_back_once() {
    run_fixture("legacy_host_falls_back_once");
}

#[test]
fn multi_target_skips_non_sign() {
    run_fixture("multi_target_skips_non_sign");
}

#[test]
fn out_of_range_is_a_noop() {
    run_fixture("out_of_range_is_a_noop");
}

#[test]
fn delete_matches_set_empty() {
    run_fixture("delete_matches_set_empty");
}

#[test]
fn transient_delete_without_commit() {
    run_fixture("transient_delete_without_commit");
}

// Round trips over every line, in both resolution modes.

fn event_block_line(line: f64, timing: TimingHint) -> TextLineProperty<WorldEvent, BlockId> {
    TextLineProperty::new(AddressingMode::fixed(line), TargetSet::event_subject())
        .with_timing(timing, true)
        .expect("sign change events take a timing")
        .with_commit_shim(CommitShim::isolated())
}

#[test]
fn set_then_get_round_trips_in_transient_mode() {
    let world = MemoryWorld::new(HostVersion::Current);
    world.place_sign("a", LineSet::filled("old"));

    for line in 1..=4u8 {
        let mut event = WorldEvent::sign_change("a", LineSet::filled("new"));
        let property = event_block_line(f64::from(line), TimingHint::present());
        let text = format!("text {line}");

        let change = property.accept_change(ChangeMode::Set).unwrap();
        let report = property.change(&world, &mut event, change, Some(&text));
        assert_eq!(report.transient_writes, 1);
        assert_eq!(property.get(&world, &event), vec![text]);
    }
    assert_eq!(world.stats().published(), 0);
    assert_eq!(
        world.sign_lines(&BlockId::new("a")),
        Some(LineSet::filled("old"))
    );
}

#[test]
fn set_then_get_round_trips_in_direct_mode() {
    let world = MemoryWorld::new(HostVersion::Current);
    world.place_sign("a", LineSet::filled("old"));

    for line in 1..=4u8 {
        let mut event = WorldEvent::sign_change("a", LineSet::filled("new"));
        event.delay();
        let property = event_block_line(f64::from(line), TimingHint::present());
        let text = format!("text {line}");

        let change = property.accept_change(ChangeMode::Set).unwrap();
        let report = property.change(&world, &mut event, change, Some(&text));
        assert_eq!(report.persisted_writes, 1);
        assert_eq!(property.get(&world, &event), vec![text.clone()]);

        let index = LineIndex::from_line_number(line as usize).unwrap();
        assert_eq!(
            world.sign_lines(&BlockId::new("a")).unwrap().get(index),
            text
        );
    }
    assert_eq!(world.stats().extended, 4);
}

#[test]
fn all_lines_write_fills_every_slot() {
    let world = MemoryWorld::new(HostVersion::Legacy);
    world.place_sign("a", LineSet::from(["A", "B", "C", "D"]));
    let mut event = WorldEvent::click("a");

    let property = TextLineProperty::new(
        AddressingMode::All,
        TargetSet::default_target("the clicked block", |event: &WorldEvent| {
            event.event_block().cloned()
        }),
    )
    .with_commit_shim(CommitShim::isolated());

    let change = property.accept_change(ChangeMode::Set).unwrap();
    property.change(&world, &mut event, change, Some("s"));

    insta::assert_debug_snapshot!(property.get(&world, &event), @r###"
    [
        "s",
        "s",
        "s",
        "s",
    ]
    "###);
}
