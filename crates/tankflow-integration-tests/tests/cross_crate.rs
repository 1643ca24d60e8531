//! Cross-crate tests: scenario text through the data crate, into the engine,
//! stepped, snapshotted, and reported.

use tankflow_core::engine::Engine;
use tankflow_core::event::TankEvent;
use tankflow_core::report::OverflowTimes;
use tankflow_core::test_utils::*;
use tankflow_data::Format;
use tankflow_data::scenario::parse_scenario;

fn run_text(content: &str, format: Format) -> OverflowTimes {
    parse_scenario(content, format)
        .unwrap()
        .engine()
        .unwrap()
        .run()
        .unwrap()
        .overflow_times()
}

#[test]
fn classic_examples() {
    assert_eq!(run_text("3 1\n2\n4\n8\n", Format::Plain).to_string(), "4 4");
    assert_eq!(run_text("1 3\n10\n", Format::Plain).to_string(), "3 3");
    assert_eq!(run_text("1 2\n10\n", Format::Plain).to_string(), "5 5");
}

#[test]
fn plain_and_structured_agree_on_larger_input() {
    let caps: Vec<u32> = (0..200).map(|i| (i * 37) % 101 + 1).collect();
    let mut plain = format!("{} 2\n", caps.len());
    for c in &caps {
        plain.push_str(&format!("{c}\n"));
    }
    let mut toml = String::from("flow_rate = 2.0\n");
    for c in &caps {
        toml.push_str(&format!("[[tanks]]\ncapacity = {c}.0\n"));
    }
    assert_eq!(run_text(&plain, Format::Plain), run_text(&toml, Format::Toml));
}

#[test]
fn step_by_step_follows_the_event_log() {
    let scenario = parse_scenario("4 1\n3\n1\n6\n2\n", Format::Plain).unwrap();
    let mut engine = scenario.engine().unwrap();

    // t=1: tank 1 fills, its flow goes to tank 2.
    let first = engine.step().unwrap().unwrap();
    assert_eq!(first.filled, vec![1]);
    assert_eq!(active_ordinals(&engine), vec![0, 2, 3]);
    assert_eq!(flow_rates(&engine), vec![1.0, 2.0, 1.0]);

    // t=2: tank 3 fills first. It is last in order, so the last overflow
    // time is set and its flow is discarded.
    let second = engine.step().unwrap().unwrap();
    assert_eq!(second.filled, vec![3]);
    assert_eq!(engine.last_overflow_time(), Some(2.0));
    assert!(second.events.iter().any(|e| matches!(
        e,
        TankEvent::FlowDiscarded { flow, .. } if *flow == 1.0
    )));
    assert_eq!(flow_rates(&engine), vec![1.0, 2.0]);

    // t=3: tank 0 fills and feeds tank 2, which has 6 - 1 - 2*2 = 1 left.
    let third = engine.step().unwrap().unwrap();
    assert_eq!(third.filled, vec![0]);
    assert_eq!(flow_rates(&engine), vec![3.0]);

    let report = engine.run().unwrap();
    assert_approx(report.all_overflow_time, 3.0 + 1.0 / 3.0);
    assert_eq!(report.overflow_times(), OverflowTimes { last: 2, all: 3 });
}

#[test]
fn snapshot_survives_round_trip_between_steps() {
    let scenario = parse_scenario("5 1\n5\n4\n3\n2\n1\n", Format::Plain).unwrap();
    let mut engine = scenario.engine().unwrap();
    engine.step().unwrap();
    engine.step().unwrap();

    let bytes = engine.serialize().unwrap();
    let mut restored = Engine::deserialize(&bytes).unwrap();
    assert_eq!(active_ordinals(&restored), active_ordinals(&engine));
    assert_eq!(flow_rates(&restored), flow_rates(&engine));
    assert_eq!(restored.run().unwrap(), engine.run().unwrap());
}
