mod common;

use common::{rgb, RecordingSink, BLACK, RED};
use cx_core::utils::zones::{
    even_partition, validate_topology, PatternZone, RunZone, TopologyError, ZoneDefinition,
};

const BLINK: u8 = 2;
const SET_ALL: u8 = 1;
const CHASE: u8 = 7;

fn red() -> smart_leds_trait::RGB8 {
    rgb(0xFF, 0, 0)
}

#[test]
fn test_even_partition_leaves_remainder_uncovered() {
    let zones = even_partition(42, 4);
    assert_eq!(
        zones.as_slice(),
        &[
            ZoneDefinition::new(0, 10),
            ZoneDefinition::new(10, 10),
            ZoneDefinition::new(20, 10),
            ZoneDefinition::new(30, 10)
        ]
    );
    assert_eq!(even_partition(42, 0).as_slice(), &[ZoneDefinition::new(0, 42)]);
    assert_eq!(even_partition(100, 50).len(), 10);
}

#[test]
fn test_topology_validation() {
    let good = [
        ZoneDefinition::new(0, 17),
        ZoneDefinition::new(17, 32),
        ZoneDefinition::new(49, 17),
    ];
    assert_eq!(validate_topology(&good, 66), Ok(()));
    assert_eq!(
        validate_topology(&good, 60),
        Err(TopologyError::OutOfBounds {
            index: 2,
            end: 66,
            len: 60
        })
    );

    let overlapping = [
        ZoneDefinition::new(0, 10),
        ZoneDefinition::new(20, 5),
        ZoneDefinition::new(9, 2),
    ];
    assert_eq!(
        validate_topology(&overlapping, 30),
        Err(TopologyError::Overlap {
            first: 0,
            second: 2
        })
    );

    // gaps and empty zones are fine
    let sparse = [ZoneDefinition::new(5, 0), ZoneDefinition::new(10, 5)];
    assert_eq!(validate_topology(&sparse, 30), Ok(()));
}

#[test]
fn test_generated_zones_never_exceed_or_overlap() {
    for led_count in [0u16, 1, 7, 42, 64, 300] {
        for zone_count in 0..=12 {
            let zones = even_partition(led_count, zone_count);
            assert_eq!(validate_topology(&zones, led_count), Ok(()));
        }
    }
}

#[test]
fn test_blink_cycles_through_its_states() {
    let mut sink = RecordingSink::new(10, 0);
    let mut zones = PatternZone::new(0, 255, 10, 1);
    let run = zones.run_zone_mut(0).unwrap();
    run.pattern_id = BLINK;
    run.delay = 400;
    run.color = RED;

    assert_eq!(zones.update_zones(false, 0, &mut sink), 1);
    assert!(sink.port(0).iter().all(|&p| p == red()));

    assert_eq!(zones.update_zones(false, 399, &mut sink), 0);
    assert!(sink.port(0).iter().all(|&p| p == red()));

    assert_eq!(zones.update_zones(false, 400, &mut sink), 1);
    assert!(sink.port(0).iter().all(|&p| p == BLACK));

    assert_eq!(zones.update_zones(false, 800, &mut sink), 1);
    assert!(sink.port(0).iter().all(|&p| p == red()));
    assert_eq!(zones.run_zone(0).unwrap().state, 1);
    assert_eq!(sink.flushes[0], 3);
}

#[test]
fn test_set_pattern_renders_immediately() {
    let mut sink = RecordingSink::new(6, 0);
    let mut zones = PatternZone::new(0, 255, 6, 2);

    assert!(zones.set_color(RED, 0, &mut sink));
    // the default pattern renders nothing worth showing
    assert_eq!(sink.flushes[0], 0);

    assert!(zones.set_pattern(SET_ALL, 500, false, 10, &mut sink));
    assert_eq!(sink.flushes[0], 1);
    assert_eq!(&sink.port(0)[..3], &[red(); 3]);
    assert_eq!(&sink.port(0)[3..], &[BLACK; 3]);

    let run = zones.run_zone(0).unwrap();
    assert_eq!(run.pattern_id, SET_ALL);
    assert_eq!(run.delay, 500);
    assert_eq!(run.state, 1);
    assert_eq!(run.last_update_ms, Some(10));
    assert_eq!(zones.current_color(), RED);
}

#[test]
fn test_unknown_patterns_are_rejected() {
    let mut sink = RecordingSink::new(6, 0);
    let mut zones = PatternZone::new(0, 255, 6, 1);
    for id in [8, 12, 200] {
        assert!(!zones.set_pattern(id, 100, false, 0, &mut sink));
    }
    assert_eq!(zones.run_zone(0), Some(&RunZone::default()));
    assert_eq!(sink.flushes[0], 0);
}

#[test]
fn test_one_shot_stops_at_the_ceiling() {
    let mut sink = RecordingSink::new(4, 0);
    let mut zones = PatternZone::new(0, 255, 4, 1);
    zones.set_color(RED, 0, &mut sink);
    assert!(zones.set_pattern(BLINK, 100, true, 0, &mut sink));
    assert!(sink.port(0).iter().all(|&p| p == red()));

    assert!(zones.update_zone(0, false, 100, &mut sink));
    assert!(sink.port(0).iter().all(|&p| p == BLACK));
    assert!(!zones.pattern_done());

    assert!(!zones.update_zone(0, false, 200, &mut sink));
    assert!(zones.pattern_done());

    let flushes = sink.flushes[0];
    for now in [300, 1_000, 100_000] {
        assert!(!zones.update_zone(0, false, now, &mut sink));
    }
    assert_eq!(sink.flushes[0], flushes);
    assert!(sink.port(0).iter().all(|&p| p == BLACK));

    // a color change restarts the pattern
    assert!(zones.set_color(RED, 100_001, &mut sink));
    assert!(!zones.pattern_done());
    assert!(sink.port(0).iter().all(|&p| p == red()));
}

#[test]
fn test_chase_runs_past_the_zone_length() {
    let mut sink = RecordingSink::new(3, 0);
    let mut zones = PatternZone::new(0, 255, 3, 1);
    zones.set_color(RED, 0, &mut sink);
    assert!(zones.set_pattern(CHASE, 10, false, 0, &mut sink));

    // states 1..=7 of the 8-state ceiling (5 chase states + 3 pixels)
    for tick in 1..=7u32 {
        assert!(zones.update_zone(0, false, tick * 10, &mut sink));
    }
    assert_eq!(zones.run_zone(0).unwrap().state, 8);
    // state 7 lights pixels 2..7, of which only pixel 2 exists
    assert_eq!(sink.port(0), &[BLACK, BLACK, red()]);

    // the ceiling loops back to state 0, which lights nothing
    assert!(zones.update_zone(0, false, 80, &mut sink));
    assert_eq!(zones.run_zone(0).unwrap().state, 1);
    assert_eq!(sink.port(0), &[BLACK; 3]);
}

#[test]
fn test_ticks_closer_than_delay_do_not_advance() {
    let mut sink = RecordingSink::new(4, 0);
    let mut zones = PatternZone::new(0, 255, 4, 1);
    zones.set_pattern(BLINK, 50, false, 0, &mut sink);

    for now in [1, 10, 49] {
        assert!(!zones.update_zone(0, false, now, &mut sink));
        assert_eq!(zones.run_zone(0).unwrap().state, 1);
    }

    let states: Vec<u16> = (1..=6)
        .map(|i| {
            zones.update_zone(0, false, i * 50, &mut sink);
            zones.run_zone(0).unwrap().state
        })
        .collect();
    assert_eq!(states, [2, 1, 2, 1, 2, 1]);
}

#[test]
fn test_delay_survives_clock_wrap() {
    let run = RunZone {
        delay: 400,
        last_update_ms: Some(u32::MAX - 100),
        ..RunZone::default()
    };
    assert!(!run.should_update(250));
    assert!(run.should_update(300));
    assert!(RunZone::default().should_update(0));
}

#[test]
fn test_reversed_zone_lands_one_past_its_range() {
    let mut sink = RecordingSink::new(8, 0);
    let mut zones = PatternZone::from_definitions(
        0,
        255,
        &[ZoneDefinition::new(0, 4), ZoneDefinition::new(4, 4)],
    );

    assert!(zones.set_run_zone(1, true));
    zones.set_color(RED, 0, &mut sink);
    zones.set_pattern(SET_ALL, 500, false, 0, &mut sink);

    // pixel p of the zone goes to offset + (count - p): 8, 7, 6, 5
    assert_eq!(sink.port(0), &[BLACK, BLACK, BLACK, BLACK, BLACK, red(), red(), red()]);
    assert_eq!(sink.dropped, 2);
}

#[test]
fn test_reversed_zone_spills_into_its_neighbour() {
    let mut sink = RecordingSink::new(8, 0);
    let mut zones = PatternZone::from_definitions(
        0,
        255,
        &[ZoneDefinition::new(0, 4), ZoneDefinition::new(4, 4)],
    );

    assert!(zones.set_run_zone(0, true));
    zones.set_color(RED, 0, &mut sink);
    zones.set_pattern(SET_ALL, 500, false, 0, &mut sink);

    assert_eq!(sink.port(0), &[BLACK, red(), red(), red(), red(), BLACK, BLACK, BLACK]);
    assert_eq!(sink.dropped, 0);
}

#[test]
fn test_run_zone_selection() {
    let mut zones = PatternZone::new(0, 255, 30, 3);
    assert!(!zones.set_run_zone(3, false));
    assert_eq!(zones.current_zone(), 0);
    assert!(zones.set_run_zone(2, true));
    assert_eq!(zones.current_zone(), 2);
    assert!(zones.run_zone(2).unwrap().reversed);
}

#[test]
fn test_new_zones_replace_run_state() {
    let mut sink = RecordingSink::new(66, 0);
    let mut zones = PatternZone::new(0, 255, 66, 1);
    zones.set_color(RED, 0, &mut sink);
    zones.set_pattern(BLINK, 400, true, 0, &mut sink);

    zones.set_zones(&[
        ZoneDefinition::new(0, 17),
        ZoneDefinition::new(17, 32),
        ZoneDefinition::new(49, 17),
    ]);
    assert_eq!(zones.zones().len(), 3);
    assert_eq!(zones.run_zones(), &[RunZone::default(); 3]);
    assert_eq!(zones.current_zone(), 0);
    assert_eq!(zones.zones()[2], ZoneDefinition::new(49, 17));
}

#[test]
fn test_sync_resets_listed_zones_only() {
    let mut sink = RecordingSink::new(30, 0);
    let mut zones = PatternZone::new(0, 255, 30, 3);
    for index in 0..3 {
        zones.set_run_zone(index, false);
        zones.set_pattern(BLINK, 100, false, 0, &mut sink);
    }

    assert_eq!(zones.reset_zones(&[0, 2, 9]), 2);
    assert_eq!(zones.run_zone(0).unwrap().state, 0);
    assert_eq!(zones.run_zone(0).unwrap().last_update_ms, None);
    assert_eq!(zones.run_zone(1).unwrap().state, 1);
    assert_eq!(zones.run_zone(2).unwrap().state, 0);

    zones.reset_all();
    assert!(zones.run_zones().iter().all(|run| run.state == 0));
}
