//! End-to-end behavior of the public generator API.

use floodair::{IterationMode, Range, RangeUpdate, Ranger, Step};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn integer_sequence_walks_to_end_then_exhausts() {
    let mut range = Range::builder(1.0).end(55.0).delta(1.0).build().unwrap();

    for n in 1..=54 {
        assert_eq!(range.next(), Step::Produced(n as f64));
    }
    assert_eq!(range.next(), Step::Produced(55.0));
    assert_eq!(range.cursor(), 0.0);
    assert_eq!(range.next(), Step::Exhausted);
    assert_eq!(range.next(), Step::Produced(1.0));
}

#[test]
fn budgeted_sequence_then_spin() {
    let mut range = Range::builder(1.0)
        .end(55.0)
        .delta(0.1)
        .iteration_budget(10)
        .build()
        .unwrap();

    for i in 0..10 {
        let v = range.next().value().unwrap();
        assert!(approx(v, 1.0 + 0.1 * i as f64), "call {i}: {v}");
    }
    assert!(range.next().is_exhausted());

    for expected in [1.0, 1.1, 1.2] {
        assert!(approx(range.spin().unwrap(), expected));
    }
}

#[test]
fn random_range_respects_bounds_across_reset() {
    let mut range = Range::builder(1.0)
        .end(55.0)
        .mode(IterationMode::Random)
        .seed(11)
        .build()
        .unwrap();
    for v in range.values() {
        assert!((1.0..=55.0).contains(&v));
    }

    range
        .reset_with(RangeUpdate {
            end: Some(256.55),
            ..Default::default()
        })
        .unwrap();
    for _ in 0..500 {
        let v = range.spin().unwrap();
        assert!((1.0..=256.55).contains(&v));
    }
}

#[test]
fn unbounded_static_never_exhausts() {
    let mut range = Range::builder(1.0)
        .mode(IterationMode::Static)
        .iteration_budget(-1)
        .build()
        .unwrap();
    for _ in 0..10_000 {
        assert_eq!(range.next(), Step::Produced(1.0));
    }
}

#[test]
fn pause_round_trips_mode() {
    let mut range = Range::builder(1.0).end(5.0).build().unwrap();
    range.pause();
    for _ in 0..3 {
        assert!(range.next().is_exhausted());
    }
    range.resume();
    assert_eq!(range.mode(), IterationMode::Sequence);
    assert_eq!(range.next(), Step::Produced(1.0));
}

#[test]
fn reset_with_delta_keeps_bounds() {
    let mut range = Range::builder(1.0).end(55.0).build().unwrap();
    range.next();
    range
        .reset_with(RangeUpdate {
            delta: Some(0.1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(range.start(), 1.0);
    assert_eq!(range.end(), 55.0);
    assert!(approx(range.cursor(), 0.9));
}

#[test]
fn mixed_descriptor_cycles() {
    let mut ranger = Ranger::builder()
        .seed(5)
        .parse("1-10_0.5,5,r:0.1-1.0")
        .unwrap();
    let total: u64 = ranger.subranges().iter().map(Range::length).sum();
    assert_eq!(ranger.length(), total);
    assert_eq!(total, 30);

    for _ in 0..4 {
        let cycle: Vec<f64> = ranger.values().collect();
        assert_eq!(cycle.len(), 30);
        assert_eq!(ranger.current_index(), 0);
        for v in cycle {
            assert!(
                (1.0..=10.0).contains(&v) || v == 5.0 || (0.1..=1.0).contains(&v),
                "{v} out of bounds"
            );
        }
    }
}

#[test]
fn malformed_descriptor_builds_nothing() {
    let err = Ranger::parse("1-10,abc").unwrap_err();
    assert!(err.to_string().contains("abc"));
}
