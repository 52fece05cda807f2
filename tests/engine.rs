//! End-to-end engine tests
//!
//! Exercises the public surface: construction, reduction, scan, caching,
//! and error cases.

use heatscan::{
    Combinable, EngineConfig, Observation, QuadrantTally, ScanEngine, ScanError,
};

fn quadrant_corners() -> Vec<Observation> {
    vec![
        Observation::new(0, -1.0, -1.0),
        Observation::new(0, 1.0, 1.0),
        Observation::new(0, -1.0, 1.0),
        Observation::new(0, 1.0, -1.0),
    ]
}

fn fold(obs: &[Observation]) -> QuadrantTally {
    obs.iter().fold(QuadrantTally::identity(), |acc, o| {
        acc.combine(&QuadrantTally::from_source(o))
    })
}

#[test]
fn reduction_of_quadrant_corners() {
    let engine = ScanEngine::<QuadrantTally>::new(quadrant_corners()).unwrap();
    let reduction = engine.reduction().unwrap();
    assert_eq!(reduction.counts(), [[1, 1], [1, 1]]);
}

#[test]
fn scan_of_quadrant_corners_accumulates_cell_by_cell() {
    let engine = ScanEngine::<QuadrantTally>::new(quadrant_corners()).unwrap();
    let prefixes = engine.scan().unwrap();

    let expected = [
        [[0, 0], [1, 0]],
        [[0, 1], [1, 0]],
        [[1, 1], [1, 0]],
        [[1, 1], [1, 1]],
    ];
    assert_eq!(prefixes.len(), 4);
    for (k, want) in expected.iter().enumerate() {
        assert_eq!(prefixes[k].counts(), *want, "prefix {k}");
    }
}

#[test]
fn single_observation_boundary() {
    let obs = vec![Observation::new(7, 0.25, -0.75)];
    let engine = ScanEngine::<QuadrantTally>::new(obs.clone()).unwrap();

    let mapped = QuadrantTally::from_source(&obs[0]);
    assert_eq!(engine.reduction().unwrap(), mapped);
    assert_eq!(engine.scan().unwrap(), vec![mapped]);
}

#[test]
fn non_power_of_two_is_rejected() {
    let obs = vec![
        Observation::new(0, 1.0, 1.0),
        Observation::new(1, 1.0, 1.0),
        Observation::new(2, 1.0, 1.0),
    ];
    match ScanEngine::<QuadrantTally>::new(obs) {
        Err(ScanError::InvalidInputSize(3)) => {}
        other => panic!("expected InvalidInputSize(3), got {other:?}"),
    }
}

#[test]
fn zero_threshold_is_rejected() {
    let config = EngineConfig::default().with_threshold(0);
    match ScanEngine::<QuadrantTally>::with_config(quadrant_corners(), config) {
        Err(ScanError::InvalidThreshold(0)) => {}
        other => panic!("expected InvalidThreshold(0), got {other:?}"),
    }
}

#[test]
fn repeated_calls_return_identical_results() {
    let engine = ScanEngine::<QuadrantTally>::new(quadrant_corners()).unwrap();

    let r1 = engine.reduction().unwrap();
    let r2 = engine.reduction().unwrap();
    assert_eq!(r1, r2);

    let s1 = engine.scan().unwrap();
    let s2 = engine.scan().unwrap();
    assert_eq!(s1, s2);
}

#[test]
fn scan_triggers_reduction_implicitly() {
    // Never call reduction() first; scan must run the pass itself
    let obs = quadrant_corners();
    let engine = ScanEngine::<QuadrantTally>::new(obs.clone()).unwrap();
    let prefixes = engine.scan().unwrap();

    assert_eq!(*prefixes.last().unwrap(), fold(&obs));
    // A reduction afterwards is served from the cache and agrees
    assert_eq!(engine.reduction().unwrap(), fold(&obs));
}

#[test]
fn larger_input_matches_sequential_fold() {
    let obs: Vec<Observation> = (0..256)
        .map(|i| {
            let x = ((i * 37) % 19) as f64 - 9.0;
            let y = ((i * 53) % 23) as f64 - 11.0;
            Observation::new(i as i64, x, y)
        })
        .collect();

    let engine = ScanEngine::<QuadrantTally>::new(obs.clone()).unwrap();
    assert_eq!(engine.reduction().unwrap(), fold(&obs));

    let prefixes = engine.scan().unwrap();
    for k in 0..obs.len() {
        assert_eq!(prefixes[k], fold(&obs[..=k]), "prefix {k}");
    }
}

#[test]
fn end_of_stream_sentinel_is_bucketed_like_any_observation() {
    // Input loaders strip the sentinel, but the engine must not choke if
    // one slips through: (0, 0) buckets into the x >= 0, y >= 0 cell.
    let obs = vec![
        Observation::new(0, -1.0, -1.0),
        Observation::end_of_stream(),
    ];
    let engine = ScanEngine::<QuadrantTally>::new(obs).unwrap();
    let reduction = engine.reduction().unwrap();
    assert_eq!(reduction.counts(), [[0, 1], [1, 0]]);
}

#[test]
fn explicit_worker_count_is_honored() {
    let config = EngineConfig::default().with_workers(2);
    let engine =
        ScanEngine::<QuadrantTally>::with_config(quadrant_corners(), config).unwrap();
    assert_eq!(engine.config().workers, Some(2));
    assert_eq!(engine.reduction().unwrap().total(), 4);
}
