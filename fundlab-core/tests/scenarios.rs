//! Scenario tests for the filter → rank → allocate pipeline.
//!
//! Each test plays the role of the calling layer: it computes the total
//! investment as `min(capital, Σ min_lump_sum)` over the ranked list before
//! handing it to the allocator.

use fundlab_core::{
    allocate, allocate_traced, filter, rank, AllocationError, Catalog, EngineConfig,
    InstrumentRecord, ScoredInstrument,
};

fn total_investment(ranked: &[ScoredInstrument], capital: f64) -> f64 {
    let lump_sums: f64 = ranked.iter().map(|s| s.record.min_lump_sum).sum();
    capital.min(lump_sums)
}

fn mixed_catalog() -> Catalog {
    vec![
        InstrumentRecord::new("Bluechip Growth", 1.0, 500.0, 14.0, 4.0, Some(4.0)),
        InstrumentRecord::new("Liquid Plus", 1.0, 1000.0, 6.0, 1.0, Some(3.0)),
        InstrumentRecord::new("Small Cap Opportunities", 2.0, 100.0, 28.0, 6.0, Some(5.0)),
        InstrumentRecord::new("Gilt Long Term", 1.0, 5000.0, 7.0, 2.0, Some(2.0)),
    ]
    .into()
}

#[test]
fn scenario_a_single_record_gets_everything() {
    // GIVEN a catalog with one record
    let catalog: Catalog =
        vec![InstrumentRecord::new("X", 0.0, 100.0, 10.0, 1.0, Some(5.0))].into();
    let config = EngineConfig::default();

    // WHEN a client with tenure 5 and capital 1000 asks for an allocation
    let eligible = filter(&catalog, 5.0, 1000.0);
    assert_eq!(eligible.len(), 1);
    let ranked = rank(&eligible, &config).unwrap();
    let total = total_investment(&ranked, 1000.0);
    assert_eq!(total, 100.0);
    let trace = allocate_traced(&ranked, total, 5.0, &config).unwrap();

    // THEN each pass leaves the expected value and the record gets 100%
    assert!((trace.sized[0] - 100.0).abs() < 1e-9);
    assert!((trace.tilted[0] - 80.0).abs() < 1e-9);
    assert!((trace.floored[0] - 80.0).abs() < 1e-9);
    let allocations = trace.allocations();
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0].identifier, "X");
    assert!((allocations[0].allocation_percentage - 100.0).abs() < 1e-9);
}

#[test]
fn scenario_b_nothing_eligible_is_allocation_error() {
    // GIVEN a catalog whose minimums exceed the client's tenure and capital
    let catalog = mixed_catalog();
    let config = EngineConfig::default();

    // WHEN the client has tenure 0.5 and capital 50
    let eligible = filter(&catalog, 0.5, 50.0);
    assert!(eligible.is_empty());
    let ranked = rank(&eligible, &config).unwrap();

    // THEN the allocator reports that there is nothing to allocate
    let err = allocate(&ranked, total_investment(&ranked, 50.0), 0.5, &config).unwrap_err();
    assert_eq!(err, AllocationError::EmptyRankedList);
    assert!(err.is_empty_selection());
}

#[test]
fn scenario_c_all_zero_ratings_is_allocation_error() {
    // GIVEN eligible records that all carry rating 0
    let catalog: Catalog = vec![
        InstrumentRecord::new("A", 0.0, 100.0, 10.0, 1.0, Some(0.0)),
        InstrumentRecord::new("B", 0.0, 200.0, 12.0, 2.0, Some(0.0)),
    ]
    .into();
    let config = EngineConfig::default();

    // WHEN we allocate
    let ranked = rank(&filter(&catalog, 5.0, 1000.0), &config).unwrap();
    let err = allocate(&ranked, total_investment(&ranked, 1000.0), 5.0, &config).unwrap_err();

    // THEN reweighting by rating is undefined
    assert_eq!(err, AllocationError::ZeroRatingWeight);
    assert!(!err.is_empty_selection());
}

#[test]
fn scenario_d_short_and_long_horizons_tilt_once() {
    // GIVEN one catalog, every record eligible for both tenures
    let catalog = mixed_catalog();
    let config = EngineConfig::default();

    let trace_for = |tenure: f64| {
        let ranked = rank(&filter(&catalog, tenure, 10_000.0), &config).unwrap();
        allocate_traced(&ranked, total_investment(&ranked, 10_000.0), tenure, &config).unwrap()
    };

    // WHEN we allocate for tenure 2 and tenure 20
    let short = trace_for(2.0);
    let long = trace_for(20.0);

    // THEN the short horizon is tilted by 0.6 and the long one by 0.9, once
    assert_eq!(short.tilt_factor, 0.6);
    assert_eq!(long.tilt_factor, 0.9);
    assert_eq!(short.sized, long.sized);
    for ((sized, s), l) in short.sized.iter().zip(&short.tilted).zip(&long.tilted) {
        assert!((sized * 0.6 - s).abs() < 1e-9);
        assert!((sized * 0.9 - l).abs() < 1e-9);
    }
    let short_total: f64 = short.tilted.iter().sum();
    let long_total: f64 = long.tilted.iter().sum();
    assert!((short_total - 60.0).abs() < 1e-9);
    assert!((long_total - 90.0).abs() < 1e-9);
}

#[test]
fn scenario_d_bracket_boundaries() {
    // GIVEN a single eligible record
    let catalog: Catalog =
        vec![InstrumentRecord::new("X", 0.0, 100.0, 10.0, 1.0, Some(5.0))].into();
    let config = EngineConfig::default();
    let ranked = rank(&filter(&catalog, 1.0, 1000.0), &config).unwrap();

    // THEN 3 and 10 belong to the lower bracket, just above them to the next
    for (tenure, factor) in [(3.0, 0.6), (3.0001, 0.8), (10.0, 0.8), (10.0001, 0.9)] {
        let trace = allocate_traced(&ranked, 100.0, tenure, &config).unwrap();
        assert_eq!(trace.tilt_factor, factor, "tenure {tenure}");
        assert!((trace.tilted[0] - 100.0 * factor).abs() < 1e-9);
    }
}

#[test]
fn small_positions_are_floored_before_reweighting() {
    // GIVEN one large and many tiny lump-sum minimums
    let mut records = vec![InstrumentRecord::new("Anchor", 0.0, 10_000.0, 12.0, 2.0, Some(2.0))];
    for i in 0..5 {
        records.push(InstrumentRecord::new(format!("Tiny {i}"), 0.0, 10.0, 8.0, 2.0, Some(4.0)));
    }
    let catalog: Catalog = records.into();
    let config = EngineConfig::default();

    // WHEN we allocate over a short horizon
    let ranked = rank(&filter(&catalog, 2.0, 1e6), &config).unwrap();
    let trace = allocate_traced(&ranked, total_investment(&ranked, 1e6), 2.0, &config).unwrap();

    // THEN tiny positions sit exactly on the floor after pass 3
    let floored_count = trace.floored.iter().filter(|p| **p == 1.0).count();
    assert_eq!(floored_count, 5);
    let floored_total: f64 = trace.floored.iter().sum();
    assert!(floored_total > 60.0 - 1e-9 && floored_total < 66.0);

    // AND the final weights follow ratings and sum to 100
    let total: f64 = trace.reweighted.iter().sum();
    assert!((total - 100.0).abs() < 1e-9);
    let anchor = trace.identifiers.iter().position(|id| id == "Anchor").unwrap();
    assert!((trace.reweighted[anchor] - 100.0 * 2.0 / 22.0).abs() < 1e-9);
}

#[test]
fn pipeline_never_mutates_the_catalog() {
    let catalog = mixed_catalog();
    let snapshot = catalog.clone();
    let config = EngineConfig::default();

    let ranked = rank(&filter(&catalog, 5.0, 10_000.0), &config).unwrap();
    let _ = allocate(&ranked, total_investment(&ranked, 10_000.0), 5.0, &config).unwrap();

    assert_eq!(catalog, snapshot);
    assert_eq!(catalog.fingerprint(), snapshot.fingerprint());
}
