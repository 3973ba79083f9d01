//! Deterministic synthetic catalogs for demos and benchmarks.
//!
//! Values are drawn from ranges typical of an Indian mutual fund listing.
//! The same `(size, seed)` pair always yields the same catalog.

use fundlab_core::{Catalog, FundDetails, InstrumentRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Prefix on every synthetic identifier, so they are never mistaken for real schemes.
pub const SYNTHETIC_PREFIX: &str = "SYNTH-";

const CATEGORIES: [(&str, &str); 6] = [
    ("Equity", "Large Cap Mutual Funds"),
    ("Equity", "Small Cap Mutual Funds"),
    ("Equity", "ELSS Mutual Funds"),
    ("Debt", "Liquid Mutual Funds"),
    ("Debt", "Gilt Mutual Funds"),
    ("Hybrid", "Balanced Hybrid Mutual Funds"),
];

/// Build a catalog of `size` synthetic records.
pub fn synthetic_catalog(size: usize, seed: &str) -> Catalog {
    let seed_bytes = blake3::hash(seed.as_bytes());
    let mut rng = StdRng::from_seed(*seed_bytes.as_bytes());

    (0..size)
        .map(|i| {
            let (category, sub_category) = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            let risk_level = f64::from(rng.gen_range(1u32..=6));
            // Riskier funds get a wider, higher return band.
            let returns_5yr = rng.gen_range(-2.0..6.0_f64) * risk_level;
            let rating = if rng.gen_bool(0.9) {
                Some(f64::from(rng.gen_range(0u32..=5)))
            } else {
                None
            };

            let details = FundDetails {
                amc_name: Some(format!("Synthetic AMC {}", i % 12)),
                category: Some(category.to_string()),
                sub_category: Some(sub_category.to_string()),
                expense_ratio: Some((rng.gen_range(0.1..2.5_f64) * 100.0).round() / 100.0),
                fund_size_cr: Some(rng.gen_range(10.0..50_000.0_f64).round()),
                fund_age_yr: Some(f64::from(rng.gen_range(1u32..=25))),
                ..FundDetails::default()
            };

            InstrumentRecord::new(
                format!("{SYNTHETIC_PREFIX}{i:05}"),
                [0.0, 1.0, 5.0, 100.0, 500.0][rng.gen_range(0..5)],
                [100.0, 500.0, 1000.0, 5000.0][rng.gen_range(0..4)],
                returns_5yr,
                risk_level,
                rating,
            )
            .with_details(details)
        })
        .collect()
}
