//! Synthetic placeholder dataset.
//!
//! Used only when the real source cannot be loaded and the fallback policy
//! is active. The data is NOT meant to be realistic: brands and regions
//! rotate in lockstep and coordinates are uniform over the continental US.

use crate::models::{Dataset, Record};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SYNTHETIC_BRANDS: [&str; 5] = ["McDonald's", "Burger King", "Taco Bell", "KFC", "Pizza Hut"];
pub const SYNTHETIC_REGIONS: [&str; 5] = ["CA", "TX", "FL", "NY", "OH"];
pub const SYNTHETIC_ADDRESS: &str = "Sample Address";

/// Generates `rows` placeholder records. The same seed yields the same data.
pub fn synthetic_dataset(rows: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..rows)
        .map(|i| Record {
            name: Some(SYNTHETIC_BRANDS[i % SYNTHETIC_BRANDS.len()].to_string()),
            province: Some(SYNTHETIC_REGIONS[i % SYNTHETIC_REGIONS.len()].to_string()),
            latitude: Some(rng.gen_range(25.0..49.0)),
            longitude: Some(rng.gen_range(-125.0..-65.0)),
            address: Some(SYNTHETIC_ADDRESS.to_string()),
        })
        .collect()
}
