//! Benchmark utilities.

use entindex_core::{Batch, CanonicalKey, Mapping, Value, DEFAULT_KEY_DELIMITER};
use rand::Rng;

/// Source systems drawn from when generating rows.
pub const SOURCES: [&str; 3] = ["erp", "ERP ", "sap"];

/// Generates a raw code, padded with zeros and spaces about half the time.
pub fn random_code(rng: &mut impl Rng, distinct: u32) -> String {
    let code = rng.gen_range(0..distinct.max(1));
    if rng.gen_bool(0.5) {
        format!(" {code:06} ")
    } else {
        code.to_string()
    }
}

/// Generates a `{zsource, customer_code, qty}` batch with roughly
/// `distinct` different customers per source.
pub fn generate_batch(rows: usize, distinct: u32) -> Batch {
    let mut rng = rand::thread_rng();
    let rows = (0..rows)
        .map(|_| {
            vec![
                Value::from(SOURCES[rng.gen_range(0..SOURCES.len())]),
                Value::from(random_code(&mut rng, distinct)),
                Value::Integer(rng.gen_range(1..100)),
            ]
        })
        .collect();
    Batch::new(["zsource", "customer_code", "qty"], rows).expect("three values per row")
}

/// Generates a stored mapping covering the first `count` ERP customers.
pub fn generate_prior(count: u32) -> Mapping {
    let pairs = (0..count).map(|code| {
        let key: CanonicalKey = format!("erp{DEFAULT_KEY_DELIMITER}{code}");
        (key, i64::from(code) + 1)
    });
    Mapping::from_pairs(pairs).expect("unique keys and indices")
}
