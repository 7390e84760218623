//! Fixture batches and mappings.

use entindex_core::{Batch, CanonicalKey, Value, DEFAULT_KEY_DELIMITER};

/// Joins key components with the default delimiter.
pub fn key(parts: &[&str]) -> CanonicalKey {
    parts.join(&DEFAULT_KEY_DELIMITER.to_string())
}

/// Two ERP customers, `0007` and `12`.
pub fn orders_batch() -> Batch {
    Batch::new(
        ["zsource", "customer_code"],
        vec![
            vec!["erp".into(), "0007".into()],
            vec!["erp".into(), "12".into()],
        ],
    )
    .expect("valid fixture")
}

/// Stored customer mapping holding only `erp|7 -> 5`.
pub fn customer_prior() -> Batch {
    Batch::new(
        ["customer", "customer_index"],
        vec![vec![Value::from(key(&["erp", "7"])), Value::Integer(5)]],
    )
    .expect("valid fixture")
}

/// Sales lines referencing customers, plants and materials, with messy
/// codes and a null plant.
pub fn sales_batch() -> Batch {
    Batch::new(
        [
            "zsource",
            "customer_code",
            "plant_code",
            "material_code",
            "qty",
        ],
        vec![
            vec![
                "erp".into(),
                "0007".into(),
                "P01".into(),
                "M-1".into(),
                Value::Integer(10),
            ],
            vec![
                "ERP ".into(),
                "7".into(),
                " p01".into(),
                "m-2".into(),
                Value::Integer(4),
            ],
            vec![
                "erp".into(),
                "12".into(),
                Value::Null,
                "M-1".into(),
                Value::Integer(1),
            ],
            vec![
                "sap".into(),
                "000".into(),
                "P02".into(),
                "M-3".into(),
                Value::Integer(8),
            ],
        ],
    )
    .expect("valid fixture")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_consistent() {
        assert_eq!(orders_batch().num_rows(), 2);
        assert_eq!(customer_prior().columns(), ["customer", "customer_index"]);
        assert_eq!(sales_batch().num_columns(), 5);
        assert_eq!(key(&["a", "b"]), "a\u{1F}b");
    }
}
