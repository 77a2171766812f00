//! Field rules: pure functions from report fields to output fields.

use std::collections::{BTreeMap, HashMap};

/// Look up the product code for a part number.
///
/// An unmapped part number yields `None`, not an error. Callers render it as
/// an empty product and keep the record.
pub fn map_product_code<'a>(
    part_number: &str,
    type_map: &'a HashMap<String, String>,
) -> Option<&'a str> {
    type_map.get(part_number).map(String::as_str)
}

/// Convert a raw item count into billed usage units.
///
/// With a configured factor the result is `item_count / factor`, truncated
/// toward zero, so a factor larger than the count gives 0. Without one the
/// count passes through unchanged. Factors are never zero (checked when the
/// configuration is loaded); a zero factor here also passes the count through.
pub fn apply_unit_reduction(
    part_number: &str,
    item_count: i64,
    reductions: &BTreeMap<String, u32>,
) -> i64 {
    match reductions.get(part_number) {
        Some(&factor) if factor > 0 => item_count / i64::from(factor),
        _ => item_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reductions() -> BTreeMap<String, u32> {
        BTreeMap::from([
            ("EA000001GB0O".to_string(), 1000),
            ("PMQ00005GB0R".to_string(), 5000),
        ])
    }

    #[test]
    fn test_mapped_product() {
        let map = HashMap::from([("SSX006NR".to_string(), "backup".to_string())]);
        assert_eq!(map_product_code("SSX006NR", &map), Some("backup"));
    }

    #[test]
    fn test_unmapped_product_is_none() {
        let map = HashMap::new();
        assert_eq!(map_product_code("SSX006NR", &map), None);
    }

    #[test]
    fn test_unmapped_part_passes_count_through() {
        assert_eq!(apply_unit_reduction("OTHER", 2500, &reductions()), 2500);
        assert_eq!(apply_unit_reduction("OTHER", 0, &reductions()), 0);
    }

    #[test]
    fn test_reduction_truncates() {
        assert_eq!(apply_unit_reduction("EA000001GB0O", 2500, &reductions()), 2);
        assert_eq!(apply_unit_reduction("EA000001GB0O", 2999, &reductions()), 2);
        assert_eq!(apply_unit_reduction("EA000001GB0O", 3000, &reductions()), 3);
    }

    #[test]
    fn test_factor_larger_than_count_gives_zero() {
        assert_eq!(apply_unit_reduction("PMQ00005GB0R", 4999, &reductions()), 0);
    }

    #[test]
    fn test_reduction_is_floor_for_non_negative_counts() {
        for n in [0_i64, 1, 999, 1000, 1001, 123_456] {
            assert_eq!(apply_unit_reduction("EA000001GB0O", n, &reductions()), n / 1000);
        }
    }
}
