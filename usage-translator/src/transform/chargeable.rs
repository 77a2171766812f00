//! Report records to `chargeable` table rows.

use serde::Serialize;

use crate::events::EventSink;
use crate::models::{ChargeableRecord, InputRecord};
use crate::reference::ReferenceData;
use crate::sanitize::{all_safe, strip_non_alphanumeric};

use super::rules::{apply_unit_reduction, map_product_code};

/// Why records were left out of the chargeable table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeableDrops {
    pub missing_part_number: usize,
    pub negative_item_count: usize,
    pub excluded_partner: usize,
    pub unsafe_characters: usize,
}

impl ChargeableDrops {
    pub fn total(&self) -> usize {
        self.missing_part_number
            + self.negative_item_count
            + self.excluded_partner
            + self.unsafe_characters
    }
}

/// Result of [`build_chargeable`].
#[derive(Debug, Clone, Default)]
pub struct ChargeableOutcome {
    /// Emitted rows, in input order.
    pub records: Vec<ChargeableRecord>,
    pub drops: ChargeableDrops,
    /// Emitted rows whose part number had no product code.
    pub unmapped_products: usize,
}

/// Build `chargeable` rows from report records.
///
/// A record is dropped when its part number is missing, its item count is
/// negative, its partner is excluded, or its product, plan id or plan holds
/// unsafe characters. Excluded partners are dropped without an event; every
/// other drop is reported through `sink`.
pub fn build_chargeable(
    records: &[InputRecord],
    reference: &ReferenceData,
    sink: &dyn EventSink,
) -> ChargeableOutcome {
    let mut outcome = ChargeableOutcome::default();

    for record in records {
        let Some(part_number) = record.part_number.as_deref() else {
            sink.record_error(&format!("missing part number: {}", record.describe()));
            outcome.drops.missing_part_number += 1;
            continue;
        };

        // Zero is a valid count; only negative counts are rejected.
        if record.item_count < 0 {
            sink.record_error(&format!(
                "negative item count {}: {}",
                record.item_count,
                record.describe()
            ));
            outcome.drops.negative_item_count += 1;
            continue;
        }

        if reference.is_excluded(record.partner_id) {
            outcome.drops.excluded_partner += 1;
            continue;
        }

        let product = map_product_code(part_number, &reference.type_map);
        let plan_id = strip_non_alphanumeric(&record.account_guid);
        let usage = apply_unit_reduction(part_number, record.item_count, &reference.unit_reductions);

        if !all_safe([product, Some(plan_id.as_str()), Some(record.plan.as_str())]) {
            sink.record_error(&format!(
                "unsafe characters in product, plan id or plan: {}",
                record.describe()
            ));
            outcome.drops.unsafe_characters += 1;
            continue;
        }

        let product = match product {
            Some(product) => product.to_string(),
            None => {
                tracing::debug!(
                    part_number,
                    line = record.line,
                    "part number has no product code"
                );
                outcome.unmapped_products += 1;
                String::new()
            }
        };

        sink.record_success(&product, record.item_count);
        outcome.records.push(ChargeableRecord {
            partner_id: record.partner_id,
            product,
            partner_purchase_plan_id: plan_id,
            plan: record.plan.clone(),
            usage,
        });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;
    use crate::events::MemorySink;
    use crate::models::fixtures::record;
    use std::collections::HashMap;

    fn reference() -> ReferenceData {
        let type_map = HashMap::from([("EA000001GB0O".to_string(), "core.storage".to_string())]);
        ReferenceData::new(type_map, &TranslatorConfig::default())
    }

    #[test]
    fn test_end_to_end_record() {
        let sink = MemorySink::new();
        let outcome = build_chargeable(&[record()], &reference(), &sink);

        assert_eq!(
            outcome.records,
            vec![ChargeableRecord {
                partner_id: 1,
                product: "core.storage".into(),
                partner_purchase_plan_id: "ABC123".into(),
                plan: "Gold".into(),
                usage: 2,
            }]
        );
        assert_eq!(sink.success_count(), 1);
        assert!(sink.errors().is_empty());
    }

    #[test]
    fn test_success_event_reports_raw_count() {
        let sink = MemorySink::new();
        build_chargeable(&[record()], &reference(), &sink);
        assert_eq!(
            sink.events(),
            vec![crate::events::PipelineEvent::Success {
                product: "core.storage".into(),
                item_count: 2500,
            }]
        );
    }

    #[test]
    fn test_missing_part_number_dropped_with_event() {
        let sink = MemorySink::new();
        let input = InputRecord {
            part_number: None,
            ..record()
        };
        let outcome = build_chargeable(&[input], &reference(), &sink);

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.drops.missing_part_number, 1);
        assert_eq!(sink.errors().len(), 1);
        assert!(sink.errors()[0].contains("missing part number"));
    }

    #[test]
    fn test_negative_count_dropped_zero_kept() {
        let sink = MemorySink::new();
        let negative = InputRecord {
            item_count: -1,
            ..record()
        };
        let zero = InputRecord {
            item_count: 0,
            line: 3,
            ..record()
        };
        let outcome = build_chargeable(&[negative, zero], &reference(), &sink);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].usage, 0);
        assert_eq!(outcome.drops.negative_item_count, 1);
        assert!(sink.errors()[0].contains("negative item count -1"));
    }

    #[test]
    fn test_excluded_partner_dropped_silently() {
        let sink = MemorySink::new();
        let excluded = InputRecord {
            partner_id: 26392,
            ..record()
        };
        let excluded_and_unsafe = InputRecord {
            partner_id: 26392,
            plan: "O'Brien".into(),
            ..record()
        };
        let outcome = build_chargeable(&[excluded, excluded_and_unsafe], &reference(), &sink);

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.drops.excluded_partner, 2);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_unsafe_plan_dropped() {
        let sink = MemorySink::new();
        let input = InputRecord {
            plan: "O'Brien".into(),
            ..record()
        };
        let outcome = build_chargeable(&[input], &reference(), &sink);

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.drops.unsafe_characters, 1);
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn test_unsafe_product_dropped() {
        let type_map = HashMap::from([("EA000001GB0O".to_string(), "a;b".to_string())]);
        let reference = ReferenceData::new(type_map, &TranslatorConfig::default());
        let outcome = build_chargeable(&[record()], &reference, &MemorySink::new());
        assert_eq!(outcome.drops.unsafe_characters, 1);
    }

    #[test]
    fn test_unmapped_product_kept_empty() {
        let sink = MemorySink::new();
        let input = InputRecord {
            part_number: Some("UNKNOWN".into()),
            item_count: 7,
            ..record()
        };
        let outcome = build_chargeable(&[input], &reference(), &sink);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].product, "");
        assert_eq!(outcome.records[0].usage, 7);
        assert_eq!(outcome.unmapped_products, 1);
    }

    #[test]
    fn test_output_keeps_input_order() {
        let rows: Vec<InputRecord> = (1..=3)
            .map(|i| InputRecord {
                partner_id: i,
                item_count: if i == 2 { -5 } else { 1000 * i },
                ..record()
            })
            .collect();
        let outcome = build_chargeable(&rows, &reference(), &MemorySink::new());

        let partners: Vec<i64> = outcome.records.iter().map(|r| r.partner_id).collect();
        assert_eq!(partners, vec![1, 3]);
        assert_eq!(outcome.drops.total(), 1);
    }
}
