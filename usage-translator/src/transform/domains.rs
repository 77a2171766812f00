//! Report records to `domains` table rows, one per distinct domain.

use std::collections::HashSet;

use crate::models::{DomainRecord, InputRecord};
use crate::sanitize::{all_safe, strip_non_alphanumeric};

/// Remembers which domain values a run has already handled.
///
/// Comparison is exact (case-sensitive, no trimming). A domain counts as seen
/// from its first occurrence on, whether or not that occurrence produced a row.
#[derive(Debug, Default)]
pub struct DomainDeduplicator {
    seen: HashSet<String>,
}

impl DomainDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `domain` as seen; returns `false` if it already was.
    pub fn first_sighting(&mut self, domain: &str) -> bool {
        if self.seen.contains(domain) {
            return false;
        }
        self.seen.insert(domain.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Result of [`build_domains`].
#[derive(Debug, Clone, Default)]
pub struct DomainsOutcome {
    /// Emitted rows, in order of first appearance.
    pub records: Vec<DomainRecord>,
    pub duplicates_skipped: usize,
    pub unsafe_dropped: usize,
}

/// Build `domains` rows from report records.
///
/// The first record carrying a domain decides its plan id. The plan id,
/// the domain and the plan name must all be free of unsafe characters, so a
/// record rejected from the chargeable table for its plan name does not leak
/// into this one. A dropped record still claims its domain, so when the first
/// record for a domain is unsafe every later record for that domain is
/// skipped as a duplicate and the domain is absent from the output. Drops
/// here are silent.
pub fn build_domains(records: &[InputRecord]) -> DomainsOutcome {
    let mut dedup = DomainDeduplicator::new();
    let mut outcome = DomainsOutcome::default();

    for record in records {
        if !dedup.first_sighting(&record.domains) {
            outcome.duplicates_skipped += 1;
            continue;
        }

        let plan_id = strip_non_alphanumeric(&record.account_guid);
        if !all_safe([
            Some(plan_id.as_str()),
            Some(record.domains.as_str()),
            Some(record.plan.as_str()),
        ]) {
            tracing::trace!(line = record.line, "domain row dropped: unsafe characters");
            outcome.unsafe_dropped += 1;
            continue;
        }

        outcome.records.push(DomainRecord {
            partner_purchase_plan_id: plan_id,
            domain: record.domains.clone(),
        });
    }

    outcome
}
