//! Domain models for the usage translation pipeline.
//!
//! - [`InputRecord`] - one row of the partner usage report
//! - [`ChargeableRecord`] - one row for the `chargeable` table
//! - [`DomainRecord`] - one row for the `domains` table

use serde::{Deserialize, Serialize};

// =============================================================================
// Input
// =============================================================================

/// One data row of the usage report, in column order.
///
/// Immutable once read. `line` is the 1-based line in the source file and is
/// only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub partner_id: i64,
    pub partner_guid: String,
    pub account_id: i64,
    pub account_guid: String,
    pub username: String,
    pub domains: String,
    pub item_name: String,
    pub plan: String,
    pub item_type: i64,
    /// Absent when the report column is empty.
    pub part_number: Option<String>,
    pub item_count: i64,
    #[serde(default)]
    pub line: u64,
}

impl InputRecord {
    /// Short description for log messages; never includes row-level values.
    pub fn describe(&self) -> String {
        format!(
            "line {} (partner {}, account {})",
            self.line, self.partner_id, self.account_id
        )
    }
}

// =============================================================================
// Output rows
// =============================================================================

/// A row of the `chargeable` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeableRecord {
    pub partner_id: i64,
    /// Empty when the part number has no entry in the type map.
    pub product: String,
    pub partner_purchase_plan_id: String,
    pub plan: String,
    /// Never negative.
    pub usage: i64,
}

/// A row of the `domains` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub partner_purchase_plan_id: String,
    pub domain: String,
}
