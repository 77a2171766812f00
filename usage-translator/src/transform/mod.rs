//! Transformation module.
//!
//! - Rules: product code lookup and unit reduction
//! - Chargeable: report records to `chargeable` rows
//! - Domains: report records to deduplicated `domains` rows
//! - Pipeline: the run driver

pub mod chargeable;
pub mod domains;
pub mod pipeline;
pub mod rules;

pub use chargeable::{build_chargeable, ChargeableDrops, ChargeableOutcome};
pub use domains::{build_domains, DomainDeduplicator, DomainsOutcome};
pub use pipeline::{run, translate, RunSummary, Translation};
pub use rules::{apply_unit_reduction, map_product_code};
