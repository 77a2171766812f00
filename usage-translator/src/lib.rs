//! # Usage Translator - partner usage reports to SQL inserts
//!
//! Reads a partner usage report (CSV), reshapes every record into rows for
//! the `chargeable` and `domains` tables, drops records that fail the
//! sanitization rules, and writes one multi-row INSERT statement per table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  Report CSV │────▶│   Parser    │────▶│  Transform   │────▶│   Render    │
//! │ (11 fields) │     │ (auto-enc)  │     │ (rules+dedup)│     │ (SQL files) │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//!                                                │
//!                                         ┌──────┴──────┐
//!                                         │  EventSink  │
//!                                         └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use usage_translator::{run, TracingSink, TranslatorConfig};
//!
//! let summary = run(&TranslatorConfig::default(), &TracingSink)?;
//! println!("{} chargeable rows", summary.chargeable_rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Report records and output rows
//! - [`config`] - Run configuration
//! - [`reference`] - Type map and lookup tables
//! - [`validation`] - JSON Schema checks for config and type map
//! - [`parser`] - Report reader
//! - [`sanitize`] - Field sanitization
//! - [`transform`] - Rules, table builders and the run driver
//! - [`render`] - SQL INSERT rendering
//! - [`events`] - Record-level event sinks
//! - [`logging`] - `tracing` subscriber setup

// Core modules
pub mod error;
pub mod models;

// Configuration and reference data
pub mod config;
pub mod reference;
pub mod validation;

// Input
pub mod parser;

// Transformation
pub mod sanitize;
pub mod transform;

// Output
pub mod render;

// Observability
pub mod events;
pub mod logging;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ConfigError, PipelineError, ReferenceError, RenderError, ReportError};

// =============================================================================
// Re-exports - Models and configuration
// =============================================================================

pub use config::TranslatorConfig;
pub use models::{ChargeableRecord, DomainRecord, InputRecord};
pub use reference::{load_type_map, ReferenceData, TypeMap};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use parser::{parse_report, read_report};
pub use sanitize::{all_safe, is_safe_for_sql, strip_non_alphanumeric};
pub use transform::{
    apply_unit_reduction, build_chargeable, build_domains, map_product_code, run, translate,
    RunSummary, Translation,
};

// =============================================================================
// Re-exports - Output and events
// =============================================================================

pub use events::{EventSink, MemorySink, NullSink, PipelineEvent, TracingSink};
pub use render::{quote_literal, render_insert, InsertStatement, ParameterizedStatement, SqlValue};
