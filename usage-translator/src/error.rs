//! Error types for the usage translation pipeline.
//!
//! Each layer owns its error enum:
//!
//! - [`ReportError`] - reading and parsing the usage report
//! - [`ReferenceError`] - loading the part number to product type map
//! - [`ConfigError`] - loading and checking the run configuration
//! - [`RenderError`] - rendering SQL insert statements
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Record-level problems (unsafe characters, missing part numbers) are not
//! errors: the transformers drop the record and report it on the
//! [`crate::events::EventSink`]. Everything here is fatal to a run.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Report Errors
// =============================================================================

/// Errors while reading the usage report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to read the report file.
    #[error("failed to read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report has no header line.
    #[error("report is empty (no header line)")]
    EmptyFile,

    /// A data line does not split into the expected number of fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A numeric column holds something that is not an integer.
    #[error("line {line}, column '{column}' (value '{value}'): not an integer")]
    InvalidInteger {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// The CSV reader itself failed.
    #[error("malformed report: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Reference Data Errors
// =============================================================================

/// Errors while loading reference data (the product type map).
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Failed to read the type map file.
    #[error("failed to read type map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The type map is not valid JSON.
    #[error("type map is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The type map does not match its schema.
    #[error("type map failed schema validation: {}", errors.join("; "))]
    Schema { errors: Vec<String> },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or has wrongly typed fields.
    #[error("config is not valid: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration does not match its schema.
    #[error("config failed schema validation: {}", errors.join("; "))]
    Schema { errors: Vec<String> },

    /// A unit reduction factor of zero would divide by zero.
    #[error("unit reduction factor for part number '{0}' must be greater than zero")]
    ZeroReductionFactor(String),
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors while rendering SQL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// Nothing to insert; a multi-row INSERT needs at least one tuple.
    #[error("no rows to insert into table '{table}'")]
    EmptyBatch { table: &'static str },

    /// A row does not have one value per column.
    #[error("row {row} of table '{table}' has {found} values, expected {expected}")]
    ArityMismatch {
        table: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Report reading error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Reference data error.
    #[error("reference data error: {0}")]
    Reference(#[from] ReferenceError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the run summary.
    #[error("failed to serialize run summary: {0}")]
    Summary(#[source] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type for reference data operations.
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
