//! Run configuration.
//!
//! Every path and lookup table the translator needs comes from a
//! [`TranslatorConfig`]. A configuration file only has to name what differs
//! from [`TranslatorConfig::default`].
//!
//! ```json
//! {
//!   "inputPath": "reports/2024-06.csv",
//!   "excludedPartnerIds": [26392, 30001],
//!   "unitReductions": { "EA000001GB0O": 1000 }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::validation::validate_config;

/// Partner ids excluded from the chargeable table unless configured otherwise.
pub const DEFAULT_EXCLUDED_PARTNER_IDS: [i64; 1] = [26392];

/// Unit reduction factors used unless configured otherwise.
pub const DEFAULT_UNIT_REDUCTIONS: [(&str, u32); 4] = [
    ("EA000001GB0O", 1000),
    ("PMQ00005GB0R", 5000),
    ("SSX006NR", 1000),
    ("SPQ00001MB0R", 2000),
];

/// Configuration for one translation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorConfig {
    /// Usage report to read.
    pub input_path: PathBuf,

    /// JSON object mapping part numbers to product codes.
    pub type_map_path: PathBuf,

    /// Where the `chargeable` INSERT statement is written.
    pub chargeable_output_path: PathBuf,

    /// Where the `domains` INSERT statement is written.
    pub domains_output_path: PathBuf,

    /// Optional JSON run summary.
    pub summary_path: Option<PathBuf>,

    /// Partners whose records never reach the chargeable table.
    pub excluded_partner_ids: BTreeSet<i64>,

    /// Part number to unit reduction divisor.
    pub unit_reductions: BTreeMap<String, u32>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/Sample_Report.csv"),
            type_map_path: PathBuf::from("data/typemap.json"),
            chargeable_output_path: PathBuf::from("data/chargeable_insert_query.sql"),
            domains_output_path: PathBuf::from("data/domains_insert_query.sql"),
            summary_path: None,
            excluded_partner_ids: DEFAULT_EXCLUDED_PARTNER_IDS.into_iter().collect(),
            unit_reductions: DEFAULT_UNIT_REDUCTIONS
                .iter()
                .map(|(part, factor)| (part.to_string(), *factor))
                .collect(),
        }
    }
}

impl TranslatorConfig {
    /// Load a configuration file.
    ///
    /// The document is checked against the embedded schema, deserialized
    /// over the defaults, then passed through [`TranslatorConfig::validate`].
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        validate_config(&value).map_err(|errors| ConfigError::Schema { errors })?;

        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the type system does not express.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some((part, _)) = self.unit_reductions.iter().find(|(_, factor)| **factor == 0) {
            return Err(ConfigError::ZeroReductionFactor(part.clone()));
        }
        Ok(())
    }

    /// Resolve relative paths against `base`, typically the config file's directory.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.input_path);
        resolve(&mut self.type_map_path);
        resolve(&mut self.chargeable_output_path);
        resolve(&mut self.domains_output_path);
        if let Some(summary) = self.summary_path.as_mut() {
            resolve(summary);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_constants() {
        let config = TranslatorConfig::default();
        assert!(config.excluded_partner_ids.contains(&26392));
        assert_eq!(config.excluded_partner_ids.len(), 1);
        assert_eq!(config.unit_reductions.get("EA000001GB0O"), Some(&1000));
        assert_eq!(config.unit_reductions.get("PMQ00005GB0R"), Some(&5000));
        assert_eq!(config.unit_reductions.get("SSX006NR"), Some(&1000));
        assert_eq!(config.unit_reductions.get("SPQ00001MB0R"), Some(&2000));
        assert!(config.summary_path.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = TranslatorConfig::from_json(r#"{ "inputPath": "june.csv" }"#).unwrap();
        assert_eq!(config.input_path, PathBuf::from("june.csv"));
        assert_eq!(config.type_map_path, PathBuf::from("data/typemap.json"));
        assert_eq!(config.unit_reductions.len(), 4);
    }

    #[test]
    fn test_tables_replace_defaults() {
        let config = TranslatorConfig::from_json(
            r#"{ "excludedPartnerIds": [1, 2], "unitReductions": { "X": 10 } }"#,
        )
        .unwrap();
        assert_eq!(config.excluded_partner_ids, BTreeSet::from([1, 2]));
        assert_eq!(config.unit_reductions, BTreeMap::from([("X".to_string(), 10)]));
    }

    #[test]
    fn test_schema_violation_reported() {
        let err = TranslatorConfig::from_json(r#"{ "excludedPartnerIds": "26392" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Schema { .. }));
    }

    #[test]
    fn test_invalid_json_reported() {
        let err = TranslatorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_zero_factor_rejected() {
        let mut config = TranslatorConfig::default();
        config.unit_reductions.insert("BAD".into(), 0);
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "unit reduction factor for part number 'BAD' must be greater than zero"
        );
    }

    #[test]
    fn test_resolve_paths() {
        let config = TranslatorConfig {
            summary_path: Some(PathBuf::from("summary.json")),
            chargeable_output_path: PathBuf::from("/abs/out.sql"),
            ..TranslatorConfig::default()
        }
        .resolve_paths(Path::new("/etc/translator"));

        assert_eq!(
            config.input_path,
            PathBuf::from("/etc/translator/data/Sample_Report.csv")
        );
        assert_eq!(config.chargeable_output_path, PathBuf::from("/abs/out.sql"));
        assert_eq!(
            config.summary_path,
            Some(PathBuf::from("/etc/translator/summary.json"))
        );
    }

    #[test]
    fn test_missing_file() {
        let err = TranslatorConfig::from_path(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
