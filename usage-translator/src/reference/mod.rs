//! Reference data: lookup tables loaded once per run and read-only afterwards.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde_json::Value;

use crate::config::TranslatorConfig;
use crate::error::{ReferenceError, ReferenceResult};
use crate::validation::validate_type_map;

/// Part number to product code.
pub type TypeMap = HashMap<String, String>;

/// Load a type map from a JSON file holding a single object of strings.
pub fn load_type_map(path: &Path) -> ReferenceResult<TypeMap> {
    let content = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_type_map(&content)
}

/// Parse a type map from JSON text.
pub fn parse_type_map(json: &str) -> ReferenceResult<TypeMap> {
    let value: Value = serde_json::from_str(json)?;
    validate_type_map(&value).map_err(|errors| ReferenceError::Schema { errors })?;
    Ok(serde_json::from_value(value)?)
}

/// Everything the transformers look up while processing records.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub type_map: TypeMap,
    pub unit_reductions: BTreeMap<String, u32>,
    pub excluded_partner_ids: BTreeSet<i64>,
}

impl ReferenceData {
    /// Combine a loaded type map with the tables from the run configuration.
    pub fn new(type_map: TypeMap, config: &TranslatorConfig) -> Self {
        Self {
            type_map,
            unit_reductions: config.unit_reductions.clone(),
            excluded_partner_ids: config.excluded_partner_ids.clone(),
        }
    }

    /// Load the type map named by `config` and combine it with the config tables.
    pub fn load(config: &TranslatorConfig) -> ReferenceResult<Self> {
        let type_map = load_type_map(&config.type_map_path)?;
        tracing::info!(
            path = %config.type_map_path.display(),
            entries = type_map.len(),
            "loaded type map"
        );
        Ok(Self::new(type_map, config))
    }

    pub fn is_excluded(&self, partner_id: i64) -> bool {
        self.excluded_partner_ids.contains(&partner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_type_map() {
        let map = parse_type_map(r#"{ "EA000001GB0O": "core.storage" }"#).unwrap();
        assert_eq!(map.get("EA000001GB0O").map(String::as_str), Some("core.storage"));
    }

    #[test]
    fn test_schema_error_is_distinct_from_json_error() {
        assert!(matches!(
            parse_type_map(r#"{ "A": 1 }"#),
            Err(ReferenceError::Schema { .. })
        ));
        assert!(matches!(
            parse_type_map(r#"{ "A": "#),
            Err(ReferenceError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "SSX006NR": "backup" }}"#).unwrap();

        let config = TranslatorConfig {
            type_map_path: file.path().to_path_buf(),
            ..TranslatorConfig::default()
        };
        let reference = ReferenceData::load(&config).unwrap();

        assert_eq!(reference.type_map.len(), 1);
        assert_eq!(reference.unit_reductions.get("SSX006NR"), Some(&1000));
        assert!(reference.is_excluded(26392));
        assert!(!reference.is_excluded(1));
    }

    #[test]
    fn test_missing_type_map() {
        let err = load_type_map(Path::new("/nonexistent/typemap.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/typemap.json"));
    }
}
