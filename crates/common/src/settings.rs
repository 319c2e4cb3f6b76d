//! Generator settings
//!
//! The explicit configuration object for one generation run. Built once,
//! usually from a YAML file, and passed by reference into every component.

use crate::{GeneratorError, MimeCategory, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Number of worker threads used to process operations
    pub workers: usize,

    /// Whether blocking operations are derived at all
    pub generate_blocking: bool,

    /// Whether a blocking call can propagate a call-scoped context carrier.
    /// When false, blocking raw passthrough methods drop the carrier from
    /// their signature.
    pub blocking_context_propagation: bool,

    /// Extra content-type mappings, consulted before the built-in table.
    ///
    /// Keys support `*` wildcards:
    /// - `application/vnd.acme*` prefix match
    /// - `*+cbor` suffix match
    /// - `*acme*` contains match
    pub mime_overrides: BTreeMap<String, MimeCategory>,

    /// Wire parameters supplied by the client itself (e.g. `api-version`)
    pub client_property_parameters: Vec<String>,

    /// Poll interval used when an operation declares none
    pub default_poll_interval_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            workers: 1,
            generate_blocking: true,
            blocking_context_propagation: false,
            mime_overrides: BTreeMap::new(),
            client_property_parameters: Vec::new(),
            default_poll_interval_secs: 1,
        }
    }
}

impl GeneratorSettings {
    /// Load settings from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read settings file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            GeneratorError::Config(msg) => {
                GeneratorError::Config(format!("{} (in {:?})", msg, path))
            }
            other => other,
        })
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Config(format!("Failed to parse settings YAML: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(GeneratorError::Config(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Look up an override for a bare (parameter-free, lowercased) mime type
    pub fn mime_override(&self, mime: &str) -> Option<MimeCategory> {
        self.mime_overrides
            .iter()
            .find(|(pattern, _)| matches_pattern(&pattern.to_ascii_lowercase(), mime))
            .map(|(_, category)| *category)
    }

    pub fn is_client_property(&self, serialized_name: &str) -> bool {
        self.client_property_parameters
            .iter()
            .any(|p| p.eq_ignore_ascii_case(serialized_name))
    }
}

/// Match a value against a pattern with optional `*` wildcards
fn matches_pattern(pattern: &str, value: &str) -> bool {
    if pattern.len() > 1 && pattern.starts_with('*') && pattern.ends_with('*') {
        value.contains(pattern.trim_matches('*'))
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        value.ends_with(suffix)
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        value.starts_with(prefix)
    } else {
        pattern == value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructuredFormat;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.workers, 1);
        assert!(settings.generate_blocking);
        assert!(!settings.blocking_context_propagation);
    }

    #[test]
    fn test_from_yaml_partial() {
        let settings = GeneratorSettings::from_yaml(
            "workers: 4\nclient_property_parameters:\n  - api-version\n",
        )
        .unwrap();
        assert_eq!(settings.workers, 4);
        assert!(settings.generate_blocking);
        assert!(settings.is_client_property("API-Version"));
        assert!(!settings.is_client_property("widgetName"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = GeneratorSettings::from_yaml("workers: 0\n").unwrap_err();
        assert!(matches!(err, GeneratorError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_poll_interval_secs: 5").unwrap();
        let settings = GeneratorSettings::load(file.path()).unwrap();
        assert_eq!(settings.default_poll_interval_secs, 5);
    }

    #[test]
    fn test_mime_override_patterns() {
        let mut settings = GeneratorSettings::default();
        settings.mime_overrides.insert(
            "application/vnd.acme*".to_string(),
            MimeCategory::Structured(StructuredFormat::Json),
        );
        settings
            .mime_overrides
            .insert("*+cbor".to_string(), MimeCategory::Binary);
        settings
            .mime_overrides
            .insert("text/x-log".to_string(), MimeCategory::Text);

        assert_eq!(
            settings.mime_override("application/vnd.acme.widget"),
            Some(MimeCategory::Structured(StructuredFormat::Json))
        );
        assert_eq!(
            settings.mime_override("application/thing+cbor"),
            Some(MimeCategory::Binary)
        );
        assert_eq!(settings.mime_override("text/x-log"), Some(MimeCategory::Text));
        assert_eq!(settings.mime_override("text/plain"), None);
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("*limit*", "rate-limit-exceeded"));
        assert!(matches_pattern("no-such*", "no-such-key"));
        assert!(matches_pattern("*in-use", "address-in-use"));
        assert!(matches_pattern("exact", "exact"));
        assert!(!matches_pattern("exact", "exactly"));
    }
}
