//! Wire-model document file parser

use super::types::ModelDocument;
use clientgen_common::{GeneratorError, Result, WireModel};
use std::fs;
use std::path::Path;

/// Serialization format of a model document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect format from file extension, falling back to content sniffing
    pub fn detect(path: &Path, content: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => DocumentFormat::Json,
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => {
                if content.trim_start().starts_with('{') {
                    DocumentFormat::Json
                } else {
                    DocumentFormat::Yaml
                }
            }
        }
    }
}

/// Wire-model document parser
pub struct ModelParser {
    /// Loaded document
    document: ModelDocument,
}

impl ModelParser {
    /// Load a document from file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ModelParser::from_file("widgets.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read model file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        match DocumentFormat::detect(path.as_ref(), &content) {
            DocumentFormat::Json => Self::from_json(&content),
            DocumentFormat::Yaml => Self::from_yaml(&content),
        }
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let document: ModelDocument = serde_json::from_str(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse model JSON: {}", e)))?;
        Ok(Self { document })
    }

    /// Parse a document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: ModelDocument = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse model YAML: {}", e)))?;
        Ok(Self { document })
    }

    /// Convert the document into the WireModel IR
    pub fn parse(&self) -> Result<WireModel> {
        super::converter::convert_document_to_wire_model(&self.document)
    }

    /// Get reference to the underlying document
    pub fn document(&self) -> &ModelDocument {
        &self.document
    }
}
