//! Wire-model document parsing for clientgen
//!
//! This crate reads an API operation model document (JSON or YAML) and
//! converts it into the intermediate representation ([`WireModel`]) the
//! generator consumes.
//!
//! ## Type expressions
//!
//! Parameter and response types are written as plain type expressions:
//! - primitives: `String`, `Int32`, `Int64`, `Boolean`, `DateTime`, ...
//! - byte payloads: `Bytes`, `Base64Url`, `Binary`
//! - containers: `List<T>`, `Map<String, T>`
//! - named models and enums declared at the top of the document

pub mod document;
mod type_mapper;

pub use document::{DocumentFormat, ModelDocument, ModelParser};
pub use type_mapper::TypeMapper;

use clientgen_common::{Result, WireModel};
use std::path::Path;

/// Parse a model document file into a WireModel
///
/// # Arguments
/// * `path` - Path to a `.json`, `.yaml` or `.yml` document
///
/// # Returns
/// * `WireModel` - Intermediate representation of the service
pub fn parse_model_file<P: AsRef<Path>>(path: P) -> Result<WireModel> {
    ModelParser::from_file(path)?.parse()
}
