//! Wire-model document type definitions
//!
//! Mirrors the document layout; type expressions stay strings until the
//! converter maps them.

use clientgen_common::{CollectionFormat, HttpMethod, PagingMetadata, ParameterLocation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    /// Service name
    pub service: String,

    /// API version
    #[serde(default = "default_version")]
    pub version: String,

    /// Names of composite model types
    #[serde(default)]
    pub models: Vec<String>,

    /// Enum names mapped to the primitive they are carried as
    #[serde(default)]
    pub enums: BTreeMap<String, String>,

    #[serde(default)]
    pub operations: Vec<OperationDoc>,
}

fn default_version() -> String {
    "v1".to_string()
}

/// One operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDoc {
    /// Operation identity
    pub name: String,

    #[serde(default = "default_method")]
    pub method: HttpMethod,

    #[serde(default)]
    pub parameters: Vec<ParameterDoc>,

    #[serde(default)]
    pub request_content_type: Option<String>,

    #[serde(default)]
    pub response: Option<ResponseDoc>,

    #[serde(default)]
    pub response_content_types: Vec<String>,

    #[serde(default)]
    pub paged: bool,

    #[serde(default)]
    pub long_running: bool,

    #[serde(default)]
    pub implementation_only: bool,

    #[serde(default)]
    pub polling_primitive: bool,

    /// Pagination details; presence implies `paged`
    #[serde(default)]
    pub paging: Option<PagingMetadata>,

    /// Long-running details
    #[serde(default)]
    pub polling: Option<PollingDoc>,
}

fn default_method() -> HttpMethod {
    HttpMethod::Get
}

/// One parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDoc {
    pub name: String,

    /// Wire name; defaults to `name`
    #[serde(default)]
    pub serialized_name: Option<String>,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(rename = "type")]
    pub type_expr: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub constant: Option<String>,

    #[serde(default)]
    pub collection_format: Option<CollectionFormat>,

    #[serde(default)]
    pub explode: bool,

    #[serde(default)]
    pub added_in: Vec<String>,
}

/// Response body declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDoc {
    /// Target type; the page element type for paged operations
    #[serde(rename = "type")]
    pub type_expr: String,

    /// Wire encoding, when different from the target (e.g. `Base64Url`)
    #[serde(default)]
    pub wire: Option<String>,
}

/// Long-running operation declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingDoc {
    #[serde(default = "default_strategy")]
    pub strategy: String,

    #[serde(default)]
    pub sync_strategy: Option<String>,

    #[serde(default = "default_result")]
    pub poll_result: String,

    #[serde(default = "default_result")]
    pub final_result: String,

    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

fn default_strategy() -> String {
    "default".to_string()
}

fn default_result() -> String {
    "Binary".to_string()
}
