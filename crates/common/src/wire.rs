//! Wire-level operation model
//!
//! One [`WireOperation`] describes a network operation strictly in transport
//! terms: parameters with their wire location, the raw response payload and
//! the declared response content types. Produced by the parser, read-only
//! afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete wire-level model of one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireModel {
    /// Service name (e.g., "widgets")
    pub service: String,

    /// API version the model was built from
    pub version: String,

    /// All operations, in declaration order
    pub operations: Vec<WireOperation>,
}

/// Scalar types that travel as a single wire value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Primitive {
    String,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    DateTime,
    Duration,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::String => "String",
            Primitive::Boolean => "Boolean",
            Primitive::Int32 => "Int32",
            Primitive::Int64 => "Int64",
            Primitive::Float32 => "Float32",
            Primitive::Float64 => "Float64",
            Primitive::Decimal => "Decimal",
            Primitive::DateTime => "DateTime",
            Primitive::Duration => "Duration",
        };
        f.write_str(name)
    }
}

/// Reference to a named enumeration and the primitive it is carried as
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumRef {
    pub name: String,
    pub element: Primitive,
}

/// A type as declared by the API description
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive(Primitive),
    /// Raw byte sequence
    Bytes,
    /// Byte sequence carried base64url-encoded on the wire
    Base64Url,
    /// Opaque binary payload
    Binary,
    /// Call-scoped cancellation/context carrier
    Context,
    Void,
    List(Box<TypeRef>),
    /// String-keyed map
    Map(Box<TypeRef>),
    Enum(EnumRef),
    Model(String),
    /// A name the model builder could not resolve
    Unresolved(String),
}

impl TypeRef {
    pub fn list_of(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    pub fn map_of(value: TypeRef) -> Self {
        TypeRef::Map(Box::new(value))
    }

    pub fn model(name: &str) -> Self {
        TypeRef::Model(name.to_string())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{}", p),
            TypeRef::Bytes => f.write_str("Bytes"),
            TypeRef::Base64Url => f.write_str("Base64Url"),
            TypeRef::Binary => f.write_str("Binary"),
            TypeRef::Context => f.write_str("Context"),
            TypeRef::Void => f.write_str("Void"),
            TypeRef::List(inner) => write!(f, "List<{}>", inner),
            TypeRef::Map(inner) => write!(f, "Map<String, {}>", inner),
            TypeRef::Enum(e) => f.write_str(&e.name),
            TypeRef::Model(name) | TypeRef::Unresolved(name) => f.write_str(name),
        }
    }
}

/// HTTP method of the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Patch,
    Delete,
    Head,
    Options,
}

/// Where a parameter travels in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
    /// Transport-context-only; never serialized into the request
    Context,
    /// Any location the engine has no convenience mapping for
    #[serde(other)]
    Unsupported,
}

/// How a list-valued query/header parameter is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionFormat {
    Csv,
    Ssv,
    Tsv,
    Pipes,
    Multi,
}

impl CollectionFormat {
    /// Delimiter used to join values; `None` for repeated parameters
    pub fn delimiter(&self) -> Option<&'static str> {
        match self {
            CollectionFormat::Csv => Some(","),
            CollectionFormat::Ssv => Some(" "),
            CollectionFormat::Tsv => Some("\t"),
            CollectionFormat::Pipes => Some("|"),
            CollectionFormat::Multi => None,
        }
    }
}

/// One parameter of a wire-level operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireParameter {
    /// Client-facing parameter name
    pub name: String,

    /// Name on the wire (header name, query key, path segment)
    pub serialized_name: String,

    pub location: ParameterLocation,

    pub wire_type: TypeRef,

    #[serde(default)]
    pub required: bool,

    /// Fixed value; never exposed to callers
    #[serde(default)]
    pub constant: Option<String>,

    #[serde(default)]
    pub collection_format: Option<CollectionFormat>,

    #[serde(default)]
    pub explode: bool,

    /// API versions that introduced the parameter
    #[serde(default)]
    pub added_in: Vec<String>,
}

/// Declared response body of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// Type the convenience method should return.
    /// For paged operations this is the page element type.
    pub target: TypeRef,

    /// Wire encoding of the payload when it differs from `target`
    /// (e.g. `Base64Url` for a `Bytes` target)
    #[serde(default)]
    pub raw: Option<TypeRef>,
}

impl ResponseBody {
    pub fn raw_type(&self) -> &TypeRef {
        self.raw.as_ref().unwrap_or(&self.target)
    }
}

/// Metadata flags attached to an operation by the model builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationFlags {
    #[serde(default)]
    pub paged: bool,

    #[serde(default)]
    pub long_running: bool,

    /// Operation is an implementation detail and not exposed publicly
    #[serde(default)]
    pub implementation_only: bool,

    /// Model-returning variant that only serves as another operation's
    /// polling primitive
    #[serde(default)]
    pub polling_primitive: bool,
}

/// Pagination details of a paged operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingMetadata {
    /// Property of the page payload holding the elements
    #[serde(default = "default_item_name")]
    pub item_name: String,

    /// Property of the page payload holding the continuation token;
    /// `None` means the operation always returns a single page
    #[serde(default = "default_next_link_name")]
    pub next_link_name: Option<String>,

    /// Operation used to fetch subsequent pages, if different
    #[serde(default)]
    pub next_operation: Option<String>,

    /// Wire parameter carrying the page-size hint
    #[serde(default)]
    pub page_size_parameter: Option<String>,
}

fn default_item_name() -> String {
    "value".to_string()
}

fn default_next_link_name() -> Option<String> {
    Some("nextLink".to_string())
}

impl Default for PagingMetadata {
    fn default() -> Self {
        Self {
            item_name: default_item_name(),
            next_link_name: default_next_link_name(),
            next_operation: None,
            page_size_parameter: None,
        }
    }
}

/// Long-running operation details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingMetadata {
    /// Polling primitive driving the status loop
    pub strategy: String,

    /// Blocking counterpart of `strategy`, when distinct
    #[serde(default)]
    pub sync_strategy: Option<String>,

    pub poll_result: TypeRef,

    pub final_result: TypeRef,

    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

/// A network operation as described by the API surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOperation {
    /// Operation identity; unique within a model
    pub name: String,

    pub http_method: HttpMethod,

    #[serde(default)]
    pub parameters: Vec<WireParameter>,

    /// Content type of the request body, if any
    #[serde(default)]
    pub request_content_type: Option<String>,

    #[serde(default)]
    pub response: Option<ResponseBody>,

    #[serde(default)]
    pub response_content_types: Vec<String>,

    #[serde(default)]
    pub flags: OperationFlags,

    #[serde(default)]
    pub paging: Option<PagingMetadata>,

    #[serde(default)]
    pub polling: Option<PollingMetadata>,
}

impl WireOperation {
    /// Create a bare operation with no parameters and no response body
    pub fn new(name: &str, http_method: HttpMethod) -> Self {
        Self {
            name: name.to_string(),
            http_method,
            parameters: Vec::new(),
            request_content_type: None,
            response: None,
            response_content_types: Vec::new(),
            flags: OperationFlags::default(),
            paging: None,
            polling: None,
        }
    }

    /// Context carrier parameters of this operation
    pub fn context_parameters(&self) -> impl Iterator<Item = &WireParameter> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Context || p.wire_type == TypeRef::Context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::map_of(TypeRef::list_of(TypeRef::model("Widget")));
        assert_eq!(ty.to_string(), "Map<String, List<Widget>>");
        assert_eq!(
            TypeRef::Primitive(Primitive::Int64).to_string(),
            "Int64"
        );
    }

    #[test]
    fn test_response_raw_type_defaults_to_target() {
        let body = ResponseBody {
            target: TypeRef::Bytes,
            raw: None,
        };
        assert_eq!(body.raw_type(), &TypeRef::Bytes);

        let body = ResponseBody {
            target: TypeRef::Bytes,
            raw: Some(TypeRef::Base64Url),
        };
        assert_eq!(body.raw_type(), &TypeRef::Base64Url);
    }

    #[test]
    fn test_unknown_location_deserializes_as_unsupported() {
        let location: ParameterLocation = serde_json::from_str("\"cookie\"").unwrap();
        assert_eq!(location, ParameterLocation::Unsupported);
    }

    #[test]
    fn test_paging_metadata_defaults() {
        let paging: PagingMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(paging.item_name, "value");
        assert_eq!(paging.next_link_name.as_deref(), Some("nextLink"));
        assert_eq!(paging, PagingMetadata::default());
    }

    #[test]
    fn test_collection_format_delimiter() {
        assert_eq!(CollectionFormat::Csv.delimiter(), Some(","));
        assert_eq!(CollectionFormat::Pipes.delimiter(), Some("|"));
        assert_eq!(CollectionFormat::Multi.delimiter(), None);
    }
}
