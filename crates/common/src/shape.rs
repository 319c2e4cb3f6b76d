//! Payload shapes
//!
//! The classified form of a target value type. Pure values with no identity
//! beyond their contents.

use crate::wire::Primitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a reified generic type that must be emitted as a static helper
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeToken(String);

impl TypeToken {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of generic container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    List,
    Map,
}

/// How a byte sequence is carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteEncoding {
    Plain,
    Base64Url,
}

/// Classified shape of a target value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PayloadShape {
    Scalar {
        primitive: Primitive,
    },
    ByteSequence {
        encoding: ByteEncoding,
    },
    Enum {
        name: String,
        element: Box<PayloadShape>,
    },
    Container {
        kind: ContainerKind,
        element: Box<PayloadShape>,
        /// Reified identity of the whole container type
        token: TypeToken,
    },
    Composite {
        name: String,
    },
    OpaqueBinary,
}

impl PayloadShape {
    /// Name of the shape's type as the emitter should spell it
    pub fn type_name(&self) -> String {
        match self {
            PayloadShape::Scalar { primitive } => primitive.to_string(),
            PayloadShape::ByteSequence { .. } => "Bytes".to_string(),
            PayloadShape::Enum { name, .. } | PayloadShape::Composite { name } => name.clone(),
            PayloadShape::Container { token, .. } => token.to_string(),
            PayloadShape::OpaqueBinary => "Binary".to_string(),
        }
    }
}
