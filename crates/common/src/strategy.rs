//! Decoding and encoding strategies
//!
//! A strategy says how to move between an opaque transport payload and a
//! typed value, or that no conversion applies.

use crate::shape::TypeToken;
use serde::{Deserialize, Serialize};

/// Structured serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuredFormat {
    Json,
    Xml,
}

/// Best known category of a set of content types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimeCategory {
    Text,
    Binary,
    Structured(StructuredFormat),
    Unknown,
}

/// A named conversion between a transport payload and a typed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "conversion", rename_all = "snake_case")]
pub enum Conversion {
    /// Payload read or written as text
    Stringify,
    /// Structured conversion into/out of a named type
    Object { target: String },
    /// Structured conversion through a reified generic type token
    Generic { token: TypeToken },
    /// Raw byte sequence
    Bytes,
    /// Through the base64url wrapper
    Base64Url,
    /// Convert the wire element, then map between element and enum value
    Enum {
        name: String,
        element: Box<Conversion>,
        /// Mapping function, e.g. `from_string` or `to_int32`
        mapping: String,
    },
}

/// How a transport payload becomes the typed return value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "with", rename_all = "snake_case")]
pub enum DecodingStrategy {
    /// Payload handed through unchanged
    #[default]
    None,
    Decode(Conversion),
}

impl DecodingStrategy {
    pub fn is_none(&self) -> bool {
        matches!(self, DecodingStrategy::None)
    }

    pub fn conversion(&self) -> Option<&Conversion> {
        match self {
            DecodingStrategy::None => None,
            DecodingStrategy::Decode(c) => Some(c),
        }
    }
}

/// How a typed value becomes a transport payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "with", rename_all = "snake_case")]
pub enum EncodingStrategy {
    #[default]
    None,
    Encode(Conversion),
}

impl EncodingStrategy {
    pub fn is_none(&self) -> bool {
        matches!(self, EncodingStrategy::None)
    }
}

/// A resolved strategy plus the type tokens it requires to be emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<S> {
    pub strategy: S,
    pub tokens: Vec<TypeToken>,
}

impl<S> Resolution<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            tokens: Vec::new(),
        }
    }

    pub fn with_token(strategy: S, token: TypeToken) -> Self {
        Self {
            strategy,
            tokens: vec![token],
        }
    }
}
