//! Common types and utilities for clientgen
//!
//! This crate contains the shared data structures used across the parser,
//! generator, and CLI components:
//!
//! - the wire-level operation model ([`WireModel`], [`WireOperation`])
//! - payload shapes and decoding/encoding strategies
//! - convenience operation descriptors handed to the source emitter
//! - generation diagnostics and [`GeneratorSettings`]

mod convenience;
mod diagnostics;
mod settings;
mod shape;
mod strategy;
mod wire;

pub use convenience::{
    Argument, ArgumentValue, ControlFlow, ConvenienceOperation, ConveniencePair,
    ConvenienceParameter, Execution, GuardFailure, Invocation, OperationCategory, PageContract,
    ParameterConversion, PollContract, ReturnShape, StringConversion, SyntheticDefault,
    VersionGuard,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use settings::GeneratorSettings;
pub use shape::{ByteEncoding, ContainerKind, PayloadShape, TypeToken};
pub use strategy::{
    Conversion, DecodingStrategy, EncodingStrategy, MimeCategory, Resolution, StructuredFormat,
};
pub use wire::{
    CollectionFormat, EnumRef, HttpMethod, OperationFlags, PagingMetadata, ParameterLocation,
    PollingMetadata, Primitive, ResponseBody, TypeRef, WireModel, WireOperation, WireParameter,
};

use thiserror::Error;

/// Errors that can occur during generation
///
/// Problems scoped to a single operation are reported as [`Diagnostic`]s and
/// never surface here; these variants abort the whole run.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate operation identity: {0}")]
    DuplicateOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeneratorError::DuplicateOperation("list_widgets".to_string());
        assert_eq!(
            err.to_string(),
            "Duplicate operation identity: list_widgets"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<WireModel>("{").unwrap_err();
        let err: GeneratorError = json_err.into();
        assert!(matches!(err, GeneratorError::Json(_)));
    }
}
