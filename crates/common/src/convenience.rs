//! Convenience operation descriptors
//!
//! The output of the transformation engine. A descriptor carries every
//! decision the source emitter needs: the adapted signature, the return
//! shape, and a control-flow tree whose leaves are invocations of the
//! wire-level operation.

use crate::strategy::{DecodingStrategy, EncodingStrategy};
use crate::wire::{ParameterLocation, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Control-flow category of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationCategory {
    Plain,
    Paged,
    LongRunning,
    RawPassthrough,
}

impl fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationCategory::Plain => "plain",
            OperationCategory::Paged => "paged",
            OperationCategory::LongRunning => "long-running",
            OperationCategory::RawPassthrough => "raw-passthrough",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    NonBlocking,
    Blocking,
}

/// A parameter exposed on the convenience signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvenienceParameter {
    pub name: String,
    pub type_ref: TypeRef,
    pub required: bool,
    pub location: ParameterLocation,
}

/// Value supplied for a wire parameter that is not on the convenience signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "default", content = "value", rename_all = "snake_case")]
pub enum SyntheticDefault {
    /// Empty call-scoped context
    Context,
    Constant(String),
    /// Read from the client (e.g. endpoint, api-version)
    ClientProperty(String),
    /// Optional parameter left unset
    Absent,
}

/// How a header/query/path argument becomes its string form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "conversion", rename_all = "snake_case")]
pub enum StringConversion {
    AsIs,
    /// String-backed enum; its display form is the wire value
    EnumToString,
    /// Non-string enum; map to the wire element, then stringify
    EnumToWire { mapping: String },
    /// List joined with a delimiter
    Joined { delimiter: String },
    /// List sent as repeated parameters
    Repeated,
    Stringify,
}

/// Conversion applied to a convenience argument before the wire call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "with", rename_all = "snake_case")]
pub enum ParameterConversion {
    None,
    Text(StringConversion),
    Body(EncodingStrategy),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ArgumentValue {
    /// Taken from a convenience parameter
    Parameter {
        name: String,
        conversion: ParameterConversion,
    },
    Default {
        value: SyntheticDefault,
    },
    /// The page-size hint of the page being fetched
    PageSize,
}

/// One argument of a wire-level invocation, in wire parameter order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub wire_name: String,
    pub location: ParameterLocation,
    pub value: ArgumentValue,
}

/// Invocation of the wire-level operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub operation: String,
    pub arguments: Vec<Argument>,
}

/// Shape of the value a convenience operation returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "returns", rename_all = "snake_case")]
pub enum ReturnShape {
    Unit,
    Value { type_ref: TypeRef },
    /// Lazy, restartable sequence keyed by a continuation token
    Pages { item: TypeRef },
    /// Poller handle over a long-running operation
    Poller { poll: TypeRef, result: TypeRef },
}

/// Page retrieval contract of a paged operation.
///
/// The first page is always requested with no continuation token; the
/// sequence ends on the first page that returns none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContract {
    pub item_name: String,
    pub next_link_name: Option<String>,
    pub next_operation: Option<String>,
    pub page_size_parameter: Option<String>,
}

/// Polling primitive used to build a poller handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollContract {
    pub strategy: String,
    pub sync_strategy: Option<String>,
    pub poll_interval_secs: u64,
}

/// How a failed parameter guard is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardFailure {
    FailedFuture,
    FailedPages,
    FailedPoller,
    /// Raised synchronously at the call site
    Raise,
}

/// Rejects a parameter the selected API version does not support
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionGuard {
    pub parameter: String,
    pub versions: Vec<String>,
    pub failure: GuardFailure,
}

/// Control-flow template with its resolved expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "snake_case")]
pub enum ControlFlow {
    /// Call once, decode the resolved payload
    Single {
        invocation: Invocation,
        decode: DecodingStrategy,
    },
    /// Lazy page-by-page sequence, each element decoded
    Paged {
        invocation: Invocation,
        decode: DecodingStrategy,
        paging: PageContract,
    },
    /// Poller handle construction; the loop belongs to the polling primitive
    Poller {
        invocation: Invocation,
        final_decode: DecodingStrategy,
        polling: PollContract,
    },
    /// Identity pass-through of the wire-level call
    Passthrough { invocation: Invocation },
    /// Single blocking resolution of a non-blocking flow.
    /// Failures surface synchronously with the same error kind.
    BlockOn { inner: Box<ControlFlow> },
    /// Synchronous iteration, one page fetch per advance
    IteratePages { inner: Box<ControlFlow> },
    /// Synchronous poller taken from the non-blocking handle
    ExtractSyncPoller { inner: Box<ControlFlow> },
}

impl ControlFlow {
    /// Name of the expansion template the emitter should use
    pub fn template(&self) -> &'static str {
        match self {
            ControlFlow::Single { .. } => "single",
            ControlFlow::Paged { .. } => "paged",
            ControlFlow::Poller { .. } => "poller",
            ControlFlow::Passthrough { .. } => "passthrough",
            ControlFlow::BlockOn { .. } => "block_on",
            ControlFlow::IteratePages { .. } => "iterate_pages",
            ControlFlow::ExtractSyncPoller { .. } => "extract_sync_poller",
        }
    }

    /// All wire-level invocations embedded in this flow
    pub fn invocations(&self) -> Vec<&Invocation> {
        match self {
            ControlFlow::Single { invocation, .. }
            | ControlFlow::Paged { invocation, .. }
            | ControlFlow::Poller { invocation, .. }
            | ControlFlow::Passthrough { invocation } => vec![invocation],
            ControlFlow::BlockOn { inner }
            | ControlFlow::IteratePages { inner }
            | ControlFlow::ExtractSyncPoller { inner } => inner.invocations(),
        }
    }

    /// The non-blocking flow at the bottom of any blocking wrappers
    pub fn innermost(&self) -> &ControlFlow {
        match self {
            ControlFlow::BlockOn { inner }
            | ControlFlow::IteratePages { inner }
            | ControlFlow::ExtractSyncPoller { inner } => inner.innermost(),
            other => other,
        }
    }
}

/// Developer-facing operation derived from one wire-level operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvenienceOperation {
    pub name: String,

    /// Originating wire-level operation
    pub operation: String,

    pub category: OperationCategory,

    pub execution: Execution,

    pub parameters: Vec<ConvenienceParameter>,

    pub returns: ReturnShape,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guards: Vec<VersionGuard>,

    pub body: ControlFlow,
}

impl ConvenienceOperation {
    pub fn parameter(&self, name: &str) -> Option<&ConvenienceParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Non-blocking descriptor and its derived blocking counterpart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConveniencePair {
    pub non_blocking: ConvenienceOperation,
    pub blocking: Option<ConvenienceOperation>,
}
