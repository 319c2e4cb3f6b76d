//! Wire-model document parser
//!
//! Reads the wire-level operation model handed over by the model builder and
//! converts it into a [`WireModel`](clientgen_common::WireModel).
//!
//! ## Document Format
//!
//! Documents are JSON or YAML with string type expressions:
//!
//! ```yaml
//! service: widgets
//! version: "2024-05-01"
//! models: [Widget]
//! enums:
//!   Color: String
//! operations:
//!   - name: list_widgets
//!     method: GET
//!     parameters:
//!       - { name: filter, in: query, type: String }
//!     response: { type: Widget }
//!     response_content_types: [application/json]
//!     paging: { item_name: value, next_link_name: nextLink }
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use clientgen_parser::document::ModelParser;
//!
//! let parser = ModelParser::from_file("widgets.yaml")?;
//! let model = parser.parse()?;
//! ```

mod converter;
mod parser;
mod types;

pub use parser::{DocumentFormat, ModelParser};
pub use types::*;
