//! Operation category classification
//!
//! Assigns each wire-level operation the control-flow category that drives
//! which expansion template the synthesizer and the blocking deriver use.

use clientgen_common::{Diagnostic, DiagnosticKind, OperationCategory, WireOperation};
use tracing::debug;

/// Category of one operation plus any metadata problems found on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: OperationCategory,
    pub diagnostics: Vec<Diagnostic>,
}

/// Classifies wire-level operations into categories
pub struct OperationClassifier;

impl OperationClassifier {
    /// Classify an operation.
    ///
    /// Priority, first match wins:
    /// 1. long-running: `RawPassthrough` for polling-primitive variants,
    ///    `Plain` with a diagnostic when polling metadata is missing,
    ///    otherwise `LongRunning`
    /// 2. paged flag or paging metadata: `Paged`
    /// 3. implementation-only, or a required context parameter: `RawPassthrough`
    /// 4. `Plain`
    ///
    /// # Examples
    /// ```
    /// use clientgen_common::{HttpMethod, OperationCategory, WireOperation};
    /// use clientgen_generator::OperationClassifier;
    ///
    /// let mut op = WireOperation::new("list_widgets", HttpMethod::Get);
    /// op.flags.paged = true;
    /// assert_eq!(OperationClassifier::category(&op), OperationCategory::Paged);
    /// ```
    pub fn classify(op: &WireOperation) -> Classification {
        let mut diagnostics = Vec::new();

        let category = if op.flags.long_running {
            if op.flags.polling_primitive {
                OperationCategory::RawPassthrough
            } else if op.polling.is_none() {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::MalformedMetadata,
                    &op.name,
                    "long-running flag set without polling metadata; generated as a plain operation",
                ));
                OperationCategory::Plain
            } else {
                OperationCategory::LongRunning
            }
        } else if op.flags.paged || op.paging.is_some() {
            OperationCategory::Paged
        } else if op.flags.implementation_only || Self::has_required_context(op) {
            OperationCategory::RawPassthrough
        } else {
            OperationCategory::Plain
        };

        debug!(operation = %op.name, %category, "classified operation");

        Classification {
            category,
            diagnostics,
        }
    }

    /// Category only, dropping diagnostics
    pub fn category(op: &WireOperation) -> OperationCategory {
        Self::classify(op).category
    }

    /// A context carrier the caller must supply cannot be defaulted
    fn has_required_context(op: &WireOperation) -> bool {
        op.context_parameters().any(|p| p.required)
    }
}
