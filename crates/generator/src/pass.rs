//! The generation pass
//!
//! Runs every operation of a [`WireModel`] through classification, content
//! resolution, synthesis and blocking derivation. Operations are isolated:
//! a problem with one produces diagnostics and never stops the others. Only
//! a malformed model (empty or duplicate operation identity) aborts the run.

use crate::blocking::BlockingDeriver;
use crate::category::OperationClassifier;
use crate::content::ContentResolver;
use crate::shape::ShapeClassifier;
use crate::synthesizer::{poller_result_types, ConvenienceSynthesizer};
use crate::tokens::TypeTokenRegistry;
use clientgen_common::{
    ConveniencePair, DecodingStrategy, Diagnostic, DiagnosticKind, GeneratorError,
    GeneratorSettings, MimeCategory, OperationCategory, Result, TypeRef, TypeToken, WireModel,
    WireOperation,
};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Result of processing one wire-level operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationOutput {
    pub operation: String,
    pub category: OperationCategory,
    pub decoding: DecodingStrategy,
    /// `None` when synthesis failed; the operation stays wire-level only
    pub pair: Option<ConveniencePair>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything handed to the source emitter for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub service: String,
    pub version: String,
    /// In model declaration order
    pub operations: Vec<OperationOutput>,
    /// Sorted by token identity
    pub type_tokens: Vec<TypeToken>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    pub fn operation(&self, name: &str) -> Option<&OperationOutput> {
        self.operations.iter().find(|o| o.operation == name)
    }

    /// Operations that received a convenience pair
    pub fn synthesized(&self) -> impl Iterator<Item = &OperationOutput> {
        self.operations.iter().filter(|o| o.pair.is_some())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// One generation run over a wire model
pub struct GenerationPass<'a> {
    settings: &'a GeneratorSettings,
}

impl<'a> GenerationPass<'a> {
    pub fn new(settings: &'a GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Process every operation of the model
    pub fn run(&self, model: &WireModel) -> Result<GenerationOutput> {
        Self::validate(model)?;

        let processed = self.process_all(&model.operations)?;

        let mut registry = TypeTokenRegistry::new();
        let mut operations = Vec::with_capacity(processed.len());
        let mut diagnostics = Vec::new();

        for (output, tokens) in processed {
            registry.extend(tokens);
            diagnostics.extend(output.diagnostics.iter().cloned());
            operations.push(output);
        }

        for diagnostic in &diagnostics {
            warn!(kind = ?diagnostic.kind, "{}", diagnostic);
        }

        let output = GenerationOutput {
            service: model.service.clone(),
            version: model.version.clone(),
            operations,
            type_tokens: registry.into_sorted(),
            diagnostics,
        };

        info!(
            service = %output.service,
            operations = output.operations.len(),
            synthesized = output.synthesized().count(),
            type_tokens = output.type_tokens.len(),
            errors = output.error_count(),
            "generation pass complete"
        );

        Ok(output)
    }

    fn validate(model: &WireModel) -> Result<()> {
        let mut seen = HashSet::new();
        for op in &model.operations {
            if op.name.trim().is_empty() {
                return Err(GeneratorError::Parse(format!(
                    "Operation without a name in service '{}'",
                    model.service
                )));
            }
            if !seen.insert(op.name.as_str()) {
                return Err(GeneratorError::DuplicateOperation(op.name.clone()));
            }
        }
        Ok(())
    }

    /// Process operations, on a dedicated thread pool when more than one
    /// worker is configured. Output order always follows input order.
    fn process_all(&self, ops: &[WireOperation]) -> Result<Vec<(OperationOutput, Vec<TypeToken>)>> {
        let workers = self.settings.workers.clamp(1, ops.len().max(1));
        if workers == 1 {
            return Ok(ops.iter().map(|op| self.process(op)).collect());
        }

        debug!(workers, "processing operations in parallel");

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| {
                GeneratorError::Generation(format!("Failed to build worker pool: {}", e))
            })?;

        Ok(pool.install(|| ops.par_iter().map(|op| self.process(op)).collect()))
    }

    /// Process one operation; returns its output and the tokens it needs
    pub fn process(&self, op: &WireOperation) -> (OperationOutput, Vec<TypeToken>) {
        let classification = OperationClassifier::classify(op);
        let category = classification.category;
        let mut diagnostics = classification.diagnostics;

        let resolver = ContentResolver::new(self.settings);
        let (target, raw) = payload_types(op, category);

        let resolution = if category == OperationCategory::RawPassthrough {
            None
        } else {
            let shape = ShapeClassifier::classify(&target, Some(&raw));
            Some(resolver.resolve_decoding(&shape, &raw, &op.response_content_types))
        };

        if !raw.is_void()
            && !op.response_content_types.is_empty()
            && resolver.mime_category(&op.response_content_types) == MimeCategory::Unknown
        {
            diagnostics.push(Diagnostic::note(
                DiagnosticKind::UnsupportedContentType,
                &op.name,
                format!(
                    "no decoding known for {}; the raw payload is returned",
                    op.response_content_types.join(", ")
                ),
            ));
        }

        let (decoding, mut tokens) = match resolution {
            Some(r) => (r.strategy, r.tokens),
            None => (DecodingStrategy::None, Vec::new()),
        };

        let synthesizer = ConvenienceSynthesizer::new(self.settings);
        let pair = match synthesizer.synthesize(op, &decoding, category) {
            Ok(synthesized) => {
                tokens.extend(synthesized.tokens);
                diagnostics.extend(synthesized.diagnostics);

                let blocking = self
                    .settings
                    .generate_blocking
                    .then(|| BlockingDeriver::new(self.settings).derive(&synthesized.operation));

                Some(ConveniencePair {
                    non_blocking: synthesized.operation,
                    blocking,
                })
            }
            Err(errors) => {
                diagnostics.extend(errors);
                tokens.clear();
                None
            }
        };

        let output = OperationOutput {
            operation: op.name.clone(),
            category,
            decoding,
            pair,
            diagnostics,
        };

        (output, tokens)
    }
}

/// Target and raw wire type of the payload the decoding applies to
fn payload_types(op: &WireOperation, category: OperationCategory) -> (TypeRef, TypeRef) {
    match category {
        OperationCategory::LongRunning => poller_result_types(op)
            .map(|(_, result)| (result.clone(), result))
            .unwrap_or((TypeRef::Void, TypeRef::Void)),
        OperationCategory::RawPassthrough => (TypeRef::Void, TypeRef::Void),
        OperationCategory::Plain | OperationCategory::Paged => match &op.response {
            Some(response) => (response.target.clone(), response.raw_type().clone()),
            None => (TypeRef::Void, TypeRef::Void),
        },
    }
}
