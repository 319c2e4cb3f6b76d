//! Convenience operation generation for clientgen
//!
//! This crate turns wire-level operations into developer-facing convenience
//! operation descriptors:
//!
//! - [`ShapeClassifier`] classifies target value types into payload shapes
//! - [`ContentResolver`] picks decoding/encoding strategies from content types
//! - [`OperationClassifier`] assigns each operation its control-flow category
//! - [`ConvenienceSynthesizer`] builds the non-blocking descriptor
//! - [`BlockingDeriver`] derives the blocking counterpart
//! - [`GenerationPass`] runs all of the above over a model
//!
//! [`ConvenienceGenerator`] writes the result for the source emitter:
//! - convenience.json (descriptor pairs, per-operation diagnostics)
//! - type_tokens.json (reified types to emit as static helpers)
//! - REPORT.md

mod blocking;
mod category;
mod content;
pub mod paging;
mod pass;
pub mod polling;
mod report;
mod shape;
mod synthesizer;
mod templates;
mod tokens;

pub use blocking::BlockingDeriver;
pub use category::{Classification, OperationClassifier};
pub use content::{builtin_category, ContentResolver};
pub use pass::{GenerationOutput, GenerationPass, OperationOutput};
pub use report::{describe_conversion, describe_decoding, report_rows, ReportRow};
pub use shape::ShapeClassifier;
pub use synthesizer::{poller_result_types, ConvenienceSynthesizer, Synthesized};
pub use tokens::TypeTokenRegistry;

use clientgen_common::{GeneratorError, GeneratorSettings, Result, WireModel};
use std::fs;
use std::path::Path;
use tera::Tera;
use tracing::info;

/// Writes the artifacts of a generation run
pub struct ConvenienceGenerator {
    output: GenerationOutput,
    tera: Tera,
}

impl ConvenienceGenerator {
    /// Create a new generator from the output of a generation pass
    pub fn new(output: GenerationOutput) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { output, tera })
    }

    pub fn output(&self) -> &GenerationOutput {
        &self.output
    }

    /// Generate all artifacts to a directory
    pub fn generate_to_directory(&self, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir).map_err(|e| {
            GeneratorError::Generation(format!("Failed to create output directory: {}", e))
        })?;

        self.generate_convenience_json(output_dir)?;
        self.generate_type_tokens_json(output_dir)?;
        self.generate_report(output_dir)?;

        info!(dir = %output_dir.display(), "wrote generation artifacts");
        Ok(())
    }

    /// Generate convenience.json
    fn generate_convenience_json(&self, output_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.output)?;

        let output_path = output_dir.join("convenience.json");
        fs::write(output_path, json).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write convenience.json: {}", e))
        })?;

        Ok(())
    }

    /// Generate type_tokens.json
    fn generate_type_tokens_json(&self, output_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.output.type_tokens)?;

        let output_path = output_dir.join("type_tokens.json");
        fs::write(output_path, json).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write type_tokens.json: {}", e))
        })?;

        Ok(())
    }

    /// Generate REPORT.md
    fn generate_report(&self, output_dir: &Path) -> Result<()> {
        let context = self.create_context();
        let rendered = self
            .tera
            .render("REPORT.md", &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {:?}", e)))?;

        let output_path = output_dir.join("REPORT.md");
        fs::write(output_path, rendered)
            .map_err(|e| GeneratorError::Generation(format!("Failed to write REPORT.md: {}", e)))?;

        Ok(())
    }

    /// Create template context from the generation output
    fn create_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("service", &self.output.service);
        context.insert("version", &self.output.version);
        context.insert("total", &self.output.operations.len());
        context.insert("synthesized", &self.output.synthesized().count());
        context.insert("rows", &report_rows(&self.output));
        context.insert("type_tokens", &self.output.type_tokens);
        context.insert("diagnostics", &self.output.diagnostics);
        context
    }
}

/// Run a generation pass and write its artifacts (convenience function)
pub fn generate_convenience(
    model: &WireModel,
    settings: &GeneratorSettings,
    output_path: &Path,
) -> Result<GenerationOutput> {
    let output = GenerationPass::new(settings).run(model)?;
    let generator = ConvenienceGenerator::new(output)?;
    generator.generate_to_directory(output_path)?;
    Ok(generator.output)
}
