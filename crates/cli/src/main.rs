//! Clientgen CLI
//!
//! Command-line interface for deriving convenience operations from
//! wire-level API operation models.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clientgen_common::{GeneratorSettings, ReturnShape, Severity, WireModel};
use clientgen_generator::{describe_decoding, ConvenienceGenerator, GenerationPass};
use clientgen_parser::{DocumentFormat, ModelParser};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clientgen")]
#[command(version, about = "Derive convenience client operations from wire-level operation models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every operation of a model and show the chosen strategies
    #[command(after_help = "EXAMPLES:\n  \
        # Inspect a YAML model\n  \
        clientgen inspect --model widgets.yaml\n\n  \
        # Force the document format\n  \
        clientgen inspect --model widgets.model --format json")]
    Inspect {
        /// Path to the model document
        #[arg(short, long)]
        model: PathBuf,

        /// Document format (detected from the extension if not specified)
        #[arg(short, long)]
        format: Option<ModelFormat>,

        /// Generator settings file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the generation pass and write the emitter hand-off artifacts
    #[command(after_help = "EXAMPLES:\n  \
        # Generate with default settings\n  \
        clientgen generate --model widgets.yaml --output ./out/widgets\n\n  \
        # Use a settings file and four workers\n  \
        clientgen generate \\\n    \
        --model widgets.yaml \\\n    \
        --config clientgen.yaml \\\n    \
        --workers 4 \\\n    \
        --output ./out/widgets")]
    Generate {
        /// Path to the model document
        #[arg(short, long)]
        model: PathBuf,

        /// Document format (detected from the extension if not specified)
        #[arg(short, long)]
        format: Option<ModelFormat>,

        /// Generator settings file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of worker threads (overrides the settings file)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModelFormat {
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelFormat::Json => write!(f, "JSON"),
            ModelFormat::Yaml => write!(f, "YAML"),
        }
    }
}

impl From<DocumentFormat> for ModelFormat {
    fn from(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Json => ModelFormat::Json,
            DocumentFormat::Yaml => ModelFormat::Yaml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::Inspect {
            model,
            format,
            config,
        } => {
            inspect_command(model.as_path(), format, config.as_deref(), cli.verbose)?;
        }
        Commands::Generate {
            model,
            format,
            config,
            workers,
            output,
        } => {
            generate_command(
                model.as_path(),
                format,
                config.as_deref(),
                workers,
                output.as_path(),
                cli.verbose,
            )?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `warn`, or `info` with `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config: Option<&Path>, workers: Option<usize>) -> Result<GeneratorSettings> {
    let mut settings = match config {
        Some(path) => GeneratorSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => GeneratorSettings::default(),
    };

    if let Some(workers) = workers {
        if workers == 0 {
            anyhow::bail!("--workers must be at least 1");
        }
        settings.workers = workers;
    }

    Ok(settings)
}

fn load_model(path: &Path, format: Option<ModelFormat>) -> Result<WireModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file {}", path.display()))?;

    // Detect format if not specified
    let format = format.unwrap_or_else(|| {
        let detected = ModelFormat::from(DocumentFormat::detect(path, &content));
        println!(
            "{} Detected format: {}",
            "→".cyan(),
            detected.to_string().yellow()
        );
        detected
    });

    let parser = match format {
        ModelFormat::Json => ModelParser::from_json(&content),
        ModelFormat::Yaml => ModelParser::from_yaml(&content),
    }
    .context("Failed to load model document")?;

    parser.parse().context("Failed to convert model document")
}

fn inspect_command(
    model_path: &Path,
    format: Option<ModelFormat>,
    config: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    println!("{} Inspecting model: {}", "→".cyan(), model_path.display());

    let settings = load_settings(config, None)?;
    let model = load_model(model_path, format)?;
    let output = GenerationPass::new(&settings)
        .run(&model)
        .context("Generation pass failed")?;

    println!("\n{}", "Service:".bold());
    println!("  Name: {}", output.service.yellow());
    println!("  Version: {}", output.version.yellow());
    println!("  Operations: {}", output.operations.len());

    println!("\n{}", "Operations:".bold());
    for op in &output.operations {
        let status = if op.pair.is_some() {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {} {} [{}] decode: {}",
            status,
            op.operation.cyan(),
            op.category,
            describe_decoding(&op.decoding)
        );

        if verbose {
            if let Some(pair) = &op.pair {
                let convenience = &pair.non_blocking;
                let params: Vec<&str> = convenience
                    .parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect();
                println!("    Parameters: ({})", params.join(", "));
                println!("    Returns: {}", describe_return(&convenience.returns));
                println!("    Template: {}", convenience.body.template());
                if let Some(blocking) = &pair.blocking {
                    println!("    Blocking template: {}", blocking.body.template());
                }
            }
        }

        for diagnostic in &op.diagnostics {
            let line = format!("    {}", diagnostic);
            match diagnostic.severity {
                Severity::Error => println!("{}", line.red()),
                Severity::Warning => println!("{}", line.yellow()),
                Severity::Note => println!("{}", line.dimmed()),
            }
        }
    }

    if !output.type_tokens.is_empty() {
        println!("\n{}", "Type tokens:".bold());
        for token in &output.type_tokens {
            println!("  • {}", token);
        }
    }

    Ok(())
}

fn generate_command(
    model_path: &Path,
    format: Option<ModelFormat>,
    config: Option<&Path>,
    workers: Option<usize>,
    output_dir: &Path,
    verbose: bool,
) -> Result<()> {
    println!(
        "{} Generating convenience operations from: {}",
        "→".cyan(),
        model_path.display()
    );

    let settings = load_settings(config, workers)?;

    if verbose {
        println!("  Workers: {}", settings.workers);
        println!("  Blocking variants: {}", settings.generate_blocking);
        println!("  Output: {}", output_dir.display());
    }

    println!("{} Parsing model...", "→".cyan());
    let model = load_model(model_path, format)?;
    println!(
        "{} Parsed {} operations",
        "✓".green(),
        model.operations.len()
    );

    println!("{} Running generation pass...", "→".cyan());
    let output = GenerationPass::new(&settings)
        .run(&model)
        .context("Generation pass failed")?;

    let synthesized = output.synthesized().count();
    let wire_only = output.operations.len() - synthesized;

    let generator = ConvenienceGenerator::new(output).context("Failed to create generator")?;
    generator
        .generate_to_directory(output_dir)
        .context("Failed to write generation artifacts")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!(
        "  {} of {} operations have convenience methods",
        synthesized,
        model.operations.len()
    );
    if wire_only > 0 {
        println!(
            "  {}",
            format!("{} operations left wire-level only (see REPORT.md)", wire_only).yellow()
        );
    }
    println!("\n{}", "Generated files:".bold());
    println!("  📄 {}/convenience.json", output_dir.display());
    println!("  📄 {}/type_tokens.json", output_dir.display());
    println!("  📄 {}/REPORT.md", output_dir.display());

    Ok(())
}

fn describe_return(returns: &ReturnShape) -> String {
    match returns {
        ReturnShape::Unit => "()".to_string(),
        ReturnShape::Value { type_ref } => type_ref.to_string(),
        ReturnShape::Pages { item } => format!("Pages<{}>", item),
        ReturnShape::Poller { poll, result } => format!("Poller<{}, {}>", poll, result),
    }
}
