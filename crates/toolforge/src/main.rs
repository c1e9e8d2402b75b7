//! toolforge CLI.
//!
//! Inspects OpenAPI documents and prints the identifiers and display names
//! derived for their operations.

use std::io::Read;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use toolforge_lib::{load, CatalogStats, ToolCatalog, ToolforgeError};
use toolforge_naming::{abbreviate_with, decode, encode, NamingOptions};
use toolforge_spec::{FormatHint, LoadOptions, ResolveOptions, ResolvedDocument};
use toolforge_telemetry::{log_command_failed, LogFormat, Telemetry, TelemetryConfig};

#[derive(Parser, Debug)]
#[command(name = "toolforge", about = "Derive tool identifiers and names from OpenAPI documents", version)]
struct Cli {
    /// Log level (RUST_LOG takes precedence).
    #[arg(long, global = true, env = "TOOLFORGE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (json or pretty). Logs always go to stderr.
    #[arg(long, global = true, env = "TOOLFORGE_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List operations in enumeration order.
    Operations {
        #[command(flatten)]
        input: InputArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Build the tool catalog (identifier, display name, input schema).
    Tools {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        naming: NamingArgs,

        /// Only show the tool with this identifier (e.g. `GET::pets`).
        #[arg(long, conflicts_with = "name")]
        id: Option<String>,

        /// Only show the tool with this display name.
        #[arg(long)]
        name: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List declared and used tags.
    Tags {
        #[command(flatten)]
        input: InputArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Summarize operations, tags and reference problems.
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Encode a method and path template into an identifier.
    Encode {
        method: String,
        path: String,
    },

    /// Decode an identifier into method and path template.
    Decode {
        id: String,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Derive a display name from arbitrary text.
    Abbreviate {
        text: String,

        #[command(flatten)]
        naming: NamingArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Document file (YAML or JSON), or `-` for stdin.
    #[arg(short, long)]
    spec: String,

    /// Document format: auto, json or yaml.
    #[arg(long, default_value = "auto")]
    input_format: FormatHint,

    /// Resolve references on worker threads.
    #[arg(long, env = "TOOLFORGE_CONCURRENT")]
    concurrent: bool,
}

impl InputArgs {
    fn load(&self) -> Result<ResolvedDocument, ToolforgeError> {
        let text = read_input(&self.spec)?;
        let options = LoadOptions {
            format: self.input_format,
            resolve: ResolveOptions {
                concurrent: self.concurrent,
            },
        };
        load(&text, options)
    }
}

#[derive(Args, Debug)]
struct NamingArgs {
    /// Prefix every name with this namespace.
    #[arg(long, env = "TOOLFORGE_NAMESPACE")]
    namespace: Option<String>,

    /// Only sanitize characters; no abbreviation or length bound.
    #[arg(long, env = "TOOLFORGE_DISABLE_ABBREVIATION")]
    disable_abbreviation: bool,
}

impl NamingArgs {
    fn options(&self) -> NamingOptions {
        NamingOptions {
            disable_abbreviation: self.disable_abbreviation,
            namespace: self.namespace.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match init_telemetry(&cli) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };
    tracing::debug!(
        log_level = %telemetry.config().log_level,
        log_format = ?telemetry.config().log_format,
        "logging ready"
    );

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_command_failed!(error = %e);
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn init_telemetry(cli: &Cli) -> Result<Telemetry, ToolforgeError> {
    let log_format = LogFormat::parse(&cli.log_format).ok_or_else(|| {
        ToolforgeError::InvalidArgument(format!(
            "unknown log format '{}' (expected json or pretty)",
            cli.log_format
        ))
    })?;
    let config = TelemetryConfig::new()
        .with_log_level(&cli.log_level)
        .with_log_format(log_format);
    Ok(Telemetry::init(config)?)
}

fn run(command: Commands) -> Result<(), ToolforgeError> {
    match command {
        Commands::Operations { input, format } => run_operations(&input.load()?, format),
        Commands::Tools {
            input,
            naming,
            id,
            name,
            format,
        } => {
            let selector = match (id, name) {
                (Some(id), _) => Some(ToolSelector::Id(id)),
                (None, Some(name)) => Some(ToolSelector::Name(name)),
                (None, None) => None,
            };
            run_tools(&input.load()?, &naming.options(), selector, format)
        }
        Commands::Tags { input, format } => {
            let doc = input.load()?;
            match format {
                OutputFormat::Json => print_json(&doc.tags()),
                OutputFormat::Text => {
                    for tag in doc.tags() {
                        println!("{}", tag);
                    }
                    Ok(())
                }
            }
        }
        Commands::Stats { input, format } => run_stats(&input.load()?, format),
        Commands::Encode { method, path } => {
            println!("{}", encode(&method, &path));
            Ok(())
        }
        Commands::Decode { id, format } => {
            let decoded = decode(&id)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "method": decoded.method,
                    "path": decoded.path,
                })),
                OutputFormat::Text => {
                    println!("{} {}", decoded.method, decoded.path);
                    Ok(())
                }
            }
        }
        Commands::Abbreviate { text, naming } => {
            println!("{}", abbreviate_with(&text, &naming.options())?);
            Ok(())
        }
    }
}

fn run_operations(doc: &ResolvedDocument, format: OutputFormat) -> Result<(), ToolforgeError> {
    if format == OutputFormat::Json {
        return print_json(&doc.operations());
    }
    for op in doc.operations() {
        println!(
            "{:<7} {} {}",
            op.method,
            op.path,
            op.operation_id.as_deref().unwrap_or("-")
        );
    }
    report_warnings(doc);
    Ok(())
}

enum ToolSelector {
    Id(String),
    Name(String),
}

fn run_tools(
    doc: &ResolvedDocument,
    options: &NamingOptions,
    selector: Option<ToolSelector>,
    format: OutputFormat,
) -> Result<(), ToolforgeError> {
    let catalog = ToolCatalog::build(doc, options)?;
    let tools = match &selector {
        None => catalog.tools(),
        Some(selector) => {
            let found = match selector {
                ToolSelector::Id(id) => catalog.find_by_id(id),
                ToolSelector::Name(name) => catalog.find(name),
            };
            let tool = found.ok_or_else(|| {
                ToolforgeError::InvalidArgument(match selector {
                    ToolSelector::Id(id) => format!("no tool with identifier '{id}'"),
                    ToolSelector::Name(name) => format!("no tool named '{name}'"),
                })
            })?;
            std::slice::from_ref(tool)
        }
    };

    if format == OutputFormat::Json {
        return print_json(tools);
    }
    for tool in tools {
        println!("{}\t{}\t{} {}", tool.name, tool.id, tool.method, tool.path);
    }
    report_warnings(doc);
    Ok(())
}

fn run_stats(doc: &ResolvedDocument, format: OutputFormat) -> Result<(), ToolforgeError> {
    let stats = CatalogStats::compute(doc);
    if format == OutputFormat::Json {
        return print_json(&stats);
    }

    println!(
        "{}: {} operation(s)",
        doc.title().unwrap_or("untitled"),
        stats.operations
    );
    for (method, count) in &stats.by_method {
        println!("  {:<7} {}", method, count);
    }
    if !stats.by_tag.is_empty() {
        println!("tags:");
        for (tag, count) in &stats.by_tag {
            println!("  {} {}", tag, count);
        }
    }
    println!("untagged: {}", stats.untagged);
    println!("deprecated: {}", stats.deprecated);
    println!("with unresolved references: {}", stats.with_fallbacks);
    report_warnings(doc);
    Ok(())
}

/// Summarize reference problems on stderr (text output only).
fn report_warnings(doc: &ResolvedDocument) {
    if doc.warnings().is_empty() {
        return;
    }
    eprintln!("{} reference warning(s):", doc.warnings().len());
    for warning in doc.warnings() {
        eprintln!("  {}", warning.message);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ToolforgeError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_input(spec: &str) -> Result<String, ToolforgeError> {
    if spec == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| ToolforgeError::Io {
                path: "<stdin>".to_string(),
                source,
            })?;
        return Ok(text);
    }
    std::fs::read_to_string(spec).map_err(|source| ToolforgeError::Io {
        path: spec.to_string(),
        source,
    })
}
