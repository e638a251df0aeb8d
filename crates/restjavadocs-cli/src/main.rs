//! restjavadocs: print field and request-parameter descriptors for Java sources.
//!
//! This CLI provides access to restjavadocs functionality for:
//! - Documenting the payload fields of a bean (optionally as a page)
//! - Documenting the `@RequestParam`s of a Spring controller, filtered by mapping
//! - Documenting request parameters bound to a bean
//! - Scanning a source tree for every documented field and parameter

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use restjavadocs::{
    config::Config,
    filter::{FilterMap, METHOD, NAME, PATH},
    payload, request,
    source::{find_java_sources, load_file},
    Descriptor, FieldDescriptorVisitor, JacksonFieldVisitor, SpringWebParameterVisitor,
};
use serde::Serialize;

/// Exit codes for the CLI
///
/// - 0: Success (at least one descriptor)
/// - 1: Not found (valid query, no descriptors)
/// - 2: Error (invalid input, missing class, malformed Javadoc, etc.)
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const NOT_FOUND: u8 = 1;
    pub const ERROR: u8 = 2;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
    Text,
}

/// Field and request-parameter descriptors from annotated Java sources
#[derive(Parser)]
#[command(name = "restjavadocs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Project root holding `.restjavadocs.toml` (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Resolve classes under the test source root instead of the main one
    #[arg(long, global = true)]
    tests: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the payload fields of a bean
    Fields {
        /// Fully-qualified class name (e.g. "com.example.beans.Person")
        class: String,

        /// Only document fields carrying this annotation
        #[arg(long, value_name = "NAME")]
        annotated: Option<String>,

        /// Ignore Jackson annotations and document plain fields
        #[arg(long)]
        plain: bool,

        /// Nest the fields under `content[]` of a Spring Data page
        #[arg(long)]
        paginated: bool,
    },

    /// Describe the request parameters of a controller's handler methods
    Params {
        /// Fully-qualified controller class name
        class: String,

        /// Mapping filter as a flat JSON object, e.g. '{"path": "/users"}'
        #[arg(long, value_name = "JSON", conflicts_with_all = ["path", "method", "name"])]
        filter: Option<String>,

        /// Required mapping path (repeatable)
        #[arg(long)]
        path: Vec<String>,

        /// Required request method, e.g. RequestMethod.GET (repeatable)
        #[arg(long)]
        method: Vec<String>,

        /// Required mapping name
        #[arg(long)]
        name: Option<String>,

        /// Append the page, size and sort parameters of a paged request
        #[arg(long)]
        paginated: bool,
    },

    /// Describe request parameters bound to the fields of a bean
    BeanParams {
        /// Fully-qualified class name
        class: String,

        /// Only document fields carrying this annotation
        #[arg(long, value_name = "NAME")]
        annotated: Option<String>,

        /// Ignore Jackson annotations and document plain fields
        #[arg(long)]
        plain: bool,
    },

    /// Describe every class under a directory
    Scan {
        /// Directory to scan (defaults to the configured source root)
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            if format == OutputFormat::Json {
                let error_json = serde_json::json!({
                    "error": error_kind(&e),
                    "message": format!("{:#}", e),
                });
                eprintln!("{}", error_json);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

/// Name of the library error at the root of `e`, if any.
fn error_kind(e: &anyhow::Error) -> &'static str {
    use restjavadocs::Error;
    match e.downcast_ref::<Error>() {
        Some(Error::IoError(_)) => "IoError",
        Some(Error::ParseError { .. }) => "ParseError",
        Some(Error::InvalidFilter(_)) => "InvalidFilter",
        Some(Error::InvalidFilterJson(_)) => "InvalidFilterJson",
        Some(Error::SerializationError(_)) => "SerializationError",
        Some(Error::MalformedJavadoc(_)) => "MalformedJavadoc",
        Some(Error::UnsupportedLiteral(_)) => "UnsupportedLiteral",
        Some(Error::NotVisited) => "NotVisited",
        Some(Error::InvalidClassName(_)) => "InvalidClassName",
        Some(Error::ClassNotFound(_)) => "ClassNotFound",
        None => "CommandFailed",
    }
}

fn run(cli: Cli) -> Result<u8> {
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("Failed to resolve root directory {}", cli.root.display()))?;
    let config = Config::load(&root);
    let source_root = if cli.tests {
        config.test_source_root_in(&root)
    } else {
        config.source_root_in(&root)
    };
    let format = cli.format;

    match cli.command {
        Commands::Fields {
            class,
            annotated,
            plain,
            paginated,
        } => {
            let jackson = config.jackson_aware && !plain;
            let gate = annotated.as_deref();
            let descriptors = if paginated {
                payload::paginated_fields(&source_root, &class, gate, jackson)
            } else {
                payload::fields(&source_root, &class, gate, jackson)
            }
            .with_context(|| format!("Failed to describe fields of {}", class))?;
            print_descriptors(&descriptors, format)
        }
        Commands::Params {
            class,
            filter,
            path,
            method,
            name,
            paginated,
        } => {
            let filter = match filter {
                Some(json) => FilterMap::from_json(&json)?,
                None => filter_from_args(&path, &method, name.as_deref()),
            };
            let mut descriptors = request::descriptors(&source_root, &class, &filter)
                .with_context(|| format!("Failed to describe parameters of {}", class))?;
            if paginated {
                descriptors.extend(request::pagination_parameters());
            }
            print_descriptors(&descriptors, format)
        }
        Commands::BeanParams {
            class,
            annotated,
            plain,
        } => {
            let jackson = config.jackson_aware && !plain;
            let descriptors =
                request::parameters(&source_root, &class, annotated.as_deref(), jackson)
                    .with_context(|| format!("Failed to describe parameters of {}", class))?;
            print_descriptors(&descriptors, format)
        }
        Commands::Scan { dir } => {
            let dir = dir.map(|d| root.join(d)).unwrap_or(source_root);
            cmd_scan(&dir, &config, format)
        }
    }
}

fn filter_from_args(path: &[String], method: &[String], name: Option<&str>) -> FilterMap {
    let mut filter = FilterMap::new();
    if let Some(name) = name {
        filter.insert(NAME, [name]);
    }
    if !path.is_empty() {
        filter.insert(PATH, path);
    }
    if !method.is_empty() {
        filter.insert(METHOD, method);
    }
    filter
}

fn print_descriptors(descriptors: &[Descriptor], format: OutputFormat) -> Result<u8> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(descriptors)?),
        OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(descriptors)?),
        OutputFormat::Text => {
            for descriptor in descriptors {
                println!("{}", descriptor);
            }
        }
    }
    Ok(found(!descriptors.is_empty()))
}

fn found(any: bool) -> u8 {
    if any {
        exit_codes::SUCCESS
    } else {
        exit_codes::NOT_FOUND
    }
}

/// Descriptors of one class found by `scan`.
#[derive(Debug, Serialize)]
struct ClassReport {
    file: PathBuf,
    class: String,
    fields: Vec<Descriptor>,
    params: Vec<Descriptor>,
}

fn cmd_scan(dir: &Path, config: &Config, format: OutputFormat) -> Result<u8> {
    let files = find_java_sources(dir, &config.excluded_dirs(), config.respect_gitignore)
        .context("Failed to find Java sources")?;

    // Parse and visit files in parallel using rayon; every file gets its own visitors
    let results: Vec<_> = files
        .par_iter()
        .map(|file| {
            scan_file(file, config.jackson_aware).map_err(|e| format!("{}: {}", file.display(), e))
        })
        .collect();

    let mut reports = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(file_reports) => reports.extend(file_reports),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        eprintln!("Warnings:");
        for error in errors.iter().take(10) {
            eprintln!("  {}", error);
        }
        if errors.len() > 10 {
            eprintln!("  ... and {} more", errors.len() - 10);
        }
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&reports)?),
        OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                println!("{} ({})", report.class, report.file.display());
                for field in &report.fields {
                    println!("  field {}", field);
                }
                for param in &report.params {
                    println!("  param {}", param);
                }
            }
        }
    }

    let any = reports
        .iter()
        .any(|r| !r.fields.is_empty() || !r.params.is_empty());
    Ok(found(any))
}

fn scan_file(file: &Path, jackson_aware: bool) -> restjavadocs::Result<Vec<ClassReport>> {
    let unit = load_file(file)?;
    let mut reports = Vec::new();
    for class in &unit.classes {
        let fields = if jackson_aware {
            JacksonFieldVisitor::new().visit_class(class, None)?
        } else {
            FieldDescriptorVisitor::new().visit_class(class, None)?
        };
        let params = SpringWebParameterVisitor::new(FilterMap::new()).visit_class(class, None)?;
        if fields.is_empty() && params.is_empty() {
            continue;
        }
        reports.push(ClassReport {
            file: file.to_path_buf(),
            class: class.qualified.clone(),
            fields,
            params,
        });
    }
    Ok(reports)
}
