//! CLI logic for the elkjson graph checker.
//!
//! [`run`] reads an ELK JSON document, parses it with the options from the
//! configuration file and the command line, and summarises the resulting
//! graph. Documents with errors are returned as [`CliError::Parse`] carrying
//! every diagnostic; warnings travel with the successful [`Report`].

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use config::{AppConfig, ConfigError, load_config};
pub use error::CliError;

use std::{fmt, fs};

use log::{debug, info};

use elkjson_core::{identifier::IdentifierGenerator, model::Document, query};
use elkjson_parser::{ParseOptions, config::RecoveryMode, error::Diagnostic, parse_with};

/// Element counts of a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub nodes: usize,
    pub ports: usize,
    pub edges: usize,
    pub labels: usize,
    pub unresolved: usize,
    pub hyperedges: usize,
    pub hierarchical: usize,
    /// Identifiers changed by `--generate-ids`.
    pub generated_ids: Option<usize>,
}

impl Summary {
    pub fn of(doc: &Document) -> Self {
        let edges: Vec<_> = doc.edges().map(|(id, _)| id).collect();
        Self {
            nodes: doc.node_count(),
            ports: doc.port_count(),
            edges: doc.edge_count(),
            labels: doc.label_count(),
            unresolved: doc.unresolved_endpoints().count(),
            hyperedges: edges
                .iter()
                .filter(|edge| query::is_hyperedge(doc, **edge))
                .count(),
            hierarchical: edges
                .iter()
                .filter(|edge| query::is_hierarchical(doc, **edge))
                .count(),
            generated_ids: None,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:        {}", self.nodes)?;
        writeln!(f, "ports:        {}", self.ports)?;
        writeln!(f, "edges:        {}", self.edges)?;
        writeln!(f, "  hyperedges:   {}", self.hyperedges)?;
        writeln!(f, "  hierarchical: {}", self.hierarchical)?;
        writeln!(f, "labels:       {}", self.labels)?;
        write!(f, "unresolved:   {}", self.unresolved)?;
        if let Some(generated) = self.generated_ids {
            write!(f, "\ngenerated ids: {generated}")?;
        }
        Ok(())
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Report {
    pub document: Document,
    pub summary: Summary,
    /// Warnings reported while parsing.
    pub warnings: Vec<Diagnostic>,
    /// The input text, for rendering the warnings.
    pub source: String,
}

/// Parser options from the configuration, overridden by command-line flags.
fn parse_options(args: &Args, config: &AppConfig) -> ParseOptions {
    let options = *config.parser();
    if args.no_recovery {
        options.with_recovery(RecoveryMode::Abort)
    } else {
        options
    }
}

/// Run the elkjson CLI application
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Documents with lexical, syntax or resolution errors
pub fn run(args: &Args) -> Result<Report, CliError> {
    info!(input_path = args.input; "Checking document");

    let app_config = config::load_config(args.config.as_ref())?;
    let options = parse_options(args, &app_config);
    debug!(options:?; "Parser options");

    let source = fs::read_to_string(&args.input)?;
    let output = parse_with(&source, &options);

    if let Some(doc) = output.document() {
        let summary = Summary::of(doc);
        info!(
            nodes = summary.nodes,
            ports = summary.ports,
            edges = summary.edges,
            labels = summary.labels,
            unresolved = summary.unresolved;
            "Document summary"
        );
    }

    if output.has_errors() {
        let (_, diagnostics) = output.into_parts();
        return Err(CliError::new_parse_error(diagnostics.into(), source));
    }

    let (document, warnings) = output.into_parts();
    let Some(mut document) = document else {
        return Err(CliError::new_parse_error(warnings.into(), source));
    };

    let generated_ids = args.generate_ids.then(|| {
        IdentifierGenerator::for_document(&mut document)
            .validate()
            .generate()
            .unique()
            .execute()
    });
    let summary = Summary {
        generated_ids,
        ..Summary::of(&document)
    };

    info!(warnings = warnings.len(); "Document checked");

    Ok(Report {
        document,
        summary,
        warnings,
        source,
    })
}
