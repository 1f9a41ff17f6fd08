//! Fit a document into a model's input budget and revise it.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable.
//!
//! # Examples
//!
//! ```sh
//! # Show what would be sent, without calling a model
//! docfit --document design.md --change "Add a REST endpoint" --dry-run
//!
//! # Revise with a tighter budget and a specific model
//! docfit --document design.md --change "Switch to PostgreSQL" \
//!   --budget 3000 --model anthropic/claude-sonnet-4
//!
//! # Pipe the document from stdin, settings from a config file
//! cat design.md | docfit --stdin --change "Harden auth" --config docfit.json
//! ```

use clap::Parser;
use docfit::prelude::*;
use std::io::{self, Read};
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Fit a document into a model's input budget and revise it.
///
/// Reads the API key from the OPENROUTER_KEY environment variable.
#[derive(Parser)]
#[command(name = "docfit")]
struct Cli {
    // ── Input ──────────────────────────────────────────────────
    /// Path to the document to revise
    #[arg(long, conflicts_with = "stdin")]
    document: Option<String>,

    /// Read the document from stdin
    #[arg(long)]
    stdin: bool,

    /// Change request to apply ("approved" returns the document as-is)
    #[arg(long)]
    change: String,

    // ── Budget / configuration ─────────────────────────────────
    /// Total token budget for document + change request + instructions
    #[arg(long)]
    budget: Option<usize>,

    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<String>,

    // ── Model ──────────────────────────────────────────────────
    /// Model to use for the revision
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens in the response
    #[arg(long, default_value_t = 4096)]
    max_tokens: u32,

    // ── Output mode ────────────────────────────────────────────
    /// Print the compacted document and statistics without calling a model
    #[arg(long)]
    dry_run: bool,

    /// Log debug detail to stderr
    #[arg(long, short)]
    verbose: bool,
}

// ── Helpers ────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default = if verbose { "docfit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_document(cli: &Cli) -> Result<String, String> {
    match (&cli.document, cli.stdin) {
        (Some(path), _) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read document '{path}': {e}")),
        (None, true) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            Ok(buf)
        }
        (None, false) => Err("provide --document or --stdin".to_string()),
    }
}

fn load_config(cli: &Cli) -> Result<ReviseConfig, String> {
    let config = match &cli.config {
        Some(path) => ReviseConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => ReviseConfig::default(),
    };
    Ok(match cli.budget {
        Some(budget) => {
            let compaction = config.compaction.clone().with_total_budget(budget);
            config.with_compaction(compaction)
        }
        None => config,
    })
}

fn dry_run(document: &str, change: &str, config: &ReviseConfig) -> String {
    if is_approval(change) {
        eprintln!("  Change request is an approval; the document would be returned as-is.");
        return document.to_string();
    }
    let result = compact_document(document, change, &config.compaction);
    eprintln!("  {}", result.to_log_string());
    if !result.headings.is_empty() {
        eprintln!("  {} heading(s) preserved", result.headings.len());
    }
    result.document
}

async fn run(cli: &Cli) -> Result<String, String> {
    let document = read_document(cli)?;
    let config = load_config(cli)?;

    if cli.dry_run {
        return Ok(dry_run(&document, &cli.change, &config));
    }

    let api_key =
        std::env::var("OPENROUTER_KEY").map_err(|_| "OPENROUTER_KEY not set".to_string())?;
    let client = OpenRouterClient::new(api_key)?;
    let generator = OpenRouterGenerator::new(client, &cli.model).with_max_tokens(cli.max_tokens);

    let revision = Reviser::new(&generator, config)
        .revise(&document, &cli.change)
        .await
        .map_err(|e| e.to_string())?;

    if revision.tier == RevisionTier::Aggressive {
        eprintln!("  Warning: document was revised from a truncated excerpt");
    }
    Ok(revision.content)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
