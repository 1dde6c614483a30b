//! # SVK Inspect CLI (`svki`)
//!
//! The `svki` binary is the primary interface for SVK Inspect. It provides
//! commands for pipeline status, audit document retrieval, artifact search,
//! and starting the MCP server.
//!
//! ## Usage
//!
//! ```bash
//! svki --config ./svk.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `svki status` | Show progress of every SVK skill pipeline |
//! | `svki audit <skill>` | Retrieve a report or findings from an audit run |
//! | `svki search "<query>"` | Full-text search across pipeline artifacts |
//! | `svki serve mcp` | Start the MCP-compatible HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Overview of all pipelines
//! svki status
//!
//! # Latest security-audit report
//! svki audit security-audit
//!
//! # Findings for the auth subsystem from the previous run, HIGH only
//! svki audit security-audit --audit previous --type findings \
//!     --subsystem auth --severity high
//!
//! # Search decision records
//! svki search "connection pooling" --scope decisions
//!
//! # Start MCP server for Cursor/Claude integration
//! svki serve mcp --config ./svk.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use svk_inspect::{audit, config, search, server, status};

/// SVK Inspect CLI — read-only status, audit, and search across SVK
/// skill pipeline artifacts.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file is absent, built-in defaults are used (project root
/// `.`, server bind `127.0.0.1:7431`).
#[derive(Parser)]
#[command(
    name = "svki",
    about = "SVK Inspect — status, audit retrieval, and search for SVK skill pipelines",
    version,
    long_about = "SVK Inspect is the read layer over SVK skill pipelines: it aggregates \
    per-skill JSON state into a unified status view, retrieves audit reports and filtered \
    findings from current or historical runs, and provides full-text search with contextual \
    excerpts across all pipeline artifacts. Exposed via CLI, HTTP tool API, and MCP."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./svk.toml`. Project root, server bind address, and
    /// search limits are read from this file; a missing file falls back
    /// to built-in defaults.
    #[arg(long, global = true, default_value = "./svk.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the status of all SVK skill pipelines.
    ///
    /// Reads every state file under `.svk/state/`, infers the current
    /// phase of each pipeline, and prints a per-skill table plus a
    /// one-line summary. Unreadable state files are skipped with a
    /// warning on stderr.
    Status,

    /// Retrieve an audit document or filtered findings.
    ///
    /// Resolves the requested run's artifact directory (current, the most
    /// recent historical snapshot, or an explicit path under the skill's
    /// history root) and returns either a single document or the findings
    /// collection.
    Audit {
        /// Skill pipeline to query: `doc-suite`, `security-audit`, or
        /// `verification`.
        skill: String,

        /// Which run to read: `current` (default), `previous`, or an
        /// explicit snapshot directory name under the skill's history root.
        #[arg(long)]
        audit: Option<String>,

        /// Document type: `report`, `findings`, `architecture`, or `strategies`.
        #[arg(long = "type", default_value = "report")]
        doc_type: String,

        /// Only include findings whose text mentions this subsystem
        /// (case-insensitive). Findings only.
        #[arg(long)]
        subsystem: Option<String>,

        /// Only include findings carrying this severity marker, e.g.
        /// `critical`, `high`, `medium`, `low`. Findings only.
        #[arg(long)]
        severity: Option<String>,
    },

    /// Search pipeline artifacts for a query string.
    ///
    /// Scans every text artifact in the chosen scope, prints matching
    /// lines with surrounding context, and groups results by file.
    Search {
        /// The search query string (matched case-insensitively).
        query: String,

        /// Search scope: `docs`, `audit`, `decisions`, or `all`.
        #[arg(long, default_value = "all")]
        scope: String,
    },

    /// Start the MCP-compatible HTTP server.
    ///
    /// Exposes status, audit, and search as tools via a JSON API for
    /// integration with Cursor, Claude, and other MCP-compatible AI tools.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },
}

/// Server subcommands.
#[derive(Subcommand)]
enum ServeService {
    /// Start the MCP tool server.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// the tool API plus the MCP endpoint at `/mcp`.
    Mcp,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Status => {
            status::run_status(&cfg)?;
        }
        Commands::Audit {
            skill,
            audit,
            doc_type,
            subsystem,
            severity,
        } => {
            audit::run_audit(
                &cfg,
                &skill,
                audit.as_deref(),
                &doc_type,
                subsystem.as_deref(),
                severity.as_deref(),
            )?;
        }
        Commands::Search { query, scope } => {
            search::run_search(&cfg, &query, &scope)?;
        }
        Commands::Serve {
            service: ServeService::Mcp,
        } => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
