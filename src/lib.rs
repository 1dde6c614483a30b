//! # SVK Inspect
//!
//! **Read-only status, audit retrieval, and artifact search for SVK
//! skill pipelines.**
//!
//! SVK skills — a documentation generator, a security auditor, a
//! verification pipeline — each persist progress as JSON state files and
//! write human-readable artifacts to per-skill directories. No skill sees
//! the others. SVK Inspect is the cross-cutting read layer: it normalizes
//! heterogeneous state into one status view, resolves current and
//! historical artifact snapshots, and provides full-text search with
//! excerpts across the whole artifact corpus.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌────────────┐
//! │ Collector  │──▶│  Normalizer   │   │  Resolver  │
//! │ walk+prune │   │ state/phases  │   │ cur/prev   │
//! └────────────┘   └──────┬────────┘   └─────┬──────┘
//!                         │                  │
//!                  ┌──────┴──────────────────┤
//!                  ▼                         ▼
//!            ┌───────────────────────────────────┐
//!            │    Query façade: status/audit/    │
//!            │              search               │
//!            └─────┬───────────┬───────────┬─────┘
//!                  ▼           ▼           ▼
//!              ┌──────┐   ┌─────────┐  ┌───────┐
//!              │ CLI  │   │  HTTP   │  │  MCP  │
//!              │(svki)│   │ /tools  │  │ /mcp  │
//!              └──────┘   └─────────┘  └───────┘
//! ```
//!
//! Data flows one direction: request → façade → (normalizer | resolver |
//! collector) → formatted response. There is no cache and no shared
//! mutable state; every request re-reads the filesystem, so concurrent
//! calls are safe by construction and externally-modified files are
//! always seen fresh.
//!
//! ## Response Shape
//!
//! Every operation returns either a typed payload or a `{ "text": ... }`
//! notice ([`models::Reply`]). Expected absences — pipeline not run yet,
//! no matches, no history — are notices; only I/O failures and invalid
//! input are errors.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with defaults and validation |
//! | [`models`] | Core data types: `SkillState`, `PhaseRecord`, `Reply` |
//! | [`collector`] | Lazy directory walking with pruning and extension filtering |
//! | [`state`] | State discovery, fail-soft parsing, phase inference |
//! | [`progress`] | Per-skill progress formatter registry |
//! | [`hints`] | Phase-topology next-step suggestions |
//! | [`resolver`] | Artifact directory resolution (current/previous/explicit) |
//! | [`status`] | Project-wide status aggregation |
//! | [`audit`] | Report retrieval and findings filtering |
//! | [`search`] | Full-text search with contextual excerpts |
//! | [`traits`] | `Tool` trait, `ToolContext`, `ToolRegistry` |
//! | [`server`] | HTTP tool API (Axum) with CORS |
//! | [`mcp`] | MCP JSON-RPC bridge (rmcp, Streamable HTTP) |

pub mod audit;
pub mod collector;
pub mod config;
pub mod hints;
pub mod mcp;
pub mod models;
pub mod progress;
pub mod resolver;
pub mod search;
pub mod server;
pub mod state;
pub mod status;
pub mod traits;

pub use models::{CurrentPhaseSummary, PhaseRecord, PhaseStatus, Reply, SkillState};
pub use traits::{AuditTool, SearchTool, StatusTool, Tool, ToolContext, ToolRegistry};
