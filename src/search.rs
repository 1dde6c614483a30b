//! Full-text search across the artifact corpus.
//!
//! Literal, case-insensitive substring matching over the files the
//! [`Collector`](crate::collector::Collector) yields for a scope's root
//! set. Each matching line is reported with a fixed-size excerpt window
//! (two lines of context either side by default, fewer at file
//! boundaries), capped per file so one enormous log-style document cannot
//! drown the results. No ranking — matches are grouped per file and
//! sorted by path for deterministic output.
//!
//! # Scopes
//!
//! Each scope names an explicit root-directory set. `all` is its own set,
//! not computed as a union at request time, so scope semantics stay
//! independently testable and `decisions` (a subdirectory of the docs
//! root) never silently widens.
//!
//! | Scope | Roots |
//! |-------|-------|
//! | `docs` | `docs/` |
//! | `audit` | `audits/` |
//! | `decisions` | `docs/decisions/` |
//! | `all` | `docs/`, `audits/`, `verification/` |

use anyhow::{bail, Result};
use serde::Serialize;

use crate::collector::Collector;
use crate::config::Config;
use crate::models::Reply;

fn scope_roots(scope: &str) -> Result<&'static [&'static str]> {
    match scope {
        "docs" => Ok(&["docs"]),
        "audit" => Ok(&["audits"]),
        "decisions" => Ok(&["docs/decisions"]),
        "all" => Ok(&["docs", "audits", "verification"]),
        other => bail!(
            "Unknown search scope: {}. Use docs, audit, decisions, or all.",
            other
        ),
    }
}

/// One matching line with its surrounding excerpt.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    /// 1-based line number of the matching line.
    pub line: usize,
    pub excerpt: String,
}

/// All matches within one file, in line order.
#[derive(Debug, Serialize)]
pub struct FileMatches {
    /// Path relative to the project root where possible.
    pub path: String,
    pub matches: Vec<SearchMatch>,
}

/// Response payload for the `search` operation.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub scope: String,
    pub total_matches: usize,
    pub files: Vec<FileMatches>,
}

/// Core search function used by the CLI, HTTP server, and MCP bridge.
///
/// An empty or whitespace-only query is invalid input and a hard error.
/// Files that fail to read are skipped silently — a file vanishing
/// between listing and reading is the same as one that never existed.
pub fn search_artifacts(config: &Config, query: &str, scope: &str) -> Result<Reply<SearchReport>> {
    if query.trim().is_empty() {
        bail!("query must not be empty");
    }

    let roots = scope_roots(scope)?;
    let collector = Collector::new()?;
    let query_lower = query.to_lowercase();
    let project_root = &config.project.root;

    let mut files = Vec::new();
    for root in roots {
        for path in collector.walk(&project_root.join(root)) {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };

            let matches = match_lines(
                &content,
                &query_lower,
                config.search.context_lines,
                config.search.max_matches_per_file,
            );
            if matches.is_empty() {
                continue;
            }

            let display = path
                .strip_prefix(project_root)
                .unwrap_or(&path)
                .display()
                .to_string();
            files.push(FileMatches {
                path: display,
                matches,
            });
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    if files.is_empty() {
        return Ok(Reply::notice(format!(
            "No results for \"{}\" in scope '{}'.",
            query, scope
        )));
    }

    let total_matches = files.iter().map(|f| f.matches.len()).sum();
    Ok(Reply::Data(SearchReport {
        query: query.to_string(),
        scope: scope.to_string(),
        total_matches,
        files,
    }))
}

/// Scan content line by line for the (already lowercased) query, stopping
/// once `cap` excerpts have been recorded.
fn match_lines(content: &str, query_lower: &str, context: usize, cap: usize) -> Vec<SearchMatch> {
    let lines: Vec<&str> = content.lines().collect();
    let mut matches = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !line.to_lowercase().contains(query_lower) {
            continue;
        }

        let from = i.saturating_sub(context);
        let to = usize::min(i + context, lines.len().saturating_sub(1));
        matches.push(SearchMatch {
            line: i + 1,
            excerpt: lines[from..=to].join("\n"),
        });

        if matches.len() >= cap {
            break;
        }
    }

    matches
}

/// CLI entry point for `svki search`.
pub fn run_search(config: &Config, query: &str, scope: &str) -> Result<()> {
    match search_artifacts(config, query, scope)? {
        Reply::Notice { text } => println!("{}", text),
        Reply::Data(report) => {
            println!(
                "{} match(es) in {} file(s) for \"{}\" [scope: {}]",
                report.total_matches,
                report.files.len(),
                report.query,
                report.scope
            );
            for (i, file) in report.files.iter().enumerate() {
                println!();
                println!("{}. {} ({} match(es))", i + 1, file.path, file.matches.len());
                for m in &file.matches {
                    println!("    line {}:", m.line);
                    for excerpt_line in m.excerpt.lines() {
                        println!("        {}", excerpt_line);
                    }
                }
            }
        }
    }
    Ok(())
}
