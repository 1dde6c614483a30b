//! Audit and report retrieval with findings filtering.
//!
//! Resolves an artifact directory through [`crate::resolver`] and loads
//! either a single named document (`report`, `architecture`, `strategies`)
//! or the `findings/` subdirectory with optional subsystem and severity
//! filters. All expected absences — unknown skill, no previous run,
//! document not yet produced, empty findings — come back as notices; only
//! genuine I/O failures and invalid input are errors.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::Reply;
use crate::resolver::{self};

/// Subdirectory of an artifact directory holding individual findings.
const FINDINGS_DIR: &str = "findings";

/// A single named artifact document.
#[derive(Debug, Serialize)]
pub struct DocumentPayload {
    pub skill: String,
    pub directory: String,
    pub document: String,
    pub content: String,
}

/// One finding document, identified by its file name within `findings/`.
#[derive(Debug, Serialize)]
pub struct Finding {
    pub name: String,
    pub path: String,
    pub content: String,
}

/// The filtered findings of one artifact directory.
#[derive(Debug, Serialize)]
pub struct FindingsPayload {
    pub skill: String,
    pub directory: String,
    pub count: usize,
    pub findings: Vec<Finding>,
}

/// Response payload for the `audit` operation.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AuditPayload {
    Document(DocumentPayload),
    Findings(FindingsPayload),
}

/// Core audit retrieval used by the CLI, HTTP server, and MCP bridge.
///
/// `reference` is `None`/`"current"`, `"previous"`, or an explicit
/// relative path; `doc_type` is one of `report`, `architecture`,
/// `strategies`, `findings`.
pub fn get_audit(
    config: &Config,
    skill_id: &str,
    reference: Option<&str>,
    doc_type: &str,
    subsystem: Option<&str>,
    severity: Option<&str>,
) -> Result<Reply<AuditPayload>> {
    match doc_type {
        "report" | "architecture" | "strategies" | "findings" => {}
        other => anyhow::bail!(
            "Unknown document type: {}. Use report, findings, architecture, or strategies.",
            other
        ),
    }

    let Some(roots) = resolver::skill_roots(skill_id) else {
        return Ok(Reply::notice(format!(
            "Unknown skill '{}'. Known skills: {}.",
            skill_id,
            resolver::known_skill_ids()
        )));
    };

    let root = &config.project.root;
    let Some(dir) = resolver::resolve(root, roots, reference)? else {
        return Ok(Reply::notice(format!(
            "No previous {} run found. Start one with {}.",
            skill_id, roots.start_command
        )));
    };

    if doc_type == "findings" {
        return load_findings(skill_id, &dir, subsystem, severity);
    }

    let doc_path = dir.join(format!("{}.md", doc_type));
    match read_optional(&doc_path)? {
        Some(content) => Ok(Reply::Data(AuditPayload::Document(DocumentPayload {
            skill: skill_id.to_string(),
            directory: dir.display().to_string(),
            document: doc_type.to_string(),
            content,
        }))),
        None if dir.is_dir() => Ok(Reply::notice(format!(
            "{} exists, but no {} document has been produced yet.",
            dir.display(),
            doc_type
        ))),
        None => Ok(Reply::notice(format!(
            "Artifact directory {} does not exist. Start with {}.",
            dir.display(),
            roots.start_command
        ))),
    }
}

/// Enumerate and filter the `findings/` subdirectory.
///
/// Filters apply in order and AND together: subsystem is a
/// case-insensitive substring over the full document text; severity
/// matches the uppercased token (findings carry `Severity: HIGH` style
/// markers). A missing or empty directory is a zero-count payload.
fn load_findings(
    skill_id: &str,
    dir: &Path,
    subsystem: Option<&str>,
    severity: Option<&str>,
) -> Result<Reply<AuditPayload>> {
    let findings_dir = dir.join(FINDINGS_DIR);
    let mut findings = Vec::new();

    let entries = match std::fs::read_dir(&findings_dir) {
        Ok(entries) => Some(entries),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    if let Some(entries) = entries {
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        for path in paths {
            // A finding removed between listing and reading is the same
            // as one that never existed.
            let Some(content) = read_optional(&path)? else {
                continue;
            };

            if let Some(sub) = subsystem {
                if !content.to_lowercase().contains(&sub.to_lowercase()) {
                    continue;
                }
            }
            if let Some(sev) = severity {
                if !content.contains(&sev.to_uppercase()) {
                    continue;
                }
            }

            findings.push(Finding {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                path: path.display().to_string(),
                content,
            });
        }
    }

    Ok(Reply::Data(AuditPayload::Findings(FindingsPayload {
        skill: skill_id.to_string(),
        directory: dir.display().to_string(),
        count: findings.len(),
        findings,
    })))
}

/// Read a file, mapping "not found" to `None` and propagating other
/// I/O errors untransformed.
fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// CLI entry point for `svki audit`.
pub fn run_audit(
    config: &Config,
    skill_id: &str,
    reference: Option<&str>,
    doc_type: &str,
    subsystem: Option<&str>,
    severity: Option<&str>,
) -> Result<()> {
    match get_audit(config, skill_id, reference, doc_type, subsystem, severity)? {
        Reply::Notice { text } => println!("{}", text),
        Reply::Data(AuditPayload::Document(doc)) => {
            println!("--- {} ({}) ---", doc.document, doc.directory);
            println!("{}", doc.content);
        }
        Reply::Data(AuditPayload::Findings(f)) => {
            println!("{} finding(s) in {}", f.count, f.directory);
            for finding in &f.findings {
                println!();
                println!("--- {} ---", finding.name);
                println!("{}", finding.content);
            }
        }
    }
    Ok(())
}
