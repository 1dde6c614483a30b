//! Project-wide status aggregation.
//!
//! Composes the state normalizer, progress formatters, hint tables, and
//! history counts into one record per discovered skill. Used by both the
//! `svki status` CLI command and the `status` tool on the server surfaces.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::models::{PhaseStatus, Reply};
use crate::progress::FormatterRegistry;
use crate::resolver;
use crate::state::{self, current_phase, list_states};

/// One skill's normalized status.
#[derive(Debug, Clone, Serialize)]
pub struct SkillStatus {
    pub skill: String,
    pub version: String,
    pub phase: String,
    pub status: PhaseStatus,
    pub progress: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub next_step: Option<String>,
    /// Number of historical snapshots under the skill's history root.
    /// Informational; zero when the root is absent.
    pub history_count: usize,
}

/// Response payload for the `status` operation.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub skills: Vec<SkillStatus>,
    pub summary: String,
}

/// Core status function used by the CLI, HTTP server, and MCP bridge.
///
/// Re-reads every state document on each call; there is no cache. No
/// state at all yields an explanatory notice, not an empty success.
pub fn project_status(config: &Config) -> Result<Reply<StatusReport>> {
    let root = &config.project.root;
    let states = list_states(root)?;

    if states.is_empty() {
        return Ok(Reply::notice(format!(
            "No SVK state found under {}. Start a pipeline with {}.",
            state::state_dir(root).display(),
            resolver::SKILLS
                .iter()
                .map(|s| s.start_command)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    let formatters = FormatterRegistry::with_builtins();
    let mut skills = Vec::new();

    for st in &states {
        let current = current_phase(st, &formatters);
        let history_count = resolver::skill_roots(&st.skill_id)
            .map(|roots| resolver::history_count(root, roots))
            .unwrap_or(0);

        skills.push(SkillStatus {
            skill: st.skill_id.clone(),
            version: st.version.clone(),
            phase: current.phase,
            status: current.status,
            progress: current.progress,
            updated_at: st.updated_at,
            next_step: current.next_step,
            history_count,
        });
    }

    let summary = skills
        .iter()
        .map(|s| format!("{}: {} ({})", s.skill, s.phase, s.status))
        .collect::<Vec<_>>()
        .join("; ");

    Ok(Reply::Data(StatusReport { skills, summary }))
}

/// CLI entry point for `svki status`.
///
/// Calls [`project_status`] and prints a formatted table to stdout.
pub fn run_status(config: &Config) -> Result<()> {
    match project_status(config)? {
        Reply::Notice { text } => println!("{}", text),
        Reply::Data(report) => {
            println!(
                "{:<16} {:<12} {:<12} {:<24} {:>7}",
                "SKILL", "PHASE", "STATUS", "PROGRESS", "HISTORY"
            );
            for s in &report.skills {
                println!(
                    "{:<16} {:<12} {:<12} {:<24} {:>7}",
                    s.skill,
                    s.phase,
                    s.status.as_str(),
                    s.progress.as_deref().unwrap_or("-"),
                    s.history_count
                );
                if let Some(ref next) = s.next_step {
                    println!("    next: {}", next);
                }
            }
            println!();
            println!("{}", report.summary);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_at(root: &std::path::Path) -> Config {
        let mut cfg = Config::minimal();
        cfg.project.root = root.to_path_buf();
        cfg
    }

    #[test]
    fn test_no_state_yields_notice() {
        let tmp = TempDir::new().unwrap();
        let reply = project_status(&config_at(tmp.path())).unwrap();
        match reply {
            Reply::Notice { text } => assert!(text.contains("No SVK state found")),
            Reply::Data(_) => panic!("expected notice for an empty project"),
        }
    }

    #[test]
    fn test_status_composes_phase_progress_and_history() {
        let tmp = TempDir::new().unwrap();
        let state_dir = tmp.path().join(".svk/state");
        fs::create_dir_all(&state_dir).unwrap();
        fs::write(
            state_dir.join("security-audit.json"),
            r#"{
                "skill": "security-audit",
                "version": "1.2.0",
                "updated_at": "2026-03-01T12:00:00Z",
                "phases": {
                    "recon": { "status": "complete" },
                    "analysis": { "status": "in_progress" },
                    "findings": { "status": "pending" },
                    "report": { "status": "pending" }
                },
                "wave": 2,
                "waves_total": 3
            }"#,
        )
        .unwrap();
        fs::create_dir_all(tmp.path().join("audits/history/2026-01-01")).unwrap();

        let reply = project_status(&config_at(tmp.path())).unwrap();
        let report = match reply {
            Reply::Data(r) => r,
            Reply::Notice { text } => panic!("unexpected notice: {}", text),
        };

        assert_eq!(report.skills.len(), 1);
        let s = &report.skills[0];
        assert_eq!(s.skill, "security-audit");
        assert_eq!(s.phase, "analysis");
        assert_eq!(s.status, PhaseStatus::InProgress);
        assert_eq!(s.progress.as_deref(), Some("wave 2/3"));
        assert_eq!(
            s.next_step.as_deref(),
            Some("/svk:security-audit analysis --resume")
        );
        assert_eq!(s.history_count, 1);
        assert!(report.summary.contains("security-audit: analysis (in_progress)"));
    }
}
