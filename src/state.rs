//! Skill state discovery and phase inference.
//!
//! Each skill persists one JSON state document under `.svk/state/`. This
//! module discovers those documents, parses them fail-soft (one corrupt
//! producer must never blind the caller to every other skill's status),
//! and reduces the ordered phase map to a single current-phase summary.
//!
//! # Current-phase precedence
//!
//! 1. The first phase with status `in_progress`, in declared order. If a
//!    producer violates the at-most-one-in-progress invariant, the first
//!    one encountered wins — preserved as defined behavior.
//! 2. Otherwise, the **last** phase in declared order with status
//!    `complete`.
//! 3. Otherwise (all pending), the first phase.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::hints::next_step_hint;
use crate::models::{CurrentPhaseSummary, PhaseStatus, SkillState};
use crate::progress::FormatterRegistry;

/// Conventional location of skill state documents under a project root.
pub const STATE_DIR: &str = ".svk/state";

pub fn state_dir(project_root: &Path) -> PathBuf {
    project_root.join(STATE_DIR)
}

/// Discover and parse all skill state documents under a project root.
///
/// A missing state directory yields an empty vec. Documents that fail to
/// parse (or violate the non-empty-phases invariant) are skipped with a
/// warning on stderr; the scan continues over the rest. Results are
/// sorted by skill id for deterministic output.
pub fn list_states(project_root: &Path) -> Result<Vec<SkillState>> {
    let dir = state_dir(project_root);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to list {}", dir.display()))
        }
    };

    let mut states = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match load_state(&path) {
            Ok(state) => states.push(state),
            Err(e) => {
                eprintln!(
                    "Warning: skipping invalid state file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    states.sort_by(|a, b| a.skill_id.cmp(&b.skill_id));
    Ok(states)
}

fn load_state(path: &Path) -> Result<SkillState> {
    let content = std::fs::read_to_string(path)?;
    let state: SkillState = serde_json::from_str(&content)?;
    if state.phases.is_empty() {
        anyhow::bail!("state document has an empty phase map");
    }
    Ok(state)
}

/// Reduce a state's phase map to its current phase, with progress text
/// from the formatter registry and a next-step hint from the topology
/// tables. Never fails: unknown skills simply get no progress or hint.
pub fn current_phase(state: &SkillState, formatters: &FormatterRegistry) -> CurrentPhaseSummary {
    let (phase, status) = infer_current(state);
    let next_step = next_step_hint(&state.skill_id, &phase, status);
    CurrentPhaseSummary {
        phase,
        status,
        progress: formatters.format(state),
        next_step,
    }
}

fn infer_current(state: &SkillState) -> (String, PhaseStatus) {
    if let Some((name, _)) = state
        .phases
        .iter()
        .find(|(_, rec)| rec.status == PhaseStatus::InProgress)
    {
        return (name.clone(), PhaseStatus::InProgress);
    }

    if let Some((name, _)) = state
        .phases
        .iter()
        .filter(|(_, rec)| rec.status == PhaseStatus::Complete)
        .last()
    {
        return (name.clone(), PhaseStatus::Complete);
    }

    match state.phases.first() {
        Some((name, _)) => (name.clone(), PhaseStatus::Pending),
        // Unreachable for states produced by load_state, which rejects
        // empty phase maps.
        None => (String::new(), PhaseStatus::Pending),
    }
}
