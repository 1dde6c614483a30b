//! Core data model: skill state documents and the uniform response shape.
//!
//! A **skill state** is the JSON document each SVK skill overwrites on
//! every phase transition. The common schema (skill id, version, ordered
//! phase map, timestamp) is typed here; skill-specific fields are captured
//! in `extra` and interpreted by the per-skill formatters in
//! [`crate::progress`].
//!
//! [`Reply`] is the uniform response shape of every façade operation:
//! either a typed payload or a `{ "text": ... }` notice. Expected absences
//! (pipeline not run yet, no matches, no history) are notices, never
//! errors — callers branch on the variant instead of duck-typing.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Status of a single pipeline phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Complete,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::InProgress => "in_progress",
            PhaseStatus::Complete => "complete",
        }
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a skill's phase map.
///
/// Producers may attach progress counters next to `status`
/// (e.g. `"completed": 4, "total": 9`); those are preserved verbatim.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhaseRecord {
    pub status: PhaseStatus,
    #[serde(flatten)]
    pub counters: serde_json::Map<String, serde_json::Value>,
}

/// A skill's persisted state document, read-only to this service.
///
/// The `phases` map preserves the producer's insertion order — that order
/// *is* the pipeline topology, so it is modeled as an [`IndexMap`] rather
/// than a sorted or hashed map.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillState {
    #[serde(rename = "skill")]
    pub skill_id: String,
    pub version: String,
    pub updated_at: DateTime<Utc>,
    pub phases: IndexMap<String, PhaseRecord>,
    /// Skill-specific fields outside the common schema (batch counters,
    /// tier, wave numbers). Interpreted only by the progress formatters.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Derived summary of where a skill currently is in its pipeline.
///
/// Not persisted; computed fresh from a [`SkillState`] on every request.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentPhaseSummary {
    pub phase: String,
    pub status: PhaseStatus,
    pub progress: Option<String>,
    pub next_step: Option<String>,
}

/// Uniform response shape for all façade operations.
///
/// Serializes untagged: `Data` becomes the payload object itself, `Notice`
/// becomes `{ "text": "..." }`. Soft absences are `Notice` values carried
/// in an `Ok`; hard failures propagate as `anyhow::Error` instead.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Data(T),
    Notice { text: String },
}

impl<T> Reply<T> {
    pub fn notice(text: impl Into<String>) -> Self {
        Reply::Notice { text: text.into() }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self, Reply::Notice { .. })
    }
}
