//! Per-skill progress formatting.
//!
//! Each skill reports progress through different `extra` fields in its
//! state document: the documentation suite counts topics, the security
//! auditor counts analysis waves, the verification pipeline tracks named
//! check counters. Rather than a chain of skill-id branches, formatting is
//! a registry of [`ProgressFormatter`] implementations keyed by skill id —
//! adding a skill is a data-table edit, not a control-flow change.
//!
//! Unknown skill ids produce no progress text. They never error.

use crate::models::SkillState;

/// Formats one skill's `extra` fields into a short progress string.
pub trait ProgressFormatter: Send + Sync {
    /// The skill id this formatter handles (e.g. `"doc-suite"`).
    fn skill_id(&self) -> &str;

    /// Produce progress text from the state's extra fields, or `None`
    /// when the fields this formatter reads are absent.
    fn format(&self, state: &SkillState) -> Option<String>;
}

fn extra_u64(state: &SkillState, key: &str) -> Option<u64> {
    state.extra.get(key).and_then(|v| v.as_u64())
}

/// `doc-suite` — "N/M topics".
struct DocSuiteProgress;

impl ProgressFormatter for DocSuiteProgress {
    fn skill_id(&self) -> &str {
        "doc-suite"
    }

    fn format(&self, state: &SkillState) -> Option<String> {
        let done = extra_u64(state, "topics_done")?;
        let total = extra_u64(state, "topics_total")?;
        Some(format!("{}/{} topics", done, total))
    }
}

/// `security-audit` — "wave X/Y".
struct SecurityAuditProgress;

impl ProgressFormatter for SecurityAuditProgress {
    fn skill_id(&self) -> &str {
        "security-audit"
    }

    fn format(&self, state: &SkillState) -> Option<String> {
        let wave = extra_u64(state, "wave")?;
        let total = extra_u64(state, "waves_total")?;
        Some(format!("wave {}/{}", wave, total))
    }
}

/// `verification` — named check counters, e.g. "3 passed, 1 failed, 2 pending".
struct VerificationProgress;

impl ProgressFormatter for VerificationProgress {
    fn skill_id(&self) -> &str {
        "verification"
    }

    fn format(&self, state: &SkillState) -> Option<String> {
        let passed = extra_u64(state, "checks_passed");
        let failed = extra_u64(state, "checks_failed");
        let pending = extra_u64(state, "checks_pending");
        if passed.is_none() && failed.is_none() && pending.is_none() {
            return None;
        }
        Some(format!(
            "{} passed, {} failed, {} pending",
            passed.unwrap_or(0),
            failed.unwrap_or(0),
            pending.unwrap_or(0)
        ))
    }
}

/// Registry mapping skill ids to their progress formatters.
pub struct FormatterRegistry {
    formatters: Vec<Box<dyn ProgressFormatter>>,
}

impl FormatterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            formatters: Vec::new(),
        }
    }

    /// Create a registry pre-loaded with the known SVK skills.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DocSuiteProgress));
        registry.register(Box::new(SecurityAuditProgress));
        registry.register(Box::new(VerificationProgress));
        registry
    }

    /// Register a formatter.
    pub fn register(&mut self, formatter: Box<dyn ProgressFormatter>) {
        self.formatters.push(formatter);
    }

    /// Find a formatter by skill id.
    pub fn find(&self, skill_id: &str) -> Option<&dyn ProgressFormatter> {
        self.formatters
            .iter()
            .find(|f| f.skill_id() == skill_id)
            .map(|f| f.as_ref())
    }

    /// Format a state's progress, falling back to no text for unknown skills.
    pub fn format(&self, state: &SkillState) -> Option<String> {
        self.find(&state.skill_id).and_then(|f| f.format(state))
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
