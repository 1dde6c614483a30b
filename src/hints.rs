//! Next-step suggestions from each skill's phase topology.
//!
//! One ordered table per skill: for every phase, the command that runs it
//! and the command that resumes it mid-flight. Given a current phase and
//! status, the hint is:
//!
//! - `in_progress` → the resume command for that phase,
//! - `pending` → the run command for that phase,
//! - `complete` → the run command for the **next** phase in the table
//!   (none for the final phase — the pipeline is done).
//!
//! Skill/phase combinations absent from the tables yield `None`, never an
//! error, so state files from newer toolkit versions degrade gracefully.

use crate::models::PhaseStatus;

struct PhaseHint {
    phase: &'static str,
    run: &'static str,
    resume: &'static str,
}

const DOC_SUITE: &[PhaseHint] = &[
    PhaseHint {
        phase: "survey",
        run: "/svk:doc-suite survey",
        resume: "/svk:doc-suite survey --resume",
    },
    PhaseHint {
        phase: "outline",
        run: "/svk:doc-suite outline",
        resume: "/svk:doc-suite outline --resume",
    },
    PhaseHint {
        phase: "draft",
        run: "/svk:doc-suite draft",
        resume: "/svk:doc-suite draft --resume",
    },
    PhaseHint {
        phase: "review",
        run: "/svk:doc-suite review",
        resume: "/svk:doc-suite review --resume",
    },
    PhaseHint {
        phase: "publish",
        run: "/svk:doc-suite publish",
        resume: "/svk:doc-suite publish --resume",
    },
];

const SECURITY_AUDIT: &[PhaseHint] = &[
    PhaseHint {
        phase: "recon",
        run: "/svk:security-audit recon",
        resume: "/svk:security-audit recon --resume",
    },
    PhaseHint {
        phase: "analysis",
        run: "/svk:security-audit analysis",
        resume: "/svk:security-audit analysis --resume",
    },
    PhaseHint {
        phase: "findings",
        run: "/svk:security-audit findings",
        resume: "/svk:security-audit findings --resume",
    },
    PhaseHint {
        phase: "report",
        run: "/svk:security-audit report",
        resume: "/svk:security-audit report --resume",
    },
];

const VERIFICATION: &[PhaseHint] = &[
    PhaseHint {
        phase: "plan",
        run: "/svk:verify plan",
        resume: "/svk:verify plan --resume",
    },
    PhaseHint {
        phase: "execute",
        run: "/svk:verify execute",
        resume: "/svk:verify execute --resume",
    },
    PhaseHint {
        phase: "summarize",
        run: "/svk:verify summarize",
        resume: "/svk:verify summarize --resume",
    },
];

fn skill_table(skill_id: &str) -> Option<&'static [PhaseHint]> {
    match skill_id {
        "doc-suite" => Some(DOC_SUITE),
        "security-audit" => Some(SECURITY_AUDIT),
        "verification" => Some(VERIFICATION),
        _ => None,
    }
}

/// Suggest the next command for a skill at the given phase and status.
pub fn next_step_hint(skill_id: &str, phase: &str, status: PhaseStatus) -> Option<String> {
    let table = skill_table(skill_id)?;
    let idx = table.iter().position(|h| h.phase == phase)?;
    match status {
        PhaseStatus::InProgress => Some(table[idx].resume.to_string()),
        PhaseStatus::Pending => Some(table[idx].run.to_string()),
        PhaseStatus::Complete => table.get(idx + 1).map(|h| h.run.to_string()),
    }
}
