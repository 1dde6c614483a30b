//! Artifact directory resolution.
//!
//! Maps a logical reference — `current`, `previous`, or an explicit
//! relative path — plus a skill id to a concrete artifact directory. The
//! per-skill root names live in a static table, not inferred from disk, so
//! resolution is deterministic even before any files exist.
//!
//! `current` resolution never touches the disk and always returns a path;
//! whether anything exists there is the reader's concern. `previous` lists
//! the skill's history root and picks the lexicographically greatest
//! subdirectory (snapshot names are ISO-timestamp-prefixed, so string
//! order tracks recency). Missing or empty history resolves to nothing,
//! not an error.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Static per-skill directory conventions.
pub struct SkillRoots {
    pub id: &'static str,
    /// Current-run artifact directory, relative to the project root.
    pub current: &'static str,
    /// History root whose subdirectories are timestamped snapshots.
    pub history: &'static str,
    /// The command that starts this skill's pipeline, used in guidance
    /// messages when no artifacts exist yet.
    pub start_command: &'static str,
}

pub const SKILLS: &[SkillRoots] = &[
    SkillRoots {
        id: "doc-suite",
        current: "docs",
        history: "docs/archive",
        start_command: "/svk:doc-suite survey",
    },
    SkillRoots {
        id: "security-audit",
        current: "audits/current",
        history: "audits/history",
        start_command: "/svk:security-audit recon",
    },
    SkillRoots {
        id: "verification",
        current: "verification/current",
        history: "verification/history",
        start_command: "/svk:verify plan",
    },
];

/// Look up a skill's directory conventions.
pub fn skill_roots(skill_id: &str) -> Option<&'static SkillRoots> {
    SKILLS.iter().find(|s| s.id == skill_id)
}

/// A comma-separated list of known skill ids, for guidance messages.
pub fn known_skill_ids() -> String {
    SKILLS
        .iter()
        .map(|s| s.id)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a logical artifact reference to a concrete directory path.
///
/// Returns `Ok(None)` only for `"previous"` with no history snapshots.
/// Directory-listing failures from an absent history root count as "no
/// history"; other I/O errors propagate.
pub fn resolve(
    project_root: &Path,
    roots: &SkillRoots,
    reference: Option<&str>,
) -> Result<Option<PathBuf>> {
    match reference {
        None | Some("current") => Ok(Some(project_root.join(roots.current))),
        Some("previous") => latest_snapshot(&project_root.join(roots.history)),
        Some(explicit) => Ok(Some(project_root.join(explicit))),
    }
}

fn latest_snapshot(history_root: &Path) -> Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(history_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to list {}", history_root.display()))
        }
    };

    let mut latest: Option<String> = None;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if latest.as_deref().map(|l| name.as_str() > l).unwrap_or(true) {
            latest = Some(name);
        }
    }

    Ok(latest.map(|name| history_root.join(name)))
}

/// Count the snapshot entries under a skill's history root.
///
/// Informational only: a missing or unreadable history root counts as zero.
pub fn history_count(project_root: &Path, roots: &SkillRoots) -> usize {
    match std::fs::read_dir(project_root.join(roots.history)) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .count(),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_current_is_deterministic_and_needs_no_disk() {
        let roots = skill_roots("security-audit").unwrap();
        let root = Path::new("/proj");
        let a = resolve(root, roots, Some("current")).unwrap();
        let b = resolve(root, roots, None).unwrap();
        assert_eq!(a, Some(PathBuf::from("/proj/audits/current")));
        assert_eq!(a, b);
    }

    #[test]
    fn test_previous_picks_lexicographically_greatest() {
        let tmp = TempDir::new().unwrap();
        let roots = skill_roots("security-audit").unwrap();
        let history = tmp.path().join(roots.history);
        for name in ["2026-01-01", "2026-02-15", "2025-12-31"] {
            fs::create_dir_all(history.join(name)).unwrap();
        }

        let resolved = resolve(tmp.path(), roots, Some("previous")).unwrap();
        assert_eq!(resolved, Some(history.join("2026-02-15")));
    }

    #[test]
    fn test_previous_with_no_history_is_none() {
        let tmp = TempDir::new().unwrap();
        let roots = skill_roots("doc-suite").unwrap();
        assert_eq!(resolve(tmp.path(), roots, Some("previous")).unwrap(), None);

        // Empty history root behaves the same as an absent one.
        fs::create_dir_all(tmp.path().join(roots.history)).unwrap();
        assert_eq!(resolve(tmp.path(), roots, Some("previous")).unwrap(), None);
    }

    #[test]
    fn test_previous_ignores_stray_files() {
        let tmp = TempDir::new().unwrap();
        let roots = skill_roots("verification").unwrap();
        let history = tmp.path().join(roots.history);
        fs::create_dir_all(history.join("2026-01-01")).unwrap();
        fs::write(history.join("zzz-notes.txt"), "not a snapshot").unwrap();

        let resolved = resolve(tmp.path(), roots, Some("previous")).unwrap();
        assert_eq!(resolved, Some(history.join("2026-01-01")));
    }

    #[test]
    fn test_explicit_path_returned_verbatim() {
        let roots = skill_roots("doc-suite").unwrap();
        let resolved = resolve(Path::new("/proj"), roots, Some("docs/archive/2026-01-01"))
            .unwrap();
        assert_eq!(
            resolved,
            Some(PathBuf::from("/proj/docs/archive/2026-01-01"))
        );
    }

    #[test]
    fn test_history_count() {
        let tmp = TempDir::new().unwrap();
        let roots = skill_roots("security-audit").unwrap();
        assert_eq!(history_count(tmp.path(), roots), 0);

        let history = tmp.path().join(roots.history);
        fs::create_dir_all(history.join("2026-01-01")).unwrap();
        fs::create_dir_all(history.join("2026-02-01")).unwrap();
        assert_eq!(history_count(tmp.path(), roots), 2);
    }
}
