use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectConfig {
    /// Root of the SVK project tree this service reads from.
    #[serde(default = "default_project_root")]
    pub root: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_project_root(),
        }
    }
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7431".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Excerpts recorded per file before moving to the next file.
    #[serde(default = "default_max_matches_per_file")]
    pub max_matches_per_file: usize,
    /// Lines of leading and trailing context around each matching line.
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_matches_per_file: default_max_matches_per_file(),
            context_lines: default_context_lines(),
        }
    }
}

fn default_max_matches_per_file() -> usize {
    5
}
fn default_context_lines() -> usize {
    2
}

impl Config {
    /// A config with all defaults: project root `.`, standard bind address.
    ///
    /// Used when no config file is present — every setting has a working
    /// default, so a bare `svki status` in a project directory just works.
    pub fn minimal() -> Self {
        Self::default()
    }
}

/// Load and validate a TOML config file.
///
/// A missing file is not an error; it falls back to [`Config::minimal`].
/// A file that exists but fails to parse or validate is a hard error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::minimal());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.search.max_matches_per_file == 0 {
        anyhow::bail!("search.max_matches_per_file must be >= 1");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_defaults() {
        let cfg = Config::minimal();
        assert_eq!(cfg.project.root, PathBuf::from("."));
        assert_eq!(cfg.search.max_matches_per_file, 5);
        assert_eq!(cfg.search.context_lines, 2);
    }

    #[test]
    fn test_missing_file_falls_back_to_minimal() {
        let cfg = load_config(Path::new("/nonexistent/svk.toml")).unwrap();
        assert_eq!(cfg.project.root, PathBuf::from("."));
    }
}
