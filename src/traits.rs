//! The tool layer: typed operations behind one capability interface.
//!
//! Every external surface — the HTTP tool API and the MCP bridge —
//! dispatches through the same [`ToolRegistry`] of [`Tool`]
//! implementations, so all callers get identical semantics. The three
//! built-ins wrap the query façade:
//!
//! | Tool | Façade function |
//! |------|-----------------|
//! | `status` | [`crate::status::project_status`] |
//! | `audit` | [`crate::audit::get_audit`] |
//! | `search` | [`crate::search::search_artifacts`] |
//!
//! Tools return a single JSON value: either the operation's typed payload
//! or a `{ "text": ... }` notice (see [`crate::models::Reply`]). Hard
//! failures surface as `Err` and are mapped to protocol errors by the
//! serving layer.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::audit::{get_audit, AuditPayload};
use crate::config::Config;
use crate::models::Reply;
use crate::search::{search_artifacts, SearchReport};
use crate::status::{project_status, StatusReport};

/// A read-only operation that agents can discover and call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's name, used as the route path (`POST /tools/{name}`)
    /// and as the MCP tool identifier.
    fn name(&self) -> &str;

    /// One-line description for agent discovery.
    fn description(&self) -> &str;

    /// Whether this tool is a built-in. Defaults to `false` for
    /// user-registered extensions.
    fn is_builtin(&self) -> bool {
        false
    }

    /// JSON Schema for the tool's parameter object.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool. `params` is always a JSON object.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Context bridge for tool execution.
///
/// Gives tools access to the query façade with the same capabilities as
/// the CLI. Created per invocation by the serving layer; holds no state
/// beyond the shared config.
pub struct ToolContext {
    config: Arc<Config>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Per-skill pipeline status. Equivalent to `svki status`.
    pub fn status(&self) -> Result<Reply<StatusReport>> {
        project_status(&self.config)
    }

    /// Audit/report retrieval. Equivalent to `svki audit`.
    pub fn audit(
        &self,
        skill_id: &str,
        reference: Option<&str>,
        doc_type: &str,
        subsystem: Option<&str>,
        severity: Option<&str>,
    ) -> Result<Reply<AuditPayload>> {
        get_audit(
            &self.config,
            skill_id,
            reference,
            doc_type,
            subsystem,
            severity,
        )
    }

    /// Full-text artifact search. Equivalent to `svki search`.
    pub fn search(&self, query: &str, scope: &str) -> Result<Reply<SearchReport>> {
        search_artifacts(&self.config, query, scope)
    }
}

// ============ Built-in tools ============

/// Built-in project status tool.
pub struct StatusTool;

#[async_trait]
impl Tool for StatusTool {
    fn name(&self) -> &str {
        "status"
    }

    fn description(&self) -> &str {
        "Show the current phase and progress of every SVK skill pipeline"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        let reply = ctx.status()?;
        Ok(serde_json::to_value(&reply)?)
    }
}

/// Built-in audit retrieval tool.
pub struct AuditTool;

#[async_trait]
impl Tool for AuditTool {
    fn name(&self) -> &str {
        "audit"
    }

    fn description(&self) -> &str {
        "Retrieve an audit report or filtered findings from a current or historical run"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "skill": { "type": "string", "description": "Skill id, e.g. security-audit" },
                "audit": {
                    "type": "string",
                    "description": "Which run: 'current' (default), 'previous', or an explicit relative path"
                },
                "type": {
                    "type": "string",
                    "enum": ["report", "findings", "architecture", "strategies"],
                    "default": "report"
                },
                "subsystem": { "type": "string", "description": "Filter findings by subsystem substring" },
                "severity": { "type": "string", "description": "Filter findings by severity token" }
            },
            "required": ["skill"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let skill = match params.get("skill").and_then(|v| v.as_str()) {
            Some(s) => s,
            None => anyhow::bail!("skill must not be empty"),
        };
        let reference = params.get("audit").and_then(|v| v.as_str());
        let doc_type = params
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or("report");
        let subsystem = params.get("subsystem").and_then(|v| v.as_str());
        let severity = params.get("severity").and_then(|v| v.as_str());

        let reply = ctx.audit(skill, reference, doc_type, subsystem, severity)?;
        Ok(serde_json::to_value(&reply)?)
    }
}

/// Built-in artifact search tool.
pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Full-text search across project artifacts with contextual excerpts"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Literal search text" },
                "scope": {
                    "type": "string",
                    "enum": ["docs", "audit", "decisions", "all"],
                    "default": "all"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let query = params.get("query").and_then(|v| v.as_str()).unwrap_or("");
        let scope = params.get("scope").and_then(|v| v.as_str()).unwrap_or("all");

        let reply = ctx.search(query, scope)?;
        Ok(serde_json::to_value(&reply)?)
    }
}

// ============ Registry ============

/// Registry for tools.
///
/// Use [`ToolRegistry::with_builtins`] to pre-load the core `status`,
/// `audit`, and `search` tools, then optionally
/// [`register`](ToolRegistry::register) custom ones.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry pre-loaded with the built-in tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(StatusTool));
        registry.register(Box::new(AuditTool));
        registry.register(Box::new(SearchTool));
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Get all registered tools.
    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    /// Find a tool by name.
    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ctx_at(root: &std::path::Path) -> ToolContext {
        let mut cfg = Config::minimal();
        cfg.project.root = root.to_path_buf();
        ToolContext::new(Arc::new(cfg))
    }

    #[test]
    fn test_registry_builtins() {
        let registry = ToolRegistry::with_builtins();
        assert_eq!(registry.len(), 3);
        assert!(registry.find("status").is_some());
        assert!(registry.find("audit").is_some());
        assert!(registry.find("search").is_some());
        assert!(registry.find("nope").is_none());
    }

    #[tokio::test]
    async fn test_status_tool_returns_text_shape_for_empty_project() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx_at(tmp.path());

        let result = StatusTool
            .execute(serde_json::json!({}), &ctx)
            .await
            .unwrap();
        assert!(result.get("text").is_some());
    }

    #[tokio::test]
    async fn test_search_tool_rejects_empty_query() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx_at(tmp.path());

        let result = SearchTool.execute(serde_json::json!({}), &ctx).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_audit_tool_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("audits/current");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("report.md"), "# Report").unwrap();

        let ctx = ctx_at(tmp.path());
        let result = AuditTool
            .execute(serde_json::json!({ "skill": "security-audit" }), &ctx)
            .await
            .unwrap();
        assert_eq!(
            result.get("document").and_then(|v| v.as_str()),
            Some("report")
        );
    }
}
