//! Restricted `{{…}}` template engine for `MCPServer` headers (spec.md §3/§9).
//!
//! Headers may embed `{{Env.NAME}}`, `{{Context.dotted.path}}`, or `{{Header.Name}}`
//! expressions, resolved against the three namespaces passed in at build time. There is
//! no conditional or loop syntax and no code execution: an expression is a namespace tag
//! followed by a dotted lookup path, nothing else. A template with an unresolved
//! reference is rejected rather than rendered with a blank substitution, so a typo'd
//! header never silently reaches an MCP server as the literal string `{{Env.OOPS}}`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+(?:\.[A-Za-z0-9_\-]+)*)\s*\}\}").unwrap());

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown namespace {0:?}, expected one of Env, Context, Header")]
    UnknownNamespace(String),
    #[error("template expression {0:?} has no namespace")]
    MissingNamespace(String),
    #[error("unresolved template reference {0:?}")]
    Unresolved(String),
}

/// The three namespaces a header template may reference.
#[derive(Debug, Default, Clone)]
pub struct TemplateContext {
    pub env: HashMap<String, String>,
    pub context: Value,
    pub headers: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self {
            env: HashMap::new(),
            context: Value::Null,
            headers: HashMap::new(),
        }
    }

    /// Convenience for the common case: env vars plus the request's JSON context.
    pub fn from_env_and_context(context: Value) -> Self {
        Self {
            env: std::env::vars().collect(),
            context,
            headers: HashMap::new(),
        }
    }

    fn lookup(&self, expr: &str) -> Result<String, TemplateError> {
        let mut parts = expr.splitn(2, '.');
        let namespace = parts.next().unwrap_or_default();
        let path = parts
            .next()
            .ok_or_else(|| TemplateError::MissingNamespace(expr.to_string()))?;
        match namespace {
            "Env" => self
                .env
                .get(path)
                .cloned()
                .ok_or_else(|| TemplateError::Unresolved(expr.to_string())),
            "Header" => self
                .headers
                .get(path)
                .cloned()
                .ok_or_else(|| TemplateError::Unresolved(expr.to_string())),
            "Context" => lookup_dotted(&self.context, path)
                .ok_or_else(|| TemplateError::Unresolved(expr.to_string())),
            other => Err(TemplateError::UnknownNamespace(other.to_string())),
        }
    }
}

fn lookup_dotted(value: &Value, path: &str) -> Option<String> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    match current {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Renders one template string, failing closed on the first unresolved reference.
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String, TemplateError> {
    let mut error = None;
    let rendered = EXPR.replace_all(template, |caps: &regex::Captures| {
        let expr = &caps[1];
        match ctx.lookup(expr) {
            Ok(value) => value,
            Err(e) => {
                if error.is_none() {
                    error = Some(e);
                }
                String::new()
            }
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(rendered.into_owned()),
    }
}

/// Renders every header value, rejecting the whole map if any template is unresolved
/// (spec.md §9: "Reject templates with unresolved references at build time").
pub fn render_headers(
    headers: &HashMap<String, String>,
    ctx: &TemplateContext,
) -> Result<HashMap<String, String>, TemplateError> {
    headers
        .iter()
        .map(|(k, v)| render(v, ctx).map(|rendered| (k.clone(), rendered)))
        .collect()
}
