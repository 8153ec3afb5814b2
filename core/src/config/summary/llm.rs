//! LLM config block for run config summary.
//!
//! Implements [`ConfigSection`](super::ConfigSection). Does not include api_key.
//! Used by CLI or other callers to build the "LLM config" line.

use super::ConfigSection;

/// LLM configuration summary: model, api_base, temperature, tool_choice (no api_key).
///
/// Built from RunConfig/ReactBuildConfig LLM fields (effective values, e.g. default
/// model/base when unset).
pub struct LlmConfigSummary {
    /// Model name, e.g. `gpt-4o`.
    pub model: String,
    /// API base URL.
    pub api_base: String,
    /// Sampling temperature, when set.
    pub temperature: Option<f32>,
    /// Tool-choice policy, e.g. `"auto"`, `"required"`, `"none"`.
    pub tool_choice: Option<String>,
}

impl ConfigSection for LlmConfigSummary {
    fn section_name(&self) -> &str {
        "LLM config"
    }

    fn entries(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            ("model", self.model.clone()),
            ("api_base", self.api_base.clone()),
        ];
        if let Some(t) = self.temperature {
            out.push(("temperature", t.to_string()));
        }
        if let Some(ref tc) = self.tool_choice {
            out.push(("tool_choice", tc.clone()));
        }
        out
    }
}
