//! Product-level config (HelveConfig) and conversion to ReactBuildConfig.
//!
//! Server (or CLI) can parse request body or CLI args into HelveConfig, then call
//! `to_react_build_config(helve, base)` to get a full ReactBuildConfig for
//! `build_react_runner`.

use std::path::PathBuf;

use crate::agent::react::{ReactBuildConfig, REACT_SYSTEM_PROMPT};

use super::prompt::{assemble_system_prompt, ApprovalPolicy};

/// Product-semantic configuration for a Helve-style run.
///
/// Holds only the fields that carry product meaning (working folder, thread, user,
/// approval policy, role setting, optional system prompt override). Convert to [`ReactBuildConfig`]
/// via [`to_react_build_config`] so that runner build (e.g. `build_react_runner`) can use it.
#[derive(Clone, Debug, Default)]
pub struct HelveConfig {
    /// Working folder for file/bash tools. When set, the assembled system prompt
    /// includes workdir rules.
    pub working_folder: Option<PathBuf>,
    /// Thread ID for checkpointer (conversation / run identity).
    pub thread_id: Option<String>,
    /// User ID for long-term store (namespace).
    pub user_id: Option<String>,
    /// When set, tools that require approval (e.g. delete_file) pause before execution.
    pub approval_policy: Option<ApprovalPolicy>,
    /// Role/persona setting (e.g. from SOUL.md): prepended to the assembled system prompt.
    /// Does not apply when `system_prompt_override` is set.
    pub role_setting: Option<String>,
    /// Project-level agent rules (e.g. from AGENTS.md): appended after role_setting, before base.
    /// Order in prompt: role_setting + agents_md + base_content.
    pub agents_md: Option<String>,
    /// When set, used as the full system prompt instead of assembling from workdir + approval.
    pub system_prompt_override: Option<String>,
}

/// Converts a HelveConfig and a base ReactBuildConfig into a single ReactBuildConfig.
///
/// Product fields (working_folder, thread_id, user_id, approval_policy) are taken from
/// `helve` when set; otherwise from `base`. System prompt is set in this order:
/// 1. `helve.system_prompt_override` if present (used as full system prompt)
/// 2. else: base content = assembled from workdir (if set) or `base.system_prompt`;
///    role prefix = role_setting (if set) + "\n\n" + agents_md (if set), trimmed;
///    if role prefix is non-empty, system prompt = role prefix + "\n\n" + base content;
///    otherwise system prompt = base content
///
/// Other fields (db_path, mcp_*, openai_*, etc.) are always taken from `base`.
pub fn to_react_build_config(helve: &HelveConfig, base: ReactBuildConfig) -> ReactBuildConfig {
    let system_prompt = helve.system_prompt_override.clone().or_else(|| {
        let base_content = helve
            .working_folder
            .as_ref()
            .map(|p| assemble_system_prompt(p.as_path(), helve.approval_policy))
            .or_else(|| base.system_prompt.clone())
            .unwrap_or_else(|| REACT_SYSTEM_PROMPT.to_string());
        let role_prefix: Vec<&str> = [helve.role_setting.as_deref(), helve.agents_md.as_deref()]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        Some(if role_prefix.is_empty() {
            base_content
        } else {
            format!("{}\n\n{}", role_prefix.join("\n\n"), base_content)
        })
    });

    let approval_policy = helve.approval_policy.or(base.approval_policy);
    let mut tools_requiring_human_approval = base.tools_requiring_human_approval.clone();
    if let Some(policy) = approval_policy {
        for tool in super::prompt::tools_requiring_approval(policy) {
            if !tools_requiring_human_approval.iter().any(|t| t == tool) {
                tools_requiring_human_approval.push((*tool).to_string());
            }
        }
    }

    ReactBuildConfig {
        system_prompt,
        working_folder: helve.working_folder.clone().or(base.working_folder),
        thread_id: helve.thread_id.clone().or(base.thread_id),
        user_id: helve.user_id.clone().or(base.user_id),
        approval_policy,
        tools_requiring_human_approval,
        ..base
    }
}
