//! Resolves effective prompt strings from loaded config and code defaults.
//!
//! [`AgentPrompts`] holds per-pattern optional overrides; getters return the string to use
//! (override or in-code default). Used by [`ReactRunner`](crate::agent::react::ReactRunner)
//! and [`assemble_system_prompt`](crate::helve::assemble_system_prompt).

use crate::agent::react::{
    DEFAULT_EXECUTION_ERROR_TEMPLATE, DEFAULT_TOOL_ERROR_TEMPLATE, REACT_SYSTEM_PROMPT,
};

use super::{DupPromptsFile, GotPromptsFile, HelvePromptsFile, ReactPromptsFile, TotPromptsFile};

/// In-code fallback for `tot.expand_system_addon`. No ToT runner reads this; kept so
/// [`AgentPrompts::tot_expand_system_addon`] has a non-empty default for prompt-file compatibility.
const TOT_EXPAND_SYSTEM_ADDON: &str = "Consider multiple distinct approaches before committing to one.";
const TOT_RESEARCH_QUALITY_ADDON: &str = "Prefer primary sources and verify claims before using them.";
const GOT_PLAN_SYSTEM: &str = "Break the task into a dependency graph of steps and output it as JSON.";
const AGOT_EXPAND_SYSTEM: &str = "Expand the current step into finer-grained sub-steps.";
const DUP_UNDERSTAND_PROMPT: &str = "Restate the user's request in your own words before acting.";

/// Loaded and env-overridden prompts for all agent patterns. Getters resolve to code defaults when unset.
///
/// Build via [`load`](crate::prompts::load) or [`load_or_default`](crate::prompts::load_or_default).
/// Pass to [`build_react_runner`](crate::agent::react::build_react_runner) or use in
/// [`assemble_system_prompt_with_prompts`](crate::helve::assemble_system_prompt_with_prompts) to override in-code prompts.
#[derive(Clone, Debug, Default)]
pub struct AgentPrompts {
    pub react: ReactPromptsFile,
    pub tot: TotPromptsFile,
    pub got: GotPromptsFile,
    pub dup: DupPromptsFile,
    pub helve: HelvePromptsFile,
}

impl AgentPrompts {
    /// ReAct system prompt (base for ReAct and Helve assembly). Env `REACT_SYSTEM_PROMPT` overrides file.
    pub fn react_system_prompt(&self) -> String {
        std::env::var("REACT_SYSTEM_PROMPT")
            .ok()
            .or_else(|| self.react.system_prompt.clone())
            .unwrap_or_else(|| REACT_SYSTEM_PROMPT.to_string())
    }

    /// ReAct tool error template for ActNode. Placeholder: `{error}`.
    pub fn react_tool_error_template(&self) -> String {
        self.react
            .tool_error_template
            .clone()
            .unwrap_or_else(|| DEFAULT_TOOL_ERROR_TEMPLATE.to_string())
    }

    /// ReAct execution error template. Placeholders: `{tool_name}`, `{tool_kwargs}`, `{error}`.
    pub fn react_execution_error_template(&self) -> String {
        self.react
            .execution_error_template
            .clone()
            .unwrap_or_else(|| DEFAULT_EXECUTION_ERROR_TEMPLATE.to_string())
    }

    /// ToT expand node system addon. No in-tree runner consumes this.
    pub fn tot_expand_system_addon(&self) -> String {
        self.tot
            .expand_system_addon
            .clone()
            .unwrap_or_else(|| TOT_EXPAND_SYSTEM_ADDON.trim().to_string())
    }

    /// ToT research quality addon. No in-tree runner consumes this.
    pub fn tot_research_quality_addon(&self) -> String {
        self.tot
            .research_quality_addon
            .clone()
            .unwrap_or_else(|| TOT_RESEARCH_QUALITY_ADDON.trim().to_string())
    }

    /// GoT plan node system prompt. No in-tree runner consumes this.
    pub fn got_plan_system(&self) -> String {
        self.got
            .plan_system
            .clone()
            .unwrap_or_else(|| GOT_PLAN_SYSTEM.to_string())
    }

    /// AGoT expand node system prompt. No in-tree runner consumes this.
    pub fn got_agot_expand_system(&self) -> String {
        self.got
            .agot_expand_system
            .clone()
            .unwrap_or_else(|| AGOT_EXPAND_SYSTEM.to_string())
    }

    /// DUP understand node system prompt. No in-tree runner consumes this.
    pub fn dup_understand_prompt(&self) -> String {
        self.dup
            .understand_prompt
            .clone()
            .unwrap_or_else(|| DUP_UNDERSTAND_PROMPT.to_string())
    }

    /// Helve workdir section template. Placeholder: `{workdir}`. Caller replaces with actual path.
    pub fn helve_workdir_section_template(&self) -> String {
        self.helve
            .workdir_section_template
            .clone()
            .unwrap_or_else(|| {
                r#"
WORKING FOLDER & FILE RULES:
- Working folder path: {workdir}
- You may ONLY use the provided file tools (ls, read_file, write_file, move_file, delete_file, create_dir) to operate inside this directory and its subdirectories.
- Do NOT access paths outside the working folder. Any path you use must be under the above folder.
- EXPLORE FIRST: when asked about the project or its contents, call ls before answering. Never guess.
- FILE OUTPUT: when asked to write/save content to a file, call write_file before giving a final answer."#
                    .to_string()
            })
    }

    /// Helve approval text when policy is DestructiveOnly.
    pub fn helve_approval_destructive(&self) -> String {
        self.helve
            .approval_destructive
            .clone()
            .unwrap_or_else(|| {
                "\n\nAPPROVAL: Before executing delete_file, output your plan and wait for the user to confirm. Do not perform the deletion until the user approves.".to_string()
            })
    }

    /// Helve approval text when policy is Always.
    pub fn helve_approval_always(&self) -> String {
        self.helve
            .approval_always
            .clone()
            .unwrap_or_else(|| {
                "\n\nAPPROVAL: Before executing delete_file or write_file, output your plan and wait for the user to confirm. Do not perform these operations until the user approves.".to_string()
            })
    }
}
