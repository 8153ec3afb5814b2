//! Managed values: runtime-computed values that live alongside state but are
//! not part of it (the graph derives them, nodes only read them).

/// A value derived by the runtime rather than stored in state.
///
/// Mirrors LangGraph's managed values: a node can ask "is this the last step
/// before the step budget is exhausted?" without threading a counter through
/// every state struct.
pub trait ManagedValue: Send + Sync {
    type Value;

    fn value(&self) -> Self::Value;
}

/// Whether the current step is the last one the runtime will allow.
///
/// Computed from `(current_step, recursion_limit)`; `ActNode`/`ThinkNode` can
/// consult this to force a final answer instead of another tool call.
#[derive(Debug, Clone, Copy)]
pub struct IsLastStep {
    pub current_step: usize,
    pub recursion_limit: usize,
}

impl IsLastStep {
    pub fn new(current_step: usize, recursion_limit: usize) -> Self {
        Self {
            current_step,
            recursion_limit,
        }
    }
}

impl ManagedValue for IsLastStep {
    type Value = bool;

    fn value(&self) -> bool {
        self.current_step + 1 >= self.recursion_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_last_step_true_at_limit() {
        assert!(IsLastStep::new(4, 5).value());
    }

    #[test]
    fn is_last_step_false_before_limit() {
        assert!(!IsLastStep::new(0, 5).value());
    }
}
