//! Static, config-driven resolver: operator-pinned limits for providers or models
//! the remote catalog doesn't know about (e.g. self-hosted or newly released models).

use std::collections::HashMap;

use async_trait::async_trait;

use super::resolver::ModelLimitResolver;
use super::spec::ModelSpec;

/// Resolves limits from a static map keyed by `"provider_id/model_id"`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverride {
    overrides: HashMap<String, ModelSpec>,
}

impl ConfigOverride {
    /// Builds an override table from `(provider_id, model_id, spec)` triples.
    pub fn new(entries: impl IntoIterator<Item = (String, String, ModelSpec)>) -> Self {
        let overrides = entries
            .into_iter()
            .map(|(provider_id, model_id, spec)| (format!("{}/{}", provider_id, model_id), spec))
            .collect();
        Self { overrides }
    }

    /// Inserts or replaces a single override.
    pub fn insert(&mut self, provider_id: &str, model_id: &str, spec: ModelSpec) {
        self.overrides
            .insert(format!("{}/{}", provider_id, model_id), spec);
    }
}

#[async_trait]
impl ModelLimitResolver for ConfigOverride {
    async fn resolve(&self, provider_id: &str, model_id: &str) -> Option<ModelSpec> {
        self.overrides
            .get(&format!("{}/{}", provider_id, model_id))
            .cloned()
    }
}
