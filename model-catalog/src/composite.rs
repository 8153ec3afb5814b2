//! Composite resolver: tries several resolvers in order, first hit wins.

use async_trait::async_trait;

use super::resolver::ModelLimitResolver;
use super::spec::ModelSpec;

/// Tries each resolver in order and returns the first `Some`.
///
/// Typical order: a static [`super::ConfigOverride`] first (operator-pinned limits),
/// then a cached remote catalog, then a local file fallback.
pub struct CompositeResolver {
    resolvers: Vec<Box<dyn ModelLimitResolver>>,
}

impl CompositeResolver {
    /// Builds a composite from resolvers in priority order.
    pub fn new(resolvers: Vec<Box<dyn ModelLimitResolver>>) -> Self {
        Self { resolvers }
    }
}

#[async_trait]
impl ModelLimitResolver for CompositeResolver {
    async fn resolve(&self, provider_id: &str, model_id: &str) -> Option<ModelSpec> {
        for resolver in &self.resolvers {
            if let Some(spec) = resolver.resolve(provider_id, model_id).await {
                return Some(spec);
            }
        }
        None
    }
}
