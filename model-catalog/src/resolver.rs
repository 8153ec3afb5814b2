//! ModelLimitResolver trait: resolve a model's token limits by provider/model id.

use async_trait::async_trait;

use super::spec::ModelSpec;

/// Resolves token limits for a `(provider_id, model_id)` pair.
///
/// Implementations: [`super::ModelsDevResolver`] (fetches models.dev), [`super::LocalFileResolver`]
/// (reads a local JSON file), [`super::CachedResolver`] (wraps any resolver with an in-memory
/// cache), [`super::CompositeResolver`] (tries several resolvers in order), [`super::ConfigOverride`]
/// (static overrides for providers the catalog doesn't know about).
#[async_trait]
pub trait ModelLimitResolver: Send + Sync {
    /// Resolves limits for `model_id` under `provider_id`, or `None` if unknown.
    async fn resolve(&self, provider_id: &str, model_id: &str) -> Option<ModelSpec>;
}
