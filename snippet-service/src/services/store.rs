use crate::error::SnippetError;
use crate::models::{Snippet, SnippetFields};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// Equality constraint applied when listing. `language` is expected to be
/// lowercase already.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetFilter {
    pub language: Option<String>,
}

/// Durable storage for snippets.
///
/// Implementations return `Ok(None)` for a missing id and leave validation
/// to [`crate::services::SnippetService`]. Update and delete must be single
/// document atomic.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Matches newest `created_at` first; `limit == 0` is unbounded.
    async fn find(&self, filter: &SnippetFilter, limit: u64)
        -> Result<Vec<Snippet>, SnippetError>;
    async fn insert(&self, snippet: &Snippet) -> Result<(), SnippetError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Snippet>, SnippetError>;
    async fn update_by_id(
        &self,
        id: ObjectId,
        fields: SnippetFields,
    ) -> Result<Option<Snippet>, SnippetError>;
    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Snippet>, SnippetError>;
    async fn health_check(&self) -> Result<(), SnippetError>;
    async fn shutdown(&self);
}
