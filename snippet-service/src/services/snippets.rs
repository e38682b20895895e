use crate::error::SnippetError;
use crate::models::{Snippet, SnippetPayload};
use crate::services::metrics::record_operation;
use crate::services::store::{SnippetFilter, SnippetStore};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

/// Validation-aware gateway in front of a [`SnippetStore`].
///
/// Every method is one store round-trip; nothing is retried.
#[derive(Clone)]
pub struct SnippetService {
    store: Arc<dyn SnippetStore>,
}

impl SnippetService {
    pub fn new(store: Arc<dyn SnippetStore>) -> Self {
        Self { store }
    }

    pub async fn list_snippets(
        &self,
        filter: SnippetFilter,
        limit: u64,
    ) -> Result<Vec<Snippet>, SnippetError> {
        let filter = SnippetFilter {
            language: filter.language.map(|language| language.to_lowercase()),
        };
        let result = self.store.find(&filter, limit).await;
        record_operation("list", &result);
        result
    }

    pub async fn create_snippet(&self, payload: SnippetPayload) -> Result<Snippet, SnippetError> {
        let result = async {
            let snippet = payload.into_fields()?.into_snippet();
            self.store.insert(&snippet).await?;
            tracing::info!(
                snippet_id = %snippet.id,
                language = %snippet.language,
                "Snippet created"
            );
            Ok::<_, SnippetError>(snippet)
        }
        .await;
        record_operation("create", &result);
        result
    }

    pub async fn get_snippet_by_id(&self, id: &str) -> Result<Snippet, SnippetError> {
        let result = async {
            let id = parse_id(id)?;
            self.store
                .find_by_id(id)
                .await?
                .ok_or(SnippetError::NotFound)
        }
        .await;
        record_operation("get", &result);
        result
    }

    pub async fn update_snippet_by_id(
        &self,
        id: &str,
        payload: SnippetPayload,
    ) -> Result<Snippet, SnippetError> {
        let result = async {
            let id = parse_id(id)?;
            let fields = payload.into_fields()?;
            let snippet = self
                .store
                .update_by_id(id, fields)
                .await?
                .ok_or(SnippetError::NotFound)?;
            tracing::info!(snippet_id = %snippet.id, "Snippet updated");
            Ok::<_, SnippetError>(snippet)
        }
        .await;
        record_operation("update", &result);
        result
    }

    pub async fn delete_snippet_by_id(&self, id: &str) -> Result<(), SnippetError> {
        let result = async {
            let id = parse_id(id)?;
            self.store
                .delete_by_id(id)
                .await?
                .ok_or(SnippetError::NotFound)?;
            tracing::info!(snippet_id = %id, "Snippet deleted");
            Ok::<_, SnippetError>(())
        }
        .await;
        record_operation("delete", &result);
        result
    }

    pub async fn health_check(&self) -> Result<(), SnippetError> {
        self.store.health_check().await
    }

    pub async fn shutdown(&self) {
        self.store.shutdown().await
    }
}

fn parse_id(id: &str) -> Result<ObjectId, SnippetError> {
    ObjectId::parse_str(id).map_err(|_| SnippetError::InvalidId(id.to_string()))
}
