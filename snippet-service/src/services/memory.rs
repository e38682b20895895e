use crate::error::SnippetError;
use crate::models::{Snippet, SnippetFields};
use crate::services::store::{SnippetFilter, SnippetStore};
use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;

/// Process-local store for development and tests. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemorySnippetStore {
    snippets: DashMap<ObjectId, Snippet>,
}

impl InMemorySnippetStore {
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

#[async_trait]
impl SnippetStore for InMemorySnippetStore {
    async fn find(
        &self,
        filter: &SnippetFilter,
        limit: u64,
    ) -> Result<Vec<Snippet>, SnippetError> {
        let mut matches: Vec<Snippet> = self
            .snippets
            .iter()
            .filter(|entry| match &filter.language {
                Some(language) => entry.language == *language,
                None => true,
            })
            .map(|entry| entry.value().clone())
            .collect();

        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        if limit > 0 {
            matches.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(matches)
    }

    async fn insert(&self, snippet: &Snippet) -> Result<(), SnippetError> {
        self.snippets.insert(snippet.id, snippet.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Snippet>, SnippetError> {
        Ok(self.snippets.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update_by_id(
        &self,
        id: ObjectId,
        fields: SnippetFields,
    ) -> Result<Option<Snippet>, SnippetError> {
        // The shard stays write-locked while the entry is held.
        Ok(self.snippets.get_mut(&id).map(|mut entry| {
            fields.apply_to(entry.value_mut());
            entry.value().clone()
        }))
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Snippet>, SnippetError> {
        Ok(self.snippets.remove(&id).map(|(_, snippet)| snippet))
    }

    async fn health_check(&self) -> Result<(), SnippetError> {
        Ok(())
    }

    async fn shutdown(&self) {
        tracing::info!(snippets = self.snippets.len(), "Dropping in-memory snippet store");
    }
}
