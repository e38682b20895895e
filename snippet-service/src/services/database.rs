use crate::error::SnippetError;
use crate::models::{Snippet, SnippetFields};
use crate::services::store::{SnippetFilter, SnippetStore};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

/// Database used when neither the configuration nor the URI names one.
const FALLBACK_DATABASE: &str = "test";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Builds the shared client pool. The driver connects lazily, so callers
    /// that need a live server should follow up with [`MongoDb::ping`].
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(FALLBACK_DATABASE)),
        };
        tracing::info!(database = %db.name(), "Using MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for snippet-service");

        let snippets = self.snippets();

        // Unfiltered listing sorts newest first
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1, "_id": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        snippets
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create created_at index on snippets collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on snippets.created_at");

        let language_index = IndexModel::builder()
            .keys(doc! { "language": 1, "created_at": -1, "_id": -1 })
            .options(
                IndexOptions::builder()
                    .name("language_created_at".to_string())
                    .build(),
            )
            .build();

        snippets
            .create_index(language_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create language index on snippets collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on snippets.(language, created_at)");

        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn snippets(&self) -> Collection<Snippet> {
        self.db.collection("snippets")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl SnippetStore for MongoDb {
    async fn find(
        &self,
        filter: &SnippetFilter,
        limit: u64,
    ) -> Result<Vec<Snippet>, SnippetError> {
        let mut query = doc! {};
        if let Some(language) = &filter.language {
            query.insert("language", language.as_str());
        }

        let limit = if limit == 0 {
            None
        } else {
            Some(i64::try_from(limit).unwrap_or(i64::MAX))
        };
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1, "_id": -1 })
            .limit(limit)
            .build();

        let cursor = self.snippets().find(query, find_options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, snippet: &Snippet) -> Result<(), SnippetError> {
        self.snippets().insert_one(snippet, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Snippet>, SnippetError> {
        Ok(self.snippets().find_one(doc! { "_id": id }, None).await?)
    }

    async fn update_by_id(
        &self,
        id: ObjectId,
        fields: SnippetFields,
    ) -> Result<Option<Snippet>, SnippetError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .snippets()
            .find_one_and_update(doc! { "_id": id }, fields.to_set_document(), options)
            .await?)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Snippet>, SnippetError> {
        Ok(self
            .snippets()
            .find_one_and_delete(doc! { "_id": id }, None)
            .await?)
    }

    async fn health_check(&self) -> Result<(), SnippetError> {
        self.ping()
            .await
            .map_err(|e| SnippetError::Storage(anyhow::Error::new(e)))
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}
