#![allow(dead_code)]

use reqwest::Client;
use serde_json::{json, Value};
use snippet_service::config::SnippetConfig;
use snippet_service::services::{InMemorySnippetStore, SnippetStore};
use snippet_service::startup::Application;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemorySnippetStore>,
    pub client: Client,
}

impl TestApp {
    /// Spawns the application on a random port backed by an in-memory store.
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemorySnippetStore::default());
        let app = Application::build_with_store(
            SnippetConfig::in_memory(),
            store.clone() as Arc<dyn SnippetStore>,
        )
        .await
        .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/snippets"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Creates a snippet and returns the response body, asserting 201.
    pub async fn create_ok(&self, title: &str, language: &str) -> Value {
        let response = self
            .create(json!({ "title": title, "language": language, "code": "x" }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn list(&self, query: &str) -> Vec<Value> {
        let response = self
            .client
            .get(self.url(&format!("/api/snippets{}", query)))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("Failed to parse JSON")
    }
}
