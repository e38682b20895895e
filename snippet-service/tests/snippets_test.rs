mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn snippet_round_trip() {
    let app = TestApp::spawn().await;

    let response = app
        .create(json!({
            "title": "Add two numbers",
            "language": "Python",
            "code": "a+b",
            "tags": ["math"]
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let created: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(created["language"], "python");
    assert_eq!(created["tags"], json!(["math"]));
    let id = created["_id"].as_str().expect("Missing _id").to_string();
    assert_eq!(id.len(), 24);

    let fetched: Value = app
        .client
        .get(app.url(&format!("/api/snippets/{}", id)))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(fetched, created);

    let response = app
        .client
        .put(app.url(&format!("/api/snippets/{}", id)))
        .json(&json!({
            "title": "Add two numbers v2",
            "language": "python",
            "code": "a+b"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let updated: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(updated["title"], "Add two numbers v2");
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["tags"], json!(["math"]));
    assert_eq!(updated["created_at"], created["created_at"]);

    let response = app
        .client
        .delete(app.url(&format!("/api/snippets/{}", id)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 204);
    assert!(response.text().await.expect("Failed to read body").is_empty());

    let response = app
        .client
        .get(app.url(&format!("/api/snippets/{}", id)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Not found");
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let app = TestApp::spawn().await;

    for body in [
        json!({ "language": "rust", "code": "fn main() {}" }),
        json!({ "title": "t", "code": "fn main() {}" }),
        json!({ "title": "t", "language": "rust" }),
        json!({ "title": "", "language": "rust", "code": "x" }),
    ] {
        let response = app.create(body).await;
        assert_eq!(response.status().as_u16(), 400);
        let error: Value = response.json().await.expect("Failed to parse JSON");
        assert!(error["message"]
            .as_str()
            .unwrap()
            .starts_with("Snippet validation failed"));
    }

    assert!(app.store.is_empty());
    assert!(app.list("").await.is_empty());
}

#[tokio::test]
async fn create_rejects_malformed_json_with_message() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/snippets"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let error: Value = response.json().await.expect("Failed to parse JSON");
    assert!(error["message"].is_string());
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn create_keeps_optional_fields_and_supplied_created_at() {
    let app = TestApp::spawn().await;

    let response = app
        .create(json!({
            "title": "Fetch",
            "language": "TypeScript",
            "code": "await fetch(url)",
            "description": "HTTP GET",
            "created_at": "2023-05-01T12:00:00.000Z",
            "unknown": "ignored"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let created: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(created["language"], "typescript");
    assert_eq!(created["description"], "HTTP GET");
    assert_eq!(created["tags"], json!([]));
    assert_eq!(created["created_at"], "2023-05-01T12:00:00Z");
    assert!(created.get("unknown").is_none());
}

#[tokio::test]
async fn list_is_newest_first_and_respects_limit() {
    let app = TestApp::spawn().await;

    for (title, created_at) in [
        ("old", "2024-01-01T00:00:00Z"),
        ("new", "2024-03-01T00:00:00Z"),
        ("mid", "2024-02-01T00:00:00Z"),
    ] {
        let response = app
            .create(json!({
                "title": title,
                "language": "go",
                "code": "x",
                "created_at": created_at
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let titles = |snippets: Vec<Value>| -> Vec<String> {
        snippets
            .iter()
            .map(|s| s["title"].as_str().unwrap().to_string())
            .collect()
    };

    assert_eq!(titles(app.list("").await), vec!["new", "mid", "old"]);
    assert_eq!(titles(app.list("?limit=0").await), vec!["new", "mid", "old"]);
    assert_eq!(titles(app.list("?limit=2").await), vec!["new", "mid"]);
    assert_eq!(titles(app.list("?limit=10").await).len(), 3);
    assert_eq!(titles(app.list("?limit=abc").await).len(), 3);
}

#[tokio::test]
async fn list_language_filter_is_case_insensitive() {
    let app = TestApp::spawn().await;

    app.create_ok("a", "JavaScript").await;
    app.create_ok("b", "javascript").await;
    app.create_ok("c", "Rust").await;

    let upper = app.list("?lang=JavaScript").await;
    let lower = app.list("?lang=javascript").await;

    assert_eq!(upper.len(), 2);
    assert_eq!(upper, lower);
    assert!(upper.iter().all(|s| s["language"] == "javascript"));

    let combined = app.list("?lang=RUST&limit=5").await;
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0]["title"], "c");

    assert_eq!(app.list("?lang=").await.len(), 3);
}

#[tokio::test]
async fn unknown_ids_return_not_found_without_side_effects() {
    let app = TestApp::spawn().await;
    let missing = "64b7f0c2a1b2c3d4e5f60718";

    let response = app
        .client
        .get(app.url(&format!("/api/snippets/{}", missing)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Not found");

    let response = app
        .client
        .put(app.url(&format!("/api/snippets/{}", missing)))
        .json(&json!({ "title": "t", "language": "go", "code": "x" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Snippet not found");

    let response = app
        .client
        .delete(app.url(&format!("/api/snippets/{}", missing)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Snippet not found");

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn malformed_ids_map_per_endpoint() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/snippets/not-an-id"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["message"].as_str().unwrap().contains("not-an-id"));

    let response = app
        .client
        .put(app.url("/api/snippets/not-an-id"))
        .json(&json!({ "title": "t", "language": "go", "code": "x" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .client
        .delete(app.url("/api/snippets/not-an-id"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn update_validates_like_create_and_lowercases_language() {
    let app = TestApp::spawn().await;
    let created = app.create_ok("Sort", "rust").await;
    let id = created["_id"].as_str().unwrap();

    let response = app
        .client
        .put(app.url(&format!("/api/snippets/{}", id)))
        .json(&json!({ "title": "Sort v2" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["message"].as_str().unwrap().contains("language"));

    let unchanged: Value = app
        .client
        .get(app.url(&format!("/api/snippets/{}", id)))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(unchanged, created);

    let response = app
        .client
        .put(app.url(&format!("/api/snippets/{}", id)))
        .json(&json!({
            "title": "Sort v2",
            "language": "RUST",
            "code": "v.sort()",
            "tags": ["std"]
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let updated: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(updated["language"], "rust");
    assert_eq!(updated["code"], "v.sort()");
    assert_eq!(updated["tags"], json!(["std"]));
}

#[tokio::test]
async fn list_rejects_unparseable_query() {
    let app = TestApp::spawn().await;
    app.create_ok("a", "go").await;

    let response = app
        .client
        .get(app.url("/api/snippets?lang=rust&lang=python"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["message"].is_string());
    assert!(body.as_array().is_none());
}

#[tokio::test]
async fn update_with_null_description_clears_it() {
    let app = TestApp::spawn().await;
    let created: Value = app
        .create(json!({
            "title": "t",
            "language": "go",
            "code": "x",
            "description": "first"
        }))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    let url = app.url(&format!("/api/snippets/{}", created["_id"].as_str().unwrap()));

    let kept: Value = app
        .client
        .put(&url)
        .json(&json!({ "title": "t", "language": "go", "code": "y" }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(kept["description"], "first");

    let response = app
        .client
        .put(&url)
        .json(&json!({ "title": "t", "language": "go", "code": "y", "description": null }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let cleared: Value = response.json().await.expect("Failed to parse JSON");
    assert!(cleared.get("description").is_none());

    let fetched: Value = app
        .client
        .get(&url)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert!(fetched.get("description").is_none());
}

#[tokio::test]
async fn trailing_slash_paths_are_served() {
    let app = TestApp::spawn().await;
    let created = app.create_ok("a", "go").await;
    let id = created["_id"].as_str().unwrap();

    let response = app
        .client
        .get(app.url("/api/snippets/"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let listed: Vec<Value> = response.json().await.expect("Failed to parse JSON");
    assert_eq!(listed.len(), 1);

    let response = app
        .client
        .post(app.url("/api/snippets/"))
        .json(&json!({ "title": "b", "language": "go", "code": "x" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let fetched: Value = app
        .client
        .get(app.url(&format!("/api/snippets/{}/", id)))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(fetched, created);

    let response = app
        .client
        .delete(app.url(&format!("/api/snippets/{}/", id)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 204);
    assert_eq!(app.store.len(), 1);
}
