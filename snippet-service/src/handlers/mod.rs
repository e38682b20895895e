pub mod health;
pub mod snippets;

pub use health::{health_check, index, metrics_endpoint, readiness_check};
pub use snippets::{create_snippet, delete_snippet, get_snippet, list_snippets, update_snippet};
