pub mod database;
pub mod memory;
pub mod metrics;
pub mod snippets;
pub mod store;

pub use database::MongoDb;
pub use memory::InMemorySnippetStore;
pub use metrics::{get_metrics, init_metrics};
pub use snippets::SnippetService;
pub use store::{SnippetFilter, SnippetStore};
