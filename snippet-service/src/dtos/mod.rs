pub mod snippets;

pub use snippets::{SnippetListParams, SnippetResponse};
