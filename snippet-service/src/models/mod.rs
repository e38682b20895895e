pub mod snippet;

pub use snippet::{Snippet, SnippetFields, SnippetPayload};
