use crate::models::Snippet;
use crate::services::SnippetFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnippetResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Snippet> for SnippetResponse {
    fn from(snippet: Snippet) -> Self {
        Self {
            id: snippet.id.to_hex(),
            title: snippet.title,
            language: snippet.language,
            code: snippet.code,
            description: snippet.description,
            tags: snippet.tags,
            created_at: snippet.created_at,
        }
    }
}

/// Query string of `GET /api/snippets`. Both values are read leniently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnippetListParams {
    pub lang: Option<String>,
    pub limit: Option<String>,
}

impl SnippetListParams {
    pub fn filter(&self) -> SnippetFilter {
        SnippetFilter {
            language: self.lang.clone().filter(|lang| !lang.is_empty()),
        }
    }

    /// `0` means unbounded. Reads an optional sign and the leading digits,
    /// so `"5abc"` is 5 and `"abc"` is 0; a negative limit counts by its
    /// magnitude. A `0x` prefix switches to hexadecimal digits.
    pub fn limit(&self) -> u64 {
        let Some(raw) = self.limit.as_deref() else {
            return 0;
        };
        let raw = raw.trim_start();
        let digits = match raw.as_bytes().first() {
            Some(b'-') | Some(b'+') => &raw[1..],
            _ => raw,
        };
        let (digits, radix) = match digits.get(..2) {
            Some("0x") | Some("0X") => (&digits[2..], 16),
            _ => (digits, 10),
        };
        let end = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());

        u64::from_str_radix(&digits[..end], radix).unwrap_or(0)
    }
}
