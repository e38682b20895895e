use crate::error::SnippetError;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

/// Schema order of the required fields, used to order validation messages.
const REQUIRED_FIELDS: [&str; 3] = ["title", "language", "code"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snippet {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Request body accepted by create and update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SnippetPayload {
    #[validate(
        required(message = "Path `title` is required."),
        length(min = 1, message = "Path `title` is required.")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Path `language` is required."),
        length(min = 1, message = "Path `language` is required.")
    )]
    pub language: Option<String>,

    #[validate(
        required(message = "Path `code` is required."),
        length(min = 1, message = "Path `code` is required.")
    )]
    pub code: Option<String>,

    /// `Some(None)` is an explicit `null`, which clears a stored description.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A validated, normalized payload.
///
/// Optional fields stay `None` when the caller left them out, so an update
/// only touches what was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetFields {
    pub title: String,
    pub language: String,
    pub code: String,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SnippetPayload {
    pub fn into_fields(self) -> Result<SnippetFields, SnippetError> {
        self.validate()
            .map_err(|e| SnippetError::Validation(validation_message(&e)))?;

        match (self.title, self.language, self.code) {
            (Some(title), Some(language), Some(code)) => Ok(SnippetFields {
                title,
                language: language.to_lowercase(),
                code,
                description: self.description,
                tags: self.tags,
                created_at: self.created_at.map(truncate_to_millis),
            }),
            _ => Err(SnippetError::Validation(
                "Snippet validation failed".to_string(),
            )),
        }
    }
}

impl SnippetFields {
    pub fn into_snippet(self) -> Snippet {
        Snippet {
            id: ObjectId::new(),
            title: self.title,
            language: self.language,
            code: self.code,
            description: self.description.flatten(),
            tags: self.tags.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(now),
        }
    }

    /// Merges these fields into an existing snippet in place.
    pub fn apply_to(self, snippet: &mut Snippet) {
        snippet.title = self.title;
        snippet.language = self.language;
        snippet.code = self.code;
        if let Some(description) = self.description {
            snippet.description = description;
        }
        if let Some(tags) = self.tags {
            snippet.tags = tags;
        }
        if let Some(created_at) = self.created_at {
            snippet.created_at = created_at;
        }
    }

    /// The update document equivalent to [`SnippetFields::apply_to`].
    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {
            "title": self.title.as_str(),
            "language": self.language.as_str(),
            "code": self.code.as_str(),
        };
        let mut unset = Document::new();
        match &self.description {
            Some(Some(description)) => {
                set.insert("description", description.as_str());
            }
            Some(None) => {
                unset.insert("description", "");
            }
            None => {}
        }
        if let Some(tags) = &self.tags {
            set.insert("tags", tags.clone());
        }
        if let Some(created_at) = self.created_at {
            set.insert("created_at", bson::DateTime::from_chrono(created_at));
        }
        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }
        update
    }
}

/// Current time at the millisecond precision BSON dates can hold.
pub fn now() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut failures: Vec<(usize, String, String)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let position = REQUIRED_FIELDS
                .iter()
                .position(|required| *required == field)
                .unwrap_or(REQUIRED_FIELDS.len());
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Path `{}` is invalid.", field));
            (position, field, message)
        })
        .collect();
    failures.sort();

    let details = failures
        .into_iter()
        .map(|(_, field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join(", ");

    format!("Snippet validation failed: {}", details)
}
