//! Plaintext item model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Kind of item, as carried in `content_type` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentType {
    Note,
    Tag,
    /// Anything else the account holds (components, themes, preferences)
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Note => "Note",
            Self::Tag => "Tag",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        match s {
            "Note" => Self::Note,
            "Tag" => Self::Tag,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("content type must not be empty".to_string());
        }
        Ok(Self::from(trimmed))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link from one item to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub uuid: Uuid,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<Reference>,
}

// Other clients write `null` for fields they never filled in.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Typed item payload
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Note(NoteContent),
    Tag(TagContent),
    Other(serde_json::Value),
}

impl Content {
    /// Empty payload for `content_type`, used for tombstones
    pub fn empty(content_type: &ContentType) -> Self {
        match content_type {
            ContentType::Note => Self::Note(NoteContent::default()),
            ContentType::Tag => Self::Tag(TagContent::default()),
            ContentType::Other(_) => Self::Other(serde_json::Value::Object(Default::default())),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Self::Note(note) => serde_json::to_vec(note),
            Self::Tag(tag) => serde_json::to_vec(tag),
            Self::Other(value) => serde_json::to_vec(value),
        }
    }

    /// Parse decrypted bytes according to the item's declared type
    pub fn from_json(content_type: &ContentType, bytes: &[u8]) -> serde_json::Result<Self> {
        Ok(match content_type {
            ContentType::Note => Self::Note(serde_json::from_slice(bytes)?),
            ContentType::Tag => Self::Tag(serde_json::from_slice(bytes)?),
            ContentType::Other(_) => Self::Other(serde_json::from_slice(bytes)?),
        })
    }
}

/// A plaintext item
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub uuid: Uuid,
    pub content_type: ContentType,
    pub content: Content,
    pub deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(content_type: ContentType, content: Content) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            content_type,
            content,
            deleted: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn note(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            ContentType::Note,
            Content::Note(NoteContent {
                title: title.into(),
                text: text.into(),
                references: Vec::new(),
            }),
        )
    }

    pub fn tag(title: impl Into<String>) -> Self {
        Self::new(
            ContentType::Tag,
            Content::Tag(TagContent {
                title: title.into(),
                references: Vec::new(),
            }),
        )
    }

    /// Deletion marker for this item: same identity and type, empty payload,
    /// `deleted` set. The receiver is left untouched.
    pub fn tombstone(&self) -> Self {
        Self {
            uuid: self.uuid,
            content_type: self.content_type.clone(),
            content: Content::empty(&self.content_type),
            deleted: true,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
