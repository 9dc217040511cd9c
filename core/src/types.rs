//! Domain DTOs for the One API.
//!
//! # Design
//! These mirror the JSON documents the API returns. Every list endpoint
//! wraps its documents in the same envelope, decoded here as `Page<T>`:
//! the documents plus a `Status` describing where they sit in the full
//! result set. Fields the API leaves out, or sends as `null`, fall back
//! to their defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub runtime_in_minutes: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub budget_in_millions: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub box_office_revenue_in_millions: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub academy_award_nominations: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub academy_award_wins: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub rotten_tomatoes_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub birth: String,
    #[serde(deserialize_with = "null_as_default")]
    pub death: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hair: String,
    #[serde(deserialize_with = "null_as_default")]
    pub realm: String,
    #[serde(deserialize_with = "null_as_default")]
    pub height: String,
    #[serde(deserialize_with = "null_as_default")]
    pub spouse: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub race: String,
    #[serde(deserialize_with = "null_as_default")]
    pub wiki_url: String,
}

/// A line of dialog. `movie` and `character` hold ids, not documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dialog: String,
    #[serde(deserialize_with = "null_as_default")]
    pub movie: String,
    #[serde(deserialize_with = "null_as_default")]
    pub character: String,
}

/// A book chapter. `book` holds the id of the owning book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Chapter {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub chapter_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub book: String,
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub page: u64,
    pub pages: u64,
}

/// One response from a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub docs: Vec<T>,
    #[serde(flatten)]
    pub status: Status,
}
