//! # Document Projector
//!
//! Turns any [`Record`] into the ordered document that is sent to the store.
//!
//! The projection is driven by the record's derived `Serialize` implementation, which
//! acts as a field-descriptor table generated from the schema: fields are visited in
//! declaration order, `#[serde(skip)]` fields never appear, and values keep their
//! serialized types. On top of that the projector applies two fixed rules:
//!
//! 1. The identity field ([`Record::IDENTITY`]) is dropped, whatever its casing.
//! 2. Every remaining key has its first character lowercased; the rest is unchanged.
//!
//! The function is pure: identical input always yields an identical document.

use crate::error::ProjectionError;
use crate::record::Record;
use bson::{Bson, Document};

/// Projects a record into an ordered storage document.
///
/// # Example
///
/// ```rust
/// use eventhub_framework::{project, Record};
/// use serde::Serialize;
///
/// #[derive(Debug, Serialize)]
/// #[serde(rename_all = "PascalCase")]
/// struct Talk {
///     id: String,
///     title: String,
///     speaker: String,
/// }
///
/// impl Record for Talk {
///     const COLLECTION: &'static str = "talks";
///     fn identity(&self) -> &str { &self.id }
///     fn assign_identity(&mut self, id: String) { self.id = id; }
/// }
///
/// let talk = Talk { id: "x".into(), title: "Actors".into(), speaker: "Ada".into() };
/// let doc = project(&talk).unwrap();
/// let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
/// assert_eq!(keys, ["title", "speaker"]);
/// ```
pub fn project<R: Record>(record: &R) -> Result<Document, ProjectionError> {
    let fields = match bson::to_bson(record)? {
        Bson::Document(fields) => fields,
        other => {
            return Err(ProjectionError::NotADocument(format!(
                "{:?}",
                other.element_type()
            )))
        }
    };

    let mut doc = Document::new();
    for (field, value) in fields {
        if field.eq_ignore_ascii_case(R::IDENTITY) {
            continue;
        }
        let key = storage_key(&field);
        if doc.contains_key(&key) {
            return Err(ProjectionError::DuplicateKey(key));
        }
        doc.insert(key, value);
    }
    Ok(doc)
}

/// Derives the storage key for a serialized field name.
///
/// The first character is lowercased and the remainder is kept as-is:
/// `Name` -> `name`, `StartTime` -> `startTime`, `url` -> `url`.
pub fn storage_key(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
