//! # Record Trait
//!
//! The `Record` trait is the contract every persisted type (Event, and whatever comes
//! after it) implements so the generic [`project`](crate::projection::project) function
//! and the store gateway can handle it without per-type mapping code.
//!
//! # Architecture Note
//! The field list of a record is *not* described here. It comes from the record's
//! `serde::Serialize` implementation, which is derived from the schema definition
//! (for wire types, the code generator emits the derive). Adding a field to the schema
//! therefore changes the persisted document with no mapping table to keep in sync.
//!
//! What the trait does describe is the part serde cannot know:
//! - which field is the **identity** field (excluded from every projected document)
//! - which **collection** the record lives in
//! - how to read and assign the store-generated identifier

use serde::Serialize;
use std::fmt::Debug;

/// Trait that any persisted record must implement.
///
/// # Identity
/// The identity field is assigned exactly once, by the store, after the first successful
/// insert. It is never part of the document sent for insertion.
///
/// # Example
///
/// ```rust
/// use eventhub_framework::Record;
/// use serde::Serialize;
///
/// #[derive(Debug, Clone, Default, Serialize)]
/// struct Venue {
///     id: String,
///     name: String,
///     capacity: u32,
/// }
///
/// impl Record for Venue {
///     const COLLECTION: &'static str = "venues";
///
///     fn identity(&self) -> &str {
///         &self.id
///     }
///
///     fn assign_identity(&mut self, id: String) {
///         self.id = id;
///     }
/// }
///
/// let mut venue = Venue { name: "Hall".into(), ..Default::default() };
/// assert!(!venue.is_persisted());
/// venue.assign_identity("65f0c0ffee".into());
/// assert!(venue.is_persisted());
/// ```
pub trait Record: Serialize + Debug + Send + Sync + 'static {
    /// Name of the collection the record is stored in. Fixed per record type.
    const COLLECTION: &'static str;

    /// Serialized name of the identity field.
    ///
    /// Matched against serialized keys ignoring ASCII case, so `"id"` also drops a
    /// field serialized as `Id` or `ID`.
    const IDENTITY: &'static str = "id";

    /// The current identifier. Empty until the record has been persisted.
    fn identity(&self) -> &str;

    /// Store the identifier generated by the document store.
    fn assign_identity(&mut self, id: String);

    /// Whether the store has assigned an identifier yet.
    fn is_persisted(&self) -> bool {
        !self.identity().is_empty()
    }
}
