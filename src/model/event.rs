//! `Event` as a persisted record.

use crate::proto::Event;
use eventhub_framework::Record;

impl Record for Event {
    const COLLECTION: &'static str = "eventhub";

    fn identity(&self) -> &str {
        &self.id
    }

    fn assign_identity(&mut self, id: String) {
        self.id = id;
    }
}

impl Event {
    /// A new, not yet persisted event.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: description.into(),
            timestamp: timestamp.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_framework::bson::doc;
    use eventhub_framework::project;

    #[test]
    fn projects_every_field_but_the_identity() {
        let mut event = Event::new("Launch", "Product launch", "2024-05-01T10:00:00Z");
        event.id = "ignored".into();

        let doc = project(&event).unwrap();
        assert_eq!(
            doc,
            doc! {
                "name": "Launch",
                "description": "Product launch",
                "timestamp": "2024-05-01T10:00:00Z",
            }
        );
    }

    #[test]
    fn keys_follow_schema_order() {
        let doc = project(&Event::new("a", "b", "c")).unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "description", "timestamp"]);
    }

    #[test]
    fn empty_fields_are_kept() {
        let doc = project(&Event::default()).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get_str("name").unwrap(), "");
    }

    #[test]
    fn identity_is_assigned_once_persisted() {
        let mut event = Event::new("Launch", "", "");
        assert!(!event.is_persisted());
        event.assign_identity("65f1a2b3c4d5e6f708192a3b".into());
        assert!(event.is_persisted());
        assert_eq!(event.identity(), "65f1a2b3c4d5e6f708192a3b");
    }

    #[test]
    fn collection_is_fixed() {
        assert_eq!(<Event as Record>::COLLECTION, "eventhub");
    }
}
