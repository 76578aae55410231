//! Document-store value model.
//!
//! Documents are JSON objects addressed by a collection path plus an id,
//! e.g. `users/ada/sessions` + `0b6f...`. Writes are lists of field writes
//! that may carry store-resolved values (server timestamps, array unions),
//! and both store adapters resolve them with [`FieldWrites::apply`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::RepositoryError;

/// JSON object holding a document's fields.
pub type Fields = Map<String, Value>;

fn check_segment(segment: &str) -> Result<(), RepositoryError> {
    if segment.is_empty() {
        return Err(RepositoryError::InvalidPath("empty path segment".to_string()));
    }
    if segment.contains('/') {
        return Err(RepositoryError::InvalidPath(format!(
            "segment '{segment}' contains '/'"
        )));
    }
    Ok(())
}

/// Path of a collection: alternating collection/document segments ending in
/// a collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// A top-level collection.
    pub fn root(name: &str) -> Result<Self, RepositoryError> {
        check_segment(name)?;
        Ok(Self(name.to_string()))
    }

    /// Address a document inside this collection.
    pub fn doc(&self, id: &str) -> Result<DocumentPath, RepositoryError> {
        check_segment(id)?;
        Ok(DocumentPath {
            collection: self.clone(),
            id: id.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

impl DocumentPath {
    /// A sub-collection nested under this document.
    pub fn collection(&self, name: &str) -> Result<CollectionPath, RepositoryError> {
        check_segment(name)?;
        Ok(CollectionPath(format!("{}/{}/{}", self.collection, self.id, name)))
    }

    pub fn parent(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Deserialize the document's fields into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RepositoryError> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| {
            RepositoryError::Query(format!("malformed document '{}': {e}", self.id))
        })
    }
}

/// Value carried by a single field write.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Store the value as-is.
    Value(Value),
    /// Store the store's current time (RFC 3339).
    ServerTimestamp,
    /// Append each value not already present in the array field.
    ArrayUnion(Vec<Value>),
}

/// Ordered list of field writes applied to one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldWrites(Vec<(String, FieldValue)>);

impl FieldWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.push((field.to_string(), FieldValue::Value(value.into())));
        self
    }

    pub fn server_timestamp(mut self, field: &str) -> Self {
        self.0.push((field.to_string(), FieldValue::ServerTimestamp));
        self
    }

    pub fn array_union(mut self, field: &str, values: Vec<Value>) -> Self {
        self.0.push((field.to_string(), FieldValue::ArrayUnion(values)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve the writes onto `target`, using `now` for server timestamps.
    ///
    /// An array union onto a missing or non-array field replaces it with the
    /// deduplicated values.
    pub fn apply(&self, target: &mut Fields, now: DateTime<Utc>) {
        for (field, value) in &self.0 {
            match value {
                FieldValue::Value(v) => {
                    target.insert(field.clone(), v.clone());
                }
                FieldValue::ServerTimestamp => {
                    target.insert(field.clone(), Value::String(now.to_rfc3339()));
                }
                FieldValue::ArrayUnion(values) => {
                    let slot = target
                        .entry(field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if !slot.is_array() {
                        *slot = Value::Array(Vec::new());
                    }
                    if let Value::Array(items) = slot {
                        for v in values {
                            if !items.contains(v) {
                                items.push(v.clone());
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-17T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_paths_nest() {
        let users = CollectionPath::root("users").unwrap();
        let ada = users.doc("ada").unwrap();
        let sessions = ada.collection("sessions").unwrap();
        let session = sessions.doc("s1").unwrap();

        assert_eq!(ada.to_string(), "users/ada");
        assert_eq!(sessions.as_str(), "users/ada/sessions");
        assert_eq!(session.to_string(), "users/ada/sessions/s1");
        assert_eq!(session.parent(), &sessions);
        assert_eq!(session.id(), "s1");
    }

    #[test]
    fn test_invalid_segments_rejected() {
        let users = CollectionPath::root("users").unwrap();
        assert!(matches!(users.doc(""), Err(RepositoryError::InvalidPath(_))));
        assert!(matches!(users.doc("a/b"), Err(RepositoryError::InvalidPath(_))));
        assert!(CollectionPath::root("").is_err());
    }

    #[test]
    fn test_apply_values_and_timestamp() {
        let mut fields = Fields::new();
        FieldWrites::new()
            .value("email", "ada@x.com")
            .server_timestamp("created_at")
            .apply(&mut fields, now());

        assert_eq!(fields["email"], json!("ada@x.com"));
        assert_eq!(fields["created_at"], json!("2026-10-17T12:00:00+00:00"));
    }

    #[test]
    fn test_array_union_deduplicates() {
        let mut fields = Fields::new();
        fields.insert("sessions".to_string(), json!(["a"]));

        FieldWrites::new()
            .array_union("sessions", vec![json!("a"), json!("b"), json!("b")])
            .apply(&mut fields, now());

        assert_eq!(fields["sessions"], json!(["a", "b"]));
    }

    #[test]
    fn test_array_union_creates_missing_field() {
        let mut fields = Fields::new();
        FieldWrites::new()
            .array_union("user_history", vec![json!("hi")])
            .apply(&mut fields, now());
        assert_eq!(fields["user_history"], json!(["hi"]));
    }

    #[test]
    fn test_array_union_replaces_non_array() {
        let mut fields = Fields::new();
        fields.insert("tags".to_string(), json!("scalar"));
        FieldWrites::new()
            .array_union("tags", vec![json!("x")])
            .apply(&mut fields, now());
        assert_eq!(fields["tags"], json!(["x"]));
    }

    #[test]
    fn test_apply_leaves_other_fields() {
        let mut fields = Fields::new();
        fields.insert("email".to_string(), json!("ada@x.com"));
        FieldWrites::new()
            .value("sessions", json!(["s1"]))
            .apply(&mut fields, now());
        assert_eq!(fields["email"], json!("ada@x.com"));
        assert_eq!(fields["sessions"], json!(["s1"]));
    }

    #[test]
    fn test_decode_reports_malformed_document() {
        let doc = Document {
            id: "ada".to_string(),
            fields: json!({"email": 42}).as_object().unwrap().clone(),
        };
        let result: Result<crate::chat::UserRecord, _> = doc.decode();
        assert!(matches!(result, Err(RepositoryError::Query(_))));
    }
}
