//! Record schema bound to every action topic.
//!
//! Topics are schema-bound: producers and subscriptions declare the schema
//! they speak and payloads are validated against it. Evolving the envelope
//! means publishing a new schema version, never changing fields in place.

use serde_json::{json, Value};

use crate::errors::SchemaError;

/// Primitive field types supported by the envelope schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub field_type: FieldType,
}

/// An Avro-style record schema with required fields only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub namespace: &'static str,
    pub version: u32,
    pub fields: Vec<SchemaField>,
}

impl Schema {
    /// The action envelope schema: eight required string fields.
    pub fn action() -> Self {
        let string = |name| SchemaField {
            name,
            field_type: FieldType::String,
        };
        Self {
            name: "action",
            namespace: "engine",
            version: 1,
            fields: vec![
                string("action"),
                string("action_data"),
                string("user_guid"),
                string("entity_urn"),
                string("entity_guid"),
                string("entity_owner_guid"),
                string("entity_type"),
                string("entity_subtype"),
            ],
        }
    }

    /// The schema definition as registered with the bus.
    pub fn definition(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|f| json!({ "name": f.name, "type": f.field_type.as_str() }))
            .collect();
        json!({
            "type": "record",
            "name": self.name,
            "namespace": self.namespace,
            "fields": fields,
        })
    }

    /// Checks that `payload` is a record carrying exactly the schema fields
    /// with the declared types.
    pub fn validate(&self, payload: &Value) -> Result<(), SchemaError> {
        let record = payload.as_object().ok_or(SchemaError::NotARecord)?;

        for field in &self.fields {
            let value = record
                .get(field.name)
                .ok_or_else(|| SchemaError::MissingField(field.name.to_string()))?;
            if !field.field_type.accepts(value) {
                return Err(SchemaError::WrongType {
                    field: field.name.to_string(),
                    expected: field.field_type.as_str().to_string(),
                });
            }
        }

        if let Some(extra) = record
            .keys()
            .find(|key| !self.fields.iter().any(|f| f.name == key.as_str()))
        {
            return Err(SchemaError::UnexpectedField(extra.clone()));
        }

        Ok(())
    }

    /// Validates a raw JSON payload.
    pub fn validate_bytes(&self, payload: &[u8]) -> Result<(), SchemaError> {
        let value: Value = serde_json::from_slice(payload).map_err(|_| SchemaError::NotARecord)?;
        self.validate(&value)
    }
}
