//! The eight-field wire envelope published for every action event.
//!
//! `action_data` travels as a JSON-encoded string inside the JSON envelope.
//! The double encoding keeps the record flat and schema-checkable regardless
//! of the action-specific payload shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::EnvelopeError;
use crate::schema::Schema;
use crate::types::{ActionData, ActionEvent, ActionKind, EntityRef, Guid};

/// One wire record. Every field is a string, guids included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionEnvelope {
    pub action: String,
    pub action_data: String,
    pub user_guid: String,
    pub entity_urn: String,
    pub entity_guid: String,
    pub entity_owner_guid: String,
    pub entity_type: String,
    pub entity_subtype: String,
}

/// A decoded envelope whose fields have been checked.
///
/// The user and entity are still bare references; consumers rehydrate them
/// before building an [`ActionEvent`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub action: ActionKind,
    pub action_data: ActionData,
    pub user_guid: Guid,
    pub entity: EntityRef,
}

impl ActionEnvelope {
    pub fn from_event(event: &ActionEvent) -> Result<Self, EnvelopeError> {
        let entity = event.entity();
        Ok(Self {
            action: event.action().as_str().to_string(),
            action_data: serde_json::to_string(event.action_data())?,
            user_guid: event.user().guid.to_string(),
            entity_urn: entity.urn.clone(),
            entity_guid: entity.guid.to_string(),
            entity_owner_guid: entity
                .owner_guid
                .as_ref()
                .map(Guid::to_string)
                .unwrap_or_default(),
            entity_type: entity.entity_type.clone(),
            entity_subtype: entity.subtype.clone(),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EnvelopeError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a payload, validating it against `schema` first.
    pub fn decode(payload: &[u8], schema: &Schema) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_slice(payload)?;
        schema.validate(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Checks every field and converts the envelope into an [`ActionRecord`].
    ///
    /// The action kind is checked last so a well formed envelope carrying an
    /// unknown kind reports [`EnvelopeError::UnknownAction`] rather than a
    /// structural error.
    pub fn into_record(self) -> Result<ActionRecord, EnvelopeError> {
        let user_guid = parse_guid("user_guid", &self.user_guid)?;
        let entity_guid = parse_guid("entity_guid", &self.entity_guid)?;
        let owner_guid = if self.entity_owner_guid.is_empty() {
            None
        } else {
            Some(parse_guid("entity_owner_guid", &self.entity_owner_guid)?)
        };

        let action_data = match serde_json::from_str::<Value>(&self.action_data)? {
            Value::Object(map) => ActionData::from(map),
            // PHP-era producers encoded an empty payload as `[]`
            Value::Array(items) if items.is_empty() => ActionData::new(),
            _ => return Err(EnvelopeError::ActionDataNotObject),
        };

        let action = self.action.parse::<ActionKind>()?;

        Ok(ActionRecord {
            action,
            action_data,
            user_guid,
            entity: EntityRef {
                guid: entity_guid,
                owner_guid,
                urn: self.entity_urn,
                entity_type: self.entity_type,
                subtype: self.entity_subtype,
            },
        })
    }
}

fn parse_guid(field: &'static str, value: &str) -> Result<Guid, EnvelopeError> {
    Guid::parse(value).map_err(|source| EnvelopeError::InvalidGuid { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> ActionEvent {
        let entity = EntityRef {
            guid: Guid::parse("1234567890123456789").unwrap(),
            owner_guid: Some(Guid::parse("0098765432109876543").unwrap()),
            urn: "urn:activity:1234567890123456789".to_string(),
            entity_type: "activity".to_string(),
            subtype: String::new(),
        };
        ActionEvent::new(
            ActionKind::Comment,
            EntityRef::user(Guid::parse("100000000000000000001").unwrap()),
            entity,
        )
        .with_action_data(ActionData::new().with("comment_urn", "urn:comment:1:2"))
    }

    #[test]
    fn test_action_data_is_double_encoded() {
        let envelope = ActionEnvelope::from_event(&sample_event()).unwrap();
        let encoded: Value = serde_json::from_slice(&envelope.encode().unwrap()).unwrap();
        assert_eq!(
            encoded["action_data"],
            json!("{\"comment_urn\":\"urn:comment:1:2\"}")
        );
        assert_eq!(encoded["user_guid"], json!("100000000000000000001"));
        assert_eq!(encoded["entity_owner_guid"], json!("0098765432109876543"));
    }

    #[test]
    fn test_decode_into_record_preserves_guids() {
        let event = sample_event();
        let bytes = ActionEnvelope::from_event(&event).unwrap().encode().unwrap();
        let record = ActionEnvelope::decode(&bytes, &Schema::action())
            .unwrap()
            .into_record()
            .unwrap();

        assert_eq!(record.action, ActionKind::Comment);
        assert_eq!(record.action_data, *event.action_data());
        assert_eq!(record.user_guid.as_str(), "100000000000000000001");
        assert_eq!(record.entity, *event.entity());
    }

    #[test]
    fn test_empty_owner_becomes_none() {
        let mut envelope = ActionEnvelope::from_event(&sample_event()).unwrap();
        envelope.entity_owner_guid = String::new();
        let record = envelope.into_record().unwrap();
        assert_eq!(record.entity.owner_guid, None);
    }

    #[test]
    fn test_empty_array_action_data_is_accepted() {
        let mut envelope = ActionEnvelope::from_event(&sample_event()).unwrap();
        envelope.action_data = "[]".to_string();
        let record = envelope.into_record().unwrap();
        assert!(record.action_data.is_empty());
    }

    #[test]
    fn test_scalar_action_data_is_rejected() {
        let mut envelope = ActionEnvelope::from_event(&sample_event()).unwrap();
        envelope.action_data = "42".to_string();
        assert!(matches!(
            envelope.into_record(),
            Err(EnvelopeError::ActionDataNotObject)
        ));
    }

    #[test]
    fn test_unknown_action_reported_after_structure_checks() {
        let mut envelope = ActionEnvelope::from_event(&sample_event()).unwrap();
        envelope.action = "supermind_request".to_string();
        assert!(envelope.clone().into_record().unwrap_err().is_unknown_action());

        envelope.user_guid = "abc".to_string();
        assert!(matches!(
            envelope.into_record(),
            Err(EnvelopeError::InvalidGuid { field: "user_guid", .. })
        ));
    }

    #[test]
    fn test_decode_rejects_schema_violation() {
        let payload = json!({ "action": "vote_up" }).to_string();
        assert!(matches!(
            ActionEnvelope::decode(payload.as_bytes(), &Schema::action()),
            Err(EnvelopeError::Schema(_))
        ));
    }
}
