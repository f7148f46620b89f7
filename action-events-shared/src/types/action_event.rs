use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ActionKind, Guid};

/// Entity type carried by user accounts.
pub const USER_ENTITY_TYPE: &str = "user";

/// Action-specific payload, e.g. `comment_urn`, `amount`, `bid` or `toGuid`.
///
/// Keys are kept sorted so the payload serialises the same way every time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionData(Map<String, Value>);

impl ActionData {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds a field, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ActionData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A reference to the entity an action was performed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub guid: Guid,
    /// `None` for entities without an owner.
    pub owner_guid: Option<Guid>,
    pub urn: String,
    pub entity_type: String,
    pub subtype: String,
}

impl EntityRef {
    /// A user account. Users own themselves.
    pub fn user(guid: Guid) -> Self {
        Self {
            urn: format!("urn:user:{}", guid),
            owner_guid: Some(guid.clone()),
            guid,
            entity_type: USER_ENTITY_TYPE.to_string(),
            subtype: String::new(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.entity_type == USER_ENTITY_TYPE
    }
}

/// Immutable record of "actor did `action` to `entity`".
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    action: ActionKind,
    action_data: ActionData,
    user: EntityRef,
    entity: EntityRef,
}

impl ActionEvent {
    pub fn new(action: ActionKind, user: EntityRef, entity: EntityRef) -> Self {
        Self {
            action,
            action_data: ActionData::new(),
            user,
            entity,
        }
    }

    pub fn with_action_data(mut self, action_data: ActionData) -> Self {
        self.action_data = action_data;
        self
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    pub fn action_data(&self) -> &ActionData {
        &self.action_data
    }

    /// The acting user.
    pub fn user(&self) -> &EntityRef {
        &self.user
    }

    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }
}
