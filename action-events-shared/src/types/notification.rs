use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Guid;

/// Namespace for notification uuids derived from their natural key.
const NOTIFICATION_NAMESPACE: Uuid = Uuid::from_u128(0x5c1f_04a2_8e3b_4d6f_9a71_2b0c_e8d4_1f37);

/// The kinds of notification the classifier produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    VoteUp,
    VoteDown,
    Comment,
    Tag,
    Subscribe,
    Remind,
    Quote,
    BoostRejected,
    BoostPeerRequest,
    BoostPeerAccepted,
    BoostPeerRejected,
    TokenWithdrawAccepted,
    TokenWithdrawRejected,
    GroupInvite,
    GroupQueueAdd,
    GroupQueueApprove,
    GroupQueueReject,
    WirePayout,
    WireReceived,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::VoteUp => "vote_up",
            NotificationType::VoteDown => "vote_down",
            NotificationType::Comment => "comment",
            NotificationType::Tag => "tag",
            NotificationType::Subscribe => "subscribe",
            NotificationType::Remind => "remind",
            NotificationType::Quote => "quote",
            NotificationType::BoostRejected => "boost_rejected",
            NotificationType::BoostPeerRequest => "boost_peer_request",
            NotificationType::BoostPeerAccepted => "boost_peer_accepted",
            NotificationType::BoostPeerRejected => "boost_peer_rejected",
            NotificationType::TokenWithdrawAccepted => "token_withdraw_accepted",
            NotificationType::TokenWithdrawRejected => "token_withdraw_rejected",
            NotificationType::GroupInvite => "group_invite",
            NotificationType::GroupQueueAdd => "group_queue_add",
            NotificationType::GroupQueueApprove => "group_queue_approve",
            NotificationType::GroupQueueReject => "group_queue_reject",
            NotificationType::WirePayout => "wire_payout",
            NotificationType::WireReceived => "wire_received",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user notification derived from an action event.
///
/// The `uuid` is derived from the natural key
/// `(to_guid, from_guid, type, entity_urn, data)`, so deriving the same
/// notification twice yields the same identifier. Stores rely on this to
/// absorb duplicate deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub uuid: Uuid,
    pub to_guid: Guid,
    pub from_guid: Guid,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub data: Map<String, Value>,
    pub entity_urn: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        to_guid: Guid,
        from_guid: Guid,
        notification_type: NotificationType,
        data: Map<String, Value>,
        entity_urn: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let uuid = natural_key_uuid(
            &to_guid,
            &from_guid,
            notification_type,
            entity_urn.as_deref(),
            &data,
        );
        Self {
            uuid,
            to_guid,
            from_guid,
            notification_type,
            data,
            entity_urn,
            created_at,
        }
    }
}

fn natural_key_uuid(
    to_guid: &Guid,
    from_guid: &Guid,
    notification_type: NotificationType,
    entity_urn: Option<&str>,
    data: &Map<String, Value>,
) -> Uuid {
    let sorted: BTreeMap<&String, &Value> = data.iter().collect();
    let data_json = serde_json::to_string(&sorted).unwrap_or_default();
    let key = format!(
        "{}|{}|{}|{}|{}",
        to_guid,
        from_guid,
        notification_type,
        entity_urn.unwrap_or_default(),
        data_json
    );
    Uuid::new_v5(&NOTIFICATION_NAMESPACE, key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guid(s: &str) -> Guid {
        Guid::parse(s).unwrap()
    }

    fn comment_data(urn: &str) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("comment_urn".to_string(), Value::String(urn.to_string()));
        data
    }

    #[test]
    fn test_same_natural_key_same_uuid() {
        let a = Notification::new(
            guid("1"),
            guid("2"),
            NotificationType::Comment,
            comment_data("urn:comment:9"),
            Some("urn:activity:7".to_string()),
            Utc::now(),
        );
        let b = Notification::new(
            guid("1"),
            guid("2"),
            NotificationType::Comment,
            comment_data("urn:comment:9"),
            Some("urn:activity:7".to_string()),
            Utc::now() + chrono::Duration::seconds(30),
        );
        assert_eq!(a.uuid, b.uuid);
    }

    #[test]
    fn test_different_data_different_uuid() {
        let a = Notification::new(
            guid("1"),
            guid("2"),
            NotificationType::Comment,
            comment_data("urn:comment:9"),
            None,
            Utc::now(),
        );
        let b = Notification::new(
            guid("1"),
            guid("2"),
            NotificationType::Comment,
            comment_data("urn:comment:10"),
            None,
            Utc::now(),
        );
        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn test_type_serialises_as_snake_case() {
        let value = serde_json::to_value(NotificationType::WirePayout).unwrap();
        assert_eq!(value, Value::String("wire_payout".to_string()));
    }
}
