//! Turns action events into notifications.
mod rules;

use std::env;

use action_events_shared::{ActionEvent, Guid, Notification, NotificationType};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::errors::{ClassifyError, NotificationsError};

pub use rules::{disposition, Disposition, EntityUrnRule, RecipientRule, Rule, SelfCheck, TypeRule};

/// Classifier settings, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Account paying out plus-tier rewards.
    pub plus_handler: Option<Guid>,
    /// Account paying out pro-tier rewards.
    pub pro_handler: Option<Guid>,
}

impl ClassifierConfig {
    /// Reads the payout handlers from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PLUS_HANDLER_GUID`: Plus-tier payout handler (optional)
    /// - `PRO_HANDLER_GUID`: Pro-tier payout handler (optional)
    pub fn from_env() -> Result<Self, NotificationsError> {
        Ok(Self {
            plus_handler: handler_from_env("PLUS_HANDLER_GUID")?,
            pro_handler: handler_from_env("PRO_HANDLER_GUID")?,
        })
    }

    fn is_payout_handler(&self, guid: &Guid) -> bool {
        self.plus_handler.as_ref() == Some(guid) || self.pro_handler.as_ref() == Some(guid)
    }
}

fn handler_from_env(key: &str) -> Result<Option<Guid>, NotificationsError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Guid::parse(value)
            .map(Some)
            .map_err(|e| NotificationsError::config(format!("{} is invalid: {}", key, e))),
        _ => Ok(None),
    }
}

/// Result of classifying one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The actor acted on their own content.
    Suppressed,
    /// The kind is recognised but its notifications are switched off.
    Disabled,
    /// No notification exists for the kind.
    Unmapped,
    Notify(Notification),
}

/// Applies the rule table to action events.
///
/// Classification is a pure function of the event and the configuration,
/// so classifying a redelivered event yields an identical notification.
#[derive(Debug, Clone, Default)]
pub struct NotificationClassifier {
    config: ClassifierConfig,
}

impl NotificationClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, event: &ActionEvent) -> Result<Classification, ClassifyError> {
        self.classify_at(event, Utc::now())
    }

    /// Classifies `event`, stamping a produced notification with `created_at`.
    pub fn classify_at(
        &self,
        event: &ActionEvent,
        created_at: DateTime<Utc>,
    ) -> Result<Classification, ClassifyError> {
        let rule = match disposition(event.action()) {
            Disposition::Notify(rule) => rule,
            Disposition::Disabled => return Ok(Classification::Disabled),
            Disposition::Unmapped => return Ok(Classification::Unmapped),
        };

        if self.is_self_interaction(event, rule.self_check) {
            return Ok(Classification::Suppressed);
        }

        let notification_type = match rule.notification_type {
            TypeRule::Fixed(notification_type) => notification_type,
            TypeRule::WireSent if self.config.is_payout_handler(&event.user().guid) => {
                NotificationType::WirePayout
            }
            TypeRule::WireSent => NotificationType::WireReceived,
        };

        Ok(Classification::Notify(Notification::new(
            recipient(event, rule.recipient)?,
            event.user().guid.clone(),
            notification_type,
            data(event, rule.data_fields)?,
            Some(entity_urn(event, rule.entity_urn)?),
            created_at,
        )))
    }

    fn is_self_interaction(&self, event: &ActionEvent, check: SelfCheck) -> bool {
        let actor = &event.user().guid;
        match check {
            SelfCheck::Owner => event.entity().owner_guid.as_ref() == Some(actor),
            SelfCheck::EntityGuid => &event.entity().guid == actor,
        }
    }
}

fn field<'a>(event: &'a ActionEvent, name: &'static str) -> Result<&'a Value, ClassifyError> {
    event
        .action_data()
        .get(name)
        .ok_or(ClassifyError::MissingField {
            action: event.action(),
            field: name,
        })
}

fn recipient(event: &ActionEvent, rule: RecipientRule) -> Result<Guid, ClassifyError> {
    let entity = event.entity();
    match rule {
        RecipientRule::Default if entity.is_user() => Ok(entity.guid.clone()),
        RecipientRule::Default => entity
            .owner_guid
            .clone()
            .ok_or(ClassifyError::NoRecipient {
                action: event.action(),
            }),
        RecipientRule::EntityGuid => Ok(entity.guid.clone()),
        RecipientRule::ActionData(name) => {
            Guid::from_json(field(event, name)?).map_err(|source| ClassifyError::InvalidGuid {
                action: event.action(),
                field: name,
                source,
            })
        }
    }
}

fn data(event: &ActionEvent, fields: &[&'static str]) -> Result<Map<String, Value>, ClassifyError> {
    let mut data = Map::new();
    for &name in fields {
        data.insert(name.to_string(), field(event, name)?.clone());
    }
    Ok(data)
}

fn entity_urn(event: &ActionEvent, rule: EntityUrnRule) -> Result<String, ClassifyError> {
    match rule {
        EntityUrnRule::Default => Ok(event.entity().urn.clone()),
        EntityUrnRule::ActionData(name) => field(event, name)?
            .as_str()
            .map(str::to_string)
            .ok_or(ClassifyError::InvalidField {
                action: event.action(),
                field: name,
                expected: "string",
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_events_shared::{ActionData, ActionKind, EntityRef};
    use serde_json::json;

    fn guid(s: &str) -> Guid {
        Guid::parse(s).unwrap()
    }

    fn post(owner: &str) -> EntityRef {
        EntityRef {
            guid: guid("500"),
            owner_guid: Some(guid(owner)),
            urn: "urn:activity:500".to_string(),
            entity_type: "activity".to_string(),
            subtype: String::new(),
        }
    }

    fn by(actor: &str, action: ActionKind, entity: EntityRef, data: ActionData) -> ActionEvent {
        ActionEvent::new(action, EntityRef::user(guid(actor)), entity).with_action_data(data)
    }

    fn notify(classification: Classification) -> Notification {
        match classification {
            Classification::Notify(notification) => notification,
            other => panic!("expected a notification, got {:?}", other),
        }
    }

    fn classifier() -> NotificationClassifier {
        NotificationClassifier::new(ClassifierConfig {
            plus_handler: Some(guid("100")),
            pro_handler: Some(guid("200")),
        })
    }

    #[test]
    fn test_vote_up_notifies_owner() {
        let event = by("1", ActionKind::VoteUp, post("2"), ActionData::new());
        let n = notify(classifier().classify(&event).unwrap());

        assert_eq!(n.to_guid, guid("2"));
        assert_eq!(n.from_guid, guid("1"));
        assert_eq!(n.notification_type, NotificationType::VoteUp);
        assert!(n.data.is_empty());
        assert_eq!(n.entity_urn.as_deref(), Some("urn:activity:500"));
    }

    #[test]
    fn test_own_content_is_suppressed() {
        let event = by("2", ActionKind::Comment, post("2"), ActionData::new());
        assert_eq!(classifier().classify(&event).unwrap(), Classification::Suppressed);
    }

    #[test]
    fn test_subscribe_notifies_the_user() {
        let event = by("1", ActionKind::Subscribe, EntityRef::user(guid("3")), ActionData::new());
        let n = notify(classifier().classify(&event).unwrap());
        assert_eq!(n.to_guid, guid("3"));
        assert_eq!(n.notification_type, NotificationType::Subscribe);
    }

    #[test]
    fn test_tag_targets_tagged_user_and_post() {
        let tagged = EntityRef {
            owner_guid: Some(guid("1")),
            ..EntityRef::user(guid("7"))
        };
        let event = by(
            "1",
            ActionKind::Tag,
            tagged,
            ActionData::new().with("tag_in_entity_urn", "urn:activity:900"),
        );
        let n = notify(classifier().classify(&event).unwrap());

        assert_eq!(n.to_guid, guid("7"));
        assert_eq!(n.entity_urn.as_deref(), Some("urn:activity:900"));
        assert_eq!(n.notification_type, NotificationType::Tag);
    }

    #[test]
    fn test_tagging_yourself_is_suppressed() {
        let tagged = EntityRef {
            owner_guid: Some(guid("9")),
            ..EntityRef::user(guid("1"))
        };
        let event = by(
            "1",
            ActionKind::Tag,
            tagged,
            ActionData::new().with("tag_in_entity_urn", "urn:activity:900"),
        );
        assert_eq!(classifier().classify(&event).unwrap(), Classification::Suppressed);
    }

    #[test]
    fn test_quote_links_to_the_quote() {
        let event = by(
            "1",
            ActionKind::Quote,
            post("2"),
            ActionData::new().with("quote_urn", "urn:activity:600"),
        );
        let n = notify(classifier().classify(&event).unwrap());

        assert_eq!(n.data.get("quote_urn"), Some(&json!("urn:activity:600")));
        assert_eq!(n.entity_urn.as_deref(), Some("urn:activity:600"));
    }

    #[test]
    fn test_peer_boost_request_redirects_recipient() {
        let data = ActionData::new()
            .with("bid", "b1")
            .with("type", "t1")
            .with("toGuid", "55");
        let event = by("1", ActionKind::BoostPeerRequest, post("2"), data);
        let n = notify(classifier().classify(&event).unwrap());

        assert_eq!(n.to_guid, guid("55"));
        assert_eq!(n.notification_type, NotificationType::BoostPeerRequest);
        assert_eq!(Value::Object(n.data), json!({ "bid": "b1", "type": "t1" }));
    }

    #[test]
    fn test_peer_boost_accepted_keeps_default_recipient() {
        let data = ActionData::new().with("bid", "b1").with("type", "t1");
        let event = by("1", ActionKind::BoostPeerAccepted, post("2"), data);
        let n = notify(classifier().classify(&event).unwrap());

        assert_eq!(n.to_guid, guid("2"));
        assert_eq!(n.notification_type, NotificationType::BoostPeerAccepted);
        assert_eq!(Value::Object(n.data), json!({ "bid": "b1", "type": "t1" }));
    }

    #[test]
    fn test_wire_sent_from_handler_is_payout() {
        let data = ActionData::new().with("amount", 10);
        let payout = by("100", ActionKind::WireSent, EntityRef::user(guid("3")), data.clone());
        let pro_payout = by("200", ActionKind::WireSent, EntityRef::user(guid("3")), data.clone());
        let received = by("999", ActionKind::WireSent, EntityRef::user(guid("3")), data);

        let payout = notify(classifier().classify(&payout).unwrap());
        assert_eq!(payout.notification_type, NotificationType::WirePayout);
        assert_eq!(payout.data.get("amount"), Some(&json!(10)));

        let pro_payout = notify(classifier().classify(&pro_payout).unwrap());
        assert_eq!(pro_payout.notification_type, NotificationType::WirePayout);

        let received = notify(classifier().classify(&received).unwrap());
        assert_eq!(received.notification_type, NotificationType::WireReceived);
        assert_eq!(received.data.get("amount"), Some(&json!(10)));
    }

    #[test]
    fn test_wire_sent_without_handlers_is_received() {
        let event = by(
            "100",
            ActionKind::WireSent,
            EntityRef::user(guid("3")),
            ActionData::new().with("amount", "5"),
        );
        let n = notify(NotificationClassifier::default().classify(&event).unwrap());
        assert_eq!(n.notification_type, NotificationType::WireReceived);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let event = by("1", ActionKind::Comment, post("2"), ActionData::new());
        assert_eq!(
            classifier().classify(&event),
            Err(ClassifyError::MissingField {
                action: ActionKind::Comment,
                field: "comment_urn",
            })
        );
    }

    #[test]
    fn test_invalid_recipient_guid_is_an_error() {
        let data = ActionData::new()
            .with("bid", "b1")
            .with("type", "t1")
            .with("toGuid", "not-a-guid");
        let event = by("1", ActionKind::BoostPeerRequest, post("2"), data);
        assert!(matches!(
            classifier().classify(&event),
            Err(ClassifyError::InvalidGuid { field: "toGuid", .. })
        ));
    }

    #[test]
    fn test_disabled_and_unmapped_kinds() {
        let ping = by("1", ActionKind::ReferralPing, post("2"), ActionData::new());
        let removed = by("1", ActionKind::VoteUpRemoved, post("2"), ActionData::new());

        assert_eq!(classifier().classify(&ping).unwrap(), Classification::Disabled);
        assert_eq!(classifier().classify(&removed).unwrap(), Classification::Unmapped);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let event = by(
            "1",
            ActionKind::Comment,
            post("2"),
            ActionData::new().with("comment_urn", "urn:comment:500:1"),
        );
        let a = notify(classifier().classify(&event).unwrap());
        let b = notify(classifier().classify(&event).unwrap());
        assert_eq!(a.uuid, b.uuid);
    }
}
