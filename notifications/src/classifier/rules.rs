//! The per-action rule table.
//!
//! Every action kind has exactly one row. Kinds that share behaviour, such
//! as the three peer-boost kinds, share the row fragments they have in
//! common and spell out the parts where they differ.

use action_events_shared::{ActionKind, NotificationType};

/// How the notification type is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    Fixed(NotificationType),
    /// `wire_payout` when the sender is a configured payout handler,
    /// `wire_received` otherwise.
    WireSent,
}

/// Who receives the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientRule {
    /// The entity itself when it is a user, its owner otherwise.
    Default,
    /// The entity guid, which names the user the action is about.
    EntityGuid,
    /// A guid carried in the given `action_data` field.
    ActionData(&'static str),
}

/// Which urn the notification links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityUrnRule {
    /// The urn of the entity the action was performed on.
    Default,
    /// A urn carried in the given `action_data` field.
    ActionData(&'static str),
}

/// What counts as a user acting on themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfCheck {
    /// The actor owns the entity.
    Owner,
    /// The actor is the entity.
    EntityGuid,
}

/// How one action kind turns into a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub notification_type: TypeRule,
    /// `action_data` fields copied verbatim into the notification data.
    pub data_fields: &'static [&'static str],
    pub recipient: RecipientRule,
    pub entity_urn: EntityUrnRule,
    pub self_check: SelfCheck,
}

impl Rule {
    fn of(notification_type: NotificationType) -> Self {
        Self {
            notification_type: TypeRule::Fixed(notification_type),
            data_fields: &[],
            recipient: RecipientRule::Default,
            entity_urn: EntityUrnRule::Default,
            self_check: SelfCheck::Owner,
        }
    }

    fn copying(mut self, data_fields: &'static [&'static str]) -> Self {
        self.data_fields = data_fields;
        self
    }

    fn to(mut self, recipient: RecipientRule) -> Self {
        self.recipient = recipient;
        self
    }

    fn linking(mut self, entity_urn: EntityUrnRule) -> Self {
        self.entity_urn = entity_urn;
        self
    }

    fn checking(mut self, self_check: SelfCheck) -> Self {
        self.self_check = self_check;
        self
    }
}

/// Fields shared by the three peer-boost kinds.
const PEER_BOOST_FIELDS: &[&str] = &["bid", "type"];

/// Fields shared by group invitations and membership queue transitions.
const GROUP_FIELDS: &[&str] = &["group_urn"];

const AMOUNT: &[&str] = &["amount"];

/// What the classifier does with an action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Notify(Rule),
    /// Recognised, but notifications for it are switched off.
    Disabled,
    /// No notification exists for this kind.
    Unmapped,
}

/// Looks up the rule row for `action`.
pub fn disposition(action: ActionKind) -> Disposition {
    use NotificationType as T;

    let rule = match action {
        ActionKind::VoteUp => Rule::of(T::VoteUp),
        ActionKind::VoteDown => Rule::of(T::VoteDown),
        ActionKind::Comment => Rule::of(T::Comment).copying(&["comment_urn"]),
        ActionKind::Tag => Rule::of(T::Tag)
            .to(RecipientRule::EntityGuid)
            .linking(EntityUrnRule::ActionData("tag_in_entity_urn"))
            .checking(SelfCheck::EntityGuid),
        ActionKind::Subscribe => Rule::of(T::Subscribe),
        ActionKind::Remind => Rule::of(T::Remind).copying(&["remind_urn"]),
        ActionKind::Quote => Rule::of(T::Quote)
            .copying(&["quote_urn"])
            .linking(EntityUrnRule::ActionData("quote_urn")),

        ActionKind::BoostRejected => Rule::of(T::BoostRejected).copying(&["reason"]),
        // only the request is redirected to the explicit recipient
        ActionKind::BoostPeerRequest => Rule::of(T::BoostPeerRequest)
            .copying(PEER_BOOST_FIELDS)
            .to(RecipientRule::ActionData("toGuid")),
        ActionKind::BoostPeerAccepted => {
            Rule::of(T::BoostPeerAccepted).copying(PEER_BOOST_FIELDS)
        }
        ActionKind::BoostPeerRejected => {
            Rule::of(T::BoostPeerRejected).copying(PEER_BOOST_FIELDS)
        }

        ActionKind::TokenWithdrawAccepted => Rule::of(T::TokenWithdrawAccepted).copying(AMOUNT),
        ActionKind::TokenWithdrawRejected => Rule::of(T::TokenWithdrawRejected).copying(AMOUNT),

        ActionKind::GroupInvite => Rule::of(T::GroupInvite).copying(GROUP_FIELDS),
        ActionKind::GroupQueueAdd => Rule::of(T::GroupQueueAdd).copying(GROUP_FIELDS),
        ActionKind::GroupQueueApprove => Rule::of(T::GroupQueueApprove).copying(GROUP_FIELDS),
        ActionKind::GroupQueueReject => Rule::of(T::GroupQueueReject).copying(GROUP_FIELDS),

        ActionKind::WireSent => Rule {
            notification_type: TypeRule::WireSent,
            ..Rule::of(T::WireReceived).copying(AMOUNT)
        },

        // Referral notifications stay off until referrals are reworked
        ActionKind::ReferralPing | ActionKind::ReferralPending | ActionKind::ReferralComplete => {
            return Disposition::Disabled
        }

        ActionKind::VoteUpRemoved
        | ActionKind::VoteDownRemoved
        | ActionKind::Unsubscribe
        | ActionKind::Block
        | ActionKind::Unblock
        | ActionKind::BoostCreated
        | ActionKind::BoostAccepted
        | ActionKind::BoostCompleted => return Disposition::Unmapped,
    };

    Disposition::Notify(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(action: ActionKind) -> Rule {
        match disposition(action) {
            Disposition::Notify(rule) => rule,
            other => panic!("{} is {:?}", action, other),
        }
    }

    #[test]
    fn test_peer_boost_rows_share_fields_but_not_recipient() {
        let request = rule(ActionKind::BoostPeerRequest);
        let accepted = rule(ActionKind::BoostPeerAccepted);
        let rejected = rule(ActionKind::BoostPeerRejected);

        assert_eq!(request.data_fields, &["bid", "type"]);
        assert_eq!(accepted.data_fields, &["bid", "type"]);
        assert_eq!(rejected.data_fields, &["bid", "type"]);

        assert_eq!(request.recipient, RecipientRule::ActionData("toGuid"));
        assert_eq!(accepted.recipient, RecipientRule::Default);
        assert_eq!(rejected.recipient, RecipientRule::Default);

        assert_eq!(
            accepted.notification_type,
            TypeRule::Fixed(NotificationType::BoostPeerAccepted)
        );
        assert_eq!(
            rejected.notification_type,
            TypeRule::Fixed(NotificationType::BoostPeerRejected)
        );
    }

    #[test]
    fn test_group_rows_keep_their_own_type() {
        let cases = [
            (ActionKind::GroupInvite, NotificationType::GroupInvite),
            (ActionKind::GroupQueueAdd, NotificationType::GroupQueueAdd),
            (ActionKind::GroupQueueApprove, NotificationType::GroupQueueApprove),
            (ActionKind::GroupQueueReject, NotificationType::GroupQueueReject),
        ];
        for (action, expected) in cases {
            let rule = rule(action);
            assert_eq!(rule.notification_type, TypeRule::Fixed(expected));
            assert_eq!(rule.data_fields, &["group_urn"]);
        }
    }

    #[test]
    fn test_tag_row_overrides_recipient_urn_and_self_check() {
        let tag = rule(ActionKind::Tag);
        assert_eq!(tag.recipient, RecipientRule::EntityGuid);
        assert_eq!(tag.entity_urn, EntityUrnRule::ActionData("tag_in_entity_urn"));
        assert_eq!(tag.self_check, SelfCheck::EntityGuid);
    }

    #[test]
    fn test_wire_sent_type_is_dynamic() {
        let wire = rule(ActionKind::WireSent);
        assert_eq!(wire.notification_type, TypeRule::WireSent);
        assert_eq!(wire.data_fields, &["amount"]);
    }

    #[test]
    fn test_referrals_disabled_and_removals_unmapped() {
        for action in [
            ActionKind::ReferralPing,
            ActionKind::ReferralPending,
            ActionKind::ReferralComplete,
        ] {
            assert_eq!(disposition(action), Disposition::Disabled);
        }
        for action in [ActionKind::VoteUpRemoved, ActionKind::Unsubscribe, ActionKind::BoostCreated] {
            assert_eq!(disposition(action), Disposition::Unmapped);
        }
    }
}
