use std::str::FromStr;

use crate::errors::EnvelopeError;

/// The closed set of actions published on the action-event stream.
///
/// Each kind owns one topic, `event-action-<wire name>`. Use
/// [`ActionKind::as_str`] to get the wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    // Votes
    VoteUp,
    VoteUpRemoved,
    VoteDown,
    VoteDownRemoved,

    // Content interactions
    Comment,
    Tag,
    Remind,
    Quote,

    // Channel relations
    Subscribe,
    Unsubscribe,
    Block,
    Unblock,

    // Referrals
    ReferralPing,
    ReferralPending,
    ReferralComplete,

    // Boosts
    BoostCreated,
    BoostAccepted,
    BoostRejected,
    BoostCompleted,
    BoostPeerRequest,
    BoostPeerAccepted,
    BoostPeerRejected,

    // Tokens
    TokenWithdrawAccepted,
    TokenWithdrawRejected,

    // Groups
    GroupInvite,
    GroupQueueAdd,
    GroupQueueApprove,
    GroupQueueReject,

    // Payments
    WireSent,
}

impl ActionKind {
    /// Every action kind, in declaration order.
    pub const ALL: [ActionKind; 29] = [
        ActionKind::VoteUp,
        ActionKind::VoteUpRemoved,
        ActionKind::VoteDown,
        ActionKind::VoteDownRemoved,
        ActionKind::Comment,
        ActionKind::Tag,
        ActionKind::Remind,
        ActionKind::Quote,
        ActionKind::Subscribe,
        ActionKind::Unsubscribe,
        ActionKind::Block,
        ActionKind::Unblock,
        ActionKind::ReferralPing,
        ActionKind::ReferralPending,
        ActionKind::ReferralComplete,
        ActionKind::BoostCreated,
        ActionKind::BoostAccepted,
        ActionKind::BoostRejected,
        ActionKind::BoostCompleted,
        ActionKind::BoostPeerRequest,
        ActionKind::BoostPeerAccepted,
        ActionKind::BoostPeerRejected,
        ActionKind::TokenWithdrawAccepted,
        ActionKind::TokenWithdrawRejected,
        ActionKind::GroupInvite,
        ActionKind::GroupQueueAdd,
        ActionKind::GroupQueueApprove,
        ActionKind::GroupQueueReject,
        ActionKind::WireSent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::VoteUp => "vote_up",
            ActionKind::VoteUpRemoved => "vote_up_removed",
            ActionKind::VoteDown => "vote_down",
            ActionKind::VoteDownRemoved => "vote_down_removed",

            ActionKind::Comment => "comment",
            ActionKind::Tag => "tag",
            ActionKind::Remind => "remind",
            ActionKind::Quote => "quote",

            ActionKind::Subscribe => "subscribe",
            ActionKind::Unsubscribe => "unsubscribe",
            ActionKind::Block => "block",
            ActionKind::Unblock => "unblock",

            ActionKind::ReferralPing => "referral_ping",
            ActionKind::ReferralPending => "referral_pending",
            ActionKind::ReferralComplete => "referral_complete",

            ActionKind::BoostCreated => "boost_created",
            ActionKind::BoostAccepted => "boost_accepted",
            ActionKind::BoostRejected => "boost_rejected",
            ActionKind::BoostCompleted => "boost_completed",
            ActionKind::BoostPeerRequest => "boost_peer_request",
            ActionKind::BoostPeerAccepted => "boost_peer_accepted",
            ActionKind::BoostPeerRejected => "boost_peer_rejected",

            ActionKind::TokenWithdrawAccepted => "token_withdraw_accepted",
            ActionKind::TokenWithdrawRejected => "token_withdraw_rejected",

            ActionKind::GroupInvite => "group_invite",
            ActionKind::GroupQueueAdd => "group_queue_add",
            ActionKind::GroupQueueApprove => "group_queue_approve",
            ActionKind::GroupQueueReject => "group_queue_reject",

            ActionKind::WireSent => "wire_sent",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EnvelopeError::UnknownAction(s.to_string()))
    }
}
