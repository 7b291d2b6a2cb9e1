//! Conversation aggregate keyed by its canonical participant pair.

use super::{ConversationId, Message, MessagingDomainError};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Unordered pair of distinct users stored in canonical order.
///
/// `low` always compares less than `high`, so `(a, b)` and `(b, a)` build
/// the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantPair {
    low: UserId,
    high: UserId,
}

impl ParticipantPair {
    /// Builds the canonical pair for two users.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingDomainError::SelfConversation`] when `first` and
    /// `second` are the same user.
    pub fn new(first: UserId, second: UserId) -> Result<Self, MessagingDomainError> {
        match first.cmp(&second) {
            std::cmp::Ordering::Less => Ok(Self {
                low: first,
                high: second,
            }),
            std::cmp::Ordering::Greater => Ok(Self {
                low: second,
                high: first,
            }),
            std::cmp::Ordering::Equal => Err(MessagingDomainError::SelfConversation(first)),
        }
    }

    /// Returns the participant that sorts first.
    #[must_use]
    pub const fn low(&self) -> UserId {
        self.low
    }

    /// Returns the participant that sorts second.
    #[must_use]
    pub const fn high(&self) -> UserId {
        self.high
    }

    /// Returns `true` if `user_id` is one of the two participants.
    #[must_use]
    pub fn contains(&self, user_id: UserId) -> bool {
        self.low == user_id || self.high == user_id
    }

    /// Returns the participant that is not `viewer`, or `None` when
    /// `viewer` is not in the pair.
    #[must_use]
    pub fn other(&self, viewer: UserId) -> Option<UserId> {
        if viewer == self.low {
            Some(self.high)
        } else if viewer == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

/// Two-party conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    participants: ParticipantPair,
    last_activity_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedConversationData {
    /// Persisted identifier.
    pub id: ConversationId,
    /// Canonical participant pair.
    pub participants: ParticipantPair,
    /// Timestamp of the latest message, or creation time.
    pub last_activity_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates a conversation candidate for `participants`.
    ///
    /// Storage decides whether the candidate is inserted or an existing
    /// conversation for the same pair is returned instead.
    #[must_use]
    pub fn new(participants: ParticipantPair, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ConversationId::new(),
            participants,
            last_activity_at: timestamp,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a conversation from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedConversationData) -> Self {
        Self {
            id: data.id,
            participants: data.participants,
            last_activity_at: data.last_activity_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn id(&self) -> ConversationId {
        self.id
    }

    /// Returns the canonical participant pair.
    #[must_use]
    pub const fn participants(&self) -> ParticipantPair {
        self.participants
    }

    /// Returns the timestamp of the latest activity.
    #[must_use]
    pub const fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Checks that `user_id` takes part in the conversation.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingDomainError::NotParticipant`] otherwise.
    pub fn ensure_participant(&self, user_id: UserId) -> Result<(), MessagingDomainError> {
        if self.participants.contains(user_id) {
            Ok(())
        } else {
            Err(self.not_participant(user_id))
        }
    }

    /// Returns the participant that is not `viewer`.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingDomainError::NotParticipant`] when `viewer` is not
    /// in the conversation.
    pub fn other_participant(&self, viewer: UserId) -> Result<UserId, MessagingDomainError> {
        self.participants
            .other(viewer)
            .ok_or_else(|| self.not_participant(viewer))
    }

    /// Records activity at `at`. Earlier timestamps are ignored.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_activity_at {
            self.last_activity_at = at;
        }
        if at > self.updated_at {
            self.updated_at = at;
        }
    }

    const fn not_participant(&self, user_id: UserId) -> MessagingDomainError {
        MessagingDomainError::NotParticipant {
            conversation_id: self.id,
            user_id,
        }
    }
}

/// Inbox row for one conversation as seen by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    /// The conversation.
    pub conversation: Conversation,
    /// The participant who is not the viewer.
    pub other_participant: UserId,
    /// Most recent message, if any.
    pub last_message: Option<Message>,
    /// Messages from the other participant the viewer has not read.
    pub unread_count: u64,
}
