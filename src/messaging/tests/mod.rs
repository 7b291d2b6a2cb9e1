//! Unit tests for the messaging context.


use crate::identity::domain::UserId;
use crate::messaging::domain::{Conversation, MessagingDomainError, ParticipantPair};
use mockable::DefaultClock;

pub(super) fn conversation_between(
    first: UserId,
    second: UserId,
) -> Result<Conversation, MessagingDomainError> {
    let participants = ParticipantPair::new(first, second)?;
    Ok(Conversation::new(participants, &DefaultClock))
}
