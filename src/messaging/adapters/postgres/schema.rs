//! Diesel schema for messaging persistence.

diesel::table! {
    /// Two-party conversations keyed by their canonical participant pair.
    conversations (id) {
        /// Conversation identifier.
        id -> Uuid,
        /// Participant that sorts first.
        participant_low -> Uuid,
        /// Participant that sorts second.
        participant_high -> Uuid,
        /// Timestamp of the latest message.
        last_activity_at -> Timestamptz,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only message log.
    messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Storage-assigned position in the log.
        seq -> Int8,
        /// Owning conversation.
        conversation_id -> Uuid,
        /// Author.
        sender_id -> Uuid,
        /// Body text.
        body -> Text,
        /// When the recipient first fetched the message.
        read_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(messages -> conversations (conversation_id));
diesel::allow_tables_to_appear_in_same_query!(conversations, messages);
