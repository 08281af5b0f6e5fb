//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised (trimmed, lowercased) email address, unique.
        email -> Varchar,
        /// Human-readable display name.
        display_name -> Varchar,
        /// Bcrypt hash of the user's password.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Collaborative documents.
    documents (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display title.
        title -> Varchar,
        /// Full document content.
        content -> Text,
        /// Owning user, immutable after creation.
        owner_id -> Uuid,
        /// Timestamp of the last accepted mutation.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Collaborator membership, one row per grant.
    document_collaborators (document_id, user_id) {
        /// Document the grant applies to.
        document_id -> Uuid,
        /// User granted collaborator access.
        user_id -> Uuid,
        /// When the grant was recorded; preserves insertion order.
        added_at -> Timestamptz,
    }
}

diesel::joinable!(documents -> users (owner_id));
diesel::joinable!(document_collaborators -> documents (document_id));

diesel::allow_tables_to_appear_in_same_query!(users, documents, document_collaborators);
