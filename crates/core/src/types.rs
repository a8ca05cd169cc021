/// Avatar identifiers are random v4 UUIDs.
pub type AvatarId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
