/// Monetary amounts are integer CFA francs (XOF has zero decimal places).
/// The core exchanges raw values; display formatting is a client concern.
pub type Amount = i64;

/// All event timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar fields (project start, expected completion, milestone windows).
pub type CalendarDate = chrono::NaiveDate;

/// Stable project identifier. UUIDv7 for records created in-process, so
/// identifiers sort by creation time.
pub type ProjectId = uuid::Uuid;

/// Stable milestone identifier.
pub type MilestoneId = uuid::Uuid;
