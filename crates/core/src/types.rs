/// Upstream directory ids are 64-bit integers (e.g. `333333333333`).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
