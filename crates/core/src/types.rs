/// Row ids (`BIGSERIAL`).
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ`, handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Euro cents. Prices, fees and totals never use floats.
pub type Cents = i64;
