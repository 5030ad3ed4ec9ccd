//! Shared primitive types used across the sync job.

/// A billing account identifier, as it appears in column A of the source
/// sheet and column B of the report.
pub type AccountId = String;

/// A rectangular block of sheet cells. Trailing empty cells may be absent,
/// the way the values API returns them.
pub type CellGrid = Vec<Vec<String>>;
