//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Pagination
// =============================================================================

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Default number of users per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest offset or limit handed to the store (a BIGINT bind parameter)
pub const MAX_ROW_BOUND: u64 = i64::MAX as u64;

// =============================================================================
// Sorting
// =============================================================================

/// Persisted user columns a listing may be ordered by
pub const SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "surname",
    "patronymic",
    "age",
    "gender",
    "nationality",
];

