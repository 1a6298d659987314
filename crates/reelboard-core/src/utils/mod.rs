//! Utility functions for dates and string handling.

pub mod dates;
pub mod format;

// Re-export commonly used functions at module level
pub use dates::{
    date_encodings, days_in_month, display_date, latest_date, parse_sheet_date, resolve_records_for_date,
    DateRecord, TWO_DIGIT_YEAR_PIVOT,
};
pub use format::{canonical_id, contains_ignore_case, truncate};
