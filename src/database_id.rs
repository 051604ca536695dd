//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Database identifier for a bill.
pub type ExpenseId = DatabaseId;

/// Database identifier for a comment on a bill.
pub type CommentId = DatabaseId;
