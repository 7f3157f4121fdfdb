//! Stable exit codes for `instance-table` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid document, config, or arguments, or any other error.
pub const INVALID: i32 = 1;
/// The requested `(test, step)` pair is not registered.
pub const UNKNOWN_STEP: i32 = 2;
