//! Whole-table predicates that drive bulk controls.

use crate::core::types::RowViewModel;
use crate::instance::ManualTestStatus;

/// True if every row has its visualization enabled. Vacuously true.
pub fn all_enabled(rows: &[RowViewModel<'_>]) -> bool {
    rows.iter()
        .all(|row| row.test_step_result.is_visualization_enabled)
}

/// True if any row is still unmarked for `step_name`.
///
/// Drives the "pass unmarked instances" control, which is disabled when this
/// returns false.
pub fn any_unknown(rows: &[RowViewModel<'_>], step_name: &str) -> bool {
    rows.iter().any(|row| {
        row.instance
            .step_result(step_name)
            .is_some_and(|result| result.status == ManualTestStatus::Unknown)
    })
}
