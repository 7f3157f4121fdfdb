//! Shared view-model types produced by the core.
//!
//! Everything here is rebuilt on each render pass from the current instances
//! snapshot. Nothing is cached or mutated after construction.

use std::fmt;
use std::sync::Arc;

use crate::instance::{Instance, ManualTestStatus, StepResult};
use crate::step::TestType;

/// Projection from a row to its renderable cell for one column.
pub type RowProjection = Arc<dyn Fn(&RowViewModel<'_>) -> CellContent + Send + Sync>;

/// Hook invoked with the column key when a column header is clicked.
///
/// Passed through untouched to interactive renderers; the text renderer has
/// no clickable headers and ignores it.
pub type ColumnClickHook = Arc<dyn Fn(&str) + Send + Sync>;

/// One table row, valid for a single render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowViewModel<'a> {
    pub key: &'a str,
    pub instance: &'a Instance,
    pub test_step_result: &'a StepResult,
}

/// Command carried by a visual-helper toggle cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationToggle {
    pub test_type: TestType,
    pub step: String,
    pub instance_key: String,
    /// State the visualization should have after the toggle.
    pub enabled: bool,
}

/// Command carried by the visual-helper column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationToggleAll {
    pub test_type: TestType,
    pub step: String,
    /// State every visualization should have after the toggle.
    pub enabled: bool,
}

/// Header toggle of the visual-helper column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterToggle {
    /// Checked when every row's visualization is enabled.
    pub checked: bool,
    pub on_toggle: VisualizationToggleAll,
}

/// Command selecting a manual status for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceStatusChange {
    pub test_type: TestType,
    pub step: String,
    pub instance_key: String,
    pub status: ManualTestStatus,
}

/// Status choice group of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChoice {
    pub test_type: TestType,
    pub step: String,
    pub instance_key: String,
    pub selected: ManualTestStatus,
}

impl StatusChoice {
    pub fn choose(&self, status: ManualTestStatus) -> InstanceStatusChange {
        InstanceStatusChange {
            test_type: self.test_type,
            step: self.step.clone(),
            instance_key: self.instance_key.clone(),
            status,
        }
    }
}

/// Command replacing the failure summary of a captured instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSummaryEdit {
    pub test_type: TestType,
    pub step: String,
    pub instance_key: String,
    /// `None` clears the summary.
    pub failure_summary: Option<String>,
}

/// Command removing an instance the reviewer captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedInstanceRemoval {
    pub test_type: TestType,
    pub step: String,
    pub instance_key: String,
}

/// Edit and remove buttons of a user-captured row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedInstanceActions {
    pub test_type: TestType,
    pub step: String,
    pub instance_key: String,
    pub failure_summary: Option<String>,
}

impl CapturedInstanceActions {
    pub fn edit(&self, failure_summary: Option<String>) -> FailureSummaryEdit {
        FailureSummaryEdit {
            test_type: self.test_type,
            step: self.step.clone(),
            instance_key: self.instance_key.clone(),
            failure_summary,
        }
    }

    pub fn remove(&self) -> CapturedInstanceRemoval {
        CapturedInstanceRemoval {
            test_type: self.test_type,
            step: self.step.clone(),
            instance_key: self.instance_key.clone(),
        }
    }
}

/// Renderable content of a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Empty,
    Text(String),
    /// Visual-helper toggle bound to one instance.
    VisualHelperToggle {
        instance_key: String,
        is_visualization_enabled: bool,
        is_visible: bool,
        on_toggle: VisualizationToggle,
    },
    StatusChoice(StatusChoice),
    /// Present only on rows the reviewer captured by hand.
    CapturedActions(CapturedInstanceActions),
}

impl CellContent {
    pub fn text(value: impl Into<String>) -> Self {
        CellContent::Text(value.into())
    }
}

/// Width hints handed to the list renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSizing {
    pub min_width: u16,
    pub max_width: u16,
    pub resizable: bool,
}

/// One assembled column.
#[derive(Clone)]
pub struct ColumnSpec {
    pub key: String,
    /// Header text. Icon-only columns have none.
    pub name: Option<String>,
    pub is_icon_only: bool,
    pub sizing: ColumnSizing,
    pub on_render: RowProjection,
    pub on_column_click: Option<ColumnClickHook>,
}

impl ColumnSpec {
    pub fn render(&self, row: &RowViewModel<'_>) -> CellContent {
        (self.on_render)(row)
    }

    /// Header label, empty for icon-only columns.
    pub fn header(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("is_icon_only", &self.is_icon_only)
            .field("sizing", &self.sizing)
            .field("on_column_click", &self.on_column_click.is_some())
            .finish_non_exhaustive()
    }
}
