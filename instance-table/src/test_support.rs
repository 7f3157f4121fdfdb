//! Test-only helpers for constructing instances, steps, and handlers.

use std::cell::RefCell;
use std::sync::Arc;

use anyhow::Result;

use crate::core::types::{CellContent, ColumnSizing, ColumnSpec, RowViewModel, StatusChoice};
use crate::handler::{InstanceTableHandler, TableCommand};
use crate::instance::{Instance, ManualTestStatus, StepResult};
use crate::io::instance_store::{AssessmentDocument, AssessmentStore, write_document};
use crate::step::{ColumnConfig, StepDescriptor, TestType};

/// Create an instance with the given target and no step results.
pub fn instance(target: &[&str]) -> Instance {
    Instance {
        target: target.iter().map(|selector| selector.to_string()).collect(),
        html: String::new(),
        test_step_results: Default::default(),
        property_bag: Default::default(),
    }
}

/// Create a step result with visibility following `enabled`.
pub fn step_result(status: ManualTestStatus, enabled: bool) -> StepResult {
    StepResult {
        status,
        is_visualization_enabled: enabled,
        is_visible: enabled,
        is_captured_by_user: false,
        failure_summary: None,
    }
}

/// Create an instance the reviewer captured for `step`, failed with `summary`.
pub fn captured_instance(step: &str, summary: &str) -> Instance {
    let mut instance = instance_with_result(step, ManualTestStatus::Fail, false);
    if let Some(result) = instance.test_step_results.get_mut(step) {
        result.is_captured_by_user = true;
        result.failure_summary = Some(summary.to_string());
    }
    instance
}

/// Create an instance with a single result for `step`.
pub fn instance_with_result(step: &str, status: ManualTestStatus, enabled: bool) -> Instance {
    let mut instance = instance(&["#target"]);
    instance
        .test_step_results
        .insert(step.to_string(), step_result(status, enabled));
    instance
}

/// Write `document` into a fresh temp dir and open a store over it.
///
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn temp_store(document: &AssessmentDocument) -> Result<(tempfile::TempDir, AssessmentStore)> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("assessment.json");
    write_document(&path, document)?;
    Ok((temp, AssessmentStore::new(path)))
}

/// Status choice column under `key` for `step`.
pub fn status_column(key: &str, test_type: TestType, step: &str) -> ColumnSpec {
    let step = step.to_string();
    ColumnSpec {
        key: key.to_string(),
        name: Some("Status".to_string()),
        is_icon_only: false,
        sizing: ColumnSizing {
            min_width: 80,
            max_width: 100,
            resizable: false,
        },
        on_render: Arc::new(move |row: &RowViewModel<'_>| {
            CellContent::StatusChoice(StatusChoice {
                test_type,
                step: step.clone(),
                instance_key: row.key.to_string(),
                selected: row.test_step_result.status,
            })
        }),
        on_column_click: None,
    }
}

fn single_status_column(test_type: TestType, step: &str) -> Vec<ColumnSpec> {
    vec![status_column("status", test_type, step)]
}

/// Headings step with one description column and one status column.
pub fn headings_step(name: &str, has_visual_helper: bool) -> StepDescriptor {
    StepDescriptor {
        name: name.to_string(),
        test_type: TestType::Headings,
        columns_config: vec![ColumnConfig::property(
            "headingText",
            "Heading text",
            "headingText",
        )],
        has_visual_helper,
        status_columns: single_status_column,
    }
}

/// Handler that records every command it receives.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    commands: RefCell<Vec<TableCommand>>,
}

impl RecordingHandler {
    pub fn commands(&self) -> Vec<TableCommand> {
        self.commands.borrow().clone()
    }

    fn record(&self, command: TableCommand) -> Result<()> {
        self.commands.borrow_mut().push(command);
        Ok(())
    }
}

impl InstanceTableHandler for RecordingHandler {
    fn change_visualization_state(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        enabled: bool,
    ) -> Result<()> {
        self.record(TableCommand::ChangeVisualizationState {
            test_type,
            step: step.to_string(),
            instance_key: instance_key.to_string(),
            enabled,
        })
    }

    fn change_visualization_state_for_all(
        &self,
        test_type: TestType,
        step: &str,
        enabled: bool,
    ) -> Result<()> {
        self.record(TableCommand::ChangeVisualizationStateForAll {
            test_type,
            step: step.to_string(),
            enabled,
        })
    }

    fn pass_unmarked_instances(&self, test_type: TestType, step: &str) -> Result<()> {
        self.record(TableCommand::PassUnmarkedInstances {
            test_type,
            step: step.to_string(),
        })
    }

    fn change_instance_status(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        status: ManualTestStatus,
    ) -> Result<()> {
        self.record(TableCommand::ChangeInstanceStatus {
            test_type,
            step: step.to_string(),
            instance_key: instance_key.to_string(),
            status,
        })
    }

    fn edit_failure_summary(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        failure_summary: Option<&str>,
    ) -> Result<()> {
        self.record(TableCommand::EditFailureSummary {
            test_type,
            step: step.to_string(),
            instance_key: instance_key.to_string(),
            failure_summary: failure_summary.map(str::to_string),
        })
    }

    fn remove_captured_instance(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
    ) -> Result<()> {
        self.record(TableCommand::RemoveCapturedInstance {
            test_type,
            step: step.to_string(),
            instance_key: instance_key.to_string(),
        })
    }

    fn update_focused_target(&self, target: &[String]) -> Result<()> {
        self.record(TableCommand::UpdateFocusedTarget {
            target: target.to_vec(),
        })
    }
}
