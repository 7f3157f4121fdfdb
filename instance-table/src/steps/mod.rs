//! Registry of concrete test steps.
//!
//! Steps are looked up explicitly by `(test type, step name)`. Registration
//! validates column keys so that assembled column lists never collide.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::core::invariants::validate_step_columns;
use crate::core::types::{
    CapturedInstanceActions, CellContent, ColumnSizing, ColumnSpec, RowViewModel, StatusChoice,
};
use crate::step::{TestStep, TestType};

pub mod headings;
pub mod images;
pub mod landmarks;

/// Why a step was refused by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("step {test_type}/{name} is already registered")]
    DuplicateStep { test_type: TestType, name: String },
    #[error("column keys collide: {}", .0.join("; "))]
    ColumnCollision(Vec<String>),
}

/// Steps keyed by `(test type, step name)`, iterated in that order.
#[derive(Default)]
pub struct StepRegistry {
    steps: BTreeMap<(TestType, String), Box<dyn TestStep>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in step.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        let steps = headings::steps()
            .into_iter()
            .chain(landmarks::steps())
            .chain(images::steps());
        for step in steps {
            registry.register(Box::new(step))?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, step: Box<dyn TestStep>) -> Result<(), RegistryError> {
        let key = (step.test_type(), step.name().to_string());
        if self.steps.contains_key(&key) {
            return Err(RegistryError::DuplicateStep {
                test_type: key.0,
                name: key.1,
            });
        }
        let errors = validate_step_columns(step.as_ref());
        if !errors.is_empty() {
            return Err(RegistryError::ColumnCollision(errors));
        }
        self.steps.insert(key, step);
        Ok(())
    }

    pub fn get(&self, test_type: TestType, name: &str) -> Option<&dyn TestStep> {
        self.steps
            .get(&(test_type, name.to_string()))
            .map(|step| &**step)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn TestStep> {
        self.steps.values().map(|step| &**step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

const STATUS_WIDTH: u16 = 100;
const ACTIONS_WIDTH: u16 = 120;

/// Status choice group shared by steps reviewed instance by instance.
pub fn manual_status_columns(test_type: TestType, step: &str) -> Vec<ColumnSpec> {
    let step = step.to_string();
    vec![ColumnSpec {
        key: "statusColumn".to_string(),
        name: Some("Status".to_string()),
        is_icon_only: false,
        sizing: ColumnSizing {
            min_width: STATUS_WIDTH,
            max_width: STATUS_WIDTH,
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
    }]
}

/// Status, failure summary, and edit/remove actions for steps whose
/// instances may be captured by the reviewer.
pub fn captured_status_columns(test_type: TestType, step: &str) -> Vec<ColumnSpec> {
    let mut columns = manual_status_columns(test_type, step);
    columns.push(ColumnSpec {
        key: "failureSummaryColumn".to_string(),
        name: Some("Failure summary".to_string()),
        is_icon_only: false,
        sizing: ColumnSizing {
            min_width: 200,
            max_width: 400,
            resizable: true,
        },
        on_render: Arc::new(|row: &RowViewModel<'_>| {
            match &row.test_step_result.failure_summary {
                Some(summary) => CellContent::text(summary.as_str()),
                None => CellContent::Empty,
            }
        }),
        on_column_click: None,
    });

    let step = step.to_string();
    columns.push(ColumnSpec {
        key: "instanceActionsColumn".to_string(),
        name: Some("Actions".to_string()),
        is_icon_only: false,
        sizing: ColumnSizing {
            min_width: ACTIONS_WIDTH,
            max_width: ACTIONS_WIDTH,
            resizable: false,
        },
        on_render: Arc::new(move |row: &RowViewModel<'_>| {
            let result = row.test_step_result;
            if !result.is_captured_by_user {
                return CellContent::Empty;
            }
            CellContent::CapturedActions(CapturedInstanceActions {
                test_type,
                step: step.clone(),
                instance_key: row.key.to_string(),
                failure_summary: result.failure_summary.clone(),
            })
        }),
        on_column_click: None,
    });
    columns
}
