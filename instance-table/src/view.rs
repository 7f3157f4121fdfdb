//! Instance table façade.
//!
//! [`InstanceTableViewModel`] turns an instances snapshot plus the selected
//! step into a [`TableView`] and forwards user actions to an
//! [`InstanceTableHandler`]. It keeps no state between calls: every render is
//! a pure function of its arguments, and every command is dispatched exactly
//! once.

use anyhow::Result;
use tracing::debug;

use crate::core::columns::{ColumnLayout, VISUAL_HELPER_COLUMN_KEY, assemble_columns};
use crate::core::predicates::{all_enabled, any_unknown};
use crate::core::rows::relevant_rows;
use crate::core::types::{
    CapturedInstanceActions, CapturedInstanceRemoval, CellContent, ColumnSpec, FailureSummaryEdit,
    InstanceStatusChange, MasterToggle, RowViewModel, StatusChoice, VisualizationToggle,
    VisualizationToggleAll,
};
use crate::handler::InstanceTableHandler;
use crate::instance::InstancesMap;
use crate::render::{
    DefaultMessageGenerator, ListProps, ListRenderer, PassUnmarkedAction, RenderOutcome,
    TableHeader,
};
use crate::step::{TestStep, TestType};

/// Labels and layout used when building and rendering the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub layout: ColumnLayout,
    pub loading_label: String,
    pub pass_unmarked_label: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            loading_label: "Scanning".to_string(),
            pass_unmarked_label: "Pass unmarked instances".to_string(),
        }
    }
}

/// Snapshot of the table for one render pass.
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    /// Selected step, if any.
    pub step: Option<(TestType, String)>,
    pub rows: Vec<RowViewModel<'a>>,
    pub columns: Vec<ColumnSpec>,
    pub all_enabled: bool,
    pub any_unknown: bool,
}

impl<'a> ViewModel<'a> {
    pub fn row(&self, instance_key: &str) -> Option<&RowViewModel<'a>> {
        self.rows.iter().find(|row| row.key == instance_key)
    }

    /// Rendered cells of one row, in column order.
    pub fn cells(&self, instance_key: &str) -> Option<Vec<CellContent>> {
        let row = self.row(instance_key)?;
        Some(self.columns.iter().map(|column| column.render(row)).collect())
    }

    /// Command carried by the row's visual-helper toggle.
    pub fn visualization_toggle(&self, instance_key: &str) -> Option<VisualizationToggle> {
        self.cells(instance_key)?.into_iter().find_map(|cell| match cell {
            CellContent::VisualHelperToggle { on_toggle, .. } => Some(on_toggle),
            _ => None,
        })
    }

    /// The row's status choice group, if a status column offers one.
    pub fn status_choice(&self, instance_key: &str) -> Option<StatusChoice> {
        self.cells(instance_key)?.into_iter().find_map(|cell| match cell {
            CellContent::StatusChoice(choice) => Some(choice),
            _ => None,
        })
    }

    /// Edit/remove actions; only rows the reviewer captured have them.
    pub fn captured_actions(&self, instance_key: &str) -> Option<CapturedInstanceActions> {
        self.cells(instance_key)?.into_iter().find_map(|cell| match cell {
            CellContent::CapturedActions(actions) => Some(actions),
            _ => None,
        })
    }

    pub fn has_visual_helper(&self) -> bool {
        self.columns
            .iter()
            .any(|column| column.key == VISUAL_HELPER_COLUMN_KEY)
    }

    /// Header toggle of the visual-helper column; flips every row at once.
    pub fn master_toggle(&self) -> Option<MasterToggle> {
        if !self.has_visual_helper() {
            return None;
        }
        let (test_type, step) = self.step.clone()?;
        Some(MasterToggle {
            checked: self.all_enabled,
            on_toggle: VisualizationToggleAll {
                test_type,
                step,
                enabled: !self.all_enabled,
            },
        })
    }

    /// Whether the bulk "pass unmarked" control is disabled.
    pub fn pass_unmarked_disabled(&self) -> bool {
        !self.any_unknown
    }
}

/// Outcome of building the view model.
#[derive(Debug, Clone)]
pub enum TableView<'a> {
    /// The store has not produced an instances map yet.
    Loading,
    Ready(ViewModel<'a>),
}

impl<'a> TableView<'a> {
    pub fn is_loading(&self) -> bool {
        matches!(self, TableView::Loading)
    }

    pub fn ready(&self) -> Option<&ViewModel<'a>> {
        match self {
            TableView::Loading => None,
            TableView::Ready(view) => Some(view),
        }
    }
}

/// Builds instance table snapshots and forwards commands to `H`.
#[derive(Debug, Clone)]
pub struct InstanceTableViewModel<H> {
    handler: H,
    settings: ViewSettings,
}

impl<H: InstanceTableHandler> InstanceTableViewModel<H> {
    pub fn new(handler: H) -> Self {
        Self::with_settings(handler, ViewSettings::default())
    }

    pub fn with_settings(handler: H, settings: ViewSettings) -> Self {
        Self { handler, settings }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Build the rows, columns, and predicates for `step`.
    ///
    /// `None` instances means the store is still loading; that is reported as
    /// [`TableView::Loading`], never as an empty table.
    pub fn build_view_model<'a>(
        &self,
        instances: Option<&'a InstancesMap>,
        step: Option<&dyn TestStep>,
    ) -> TableView<'a> {
        let Some(instances) = instances else {
            debug!("instances not available yet; table is loading");
            return TableView::Loading;
        };

        let columns = assemble_columns(step, &self.settings.layout);
        let rows = match step {
            Some(step) => relevant_rows(instances, step.name()),
            None => Vec::new(),
        };
        let any_unknown = step.is_some_and(|step| any_unknown(&rows, step.name()));

        TableView::Ready(ViewModel {
            step: step.map(|step| (step.test_type(), step.name().to_string())),
            all_enabled: all_enabled(&rows),
            any_unknown,
            rows,
            columns,
        })
    }

    /// Run a full render pass through the collaborators.
    ///
    /// Loading wins over everything, then the default message, then the list.
    pub fn render<R: ListRenderer>(
        &self,
        instances: Option<&InstancesMap>,
        step: Option<&dyn TestStep>,
        messages: &dyn DefaultMessageGenerator,
        renderer: &R,
    ) -> RenderOutcome<R::Output> {
        let view = match self.build_view_model(instances, step) {
            TableView::Loading => {
                return RenderOutcome::Loading {
                    label: self.settings.loading_label.clone(),
                };
            }
            TableView::Ready(view) => view,
        };

        if let Some(instances) = instances {
            let step_name = view.step.as_ref().map(|(_, name)| name.as_str());
            if let Some(message) = messages.default_message(instances, step_name) {
                return RenderOutcome::Message(message);
            }
        }

        let header = self.header(&view);
        RenderOutcome::List(renderer.render_list(ListProps {
            items: &view.rows,
            columns: &view.columns,
            header: &header,
        }))
    }

    /// Forward a visual-helper toggle from a row.
    pub fn on_toggle_visualization(&self, toggle: &VisualizationToggle) -> Result<()> {
        debug!(
            test = %toggle.test_type,
            step = %toggle.step,
            instance = %toggle.instance_key,
            enabled = toggle.enabled,
            "dispatch change visualization state"
        );
        self.handler.change_visualization_state(
            toggle.test_type,
            &toggle.step,
            &toggle.instance_key,
            toggle.enabled,
        )
    }

    /// Forward the visual-helper header toggle.
    pub fn on_toggle_all_visualizations(&self, toggle: &VisualizationToggleAll) -> Result<()> {
        debug!(
            test = %toggle.test_type,
            step = %toggle.step,
            enabled = toggle.enabled,
            "dispatch change visualization state for all"
        );
        self.handler
            .change_visualization_state_for_all(toggle.test_type, &toggle.step, toggle.enabled)
    }

    /// Forward the bulk resolve of every unmarked instance of `step`.
    pub fn on_pass_unmarked_instances(&self, test_type: TestType, step: &str) -> Result<()> {
        debug!(test = %test_type, step, "dispatch pass unmarked instances");
        self.handler.pass_unmarked_instances(test_type, step)
    }

    /// Forward a status picked in a row's choice group.
    pub fn on_change_instance_status(&self, change: &InstanceStatusChange) -> Result<()> {
        debug!(
            test = %change.test_type,
            step = %change.step,
            instance = %change.instance_key,
            status = change.status.label(),
            "dispatch change instance status"
        );
        self.handler.change_instance_status(
            change.test_type,
            &change.step,
            &change.instance_key,
            change.status,
        )
    }

    pub fn on_edit_failure_summary(&self, edit: &FailureSummaryEdit) -> Result<()> {
        debug!(
            test = %edit.test_type,
            step = %edit.step,
            instance = %edit.instance_key,
            "dispatch edit failure summary"
        );
        self.handler.edit_failure_summary(
            edit.test_type,
            &edit.step,
            &edit.instance_key,
            edit.failure_summary.as_deref(),
        )
    }

    pub fn on_remove_captured_instance(&self, removal: &CapturedInstanceRemoval) -> Result<()> {
        debug!(
            test = %removal.test_type,
            step = %removal.step,
            instance = %removal.instance_key,
            "dispatch remove captured instance"
        );
        self.handler
            .remove_captured_instance(removal.test_type, &removal.step, &removal.instance_key)
    }

    /// Focus the target of the activated row.
    ///
    /// Keys that are not rows of `view` issue no command.
    pub fn on_instance_activated(&self, view: &ViewModel<'_>, instance_key: &str) -> Result<()> {
        let Some(row) = view.row(instance_key) else {
            debug!(instance = instance_key, "activated key is not a row; ignoring");
            return Ok(());
        };
        debug!(instance = instance_key, target = ?row.instance.target, "dispatch update focused target");
        self.handler.update_focused_target(&row.instance.target)
    }

    fn header(&self, view: &ViewModel<'_>) -> TableHeader {
        let pass_unmarked = view
            .step
            .as_ref()
            .map(|(test_type, step)| PassUnmarkedAction {
                label: self.settings.pass_unmarked_label.clone(),
                disabled: view.pass_unmarked_disabled(),
                test_type: *test_type,
                step: step.clone(),
            });
        TableHeader {
            pass_unmarked,
            master_toggle: view.master_toggle(),
        }
    }
}
