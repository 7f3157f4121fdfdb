//! Column assembly for the selected test step.
//!
//! Columns come from three sources, in this order: the visual-helper toggle
//! (only for steps with the capability), the step's description columns, and
//! the step's status columns.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, warn};

use crate::core::types::{
    CellContent, ColumnSizing, ColumnSpec, RowViewModel, VisualizationToggle,
};
use crate::step::TestStep;

/// Reserved key of the visual-helper column.
pub const VISUAL_HELPER_COLUMN_KEY: &str = "visualHelperColumn";

/// Width hints applied to the columns the assembler builds itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub visual_helper_width: u16,
    pub description_min_width: u16,
    pub description_max_width: u16,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            visual_helper_width: 20,
            description_min_width: 200,
            description_max_width: 400,
        }
    }
}

/// Assemble the ordered column list for `step`.
///
/// A missing step yields no columns; callers fall back to a default message.
pub fn assemble_columns(step: Option<&dyn TestStep>, layout: &ColumnLayout) -> Vec<ColumnSpec> {
    let Some(step) = step else {
        warn!("no test step selected; instance table has no columns");
        return Vec::new();
    };

    let mut columns = visual_helper_columns(step, layout);
    columns.extend(description_columns(step, layout));
    columns.extend(step.instance_status_columns());

    let duplicates = duplicate_column_keys(columns.iter().map(|column| column.key.as_str()));
    if !duplicates.is_empty() {
        error!(
            test = %step.test_type(),
            step = step.name(),
            keys = ?duplicates,
            "assembled columns contain duplicate keys"
        );
    }

    columns
}

/// The visual-helper toggle column, or nothing if the step lacks the capability.
pub fn visual_helper_columns(step: &dyn TestStep, layout: &ColumnLayout) -> Vec<ColumnSpec> {
    if !step.has_visual_helper() {
        return Vec::new();
    }

    let test_type = step.test_type();
    let step_name = step.name().to_string();
    let on_render = move |row: &RowViewModel<'_>| {
        let result = row.test_step_result;
        CellContent::VisualHelperToggle {
            instance_key: row.key.to_string(),
            is_visualization_enabled: result.is_visualization_enabled,
            is_visible: result.is_visible,
            on_toggle: VisualizationToggle {
                test_type,
                step: step_name.clone(),
                instance_key: row.key.to_string(),
                enabled: !result.is_visualization_enabled,
            },
        }
    };

    vec![ColumnSpec {
        key: VISUAL_HELPER_COLUMN_KEY.to_string(),
        name: None,
        is_icon_only: true,
        sizing: ColumnSizing {
            min_width: layout.visual_helper_width,
            max_width: layout.visual_helper_width,
            resizable: false,
        },
        on_render: Arc::new(on_render),
        on_column_click: None,
    }]
}

/// One resizable column per configured description column, in declared order.
pub fn description_columns(step: &dyn TestStep, layout: &ColumnLayout) -> Vec<ColumnSpec> {
    step.columns_config()
        .iter()
        .map(|config| {
            let projection = Arc::clone(&config.on_render);
            ColumnSpec {
                key: config.key.clone(),
                name: Some(config.name.clone()),
                is_icon_only: false,
                sizing: ColumnSizing {
                    min_width: layout.description_min_width,
                    max_width: layout.description_max_width,
                    resizable: true,
                },
                on_render: Arc::new(move |row: &RowViewModel<'_>| projection(row.instance)),
                on_column_click: None,
            }
        })
        .collect()
}

/// Keys that appear more than once, in first-repeat order.
pub fn duplicate_column_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for key in keys {
        if !seen.insert(key) && !duplicates.iter().any(|dup: &String| dup == key) {
            duplicates.push(key.to_string());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rows::relevant_rows;
    use crate::instance::{InstancesMap, ManualTestStatus};
    use crate::step::{ColumnConfig, StepDescriptor, TestType};
    use crate::test_support::{instance_with_result, status_column};

    fn two_status_columns(test_type: TestType, step: &str) -> Vec<ColumnSpec> {
        vec![
            status_column("status", test_type, step),
            status_column("reviewed", test_type, step),
        ]
    }

    fn step(has_visual_helper: bool) -> StepDescriptor {
        StepDescriptor {
            name: "stepX".to_string(),
            test_type: TestType::Headings,
            columns_config: vec![
                ColumnConfig::property("headingText", "Heading text", "headingText"),
                ColumnConfig::property("headingLevel", "Heading level", "headingLevel"),
            ],
            has_visual_helper,
            status_columns: two_status_columns,
        }
    }

    fn keys(columns: &[ColumnSpec]) -> Vec<&str> {
        columns.iter().map(|column| column.key.as_str()).collect()
    }

    #[test]
    fn visual_helper_column_comes_first() {
        let step = step(true);
        let columns = assemble_columns(Some(&step), &ColumnLayout::default());

        assert_eq!(columns.len(), 1 + 2 + 2);
        assert_eq!(
            keys(&columns),
            vec![
                VISUAL_HELPER_COLUMN_KEY,
                "headingText",
                "headingLevel",
                "status",
                "reviewed"
            ]
        );
        let helper = &columns[0];
        assert!(helper.is_icon_only);
        assert_eq!(helper.sizing.min_width, 20);
        assert_eq!(helper.sizing.max_width, 20);
        assert!(!helper.sizing.resizable);
        assert!(helper.on_column_click.is_none());
    }

    #[test]
    fn steps_without_visual_helper_omit_the_column() {
        let step = step(false);
        let columns = assemble_columns(Some(&step), &ColumnLayout::default());
        assert_eq!(columns.len(), 2 + 2);
        assert!(!keys(&columns).contains(&VISUAL_HELPER_COLUMN_KEY));
    }

    #[test]
    fn description_columns_use_fixed_sizing_and_project_the_instance() {
        let step = step(false);
        let columns = assemble_columns(Some(&step), &ColumnLayout::default());
        let text = &columns[0];
        assert_eq!(
            text.sizing,
            ColumnSizing {
                min_width: 200,
                max_width: 400,
                resizable: true,
            }
        );
        assert_eq!(text.header(), "Heading text");

        let mut map = InstancesMap::new();
        let mut instance = instance_with_result("stepX", ManualTestStatus::Pass, true);
        instance
            .property_bag
            .insert("headingText".to_string(), "Welcome".into());
        map.insert("a".to_string(), instance);
        let rows = relevant_rows(&map, "stepX");

        assert_eq!(text.render(&rows[0]), CellContent::text("Welcome"));
    }

    #[test]
    fn visual_helper_cell_carries_the_toggle_command() {
        let step = step(true);
        let columns = assemble_columns(Some(&step), &ColumnLayout::default());
        let mut map = InstancesMap::new();
        let mut instance = instance_with_result("stepX", ManualTestStatus::Unknown, false);
        instance.test_step_results["stepX"].is_visible = true;
        map.insert("a".to_string(), instance);
        let rows = relevant_rows(&map, "stepX");

        assert_eq!(
            columns[0].render(&rows[0]),
            CellContent::VisualHelperToggle {
                instance_key: "a".to_string(),
                is_visualization_enabled: false,
                is_visible: true,
                on_toggle: VisualizationToggle {
                    test_type: TestType::Headings,
                    step: "stepX".to_string(),
                    instance_key: "a".to_string(),
                    enabled: true,
                },
            }
        );
    }

    #[test]
    fn missing_step_yields_no_columns() {
        assert!(assemble_columns(None, &ColumnLayout::default()).is_empty());
    }

    #[test]
    fn duplicate_keys_are_reported_once() {
        let duplicates = duplicate_column_keys(["a", "b", "a", "c", "a", "b"]);
        assert_eq!(duplicates, vec!["a".to_string(), "b".to_string()]);
        assert!(duplicate_column_keys(["a", "b"]).is_empty());
    }
}
