//! List rendering collaborators.
//!
//! The façade hands a [`ListRenderer`] the finished rows, columns, and header
//! controls. [`TextListRenderer`] is the plain-text renderer used by the CLI.

use crate::core::filter::relevant_instance_keys;
use crate::core::types::{CellContent, ColumnSpec, MasterToggle, RowViewModel};
use crate::instance::InstancesMap;
use crate::step::TestType;

/// The bulk "pass unmarked instances" action shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassUnmarkedAction {
    pub label: String,
    /// Disabled when no row is left unmarked.
    pub disabled: bool,
    pub test_type: TestType,
    pub step: String,
}

/// Controls rendered around the list itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableHeader {
    pub pass_unmarked: Option<PassUnmarkedAction>,
    pub master_toggle: Option<MasterToggle>,
}

/// Everything a list renderer needs for one pass.
#[derive(Debug, Clone, Copy)]
pub struct ListProps<'v, 'a> {
    pub items: &'v [RowViewModel<'a>],
    pub columns: &'v [ColumnSpec],
    pub header: &'v TableHeader,
}

/// Paints rows and columns. The table does not care how.
pub trait ListRenderer {
    type Output;

    fn render_list(&self, props: ListProps<'_, '_>) -> Self::Output;
}

/// Fallback shown instead of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultMessage {
    pub message: String,
}

/// Consulted before the list renderer; a returned message wins.
pub trait DefaultMessageGenerator {
    fn default_message(&self, instances: &InstancesMap, step: Option<&str>)
    -> Option<DefaultMessage>;
}

/// Reports "No matching instances" when the step has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentDefaultMessageGenerator {
    pub no_matching_message: String,
}

impl Default for AssessmentDefaultMessageGenerator {
    fn default() -> Self {
        Self {
            no_matching_message: "No matching instances".to_string(),
        }
    }
}

impl DefaultMessageGenerator for AssessmentDefaultMessageGenerator {
    fn default_message(
        &self,
        instances: &InstancesMap,
        step: Option<&str>,
    ) -> Option<DefaultMessage> {
        let has_rows = step.is_some_and(|step| !relevant_instance_keys(instances, step).is_empty());
        if has_rows {
            return None;
        }
        Some(DefaultMessage {
            message: self.no_matching_message.clone(),
        })
    }
}

/// Result of a full render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome<T> {
    /// Instances are still being collected.
    Loading { label: String },
    Message(DefaultMessage),
    List(T),
}

/// Renders the list as aligned plain text.
///
/// Column width hints are treated as pixels and divided by `px_per_char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextListRenderer {
    pub px_per_char: u16,
}

impl Default for TextListRenderer {
    fn default() -> Self {
        Self { px_per_char: 8 }
    }
}

const TOGGLE_WIDTH: usize = 3;
const CAPTURED_ACTIONS: &str = "[edit] [remove]";
const SEPARATOR: &str = " | ";

impl TextListRenderer {
    fn width_bounds(&self, column: &ColumnSpec) -> (usize, usize) {
        let per_char = usize::from(self.px_per_char.max(1));
        let min = usize::from(column.sizing.min_width) / per_char;
        let max = (usize::from(column.sizing.max_width) / per_char).max(TOGGLE_WIDTH);
        (min.min(max), max)
    }
}

impl ListRenderer for TextListRenderer {
    type Output = String;

    fn render_list(&self, props: ListProps<'_, '_>) -> String {
        let mut out = String::new();

        if let Some(action) = &props.header.pass_unmarked {
            out.push('[');
            out.push_str(&action.label);
            if action.disabled {
                out.push_str(" (disabled)");
            }
            out.push_str("]\n");
        }

        let headers: Vec<String> = props
            .columns
            .iter()
            .map(|column| {
                if column.is_icon_only {
                    match &props.header.master_toggle {
                        Some(toggle) => toggle_label(toggle.checked).to_string(),
                        None => String::new(),
                    }
                } else {
                    column.header().to_string()
                }
            })
            .collect();

        let cells: Vec<Vec<String>> = props
            .items
            .iter()
            .map(|row| {
                props
                    .columns
                    .iter()
                    .map(|column| cell_text(&column.render(row)))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = props
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let natural = cells
                    .iter()
                    .map(|row| row[index].chars().count())
                    .chain(std::iter::once(headers[index].chars().count()))
                    .max()
                    .unwrap_or(0);
                let (min, max) = self.width_bounds(column);
                natural.clamp(min, max)
            })
            .collect();

        push_line(&mut out, &headers, &widths);
        for row in &cells {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn toggle_label(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn cell_text(cell: &CellContent) -> String {
    match cell {
        CellContent::Empty => String::new(),
        CellContent::Text(text) => text.clone(),
        CellContent::VisualHelperToggle {
            is_visualization_enabled,
            ..
        } => toggle_label(*is_visualization_enabled).to_string(),
        CellContent::StatusChoice(choice) => choice.selected.label().to_string(),
        CellContent::CapturedActions(_) => CAPTURED_ACTIONS.to_string(),
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| fit(cell, *width))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Clip to `width` chars (marking the cut with `~`) or pad with spaces.
fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('~');
        return clipped;
    }
    format!("{:<width$}", text, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CapturedInstanceActions, StatusChoice};
    use crate::instance::ManualTestStatus;
    use crate::test_support::instance_with_result;

    #[test]
    fn fit_pads_and_clips() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc~");
        assert_eq!(fit("abcd", 4), "abcd");
    }

    #[test]
    fn row_controls_render_as_text() {
        let choice = StatusChoice {
            test_type: TestType::Images,
            step: "imageFunction".to_string(),
            instance_key: "a".to_string(),
            selected: ManualTestStatus::Fail,
        };
        let actions = CapturedInstanceActions {
            test_type: TestType::Images,
            step: "imageFunction".to_string(),
            instance_key: "a".to_string(),
            failure_summary: None,
        };
        assert_eq!(cell_text(&CellContent::StatusChoice(choice)), "fail");
        assert_eq!(
            cell_text(&CellContent::CapturedActions(actions)),
            "[edit] [remove]"
        );
        assert_eq!(cell_text(&CellContent::Empty), "");
    }

    #[test]
    fn default_message_when_step_has_no_rows() {
        let generator = AssessmentDefaultMessageGenerator::default();
        let mut map = InstancesMap::new();
        map.insert(
            "a".to_string(),
            instance_with_result("s", ManualTestStatus::Pass, true),
        );

        assert_eq!(generator.default_message(&map, Some("s")), None);
        assert_eq!(
            generator.default_message(&map, Some("other")),
            Some(DefaultMessage {
                message: "No matching instances".to_string()
            })
        );
        assert!(generator.default_message(&map, None).is_some());
        assert!(generator.default_message(&InstancesMap::new(), Some("s")).is_some());
    }
}
