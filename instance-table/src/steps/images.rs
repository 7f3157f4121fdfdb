//! Images assessment steps.
//!
//! Image findings may be captured by the reviewer by hand, so there is
//! nothing to highlight and the step has no visual helper. Captured rows get
//! edit and remove actions next to their status.

use crate::core::types::CellContent;
use crate::instance::Instance;
use crate::step::{ColumnConfig, StepDescriptor, TestType};
use crate::steps::captured_status_columns;

pub const IMAGE_FUNCTION: &str = "imageFunction";

fn element_column() -> ColumnConfig {
    ColumnConfig::new("element", "Element", |instance: &Instance| {
        match instance.target.last() {
            Some(selector) => CellContent::text(selector.as_str()),
            None => CellContent::Empty,
        }
    })
}

/// Markup snippet of the element, as captured by the scan.
fn html_column() -> ColumnConfig {
    ColumnConfig::new("html", "HTML", |instance: &Instance| {
        if instance.html.is_empty() {
            CellContent::Empty
        } else {
            CellContent::text(instance.html.as_str())
        }
    })
}

pub fn steps() -> Vec<StepDescriptor> {
    vec![StepDescriptor {
        name: IMAGE_FUNCTION.to_string(),
        test_type: TestType::Images,
        columns_config: vec![
            element_column(),
            ColumnConfig::property("accessibleName", "Accessible name", "accessibleName"),
            html_column(),
        ],
        has_visual_helper: false,
        status_columns: captured_status_columns,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::instance;

    #[test]
    fn html_column_shows_the_snippet() {
        let mut image = instance(&["main", "img"]);
        assert_eq!((html_column().on_render)(&image), CellContent::Empty);

        image.html = "<img src=\"a.png\">".to_string();
        assert_eq!(
            (html_column().on_render)(&image),
            CellContent::text("<img src=\"a.png\">")
        );
        assert_eq!((element_column().on_render)(&image), CellContent::text("img"));
    }
}
