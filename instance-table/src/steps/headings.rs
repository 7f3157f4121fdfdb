//! Headings assessment steps.

use crate::core::types::CellContent;
use crate::instance::Instance;
use crate::step::{ColumnConfig, StepDescriptor, TestType};
use crate::steps::manual_status_columns;

pub const HEADING_FUNCTION: &str = "headingFunction";
pub const HEADING_LEVEL: &str = "headingLevel";

fn heading_text_column() -> ColumnConfig {
    ColumnConfig::property("headingText", "Heading text", "headingText")
}

/// Level as `h1`..`h6`, from the `headingLevel` property (string or number).
fn heading_level_column() -> ColumnConfig {
    ColumnConfig::new("headingLevel", "Heading level", |instance: &Instance| {
        match instance.property_display("headingLevel") {
            Some(level) => CellContent::text(format!("h{}", level)),
            None => CellContent::Empty,
        }
    })
}

pub fn steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor {
            name: HEADING_FUNCTION.to_string(),
            test_type: TestType::Headings,
            columns_config: vec![heading_text_column(), heading_level_column()],
            has_visual_helper: true,
            status_columns: manual_status_columns,
        },
        StepDescriptor {
            name: HEADING_LEVEL.to_string(),
            test_type: TestType::Headings,
            columns_config: vec![heading_level_column(), heading_text_column()],
            has_visual_helper: true,
            status_columns: manual_status_columns,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::instance;

    #[test]
    fn heading_level_is_prefixed() {
        let mut heading = instance(&["h2"]);
        heading
            .property_bag
            .insert("headingLevel".to_string(), "2".into());
        assert_eq!((heading_level_column().on_render)(&heading), CellContent::text("h2"));
    }

    #[test]
    fn numeric_heading_level_is_prefixed() {
        let heading: Instance = serde_json::from_str(
            r#"{ "target": ["h3"], "propertyBag": { "headingLevel": 3, "headingText": 7 } }"#,
        )
        .expect("parse instance");
        assert_eq!((heading_level_column().on_render)(&heading), CellContent::text("h3"));
        assert_eq!((heading_text_column().on_render)(&heading), CellContent::text("7"));
    }
}
