//! Landmarks assessment steps.

use crate::step::{ColumnConfig, StepDescriptor, TestType};
use crate::steps::manual_status_columns;

pub const PRIMARY_LANDMARK: &str = "primaryLandmark";

pub fn steps() -> Vec<StepDescriptor> {
    vec![StepDescriptor {
        name: PRIMARY_LANDMARK.to_string(),
        test_type: TestType::Landmarks,
        columns_config: vec![
            ColumnConfig::property("landmarkRole", "Landmark role", "role"),
            ColumnConfig::property("label", "Label", "label"),
        ],
        has_visual_helper: true,
        status_columns: manual_status_columns,
    }]
}
