//! Semantic invariants not expressible via JSON Schema.

use crate::core::columns::{VISUAL_HELPER_COLUMN_KEY, duplicate_column_keys};
use crate::instance::InstancesMap;
use crate::step::TestStep;

/// Check instance invariants not expressible in JSON Schema:
/// - Instance keys are non-empty
/// - Targets are non-empty and contain no blank selectors
/// - Step names in `testStepResults` are non-empty
pub fn validate_instances(instances: &InstancesMap) -> Vec<String> {
    let mut errors = Vec::new();

    for (key, instance) in instances {
        if key.trim().is_empty() {
            errors.push("instance key must be non-empty".to_string());
        }
        if instance.target.is_empty() {
            errors.push(format!("{}: target must contain at least one selector", key));
        }
        if instance.target.iter().any(|selector| selector.trim().is_empty()) {
            errors.push(format!("{}: target contains a blank selector", key));
        }
        if instance
            .test_step_results
            .keys()
            .any(|step| step.trim().is_empty())
        {
            errors.push(format!("{}: step names must be non-empty", key));
        }
    }

    errors
}

/// Check that a step's column keys are unique across all column sources.
///
/// The visual-helper key is reserved even for steps without the capability.
pub fn validate_step_columns(step: &dyn TestStep) -> Vec<String> {
    let status_columns = step.instance_status_columns();
    let keys = std::iter::once(VISUAL_HELPER_COLUMN_KEY)
        .chain(step.columns_config().iter().map(|config| config.key.as_str()))
        .chain(status_columns.iter().map(|column| column.key.as_str()));

    duplicate_column_keys(keys)
        .into_iter()
        .map(|key| {
            format!(
                "{}/{}: column key '{}' is used more than once",
                step.test_type(),
                step.name(),
                key
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ColumnSpec;
    use crate::instance::ManualTestStatus;
    use crate::step::{ColumnConfig, StepDescriptor, TestType};
    use crate::test_support::{instance, instance_with_result, status_column};

    fn colliding_status_columns(test_type: TestType, step: &str) -> Vec<ColumnSpec> {
        vec![status_column("headingText", test_type, step)]
    }

    fn no_status_columns(_: TestType, _: &str) -> Vec<ColumnSpec> {
        Vec::new()
    }

    #[test]
    fn valid_instances_have_no_errors() {
        let mut map = InstancesMap::new();
        map.insert(
            "a".to_string(),
            instance_with_result("s", ManualTestStatus::Pass, true),
        );
        assert!(validate_instances(&map).is_empty());
    }

    #[test]
    fn reports_empty_targets_and_blank_keys() {
        let mut map = InstancesMap::new();
        map.insert("".to_string(), instance(&["p"]));
        map.insert("b".to_string(), instance(&[]));
        map.insert("c".to_string(), instance(&["  "]));

        let errors = validate_instances(&map);
        assert_eq!(
            errors,
            vec![
                "instance key must be non-empty".to_string(),
                "b: target must contain at least one selector".to_string(),
                "c: target contains a blank selector".to_string(),
            ]
        );
    }

    #[test]
    fn description_and_status_collision_is_reported() {
        let step = StepDescriptor {
            name: "headingFunction".to_string(),
            test_type: TestType::Headings,
            columns_config: vec![ColumnConfig::property(
                "headingText",
                "Heading text",
                "headingText",
            )],
            has_visual_helper: true,
            status_columns: colliding_status_columns,
        };
        assert_eq!(
            validate_step_columns(&step),
            vec!["headings/headingFunction: column key 'headingText' is used more than once"]
        );
    }

    #[test]
    fn visual_helper_key_is_reserved() {
        let step = StepDescriptor {
            name: "s".to_string(),
            test_type: TestType::Images,
            columns_config: vec![ColumnConfig::property(
                VISUAL_HELPER_COLUMN_KEY,
                "Sneaky",
                "x",
            )],
            has_visual_helper: false,
            status_columns: no_status_columns,
        };
        assert_eq!(validate_step_columns(&step).len(), 1);
    }
}
