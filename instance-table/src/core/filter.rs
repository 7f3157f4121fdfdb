//! Selection of the instances relevant to a test step.

use crate::instance::InstancesMap;

/// Keys of instances that have a result for `step_name`, in map order.
///
/// Instances without a result for the step are not applicable and never
/// produce a row.
pub fn relevant_instance_keys<'a>(instances: &'a InstancesMap, step_name: &str) -> Vec<&'a str> {
    instances
        .iter()
        .filter(|(_, instance)| instance.test_step_results.contains_key(step_name))
        .map(|(key, _)| key.as_str())
        .collect()
}
