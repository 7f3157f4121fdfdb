//! Row view-model construction.

use crate::core::filter::relevant_instance_keys;
use crate::core::types::RowViewModel;
use crate::instance::InstancesMap;

/// Pair each relevant key with its instance and step result.
///
/// # Panics
///
/// Panics if a key is missing from `instances` or has no result for
/// `step_name`. Keys produced by [`relevant_instance_keys`] always satisfy
/// both, so a panic here is a caller bug.
pub fn build_rows<'a>(
    keys: &[&'a str],
    instances: &'a InstancesMap,
    step_name: &str,
) -> Vec<RowViewModel<'a>> {
    keys.iter()
        .map(|&key| {
            let instance = &instances[key];
            let test_step_result = instance.step_result(step_name).unwrap_or_else(|| {
                panic!(
                    "instance '{}' was filtered in without a result for step '{}'",
                    key, step_name
                )
            });
            RowViewModel {
                key,
                instance,
                test_step_result,
            }
        })
        .collect()
}

/// Filter and build rows for `step_name` in one pass.
pub fn relevant_rows<'a>(instances: &'a InstancesMap, step_name: &str) -> Vec<RowViewModel<'a>> {
    let keys = relevant_instance_keys(instances, step_name);
    build_rows(&keys, instances, step_name)
}
