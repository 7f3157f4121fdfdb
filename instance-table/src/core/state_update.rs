//! Store-owned state transitions for instance maps.
//!
//! These back the reference command handler. The view-model core never calls
//! them; it only issues commands.

use crate::instance::{InstancesMap, ManualTestStatus};

/// Keys whose results actually changed, in map order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateUpdateSummary {
    pub changed: Vec<String>,
}

impl StateUpdateSummary {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Set the visualization flag of one instance's result for `step`.
///
/// Unknown keys and instances without a result for `step` are left untouched.
pub fn set_visualization_state(
    instances: &mut InstancesMap,
    step: &str,
    instance_key: &str,
    enabled: bool,
) -> StateUpdateSummary {
    let mut summary = StateUpdateSummary::default();
    let result = instances
        .get_mut(instance_key)
        .and_then(|instance| instance.test_step_results.get_mut(step));
    if let Some(result) = result {
        if result.is_visualization_enabled != enabled {
            result.is_visualization_enabled = enabled;
            summary.changed.push(instance_key.to_string());
        }
    }
    summary
}

/// Set the visualization flag of every result for `step`.
pub fn set_visualization_state_for_all(
    instances: &mut InstancesMap,
    step: &str,
    enabled: bool,
) -> StateUpdateSummary {
    let mut summary = StateUpdateSummary::default();
    for (key, instance) in instances.iter_mut() {
        let Some(result) = instance.test_step_results.get_mut(step) else {
            continue;
        };
        if result.is_visualization_enabled != enabled {
            result.is_visualization_enabled = enabled;
            summary.changed.push(key.clone());
        }
    }
    summary
}

/// Mark every unmarked result for `step` as passed.
pub fn pass_unmarked_instances(instances: &mut InstancesMap, step: &str) -> StateUpdateSummary {
    let mut summary = StateUpdateSummary::default();
    for (key, instance) in instances.iter_mut() {
        let Some(result) = instance.test_step_results.get_mut(step) else {
            continue;
        };
        if result.status == ManualTestStatus::Unknown {
            result.status = ManualTestStatus::Pass;
            summary.changed.push(key.clone());
        }
    }
    summary
}

/// Set the manual status of one instance's result for `step`.
pub fn set_instance_status(
    instances: &mut InstancesMap,
    step: &str,
    instance_key: &str,
    status: ManualTestStatus,
) -> StateUpdateSummary {
    let mut summary = StateUpdateSummary::default();
    let result = instances
        .get_mut(instance_key)
        .and_then(|instance| instance.test_step_results.get_mut(step));
    if let Some(result) = result {
        if result.status != status {
            result.status = status;
            summary.changed.push(instance_key.to_string());
        }
    }
    summary
}

/// Replace the failure summary of a captured instance's result for `step`.
///
/// Generated (scanned) instances are left untouched.
pub fn set_failure_summary(
    instances: &mut InstancesMap,
    step: &str,
    instance_key: &str,
    failure_summary: Option<&str>,
) -> StateUpdateSummary {
    let mut summary = StateUpdateSummary::default();
    let result = instances
        .get_mut(instance_key)
        .and_then(|instance| instance.test_step_results.get_mut(step))
        .filter(|result| result.is_captured_by_user);
    if let Some(result) = result {
        if result.failure_summary.as_deref() != failure_summary {
            result.failure_summary = failure_summary.map(str::to_string);
            summary.changed.push(instance_key.to_string());
        }
    }
    summary
}

/// Remove an instance captured for `step`, keeping the order of the rest.
pub fn remove_captured_instance(
    instances: &mut InstancesMap,
    step: &str,
    instance_key: &str,
) -> StateUpdateSummary {
    let mut summary = StateUpdateSummary::default();
    let captured = instances
        .get(instance_key)
        .and_then(|instance| instance.step_result(step))
        .is_some_and(|result| result.is_captured_by_user);
    if captured {
        instances.shift_remove(instance_key);
        summary.changed.push(instance_key.to_string());
    }
    summary
}
