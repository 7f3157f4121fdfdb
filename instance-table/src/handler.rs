//! Command boundary between the instance table and the assessment store.
//!
//! The table never mutates instances. It issues one command per user action
//! and the store decides when the change becomes visible.

use anyhow::Result;

use crate::instance::ManualTestStatus;
use crate::step::TestType;

/// External handler receiving instance table commands.
pub trait InstanceTableHandler {
    fn change_visualization_state(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        enabled: bool,
    ) -> Result<()>;

    fn change_visualization_state_for_all(
        &self,
        test_type: TestType,
        step: &str,
        enabled: bool,
    ) -> Result<()>;

    fn pass_unmarked_instances(&self, test_type: TestType, step: &str) -> Result<()>;

    fn change_instance_status(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        status: ManualTestStatus,
    ) -> Result<()>;

    /// Only applies to instances the reviewer captured.
    fn edit_failure_summary(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        failure_summary: Option<&str>,
    ) -> Result<()>;

    /// Only applies to instances the reviewer captured.
    fn remove_captured_instance(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
    ) -> Result<()>;

    fn update_focused_target(&self, target: &[String]) -> Result<()>;
}

impl<H: InstanceTableHandler + ?Sized> InstanceTableHandler for &H {
    fn change_visualization_state(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        enabled: bool,
    ) -> Result<()> {
        (**self).change_visualization_state(test_type, step, instance_key, enabled)
    }

    fn change_visualization_state_for_all(
        &self,
        test_type: TestType,
        step: &str,
        enabled: bool,
    ) -> Result<()> {
        (**self).change_visualization_state_for_all(test_type, step, enabled)
    }

    fn pass_unmarked_instances(&self, test_type: TestType, step: &str) -> Result<()> {
        (**self).pass_unmarked_instances(test_type, step)
    }

    fn change_instance_status(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        status: ManualTestStatus,
    ) -> Result<()> {
        (**self).change_instance_status(test_type, step, instance_key, status)
    }

    fn edit_failure_summary(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        failure_summary: Option<&str>,
    ) -> Result<()> {
        (**self).edit_failure_summary(test_type, step, instance_key, failure_summary)
    }

    fn remove_captured_instance(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
    ) -> Result<()> {
        (**self).remove_captured_instance(test_type, step, instance_key)
    }

    fn update_focused_target(&self, target: &[String]) -> Result<()> {
        (**self).update_focused_target(target)
    }
}

/// A dispatched command, as recorded by test handlers and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    ChangeVisualizationState {
        test_type: TestType,
        step: String,
        instance_key: String,
        enabled: bool,
    },
    ChangeVisualizationStateForAll {
        test_type: TestType,
        step: String,
        enabled: bool,
    },
    PassUnmarkedInstances {
        test_type: TestType,
        step: String,
    },
    ChangeInstanceStatus {
        test_type: TestType,
        step: String,
        instance_key: String,
        status: ManualTestStatus,
    },
    EditFailureSummary {
        test_type: TestType,
        step: String,
        instance_key: String,
        failure_summary: Option<String>,
    },
    RemoveCapturedInstance {
        test_type: TestType,
        step: String,
        instance_key: String,
    },
    UpdateFocusedTarget {
        target: Vec<String>,
    },
}
