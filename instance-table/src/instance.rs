//! Assessment instances as stored by the external assessment store.
//!
//! The view-model core only ever reads these types. Mutation happens through
//! the commands issued to an [`InstanceTableHandler`](crate::handler::InstanceTableHandler).

use std::str::FromStr;

use anyhow::anyhow;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered map of instance key to instance.
///
/// Iteration order is insertion order (document order when loaded from disk).
pub type InstancesMap = IndexMap<String, Instance>;

/// Manual review status of one instance under one test step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualTestStatus {
    Unknown,
    Pass,
    Fail,
}

impl ManualTestStatus {
    pub const ALL: [ManualTestStatus; 3] = [
        ManualTestStatus::Unknown,
        ManualTestStatus::Pass,
        ManualTestStatus::Fail,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ManualTestStatus::Unknown => "unknown",
            ManualTestStatus::Pass => "pass",
            ManualTestStatus::Fail => "fail",
        }
    }
}

impl FromStr for ManualTestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManualTestStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| anyhow!("unknown status '{}' (expected unknown, pass, or fail)", s))
    }
}

/// Outcome of evaluating one instance against one test step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub status: ManualTestStatus,
    pub is_visualization_enabled: bool,
    pub is_visible: bool,
    #[serde(default)]
    pub is_captured_by_user: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_summary: Option<String>,
}

/// A single subject under assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Selector path used to focus the subject (outermost frame first).
    pub target: Vec<String>,
    /// Markup of the element, shown by steps that list raw findings.
    #[serde(default)]
    pub html: String,
    /// Results keyed by step name. Absence means the step does not apply.
    #[serde(default)]
    pub test_step_results: IndexMap<String, StepResult>,
    /// Step-specific payload read by description column projections.
    #[serde(default)]
    pub property_bag: Map<String, Value>,
}

impl Instance {
    pub fn step_result(&self, step_name: &str) -> Option<&StepResult> {
        self.test_step_results.get(step_name)
    }

    /// Payload value as display text. Strings, numbers, and booleans only.
    pub fn property_display(&self, key: &str) -> Option<String> {
        match self.property_bag.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}
