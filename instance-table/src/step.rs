//! Test step descriptors.
//!
//! A step decides which description and status columns the table shows and
//! whether rows get a visual-helper toggle. Concrete steps are registered in
//! [`StepRegistry`](crate::steps::StepRegistry) and looked up explicitly.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::core::types::{CellContent, ColumnSpec};
use crate::instance::Instance;

/// Projection from an instance to a description cell.
pub type InstanceProjection = Arc<dyn Fn(&Instance) -> CellContent + Send + Sync>;

/// Produces the status columns a step appends after its description columns.
///
/// Receives the step's own test type and name so cells can carry commands.
pub type StatusColumnProvider = fn(TestType, &str) -> Vec<ColumnSpec>;

/// Assessment (test) a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Headings,
    Landmarks,
    Images,
}

impl TestType {
    pub const ALL: [TestType; 3] = [TestType::Headings, TestType::Landmarks, TestType::Images];

    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Headings => "headings",
            TestType::Landmarks => "landmarks",
            TestType::Images => "images",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestType::ALL
            .into_iter()
            .find(|test_type| test_type.as_str() == s)
            .ok_or_else(|| anyhow!("unknown test type '{}'", s))
    }
}

/// A description column declared by a step.
#[derive(Clone)]
pub struct ColumnConfig {
    pub key: String,
    pub name: String,
    pub on_render: InstanceProjection,
}

impl ColumnConfig {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        on_render: impl Fn(&Instance) -> CellContent + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            on_render: Arc::new(on_render),
        }
    }

    /// Column showing a scalar value from the instance property bag.
    pub fn property(key: &str, name: &str, property: &'static str) -> Self {
        Self::new(key, name, move |instance: &Instance| {
            instance
                .property_display(property)
                .map(CellContent::Text)
                .unwrap_or(CellContent::Empty)
        })
    }
}

impl fmt::Debug for ColumnConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnConfig")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Capabilities of one test step as seen by the instance table.
pub trait TestStep: Send + Sync {
    /// Step name; also the key into `Instance::test_step_results`.
    fn name(&self) -> &str;
    fn test_type(&self) -> TestType;
    fn columns_config(&self) -> &[ColumnConfig];
    fn has_visual_helper(&self) -> bool;
    fn instance_status_columns(&self) -> Vec<ColumnSpec>;
}

/// Data-driven step implementation used by the built-in steps.
#[derive(Debug, Clone)]
pub struct StepDescriptor {
    pub name: String,
    pub test_type: TestType,
    pub columns_config: Vec<ColumnConfig>,
    pub has_visual_helper: bool,
    pub status_columns: StatusColumnProvider,
}

impl TestStep for StepDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn test_type(&self) -> TestType {
        self.test_type
    }

    fn columns_config(&self) -> &[ColumnConfig] {
        &self.columns_config
    }

    fn has_visual_helper(&self) -> bool {
        self.has_visual_helper
    }

    fn instance_status_columns(&self) -> Vec<ColumnSpec> {
        (self.status_columns)(self.test_type, &self.name)
    }
}
