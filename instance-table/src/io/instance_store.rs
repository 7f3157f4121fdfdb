//! File-backed assessment store acting as the instance table's command handler.
//!
//! The document holds the instances map (or `null` while a scan is still
//! running) and the last focused target. Every command loads the document,
//! applies one state transition, and writes it back atomically.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::validator_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::invariants::validate_instances;
use crate::core::state_update::{
    StateUpdateSummary, pass_unmarked_instances, remove_captured_instance, set_failure_summary,
    set_instance_status, set_visualization_state, set_visualization_state_for_all,
};
use crate::handler::InstanceTableHandler;
use crate::instance::{InstancesMap, ManualTestStatus};
use crate::step::TestType;

const DOCUMENT_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/assessment/v1.schema.json"
));

/// On-disk assessment state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDocument {
    /// `None` while instances are still being collected.
    pub instances: Option<InstancesMap>,
    #[serde(default)]
    pub focused_target: Option<Vec<String>>,
}

impl AssessmentDocument {
    /// Document with an empty (loaded) instances map.
    pub fn empty() -> Self {
        Self {
            instances: Some(InstancesMap::new()),
            focused_target: None,
        }
    }
}

/// Load and validate a document (schema + invariants).
pub fn load_document(path: &Path) -> Result<AssessmentDocument> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read document {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse document {}", path.display()))?;
    validate_schema(&value)?;
    // `Value` objects are key-sorted; instances must keep document order.
    let document: AssessmentDocument = serde_json::from_str(&contents)
        .with_context(|| format!("deserialize document {}", path.display()))?;
    if let Some(instances) = &document.instances {
        validate_document_invariants(instances)?;
    }
    Ok(document)
}

/// Write a document with stable pretty formatting.
pub fn write_document(path: &Path, document: &AssessmentDocument) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(document).context("serialize document")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

/// Create an empty document unless one exists (or `force` is set).
///
/// Returns true if the file was written.
pub fn init_document(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        debug!(path = %path.display(), "document exists; leaving it untouched");
        return Ok(false);
    }
    write_document(path, &AssessmentDocument::empty())?;
    Ok(true)
}

fn validate_schema(document: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(DOCUMENT_SCHEMA).context("parse bundled document schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(document) {
        let messages = compiled
            .iter_errors(document)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "document schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

fn validate_document_invariants(instances: &InstancesMap) -> Result<()> {
    let errors = validate_instances(instances);
    if errors.is_empty() {
        return Ok(());
    }
    Err(anyhow!("document invariants failed: {}", errors.join("; ")))
}

/// Assessment store backed by one JSON document.
#[derive(Debug, Clone)]
pub struct AssessmentStore {
    path: PathBuf,
}

impl AssessmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AssessmentDocument> {
        load_document(&self.path)
    }

    fn update_instances(
        &self,
        action: &str,
        apply: impl FnOnce(&mut InstancesMap) -> StateUpdateSummary,
    ) -> Result<StateUpdateSummary> {
        let mut document = self.load()?;
        let Some(instances) = document.instances.as_mut() else {
            bail!("{}: instances are still loading", action);
        };
        let summary = apply(instances);
        if summary.is_empty() {
            debug!(action, "no instance changed");
            return Ok(summary);
        }
        write_document(&self.path, &document)?;
        info!(action, changed = ?summary.changed, "applied instance update");
        Ok(summary)
    }
}

impl InstanceTableHandler for AssessmentStore {
    fn change_visualization_state(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        enabled: bool,
    ) -> Result<()> {
        debug!(test = %test_type, step, instance = instance_key, enabled, "change visualization state");
        self.update_instances("change visualization state", |instances| {
            set_visualization_state(instances, step, instance_key, enabled)
        })?;
        Ok(())
    }

    fn change_visualization_state_for_all(
        &self,
        test_type: TestType,
        step: &str,
        enabled: bool,
    ) -> Result<()> {
        debug!(test = %test_type, step, enabled, "change visualization state for all");
        self.update_instances("change visualization state for all", |instances| {
            set_visualization_state_for_all(instances, step, enabled)
        })?;
        Ok(())
    }

    fn pass_unmarked_instances(&self, test_type: TestType, step: &str) -> Result<()> {
        debug!(test = %test_type, step, "pass unmarked instances");
        self.update_instances("pass unmarked instances", |instances| {
            pass_unmarked_instances(instances, step)
        })?;
        Ok(())
    }

    fn change_instance_status(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        status: ManualTestStatus,
    ) -> Result<()> {
        debug!(test = %test_type, step, instance = instance_key, status = status.label(), "change instance status");
        self.update_instances("change instance status", |instances| {
            set_instance_status(instances, step, instance_key, status)
        })?;
        Ok(())
    }

    fn edit_failure_summary(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
        failure_summary: Option<&str>,
    ) -> Result<()> {
        debug!(test = %test_type, step, instance = instance_key, "edit failure summary");
        self.update_instances("edit failure summary", |instances| {
            set_failure_summary(instances, step, instance_key, failure_summary)
        })?;
        Ok(())
    }

    fn remove_captured_instance(
        &self,
        test_type: TestType,
        step: &str,
        instance_key: &str,
    ) -> Result<()> {
        debug!(test = %test_type, step, instance = instance_key, "remove captured instance");
        self.update_instances("remove captured instance", |instances| {
            remove_captured_instance(instances, step, instance_key)
        })?;
        Ok(())
    }

    fn update_focused_target(&self, target: &[String]) -> Result<()> {
        let mut document = self.load()?;
        document.focused_target = Some(target.to_vec());
        write_document(&self.path, &document)?;
        info!(target = ?target, "updated focused target");
        Ok(())
    }
}
