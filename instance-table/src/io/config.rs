//! Table configuration stored as TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::columns::ColumnLayout;
use crate::render::{AssessmentDefaultMessageGenerator, TextListRenderer};
use crate::view::ViewSettings;

/// Instance table configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the layout and
/// labels of the assessment details view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    /// Label shown while the store has no instances yet.
    pub loading_label: String,

    /// Label of the bulk action resolving unmarked instances.
    pub pass_unmarked_label: String,

    /// Message shown when the selected step has no instances.
    pub no_matching_message: String,

    pub columns: ColumnsConfig,

    pub text: TextConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Fixed width of the visual-helper toggle column.
    pub visual_helper_width: u16,
    pub description_min_width: u16,
    pub description_max_width: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TextConfig {
    /// Width hint units per rendered character.
    pub px_per_char: u16,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        let layout = ColumnLayout::default();
        Self {
            visual_helper_width: layout.visual_helper_width,
            description_min_width: layout.description_min_width,
            description_max_width: layout.description_max_width,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            px_per_char: TextListRenderer::default().px_per_char,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        let settings = ViewSettings::default();
        Self {
            loading_label: settings.loading_label,
            pass_unmarked_label: settings.pass_unmarked_label,
            no_matching_message: AssessmentDefaultMessageGenerator::default().no_matching_message,
            columns: ColumnsConfig::default(),
            text: TextConfig::default(),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<()> {
        if self.loading_label.trim().is_empty() {
            return Err(anyhow!("loading_label must be non-empty"));
        }
        if self.pass_unmarked_label.trim().is_empty() {
            return Err(anyhow!("pass_unmarked_label must be non-empty"));
        }
        if self.columns.visual_helper_width == 0 {
            return Err(anyhow!("columns.visual_helper_width must be > 0"));
        }
        if self.columns.description_min_width > self.columns.description_max_width {
            return Err(anyhow!(
                "columns.description_min_width {} exceeds description_max_width {}",
                self.columns.description_min_width,
                self.columns.description_max_width
            ));
        }
        if self.text.px_per_char == 0 {
            return Err(anyhow!("text.px_per_char must be > 0"));
        }
        Ok(())
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            layout: ColumnLayout {
                visual_helper_width: self.columns.visual_helper_width,
                description_min_width: self.columns.description_min_width,
                description_max_width: self.columns.description_max_width,
            },
            loading_label: self.loading_label.clone(),
            pass_unmarked_label: self.pass_unmarked_label.clone(),
        }
    }

    pub fn message_generator(&self) -> AssessmentDefaultMessageGenerator {
        AssessmentDefaultMessageGenerator {
            no_matching_message: self.no_matching_message.clone(),
        }
    }

    pub fn text_renderer(&self) -> TextListRenderer {
        TextListRenderer {
            px_per_char: self.text.px_per_char,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TableConfig::default()`.
pub fn load_config(path: &Path) -> Result<TableConfig> {
    if !path.exists() {
        let cfg = TableConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TableConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &TableConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, TableConfig::default());
        assert_eq!(cfg.view_settings(), ViewSettings::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        let mut cfg = TableConfig::default();
        cfg.loading_label = "Loading".to_string();
        cfg.columns.description_max_width = 320;
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[columns]\ndescription_min_width = 120\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.columns.description_min_width, 120);
        assert_eq!(cfg.columns.description_max_width, 400);
        assert_eq!(cfg.loading_label, "Scanning");
    }

    #[test]
    fn inverted_description_widths_are_rejected() {
        let mut cfg = TableConfig::default();
        cfg.columns.description_min_width = 500;
        let err = cfg.validate().expect_err("invalid");
        assert!(err.to_string().contains("description_min_width"));
    }
}
