use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    paginate::PageSize,
    schema::{ColumnBinding, MissingColumnPolicy, Registry},
};

/// Pipeline settings, loadable from YAML. Omitted keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Overrides the source name of the registry's date entry when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_column_name: Option<String>,
    pub registry: Registry,
    pub page_size: PageSize,
    pub day_first: bool,
    pub column_binding: ColumnBinding,
    pub date_column_policy: MissingColumnPolicy,
    pub other_columns_policy: MissingColumnPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_column_name: None,
            registry: Registry::default(),
            page_size: PageSize::default(),
            day_first: true,
            column_binding: ColumnBinding::ByName,
            date_column_policy: MissingColumnPolicy::Strict,
            other_columns_policy: MissingColumnPolicy::Lenient,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening config file {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing config YAML {path:?}"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_yaml::to_string(self).context("Serializing config YAML")?;
        fs::write(path, serialized).with_context(|| format!("Writing config file {path:?}"))
    }

    /// Registry with the configured date column name applied, if any.
    pub fn effective_registry(&self) -> Registry {
        match &self.date_column_name {
            Some(name) => self.registry.with_date_source(name),
            None => self.registry.clone(),
        }
    }
}
