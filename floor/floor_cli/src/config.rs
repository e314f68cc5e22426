use std::path::Path;

use anyhow::Context;
use floorview::ViewPalette;
use inventory::{InventoryOptions, JobPalette};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything a viewer can be configured with, every section is optional.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ViewerConfig {
    pub(crate) options: InventoryOptions,
    pub(crate) palette: ViewPalette,
    pub(crate) job_palette: JobPalette,
}

impl ViewerConfig {
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let config = inventory::file::load(path)
            .with_context(|| format!("Error loading config. file: {}", path.display()))?;
        info!("Loaded config. file: {}", path.display());
        Ok(config)
    }
}
