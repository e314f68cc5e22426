use serde::{Deserialize, Serialize};

/// Construction and feed-handling options for a [`crate::HardwareSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryOptions {
    /// hwtype whose rank order jobs and location lists are encoded against
    pub compute_type: String,
    /// hwtypes that start out Missing until the first state feed arrives, all others start Active
    pub initially_missing_types: Vec<String>,
    /// sort each definition's content by name before insertion, matching the backend's rank numbering
    pub sort_content: bool,
    /// synthesize random rankspecs for jobs whose node list resolves to nothing.  demo data only.
    pub demo_rankspecs: bool,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            compute_type: "compute-node".to_string(),
            initially_missing_types: vec!["compute-node".to_string(), "service-node".to_string()],
            sort_content: true,
            demo_rankspecs: false,
        }
    }
}

impl InventoryOptions {
    pub fn is_initially_missing(&self, hwtype: &str) -> bool {
        self.initially_missing_types
            .iter()
            .any(|candidate| candidate == hwtype)
    }
}
