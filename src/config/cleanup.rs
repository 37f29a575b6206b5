use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for the `cleanup-assignments` maintenance program.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct CleanupConfig {
    /// Collection whose documents are all deleted.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Page size used while listing the collection.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound on deletes in flight. Unset means all at once.
    #[serde(default)]
    pub max_concurrent_deletes: Option<usize>,
}

fn default_collection() -> String {
    "assignments".to_string()
}

fn default_page_size() -> u32 {
    300
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            page_size: default_page_size(),
            max_concurrent_deletes: None,
        }
    }
}
