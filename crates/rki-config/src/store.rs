//! Store settings.

use rki_core::enums::BulkMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Commit policy for config-driven corpus loads. Has no default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_mode: Option<BulkMode>,
}
