use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete, loadable catalog entry resolved from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLocation {
    /// Catalog-assigned key of the entry.
    pub primary_key: String,
    /// Opaque identifier, only used for diagnostics.
    pub internal_id: String,
    pub asset_type: String,
}

impl ResourceLocation {
    pub fn new(
        primary_key: impl Into<String>,
        internal_id: impl Into<String>,
        asset_type: impl Into<String>,
    ) -> Self {
        Self {
            primary_key: primary_key.into(),
            internal_id: internal_id.into(),
            asset_type: asset_type.into(),
        }
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.primary_key, self.internal_id)
    }
}
