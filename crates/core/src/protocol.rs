use crate::descriptor::KeyLabels;
use crate::location::ResourceLocation;
use crate::service::LoadOperation;
use serde::{Deserialize, Serialize};

/// Point-in-time view of a load operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProgress {
    pub debug_name: String,
    pub percent_complete: f32,
    pub is_done: bool,
}

impl LoadProgress {
    pub fn snapshot<A>(operation: &dyn LoadOperation<A>) -> Self {
        Self {
            debug_name: operation.debug_name().to_string(),
            percent_complete: operation.percent_complete(),
            is_done: operation.is_done(),
        }
    }
}

/// Terminal state of one logical load request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadOutcome {
    Loaded {
        /// Descriptor of the attempt that resolved, after any fallback.
        descriptor: KeyLabels,
        location: ResourceLocation,
        /// Number of locations the attempt found; the first one was used.
        candidates: usize,
    },
    /// The fallback chain ran out; carries the last descriptor tried.
    NotFound(KeyLabels),
}

#[derive(Debug, Clone)]
pub enum LoadEvent<A> {
    /// An attempt is starting for this descriptor
    Started(KeyLabels),
    /// Nothing matched `from`; the next attempt uses `to`
    Fallback { from: KeyLabels, to: KeyLabels },
    /// Several locations matched; the first one is loaded
    Ambiguous(Vec<ResourceLocation>),
    /// Dependencies of this size (bytes) are fetched by the load
    DownloadPending { key: String, bytes: u64 },
    /// Intermediate progress, only when tracking was requested
    Progress(LoadProgress),
    /// The asset is ready
    Complete { asset: A, location: ResourceLocation },
    /// The fallback chain is exhausted
    NotFound(KeyLabels),
    /// Catalog or loader failure
    Error(String),
}

impl<A> LoadEvent<A> {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoadEvent::Complete { .. } | LoadEvent::NotFound(_) | LoadEvent::Error(_)
        )
    }
}
