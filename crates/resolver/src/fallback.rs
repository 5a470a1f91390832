use assetkey_core::descriptor::labels_match;
use assetkey_core::KeyLabels;

/// What to try after a descriptor resolved to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// No labels left to drop; the asset does not exist.
    Exhausted,
    /// The labels already were the fallback set; retry by key alone.
    KeyOnly(KeyLabels),
    /// Retry the same key with the fallback label set.
    FallbackLabels(KeyLabels),
}

impl Fallback {
    pub fn next_descriptor(&self) -> Option<&KeyLabels> {
        match self {
            Fallback::Exhausted => None,
            Fallback::KeyOnly(next) | Fallback::FallbackLabels(next) => Some(next),
        }
    }
}

/// Decide the next attempt for an unresolved descriptor.
///
/// The returned descriptor is fed through the whole decision again, so a
/// key-only retry that also misses ends in `Exhausted`.
pub fn next_attempt(descriptor: &KeyLabels, fallback_labels: &[String]) -> Fallback {
    if !descriptor.has_labels() {
        return Fallback::Exhausted;
    }

    if labels_match(&descriptor.labels, fallback_labels) {
        return Fallback::KeyOnly(KeyLabels::by_key(descriptor.key.clone()));
    }

    Fallback::FallbackLabels(KeyLabels::new(
        descriptor.key.clone(),
        fallback_labels.iter().cloned(),
    ))
}
