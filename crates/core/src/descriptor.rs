use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Addressing unit for a load request: a key plus an ordered set of labels.
///
/// An empty `labels` vector means "no labels". Both parts may be empty, in
/// which case the descriptor can never resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyLabels {
    pub key: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl KeyLabels {
    pub fn new<K, I, S>(key: K, labels: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn by_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            labels: Vec::new(),
        }
    }

    pub fn by_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(String::new(), labels)
    }

    pub fn has_labels(&self) -> bool {
        !self.labels.is_empty()
    }
}

impl fmt::Display for KeyLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.key.is_empty(), self.labels.is_empty()) {
            (true, true) => write!(f, "Key and labels are empty"),
            (true, false) => write!(f, "Label:{}", self.labels.join(",")),
            (false, true) => write!(f, "Key:{}", self.key),
            (false, false) => write!(f, "Key:{} Labels:{}", self.key, self.labels.join(",")),
        }
    }
}

/// Multiset comparison: true when every element occurs the same number of
/// times in both collections, regardless of order.
pub fn labels_match<T: Eq + Hash>(lhs: &[T], rhs: &[T]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut counts: HashMap<&T, usize> = HashMap::new();
    for item in lhs {
        *counts.entry(item).or_insert(0) += 1;
    }

    for item in rhs {
        match counts.get_mut(item) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    counts.remove(item);
                }
            }
            None => return false,
        }
    }

    counts.is_empty()
}
