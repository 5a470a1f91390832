//! Narrow interfaces to the services the resolver drives but does not own.

use crate::location::ResourceLocation;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A value the loader can materialize.
///
/// Assets are handed out by value, so heavyweight payloads should be
/// wrapped in an `Arc`.
pub trait Asset: Clone + Send + Sync + 'static {
    /// Name the catalog uses to filter entries by type.
    fn type_name() -> &'static str;
}

/// How entries matching several labels are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeMode {
    /// Entries matching the first label only.
    UseFirst,
    /// Entries matching any label.
    Union,
    /// Entries matching every label.
    Intersection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationQuery<'a> {
    Key(&'a str),
    Labels {
        labels: &'a [String],
        mode: MergeMode,
    },
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Prepare the catalog. Called before every query; must be cheap once
    /// the catalog is ready.
    async fn initialize(&self) -> Result<()>;

    /// Entries matching `query` that provide `asset_type`, in catalog order.
    async fn locations(
        &self,
        query: LocationQuery<'_>,
        asset_type: &str,
    ) -> Result<Vec<ResourceLocation>>;

    /// Bytes that still have to be fetched before `location` can load.
    async fn download_size(&self, location: &ResourceLocation) -> Result<u64>;
}

/// An in-flight load owned by the loader. The resolver only observes it.
pub trait LoadOperation<A>: Send + Sync {
    /// Flips from false to true exactly once.
    fn is_done(&self) -> bool;

    /// Informational, in `[0, 1]`.
    fn percent_complete(&self) -> f32;

    /// Only meaningful once `is_done` returns true.
    fn result(&self) -> Option<A>;

    fn debug_name(&self) -> &str;
}

pub trait AssetLoader<A: Asset>: Send + Sync {
    /// Start loading `location`. Pending dependency downloads are fetched as
    /// part of the operation.
    fn load(&self, location: &ResourceLocation) -> Result<Box<dyn LoadOperation<A>>>;

    /// Return `asset` to the loader for reclamation. Releasing the same value
    /// twice is undefined.
    fn release(&self, asset: A);
}
