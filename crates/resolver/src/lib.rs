//! # assetkey-resolver
//!
//! Resolves a key (optionally narrowed by labels) to a catalog location and
//! loads it, degrading through a fixed fallback chain when nothing matches:
//!
//! 1. requested labels miss → retry the key with the fallback label set
//! 2. fallback labels miss → retry by key alone
//! 3. key alone misses → the asset does not exist
//!
//! Progress is reported either through a callback or as a stream of
//! [`LoadEvent`]s.
//!
//! ```no_run
//! use assetkey_core::service::{Asset, AssetLoader, Catalog};
//! use assetkey_core::KeyLabels;
//! use assetkey_resolver::AssetResolver;
//! use std::sync::Arc;
//!
//! async fn load<A: Asset>(
//!     catalog: Arc<dyn Catalog>,
//!     loader: Arc<dyn AssetLoader<A>>,
//! ) -> anyhow::Result<()> {
//!     let resolver = AssetResolver::new(catalog, loader);
//!     resolver
//!         .load_asset(KeyLabels::new("Sphere", ["help", "ua"]), true, |op| {
//!             if op.is_done() {
//!                 println!("{} ready", op.debug_name());
//!             } else {
//!                 println!("{}: {:.0}%", op.debug_name(), op.percent_complete() * 100.0);
//!             }
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod fallback;
pub mod locator;
pub mod orchestrator;
mod stream;

use anyhow::Result;
use assetkey_core::manifest::ResolverConfig;
use assetkey_core::protocol::LoadOutcome;
use assetkey_core::service::{Asset, AssetLoader, Catalog, LoadOperation};
use assetkey_core::{KeyLabels, ResourceLocation};
use fallback::Fallback;
use orchestrator::Step;
use std::sync::Arc;

pub use assetkey_core::protocol::{LoadEvent, LoadProgress};

pub(crate) enum Resolved<A> {
    Loaded {
        asset: A,
        descriptor: KeyLabels,
        location: ResourceLocation,
        candidates: usize,
    },
    NotFound(KeyLabels),
}

/// Entry point for loading assets of type `A`.
///
/// Cloning is cheap; clones share the catalog, the loader and the fallback
/// label set, which is fixed at construction.
#[derive(Clone)]
pub struct AssetResolver<A: Asset> {
    catalog: Arc<dyn Catalog>,
    loader: Arc<dyn AssetLoader<A>>,
    fallback_labels: Arc<[String]>,
}

impl<A: Asset> AssetResolver<A> {
    pub fn new(catalog: Arc<dyn Catalog>, loader: Arc<dyn AssetLoader<A>>) -> Self {
        Self::with_config(catalog, loader, &ResolverConfig::default())
    }

    pub fn with_config(
        catalog: Arc<dyn Catalog>,
        loader: Arc<dyn AssetLoader<A>>,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            catalog,
            loader,
            fallback_labels: config.fallback_labels.clone().into(),
        }
    }

    pub fn fallback_labels(&self) -> &[String] {
        &self.fallback_labels
    }

    /// Resolve `descriptor` and load it.
    ///
    /// `callback` receives the operation on every poll while
    /// `track_progress` is set, and exactly once after it completes in every
    /// case. Catalog and loader failures are returned unchanged; an
    /// exhausted fallback chain is `Ok(LoadOutcome::NotFound)`.
    pub async fn load_asset<F>(
        &self,
        descriptor: KeyLabels,
        track_progress: bool,
        mut callback: F,
    ) -> Result<LoadOutcome>
    where
        F: FnMut(&dyn LoadOperation<A>) + Send,
    {
        let resolved = self
            .run(descriptor, track_progress, |step| match step {
                Step::Progress(operation) | Step::Done(operation) => callback(operation),
                _ => {}
            })
            .await?;

        Ok(match resolved {
            Resolved::Loaded {
                descriptor,
                location,
                candidates,
                ..
            } => LoadOutcome::Loaded {
                descriptor,
                location,
                candidates,
            },
            Resolved::NotFound(descriptor) => LoadOutcome::NotFound(descriptor),
        })
    }

    /// Hand `asset` back to the loader. Must be called at most once per
    /// loaded value.
    pub fn release(&self, asset: A) {
        log::debug!("Releasing {} asset", A::type_name());
        self.loader.release(asset);
    }

    pub(crate) async fn run<F>(
        &self,
        descriptor: KeyLabels,
        track_progress: bool,
        mut observe: F,
    ) -> Result<Resolved<A>>
    where
        F: FnMut(Step<'_, A>) + Send,
    {
        let asset_type = A::type_name();
        let mut current = descriptor;

        loop {
            observe(Step::Attempt(&current));

            self.catalog.initialize().await?;
            let locations = locator::locate(self.catalog.as_ref(), &current, asset_type).await?;

            if locations.is_empty() {
                log::warn!("Requested asset ({}) was not found.", current);

                let next = match fallback::next_attempt(&current, &self.fallback_labels) {
                    Fallback::Exhausted => {
                        log::error!(
                            "Asset \"{}\" of type {} does not exist in the catalog",
                            current.key,
                            asset_type
                        );
                        return Ok(Resolved::NotFound(current));
                    }
                    Fallback::KeyOnly(next) => {
                        log::warn!(
                            "Requested asset ({}) with fallback labels was not found. Trying to load asset only by key ({}).",
                            current,
                            next
                        );
                        next
                    }
                    Fallback::FallbackLabels(next) => {
                        log::warn!(
                            "Requested asset ({}) was not found. Trying to load asset with fallback labels ({}).",
                            current,
                            next
                        );
                        next
                    }
                };

                observe(Step::Fallback {
                    from: &current,
                    to: &next,
                });
                current = next;
                continue;
            }

            let (asset, location) = orchestrator::load_location(
                self.catalog.as_ref(),
                self.loader.as_ref(),
                &current,
                &locations,
                track_progress,
                &mut observe,
            )
            .await?;

            return Ok(Resolved::Loaded {
                asset,
                descriptor: current,
                location,
                candidates: locations.len(),
            });
        }
    }
}
