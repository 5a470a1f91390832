//! # assetkey-catalog
//!
//! **A file-backed resource catalog and a simulated loader.**
//!
//! These are the services `assetkey-resolver` drives. They are usable on
//! their own or as a reference for wiring a real asset backend.
//!
//! - **Layered Catalog**: built-in entries, `<config>/catalog.toml` and a
//!   runtime `<cache>/registry.toml`, each entry addressed by key and labels.
//! - **Label Queries**: key lookups plus `UseFirst`, `Union` and
//!   `Intersection` label queries, filtered by asset type.
//! - **Simulated Loads**: operations that finish over timed steps, with
//!   per-location reference counts released through the loader.
//!
//! ```no_run
//! use assetkey_catalog::{CatalogRegistry, Prefab, SimulatedLoader};
//! use assetkey_core::service::{Catalog, LocationQuery};
//!
//! #[async_std::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = CatalogRegistry::new()?;
//!     catalog.initialize().await?;
//!
//!     let cubes = catalog.locations(LocationQuery::Key("Cube"), "Prefab").await?;
//!     println!("{} cube(s) in the catalog", cubes.len());
//!
//!     let _loader = SimulatedLoader::<Prefab>::default();
//!     Ok(())
//! }
//! ```

/// Simulated asset loading with reference counting.
pub mod loader;

/// The layered TOML catalog.
pub mod registry;

pub use loader::{Prefab, SimulatedAsset, SimulatedLoader};
pub use registry::{CatalogEntry, CatalogRegistry};
