#![allow(dead_code)]

use anyhow::{anyhow, Result};
use assetkey_catalog::{CatalogEntry, CatalogRegistry, Prefab, SimulatedAsset};
use assetkey_core::service::{AssetLoader, Catalog, LoadOperation, LocationQuery};
use assetkey_core::ResourceLocation;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn entry(key: &str, labels: &[&str], internal_id: &str) -> CatalogEntry {
    CatalogEntry {
        key: key.to_string(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        asset_type: "Prefab".to_string(),
        internal_id: internal_id.to_string(),
        download_size: 0,
    }
}

/// Wraps an in-memory registry and records every call in order.
pub struct RecordingCatalog {
    inner: CatalogRegistry,
    calls: Mutex<Vec<String>>,
    fail_queries: bool,
}

impl RecordingCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Arc<Self> {
        Arc::new(Self {
            inner: CatalogRegistry::from_entries(entries),
            calls: Mutex::new(Vec::new()),
            fail_queries: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            inner: CatalogRegistry::from_entries(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_queries: true,
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the location queries, e.g. `key:Cube` or `labels:help,ua`.
    pub fn queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("key:") || c.starts_with("labels:"))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Catalog for RecordingCatalog {
    async fn initialize(&self) -> Result<()> {
        self.record("initialize".to_string());
        self.inner.initialize().await
    }

    async fn locations(
        &self,
        query: LocationQuery<'_>,
        asset_type: &str,
    ) -> Result<Vec<ResourceLocation>> {
        match query {
            LocationQuery::Key(key) => self.record(format!("key:{}", key)),
            LocationQuery::Labels { labels, .. } => {
                self.record(format!("labels:{}", labels.join(",")))
            }
        }
        if self.fail_queries {
            return Err(anyhow!("catalog backend unavailable"));
        }
        self.inner.locations(query, asset_type).await
    }

    async fn download_size(&self, location: &ResourceLocation) -> Result<u64> {
        self.record(format!("download_size:{}", location.internal_id));
        self.inner.download_size(location).await
    }
}

/// Reports `pending` unfinished polls, then completes.
pub struct CountdownOperation {
    name: String,
    total: usize,
    remaining: AtomicUsize,
    done: AtomicBool,
    asset: Option<Prefab>,
}

impl LoadOperation<Prefab> for CountdownOperation {
    fn is_done(&self) -> bool {
        if self.done.load(Ordering::SeqCst) {
            return true;
        }
        if self.remaining.load(Ordering::SeqCst) == 0 {
            self.done.store(true, Ordering::SeqCst);
            return true;
        }
        self.remaining.fetch_sub(1, Ordering::SeqCst);
        false
    }

    fn percent_complete(&self) -> f32 {
        if self.done.load(Ordering::SeqCst) {
            return 1.0;
        }
        let polled = self.total - self.remaining.load(Ordering::SeqCst);
        polled as f32 / (self.total + 1) as f32
    }

    fn result(&self) -> Option<Prefab> {
        if self.done.load(Ordering::SeqCst) {
            self.asset.clone()
        } else {
            None
        }
    }

    fn debug_name(&self) -> &str {
        &self.name
    }
}

/// Loader whose operations finish after a fixed number of polls.
pub struct ScriptedLoader {
    pending: usize,
    yields_nothing: bool,
    loaded: Mutex<Vec<String>>,
    released: Mutex<Vec<String>>,
}

impl ScriptedLoader {
    pub fn new(pending: usize) -> Arc<Self> {
        Arc::new(Self {
            pending,
            yields_nothing: false,
            loaded: Mutex::new(Vec::new()),
            released: Mutex::new(Vec::new()),
        })
    }

    /// Operations complete without producing an asset.
    pub fn empty_handed() -> Arc<Self> {
        Arc::new(Self {
            pending: 0,
            yields_nothing: true,
            loaded: Mutex::new(Vec::new()),
            released: Mutex::new(Vec::new()),
        })
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn released(&self) -> Vec<String> {
        self.released.lock().unwrap().clone()
    }
}

impl AssetLoader<Prefab> for ScriptedLoader {
    fn load(&self, location: &ResourceLocation) -> Result<Box<dyn LoadOperation<Prefab>>> {
        self.loaded.lock().unwrap().push(location.internal_id.clone());
        Ok(Box::new(CountdownOperation {
            name: location.internal_id.clone(),
            total: self.pending,
            remaining: AtomicUsize::new(self.pending),
            done: AtomicBool::new(false),
            asset: if self.yields_nothing {
                None
            } else {
                Some(Prefab::from_location(location))
            },
        }))
    }

    fn release(&self, asset: Prefab) {
        self.released.lock().unwrap().push(asset.internal_id);
    }
}
