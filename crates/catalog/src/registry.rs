use anyhow::{Context, Result};
use assetkey_core::manifest::AssetDirs;
use assetkey_core::service::{Catalog, LocationQuery, MergeMode};
use assetkey_core::{AssetError, ResourceLocation};
use async_std::sync::RwLock;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_ENTRIES: &str = include_str!("catalog.toml");

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub asset_type: String,
    pub internal_id: String,
    /// Bytes still to fetch before the entry can load.
    #[serde(default)]
    pub download_size: u64,
}

impl CatalogEntry {
    fn location(&self) -> ResourceLocation {
        ResourceLocation::new(&self.key, &self.internal_id, &self.asset_type)
    }

    fn matches(&self, query: LocationQuery<'_>) -> bool {
        match query {
            LocationQuery::Key(key) => self.key == key,
            LocationQuery::Labels { labels, mode } => {
                if labels.is_empty() {
                    return false;
                }
                match mode {
                    MergeMode::UseFirst => self.labels.contains(&labels[0]),
                    MergeMode::Union => labels.iter().any(|label| self.labels.contains(label)),
                    MergeMode::Intersection => {
                        labels.iter().all(|label| self.labels.contains(label))
                    }
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    loaded: bool,
    list: Vec<CatalogEntry>,
}

impl Entries {
    /// Replaces an entry with the same internal id in place, or appends.
    fn upsert(&mut self, entry: CatalogEntry) {
        if let Some(pos) = self
            .list
            .iter()
            .position(|e| e.internal_id == entry.internal_id)
        {
            self.list[pos] = entry;
        } else {
            self.list.push(entry);
        }
    }
}

/// Catalog layered from TOML files.
///
/// Layers, later ones replacing earlier entries with the same internal id:
/// built-in defaults, `<config>/catalog.toml`, `<cache>/registry.toml`.
/// Files are read on the first `initialize`.
pub struct CatalogRegistry {
    dirs: Option<AssetDirs>,
    entries: RwLock<Entries>,
}

impl CatalogRegistry {
    /// Registry over the directories resolved from the environment.
    pub fn new() -> Result<Self> {
        Ok(Self::with_dirs(AssetDirs::resolve()?))
    }

    pub fn with_dirs(dirs: AssetDirs) -> Self {
        Self {
            dirs: Some(dirs),
            entries: RwLock::new(Entries::default()),
        }
    }

    /// In-memory registry holding exactly `entries`. Nothing is read from or
    /// written to disk.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut state = Entries {
            loaded: true,
            list: Vec::new(),
        };
        for entry in entries {
            state.upsert(entry);
        }
        Self {
            dirs: None,
            entries: RwLock::new(state),
        }
    }

    fn load_layers(dirs: &AssetDirs, state: &mut Entries) -> Result<()> {
        let defaults: RegistryFile =
            toml::from_str(DEFAULT_ENTRIES).context("Built-in catalog is malformed")?;
        for entry in defaults.entries {
            state.upsert(entry);
        }

        for path in [
            dirs.config_dir.join("catalog.toml"),
            dirs.cache_dir.join("registry.toml"),
        ] {
            for entry in read_registry(&path)?.entries {
                state.upsert(entry);
            }
        }

        log::debug!("Catalog initialized with {} entries", state.list.len());
        Ok(())
    }

    /// Add or replace an entry and persist it to `<cache>/registry.toml`.
    pub async fn record_entry(&self, entry: CatalogEntry) -> Result<()> {
        self.initialize().await?;

        if let Some(dirs) = &self.dirs {
            let registry_path = dirs.cache_dir.join("registry.toml");

            // A registry we cannot parse is left untouched
            let mut persisted = Entries {
                loaded: true,
                list: read_registry(&registry_path)?.entries,
            };
            persisted.upsert(entry.clone());

            let new_content = toml::to_string(&RegistryFile {
                entries: persisted.list,
            })?;
            fs::create_dir_all(&dirs.cache_dir)?;
            fs::write(&registry_path, new_content)
                .with_context(|| format!("Failed to write {}", registry_path.display()))?;
        }

        self.entries.write().await.upsert(entry);
        Ok(())
    }

    pub async fn entries(&self) -> Vec<CatalogEntry> {
        self.entries.read().await.list.clone()
    }
}

fn read_registry(path: &Path) -> Result<RegistryFile> {
    if !path.exists() {
        return Ok(RegistryFile::default());
    }
    let content = fs::read_to_string(path)?;
    let parsed = toml::from_str(&content)
        .map_err(AssetError::from)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(parsed)
}

#[async_trait]
impl Catalog for CatalogRegistry {
    async fn initialize(&self) -> Result<()> {
        if self.entries.read().await.loaded {
            return Ok(());
        }

        let mut state = self.entries.write().await;
        // Another task may have won the race for the write lock
        if state.loaded {
            return Ok(());
        }
        if let Some(dirs) = &self.dirs {
            Self::load_layers(dirs, &mut state)?;
        }
        state.loaded = true;
        Ok(())
    }

    async fn locations(
        &self,
        query: LocationQuery<'_>,
        asset_type: &str,
    ) -> Result<Vec<ResourceLocation>> {
        let state = self.entries.read().await;
        if !state.loaded {
            return Err(AssetError::CatalogError("Catalog is not initialized".to_string()).into());
        }

        Ok(state
            .list
            .iter()
            .filter(|entry| entry.asset_type == asset_type && entry.matches(query))
            .map(CatalogEntry::location)
            .collect())
    }

    async fn download_size(&self, location: &ResourceLocation) -> Result<u64> {
        let state = self.entries.read().await;
        state
            .list
            .iter()
            .find(|entry| entry.internal_id == location.internal_id)
            .map(|entry| entry.download_size)
            .ok_or_else(|| {
                AssetError::CatalogError(format!("Unknown location {}", location.internal_id))
                    .into()
            })
    }
}
