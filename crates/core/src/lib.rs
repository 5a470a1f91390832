//! Shared vocabulary for the assetkey workspace: descriptors, resolved
//! locations, load events, service traits and configuration.

pub mod descriptor;
pub mod location;
pub mod manifest;
pub mod protocol;
pub mod service;

pub use descriptor::KeyLabels;
pub use location::ResourceLocation;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Catalog error: {0}")]
    CatalogError(String),
    #[error("Load error: {0}")]
    LoadError(String),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
