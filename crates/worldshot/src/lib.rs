//! # worldshot
//!
//! Renders tile-grid world snapshots into single PNG images.
//!
//! This crate bundles:
//! - [`worldshot_core`] - world grid, dropped objects, item catalog and loader
//! - [`worldshot_autotile`] - neighbor-bitmask autotile offset resolution
//! - [`worldshot_render`] - sprite atlas, drawing surface and layered compositor
//!
//! plus the [`RenderService`] that ties them to a [`Config`] and the
//! `worldshot` command line tool.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use worldshot::prelude::*;
//!
//! let config = Config::load(Path::new("worldshot.toml"))?;
//! let gate = Arc::new(AtlasGate::ready(SpriteAtlas::load_dir(&config.atlas_path)?));
//! let service = RenderService::from_config(config, gate)?;
//! let png = service.render("START")?;
//! ```

pub mod config;
pub mod service;

pub use worldshot_autotile;
pub use worldshot_core;
pub use worldshot_render;

pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use service::{RenderService, ServiceError};

/// Commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::service::{RenderService, ServiceError};
    pub use worldshot_core::{Block, DroppedObject, Item, ItemCatalog, Layer, World, WorldStore};
    pub use worldshot_render::{AtlasGate, Compositor, SpriteAtlas, SystemClock, TextRenderer};
}
