//! Render requests: world name in, PNG path out

use crate::config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use worldshot_core::{CatalogError, ItemCatalog, World, WorldError, WorldStore};
use worldshot_render::{AtlasGate, Clock, Compositor, SystemClock, TextRenderer};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("Failed to load item table: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads, composites and saves worlds against a shared catalog and atlas
pub struct RenderService {
    config: Config,
    store: WorldStore,
    catalog: ItemCatalog,
    gate: Arc<AtlasGate>,
    font: Option<TextRenderer>,
    clock: Box<dyn Clock>,
}

impl RenderService {
    pub fn new(config: Config, catalog: ItemCatalog, gate: Arc<AtlasGate>) -> Self {
        Self {
            store: WorldStore::new(config.world_path.clone()),
            config,
            catalog,
            gate,
            font: None,
            clock: Box::new(SystemClock),
        }
    }

    /// Build from configuration, loading the item table and the font
    ///
    /// A font that fails to load is logged and text is left out of renders.
    pub fn from_config(config: Config, gate: Arc<AtlasGate>) -> Result<Self, ServiceError> {
        let catalog = ItemCatalog::load(&config.items_path)?;
        let font = match TextRenderer::load(&config.font_path) {
            Ok(font) => Some(font),
            Err(e) => {
                warn!("Font {} unavailable: {}", config.font_path.display(), e);
                None
            }
        };
        Ok(Self::new(config, catalog, gate).with_font(font))
    }

    pub fn with_font(mut self, font: Option<TextRenderer>) -> Self {
        self.font = font;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Render a stored world and return the written PNG path
    ///
    /// Blocks until the sprite atlas is available.
    pub fn render(&self, name: &str) -> Result<PathBuf, ServiceError> {
        if !self.store.contains(name) {
            return Err(WorldError::NotFound(name.to_string()).into());
        }
        let world = self.store.load(name, &self.catalog)?;
        self.render_world(&world)
    }

    /// Render an in-memory world and return the written PNG path
    pub fn render_world(&self, world: &World) -> Result<PathBuf, ServiceError> {
        let start = Instant::now();
        let atlas = self.gate.wait();

        let image = Compositor::new(&self.catalog, &atlas, &*self.clock)
            .with_font(self.font.as_ref())
            .with_settings(self.config.render_settings())
            .render(world);

        std::fs::create_dir_all(&self.config.results_path)?;
        let path = self.config.result_path(&world.name);
        image.save(&path).map_err(|source| ServiceError::Save {
            path: path.clone(),
            source,
        })?;

        info!(
            "Rendered '{}' in {} ms -> {}",
            world.name,
            start.elapsed().as_millis(),
            path.display()
        );
        Ok(path)
    }
}
