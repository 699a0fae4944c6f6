//! Sprite atlas and its readiness gate
//!
//! The atlas maps sheet names (PNG file stems) to decoded images. It is
//! loaded once, published through an [`AtlasGate`], and shared read-only by
//! every render afterwards.

use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Sheet holding the "pickup box" stack icon
pub const PICKUP_BOX: &str = "pickup_box";
/// Liquid overlay sheet
pub const WATER: &str = "water";
/// Fire overlay sheet
pub const FIRE: &str = "fire";
/// 16x16 seed sprites, base row 0 and overlay row 1
pub const SEED: &str = "seed";

/// Errors raised while loading or querying the sprite atlas
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Sprite not found: {0}")]
    MissingSprite(String),
    #[error("Failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to walk atlas directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Named sprite sheets
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    sprites: HashMap<String, RgbaImage>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.png` below `root`, keyed by file stem
    ///
    /// Files that fail to decode are skipped with a warning. A later file
    /// with the same stem replaces an earlier one.
    pub fn load_dir(root: &Path) -> Result<Self, AtlasError> {
        let mut atlas = Self::new();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_png(entry.path()) {
                continue;
            }
            let Some(name) = entry.path().file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match load_sprite(entry.path()) {
                Ok(image) => {
                    debug!("Loaded sprite '{}' from {}", name, entry.path().display());
                    atlas.insert(name, image);
                }
                Err(e) => warn!("Skipping sprite: {}", e),
            }
        }

        info!("Loaded {} textures from {}", atlas.len(), root.display());
        Ok(atlas)
    }

    pub fn insert(&mut self, name: impl Into<String>, image: RgbaImage) {
        self.sprites.insert(name.into(), image);
    }

    /// Sheet by name; a name with an extension also matches its stem
    pub fn sprite(&self, name: &str) -> Result<&RgbaImage, AtlasError> {
        self.sprites
            .get(name)
            .or_else(|| {
                Path::new(name)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|stem| self.sprites.get(stem))
            })
            .ok_or_else(|| AtlasError::MissingSprite(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sprite(name).is_ok()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Decode one image file to RGBA
pub fn load_sprite(path: &Path) -> Result<RgbaImage, AtlasError> {
    let image = image::open(path).map_err(|source| AtlasError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// One-shot readiness signal for the shared atlas
///
/// Renders started before the atlas is published block in [`AtlasGate::wait`]
/// until it is, instead of failing.
#[derive(Debug, Default)]
pub struct AtlasGate {
    atlas: Mutex<Option<Arc<SpriteAtlas>>>,
    ready: Condvar,
}

impl AtlasGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gate that is already open
    pub fn ready(atlas: SpriteAtlas) -> Self {
        let gate = Self::new();
        gate.publish(atlas);
        gate
    }

    /// Make the atlas available and wake every waiting render
    pub fn publish(&self, atlas: SpriteAtlas) {
        let mut slot = self.atlas.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(atlas));
        self.ready.notify_all();
    }

    /// Block until the atlas has been published
    pub fn wait(&self) -> Arc<SpriteAtlas> {
        let mut slot = self.atlas.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            info!("Waiting for textures to load...");
        }
        loop {
            if let Some(atlas) = slot.as_ref() {
                return Arc::clone(atlas);
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// The atlas if it is already published
    pub fn try_get(&self) -> Option<Arc<SpriteAtlas>> {
        self.atlas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.try_get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_load_dir_walks_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("game").join("tiles");
        std::fs::create_dir_all(&nested).unwrap();

        RgbaImage::from_pixel(64, 32, Rgba([1, 2, 3, 255]))
            .save(nested.join("tiles_page1.png"))
            .unwrap();
        RgbaImage::new(16, 16)
            .save(tmp.path().join("seed.png"))
            .unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "not an image").unwrap();
        std::fs::write(tmp.path().join("broken.png"), "not a png").unwrap();

        let atlas = SpriteAtlas::load_dir(tmp.path()).unwrap();

        assert_eq!(atlas.len(), 2);
        assert_eq!(atlas.sprite("tiles_page1").unwrap().dimensions(), (64, 32));
        assert!(atlas.contains(SEED));
        assert!(!atlas.contains("broken"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(SpriteAtlas::load_dir(&tmp.path().join("nowhere")).is_err());
    }

    #[test]
    fn test_sprite_lookup() {
        let mut atlas = SpriteAtlas::new();
        atlas.insert("tiles_page1", RgbaImage::new(32, 32));

        assert!(atlas.sprite("tiles_page1").is_ok());
        assert!(atlas.sprite("tiles_page1.rttex").is_ok());
        assert!(matches!(
            atlas.sprite("tiles_page9"),
            Err(AtlasError::MissingSprite(name)) if name == "tiles_page9"
        ));
    }

    #[test]
    fn test_gate_blocks_until_published() {
        let gate = Arc::new(AtlasGate::new());
        assert!(!gate.is_ready());

        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait().len())
        };

        thread::sleep(Duration::from_millis(50));
        let mut atlas = SpriteAtlas::new();
        atlas.insert("water", RgbaImage::new(32, 32));
        gate.publish(atlas);

        assert_eq!(waiter.join().unwrap(), 1);
        assert!(gate.is_ready());
    }

    #[test]
    fn test_ready_gate_does_not_block() {
        let gate = AtlasGate::ready(SpriteAtlas::new());
        assert!(gate.wait().is_empty());
    }
}
