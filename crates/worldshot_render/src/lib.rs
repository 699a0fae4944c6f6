//! Raster compositor for worldshot
//!
//! Turns a [`World`](worldshot_core::World) snapshot into a 3200x1920 RGBA
//! image using a shared [`SpriteAtlas`] and the autotile resolvers.
//!
//! # Features
//! - Layered compositing with drop shadows, tints and flag overlays
//! - Single reusable scratch buffer for per-cell effects
//! - Atlas readiness gate for renders that arrive before startup finishes
//! - Injectable clock for the animated rainbow tint
//!
//! # Example
//!
//! ```rust,ignore
//! use worldshot_render::{Compositor, FixedClock, SpriteAtlas};
//!
//! let atlas = SpriteAtlas::load_dir(Path::new("cache"))?;
//! let clock = FixedClock(0.0);
//! let image = Compositor::new(&catalog, &atlas, &clock).render(&world);
//! image.save("results/START.png")?;
//! ```

pub mod atlas;
pub mod blend;
pub mod clock;
pub mod compositor;
pub mod surface;
pub mod text;

pub use atlas::{load_sprite, AtlasError, AtlasGate, SpriteAtlas};
pub use blend::{blend_color, tint_pixel, Scratch, Tint, OVERLAY_ALPHA, SHADOW_OPACITY};
pub use clock::{Clock, FixedClock, SystemClock};
pub use compositor::{cell_origin, stack_column, Compositor, RenderSettings};
pub use surface::{source_over, Canvas, SpriteRect, CANVAS_HEIGHT, CANVAS_WIDTH, TILE_SIZE};
pub use text::{TextError, TextRenderer};

pub use worldshot_autotile;
pub use worldshot_core;
