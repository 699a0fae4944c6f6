//! worldshot command line tool
//!
//! Run with: worldshot render START
//! Log level follows RUST_LOG (default `info`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};
use worldshot::{Config, RenderService, DEFAULT_CONFIG_PATH};
use worldshot_core::World;
use worldshot_render::{AtlasGate, SpriteAtlas};

/// Render tile-grid worlds to PNG images
#[derive(Parser, Debug)]
#[command(name = "worldshot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render stored worlds by name
    Render {
        /// World names (case-insensitive)
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Render a freshly generated starter world
    Preview {
        /// Name used for the caption and output file
        name: String,

        /// Seed for the terrain generator
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let gate = Arc::new(AtlasGate::new());
    spawn_atlas_loader(config.atlas_path.clone(), Arc::clone(&gate));

    let service = RenderService::from_config(config, gate)
        .context("Failed to start render service")?;

    match cli.command {
        Commands::Render { names } => {
            let total = names.len();
            let mut failed = 0;
            for name in names {
                let name = name.to_uppercase();
                match service.render(&name) {
                    Ok(path) => println!("{}", path.display()),
                    Err(e) => {
                        error!("Render of '{}' failed: {}", name, e);
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} of {total} renders failed");
            }
        }
        Commands::Preview { name, seed } => {
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };
            let world = World::generate(name.to_uppercase(), &mut rng);
            let path = service
                .render_world(&world)
                .with_context(|| format!("Failed to render preview '{}'", world.name))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Load the atlas off the main thread and publish it through the gate
///
/// A failed load publishes an empty atlas so waiting renders still finish,
/// with every sprite reported missing.
fn spawn_atlas_loader(root: PathBuf, gate: Arc<AtlasGate>) {
    thread::spawn(move || {
        info!("Loading textures from {}...", root.display());
        match SpriteAtlas::load_dir(&root) {
            Ok(atlas) => gate.publish(atlas),
            Err(e) => {
                error!("Failed to load textures from {}: {}", root.display(), e);
                gate.publish(SpriteAtlas::new());
            }
        }
    });
}
