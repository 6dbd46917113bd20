use anyhow::{Result, anyhow};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Tile-grid snake with wraparound edges")]
struct Cli {
    /// JSON file with game settings; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in logical units
    #[arg(long)]
    width: Option<u32>,

    /// Board height in logical units
    #[arg(long)]
    height: Option<u32>,

    /// Tile edge length in logical units
    #[arg(long)]
    tile_size: Option<u32>,

    /// Seed for food placement, for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.board_width = width;
        }
        if let Some(height) = self.height {
            config.board_height = height;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }

        config
            .validate()
            .map_err(|e| anyhow!("Invalid game configuration: {e}"))?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = cli.game_config()?;
    info!("starting with {:?}", config);

    let mut human_mode = HumanMode::new(config, cli.seed);
    human_mode.run().await?;

    Ok(())
}
