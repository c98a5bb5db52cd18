//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use cybermatrix_core::PartialSettings;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Matrix rain and a reactive particle network for your terminal",
    long_about = None
)]
pub struct Cli {
    /// Config file to load instead of the default location.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the resolved settings as TOML and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Disable the matrix rain.
    #[arg(long)]
    pub no_rain: bool,

    /// Disable the background grid.
    #[arg(long)]
    pub no_grid: bool,

    /// Disable lines between neighboring particles.
    #[arg(long)]
    pub no_connections: bool,

    /// Particle grid spacing in virtual pixels (a cell is 10x15).
    #[arg(long, value_name = "PX")]
    pub particle_distance: Option<f32>,

    /// Target frames per second.
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Write logs to this file. Filter with RUST_LOG.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Settings given on the command line, layered over the config file.
    pub fn overrides(&self) -> PartialSettings {
        PartialSettings {
            show_matrix_rain: self.no_rain.then_some(false),
            show_grid: self.no_grid.then_some(false),
            show_connections: self.no_connections.then_some(false),
            particle_distance: self.particle_distance,
            ..Default::default()
        }
    }
}
