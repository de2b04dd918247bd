use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod config;
mod run;

use config::{TesselConfig, load_config};
use run::{RunResult, VoxelOptions, export_obj, run_grammar, run_voxel};

#[derive(Parser, Debug)]
#[command(name = "tessel")]
#[command(about = "Procedural polygon meshes from voxel fields and shape grammars")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the boundary surface of a thresholded scalar field
    Voxel {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the mesh as OBJ with vertex colors
        #[arg(long)]
        obj: Option<PathBuf>,

        /// Extract z-slabs on the rayon pool
        #[arg(long)]
        parallel: bool,

        /// Weld coincident vertices and report topology
        #[arg(long)]
        weld: bool,
    },

    /// Grow a tagged building mass from a single ground quad
    Grammar {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the mesh as OBJ with vertex colors
        #[arg(long)]
        obj: Option<PathBuf>,

        /// Overrides the config seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn config_or_default(path: Option<&PathBuf>) -> RunResult<TesselConfig> {
    match path {
        Some(p) => Ok(load_config(p)?),
        None => Ok(TesselConfig::default()),
    }
}

fn run(cli: Cli) -> RunResult<()> {
    match cli.command {
        Command::Voxel { config, obj, parallel, weld } => {
            let cfg = config_or_default(config.as_ref())?;
            let mesh = run_voxel(&cfg.voxel, cfg.seed, VoxelOptions { parallel, weld })?;
            if let Some(path) = obj {
                export_obj(&mesh, &path)?;
            }
        }
        Command::Grammar { config, obj, seed } => {
            let cfg = config_or_default(config.as_ref())?;
            let seed = seed.unwrap_or(cfg.seed);
            log::info!("grammar run: root={} seed={} steps={}", cfg.grammar.root, seed, cfg.grammar.steps.len());
            let mesh = run_grammar(&cfg.grammar, seed)?;
            if let Some(path) = obj {
                export_obj(&mesh, &path)?;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
