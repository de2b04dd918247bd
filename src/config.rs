use std::path::{Path, PathBuf};

use serde::Deserialize;
use tessel_grammar::FilterValue;
use tessel_mesh::Division;
use tessel_mesh::SplitDir;
use tessel_voxel::field::SINUSOID_FREQUENCY;

#[derive(Clone, Debug, Deserialize)]
pub struct TesselConfig {
    #[serde(default = "default_seed")] pub seed: u64,
    #[serde(default)] pub voxel: VoxelConfig,
    #[serde(default)] pub grammar: GrammarRunConfig,
}
fn default_seed() -> u64 { 1337 }
impl Default for TesselConfig {
    fn default() -> Self { Self { seed: default_seed(), voxel: VoxelConfig::default(), grammar: GrammarRunConfig::default() } }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind { Sinusoid, Noise }

#[derive(Clone, Debug, Deserialize)]
pub struct VoxelConfig {
    #[serde(default = "default_dim")] pub nx: usize,
    #[serde(default = "default_dim")] pub ny: usize,
    #[serde(default = "default_dim")] pub nz: usize,
    #[serde(default = "default_field")] pub field: FieldKind,
    /// Sinusoid frequency in radians across the whole grid.
    #[serde(default = "default_frequency")] pub frequency: f32,
    /// Noise frequency per cell.
    #[serde(default = "default_noise_frequency")] pub noise_frequency: f32,
    #[serde(default)] pub iso: f32,
    /// Forces the outer shell of the grid to void so the surface is closed.
    #[serde(default = "default_closed")] pub closed: bool,
    #[serde(default)] pub hue_min: f32,
    #[serde(default = "default_hue_max")] pub hue_max: f32,
}
fn default_dim() -> usize { 32 }
fn default_field() -> FieldKind { FieldKind::Sinusoid }
fn default_frequency() -> f32 { SINUSOID_FREQUENCY }
fn default_noise_frequency() -> f32 { 0.1 }
fn default_closed() -> bool { true }
fn default_hue_max() -> f32 { 0.66 }
impl Default for VoxelConfig {
    fn default() -> Self {
        Self {
            nx: default_dim(),
            ny: default_dim(),
            nz: default_dim(),
            field: default_field(),
            frequency: default_frequency(),
            noise_frequency: default_noise_frequency(),
            iso: 0.0,
            closed: default_closed(),
            hue_min: 0.0,
            hue_max: default_hue_max(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GrammarRunConfig {
    #[serde(default = "default_width")] pub width: f32,
    #[serde(default = "default_depth")] pub depth: f32,
    #[serde(default = "default_root")] pub root: String,
    /// Grammar table file; the built-in urban grammar when absent.
    #[serde(default)] pub rules: Option<PathBuf>,
    #[serde(default = "default_steps")] pub steps: Vec<StepConfig>,
}
fn default_width() -> f32 { 40.0 }
fn default_depth() -> f32 { 30.0 }
fn default_root() -> String { "plot".into() }
impl Default for GrammarRunConfig {
    fn default() -> Self {
        Self { width: default_width(), depth: default_depth(), root: default_root(), rules: None, steps: default_steps() }
    }
}

/// One generation: faces tagged `rule` that pass `filter` are divided with probability `ratio`.
#[derive(Clone, Debug, Deserialize)]
pub struct StepConfig {
    pub rule: String,
    /// Defaults to `group == rule`.
    #[serde(default)] pub filter: Option<FilterConfig>,
    #[serde(default = "default_ratio")] pub ratio: f64,
    pub division: Division,
}
fn default_ratio() -> f64 { 1.0 }

#[derive(Clone, Debug, Deserialize)]
pub struct FilterConfig {
    pub attribute: String,
    #[serde(default = "default_op")] pub op: String,
    pub value: FilterValue,
}
fn default_op() -> String { "==".into() }

fn step(rule: &str, ratio: f64, division: Division) -> StepConfig {
    StepConfig { rule: rule.into(), filter: None, ratio, division }
}

/// Plot → road ring and building footprint → stacked masses → walls, panels and glazing.
fn default_steps() -> Vec<StepConfig> {
    vec![
        step("plot", 1.0, Division::Inset { fraction: 0.15 }),
        step("construct_up", 1.0, Division::Extrude { height: 6.0, taper: 0.0 }),
        step("construct_up", 0.5, Division::Extrude { height: 3.0, taper: 0.25 }),
        step("construct_up", 0.0, Division::Copy),
        step("construct_side", 0.0, Division::Copy),
        step("wall", 1.0, Division::Grid { nu: 4, nv: 2 }),
        step("panel", 0.8, Division::SplitRel { dir: SplitDir::V, ratio: 0.3 }),
    ]
}

pub fn load_config(path: &Path) -> Result<TesselConfig, String> {
    let s = std::fs::read_to_string(path).map_err(|e| format!("read {}: {}", path.display(), e))?;
    let cfg: TesselConfig = toml::from_str(&s).map_err(|e| format!("parse error: {}", e))?;
    log::info!("loaded config {}", path.display());
    Ok(cfg)
}
