//! The two generators behind the CLI subcommands.

use std::error::Error;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tessel_grammar::{Filter, Grammar, Tag, color_by_group, subdivide_with_rule, tag_histogram};
use tessel_mesh::{FaceId, Mesh};
use tessel_voxel::field::{colors_from_values, noise, set_values_at_borders, sinusoids, threshold, value_range};
use tessel_voxel::{extract_boundary, extract_boundary_par};

use crate::config::{FieldKind, GrammarRunConfig, StepConfig, VoxelConfig};

pub type RunResult<T> = Result<T, Box<dyn Error>>;

#[derive(Clone, Copy, Debug, Default)]
pub struct VoxelOptions {
    pub parallel: bool,
    pub weld: bool,
}

/// Folds the high half of the run seed into the 32-bit noise seed.
fn noise_seed(seed: u64) -> i32 {
    ((seed ^ (seed >> 32)) as u32) as i32
}

/// Samples the configured field, thresholds it and extracts the colored boundary mesh.
pub fn run_voxel(cfg: &VoxelConfig, seed: u64, opts: VoxelOptions) -> RunResult<Mesh> {
    let dims = (cfg.nx, cfg.ny, cfg.nz);
    let mut field = match cfg.field {
        FieldKind::Sinusoid => sinusoids(dims, cfg.frequency, cfg.frequency, cfg.frequency),
        FieldKind::Noise => noise(dims, noise_seed(seed), cfg.noise_frequency),
    };
    let (min, max) = value_range(&field).unwrap_or((-1.0, 1.0));
    if cfg.closed {
        set_values_at_borders(&mut field, f32::min(min, cfg.iso) - 1.0);
    }
    let colors = colors_from_values(&field, min, max, cfg.hue_min, cfg.hue_max);
    let solid = threshold(&field, cfg.iso);
    log::info!(
        "voxel grid {}x{}x{}: {} solid of {} cells",
        cfg.nx,
        cfg.ny,
        cfg.nz,
        solid.count_solid(),
        solid.len()
    );

    let mut mesh = if opts.parallel {
        extract_boundary_par(&solid, &colors)?
    } else {
        extract_boundary(&solid, &colors)?
    };
    if opts.weld {
        let stats = mesh.update_topology();
        log::info!(
            "welded {} -> {} vertices, {} edges, closed={}",
            stats.vertices_before,
            stats.vertices_after,
            stats.edges,
            stats.is_closed()
        );
    }
    log::info!("boundary mesh: {} faces, {} vertices", mesh.face_count(), mesh.vertex_count());
    log_bounds("boundary mesh", &mesh);
    Ok(mesh)
}

fn ground_quad(mesh: &mut Mesh, width: f32, depth: f32, root: Tag) -> RunResult<FaceId> {
    if !(width > 0.0 && depth > 0.0) {
        return Err(format!("ground quad needs positive size, got {width}x{depth}").into());
    }
    let ids = [
        mesh.add_vertex(0.0, 0.0, 0.0),
        mesh.add_vertex(width, 0.0, 0.0),
        mesh.add_vertex(width, depth, 0.0),
        mesh.add_vertex(0.0, depth, 0.0),
    ];
    let f = mesh.add_face(&ids)?;
    if let Some(face) = mesh.face_mut(f) {
        face.group = root.as_str().to_string();
    }
    Ok(f)
}

fn step_filter(step: &StepConfig, tag: Tag) -> RunResult<Filter> {
    Ok(match &step.filter {
        Some(fc) => Filter::new(&fc.attribute, &fc.op, fc.value.clone())?,
        None => Filter::group(tag),
    })
}

/// Runs the configured steps over a single root face and returns the leaf faces as a
/// compact mesh colored by tag.
pub fn run_grammar(cfg: &GrammarRunConfig, seed: u64) -> RunResult<Mesh> {
    let loaded;
    let grammar = match &cfg.rules {
        Some(path) => {
            loaded = Grammar::load(path)?;
            &loaded
        }
        None => Grammar::builtin(),
    };
    let root: Tag = cfg.root.parse()?;
    grammar.check_resolvable(root)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut mesh = Mesh::new();
    let mut leaves = vec![ground_quad(&mut mesh, cfg.width, cfg.depth, root)?];

    for (i, step) in cfg.steps.iter().enumerate() {
        let tag: Tag = step.rule.parse()?;
        let rule = grammar.resolve(tag)?;
        let filter = step_filter(step, tag)?;
        let before = leaves.len();
        leaves = subdivide_with_rule(
            &mut mesh,
            &leaves,
            &filter,
            step.ratio,
            &mut rng,
            rule,
            |m: &mut Mesh, f: FaceId| step.division.apply(m, f),
        )?;
        log::debug!("step {i} ({tag}, {filter}): {before} -> {} leaves", leaves.len());
    }

    color_by_group(&mut mesh, &leaves)?;
    let out = mesh.extract(&leaves)?;
    for (group, n) in tag_histogram(&out, &out.face_ids()) {
        let name = if group.is_empty() { "<untagged>" } else { group.as_str() };
        log::info!("  {name}: {n}");
    }
    log::info!("grammar mesh: {} faces, {} vertices", out.face_count(), out.vertex_count());
    log_bounds("grammar mesh", &out);
    Ok(out)
}

fn log_bounds(label: &str, mesh: &Mesh) {
    if let Some(bb) = mesh.bounds() {
        let (s, c) = (bb.size(), bb.center());
        log::info!(
            "{label} bounds: size {:.2} x {:.2} x {:.2}, center ({:.2}, {:.2}, {:.2})",
            s.x, s.y, s.z, c.x, c.y, c.z
        );
    }
}

pub fn export_obj(mesh: &Mesh, path: &Path) -> RunResult<()> {
    mesh.save_obj(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TesselConfig;

    fn small_voxel() -> VoxelConfig {
        VoxelConfig { nx: 10, ny: 10, nz: 10, ..VoxelConfig::default() }
    }

    #[test]
    fn voxel_serial_and_parallel_agree() {
        let cfg = small_voxel();
        let a = run_voxel(&cfg, 1, VoxelOptions::default()).unwrap();
        let b = run_voxel(&cfg, 1, VoxelOptions { parallel: true, weld: false }).unwrap();
        assert_eq!(a.faces, b.faces);
        assert!(a.face_count() > 0);
    }

    #[test]
    fn closed_voxel_surface_welds_watertight() {
        let cfg = VoxelConfig { field: FieldKind::Noise, noise_frequency: 0.2, ..small_voxel() };
        let mut mesh = run_voxel(&cfg, 42, VoxelOptions::default()).unwrap();
        let stats = mesh.update_topology();
        assert!(stats.is_closed());
    }

    #[test]
    fn noise_seed_keeps_high_bits() {
        assert_ne!(noise_seed(7), noise_seed(7 | (1 << 40)));
        assert_eq!(noise_seed(7), 7);
        let cfg = VoxelConfig { field: FieldKind::Noise, ..small_voxel() };
        let a = run_voxel(&cfg, 7, VoxelOptions::default()).unwrap();
        let b = run_voxel(&cfg, 7, VoxelOptions::default()).unwrap();
        assert_eq!(a.faces, b.faces);
    }

    #[test]
    fn default_grammar_run_is_deterministic() {
        let cfg = TesselConfig::default();
        let a = run_grammar(&cfg.grammar, 5).unwrap();
        let b = run_grammar(&cfg.grammar, 5).unwrap();
        assert_eq!(a.faces, b.faces);
        let hist = tag_histogram(&a, &a.face_ids());
        assert_eq!(hist.get("road"), Some(&4));
        assert!(!hist.contains_key("construct_up"));
        assert!(!hist.contains_key("construct_side"));
        assert!(hist.contains_key("roof"));
        for group in hist.keys() {
            assert!(group.parse::<Tag>().is_ok(), "{group}");
        }
    }

    #[test]
    fn grammar_mass_spans_plot_and_rises() {
        let cfg = TesselConfig::default().grammar;
        let mesh = run_grammar(&cfg, 11).unwrap();
        let bb = mesh.bounds().unwrap();
        assert!((bb.size().x - cfg.width).abs() < 1e-3);
        assert!((bb.size().y - cfg.depth).abs() < 1e-3);
        assert_eq!(bb.min.z, 0.0);
        assert!(bb.max.z >= 6.0 - 1e-3);
    }

    #[test]
    fn unknown_root_or_rule_fails() {
        let mut cfg = TesselConfig::default().grammar;
        cfg.root = "castle".into();
        assert!(run_grammar(&cfg, 0).is_err());

        let mut cfg = TesselConfig::default().grammar;
        cfg.steps.truncate(1);
        cfg.steps[0].rule = "glass".into();
        assert!(run_grammar(&cfg, 0).is_err());
    }

    #[test]
    fn obj_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.obj");
        let mesh = run_grammar(&TesselConfig::default().grammar, 3).unwrap();
        export_obj(&mesh, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), mesh.face_count());
    }
}
