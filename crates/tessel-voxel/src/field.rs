//! Scalar fields over voxel grids and helpers to turn them into occupancy and color.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use tessel_mesh::color::{hue_to_rgb, map_range};

use crate::grid::{Grid, Rgb};

/// Overwrites every cell on the outer shell of `grid` with `value`.
pub fn set_values_at_borders<T: Clone>(grid: &mut Grid<T>, value: T) {
    let (nx, ny, nz) = grid.dims();
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let border = x == 0 || y == 0 || z == 0 || x + 1 == nx || y + 1 == ny || z + 1 == nz;
                if border {
                    grid.set(x, y, z, value.clone());
                }
            }
        }
    }
}

/// Default frequency of [`sinusoids`] along each axis: three full periods across the grid.
pub const SINUSOID_FREQUENCY: f32 = 6.0 * std::f32::consts::PI;

/// `(sin(fx·x/nx) + sin(fy·y/ny) + sin(fz·z/nz)) / 3` over normalized cell coordinates;
/// values lie in `[-1, 1]`.
pub fn sinusoids(dims: (usize, usize, usize), fx: f32, fy: f32, fz: f32) -> Grid<f32> {
    let (nx, ny, nz) = dims;
    Grid::from_fn(nx, ny, nz, |x, y, z| {
        let vx = (x as f32 / nx as f32 * fx).sin();
        let vy = (y as f32 / ny as f32 * fy).sin();
        let vz = (z as f32 / nz as f32 * fz).sin();
        map_range(vx + vy + vz, -3.0, 3.0, -1.0, 1.0)
    })
}

/// OpenSimplex2 noise in `[-1, 1]`, deterministic for a given seed.
pub fn noise(dims: (usize, usize, usize), seed: i32, frequency: f32) -> Grid<f32> {
    let mut fnl = FastNoiseLite::with_seed(seed);
    fnl.set_noise_type(Some(NoiseType::OpenSimplex2));
    fnl.set_frequency(Some(frequency));
    let (nx, ny, nz) = dims;
    Grid::from_fn(nx, ny, nz, |x, y, z| {
        fnl.get_noise_3d(x as f32, y as f32, z as f32)
    })
}

/// Cells strictly above `iso` are solid.
pub fn threshold(field: &Grid<f32>, iso: f32) -> Grid<bool> {
    Grid {
        nx: field.nx,
        ny: field.ny,
        nz: field.nz,
        data: field.data.iter().map(|&v| v > iso).collect(),
    }
}

/// Maps each value from `[min, max]` onto the hue range `[hue_min, hue_max]`.
pub fn colors_from_values(field: &Grid<f32>, min: f32, max: f32, hue_min: f32, hue_max: f32) -> Grid<Rgb> {
    let data = field
        .data
        .iter()
        .map(|&v| {
            let hue = map_range(v.clamp(min.min(max), min.max(max)), min, max, hue_min, hue_max);
            let [r, g, b, _] = hue_to_rgb(hue);
            [r, g, b]
        })
        .collect();
    Grid {
        nx: field.nx,
        ny: field.ny,
        nz: field.nz,
        data,
    }
}

/// Smallest and largest finite value in the field.
pub fn value_range(field: &Grid<f32>) -> Option<(f32, f32)> {
    field
        .data
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
