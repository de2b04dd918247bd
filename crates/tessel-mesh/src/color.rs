//! Hue colors for value-driven face coloring.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{FaceId, Mesh};

/// Hue range used by [`color_faces_by_values`]: red for the lowest value, blue for the highest.
pub const HUE_LOW: f32 = 0.0;
pub const HUE_HIGH: f32 = 0.66;

/// Converts a hue in `[0, 1]` (full saturation and value) to opaque RGBA.
pub fn hue_to_rgb(hue: f32) -> [f32; 4] {
    let h = hue * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let q = 1.0 - f;
    let (r, g, b) = match (sector as i32).rem_euclid(6) {
        0 => (1.0, f, 0.0),
        1 => (q, 1.0, 0.0),
        2 => (0.0, 1.0, f),
        3 => (0.0, q, 1.0),
        4 => (f, 0.0, 1.0),
        _ => (1.0, 0.0, q),
    };
    [r, g, b, 1.0]
}

/// Linearly maps `value` from one range to another. A zero-width source range maps to `out_min`.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if in_max == in_min {
        return out_min;
    }
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Colors each face by its value, spreading the value range over the hue gradient.
pub fn color_faces_by_values(mesh: &mut Mesh, faces: &[FaceId], values: &[f32]) -> MeshResult<()> {
    if faces.len() != values.len() {
        return Err(MeshError::InvalidParameter(format!(
            "{} faces but {} values",
            faces.len(),
            values.len()
        )));
    }
    let lo = values.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    for (&f, &v) in faces.iter().zip(values) {
        let face = mesh.face_mut(f).ok_or(MeshError::UnknownFace(f))?;
        face.color = hue_to_rgb(map_range(v, lo, hi, HUE_LOW, HUE_HIGH));
    }
    Ok(())
}
