use crate::error::{VoxelError, VoxelResult};

pub type Rgb = [f32; 3];

/// Dense `nx × ny × nz` array stored x-fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(nx: usize, ny: usize, nz: usize, fill: T) -> Self {
        Grid {
            nx,
            ny,
            nz,
            data: vec![fill; nx * ny * nz],
        }
    }
}

impl<T> Grid<T> {
    pub fn from_vec(nx: usize, ny: usize, nz: usize, data: Vec<T>) -> VoxelResult<Self> {
        let expected = nx * ny * nz;
        if data.len() != expected {
            return Err(VoxelError::InvalidData {
                dims: (nx, ny, nz),
                expected,
                got: data.len(),
            });
        }
        Ok(Grid { nx, ny, nz, data })
    }

    /// Builds a grid by evaluating `f(x, y, z)` for every cell.
    pub fn from_fn(nx: usize, ny: usize, nz: usize, mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nx * ny * nz);
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    data.push(f(x, y, z));
                }
            }
        }
        Grid { nx, ny, nz, data }
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.ny + y) * self.nx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> &T {
        &self.data[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
        let i = self.idx(x, y, z);
        self.data[i] = value;
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64, z: i64) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.nx
            && (y as usize) < self.ny
            && (z as usize) < self.nz
    }

    /// Signed lookup; `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i64, y: i64, z: i64) -> Option<&T> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }
}

impl Grid<bool> {
    pub fn count_solid(&self) -> usize {
        self.data.iter().filter(|&&s| s).count()
    }
}
