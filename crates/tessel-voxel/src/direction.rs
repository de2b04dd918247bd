use tessel_geom::Vec3;

/// The six axis directions a voxel face can point in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Direction {
    /// Scan order used by the extractor.
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Integer step `(dx, dy, dz)` to the neighbor across this face.
    #[inline]
    pub fn delta(self) -> (i64, i64, i64) {
        match self {
            Direction::PosX => (1, 0, 0),
            Direction::NegX => (-1, 0, 0),
            Direction::PosY => (0, 1, 0),
            Direction::NegY => (0, -1, 0),
            Direction::PosZ => (0, 0, 1),
            Direction::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Unit-cube corner offsets of this face, counter-clockwise seen from outside.
    #[inline]
    pub fn corners(self) -> [(u8, u8, u8); 4] {
        match self {
            Direction::PosX => [(1, 0, 0), (1, 1, 0), (1, 1, 1), (1, 0, 1)],
            Direction::NegX => [(0, 1, 0), (0, 0, 0), (0, 0, 1), (0, 1, 1)],
            Direction::PosY => [(1, 1, 0), (0, 1, 0), (0, 1, 1), (1, 1, 1)],
            Direction::NegY => [(0, 0, 0), (1, 0, 0), (1, 0, 1), (0, 0, 1)],
            Direction::PosZ => [(0, 0, 1), (1, 0, 1), (1, 1, 1), (0, 1, 1)],
            Direction::NegZ => [(0, 1, 0), (1, 1, 0), (1, 0, 0), (0, 0, 0)],
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosY => Direction::NegY,
            Direction::NegY => Direction::PosY,
            Direction::PosZ => Direction::NegZ,
            Direction::NegZ => Direction::PosZ,
        }
    }
}
