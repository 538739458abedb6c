//! Cardinal step directions in face UV space.

/// Cardinal directions on a cube face in UV space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceDirection {
    /// Decreasing u.
    West,
    /// Increasing u.
    East,
    /// Decreasing v.
    South,
    /// Increasing v.
    North,
}

impl FaceDirection {
    /// All four cardinal directions.
    pub const ALL: [FaceDirection; 4] = [
        FaceDirection::North,
        FaceDirection::South,
        FaceDirection::East,
        FaceDirection::West,
    ];

    /// The `(dx, dy)` cell delta of one step.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            FaceDirection::West => (-1, 0),
            FaceDirection::East => (1, 0),
            FaceDirection::South => (0, -1),
            FaceDirection::North => (0, 1),
        }
    }

    /// Inverse of [`delta`](Self::delta); `None` for anything but a unit axis step.
    #[must_use]
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (-1, 0) => Some(FaceDirection::West),
            (1, 0) => Some(FaceDirection::East),
            (0, -1) => Some(FaceDirection::South),
            (0, 1) => Some(FaceDirection::North),
            _ => None,
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            FaceDirection::West => FaceDirection::East,
            FaceDirection::East => FaceDirection::West,
            FaceDirection::South => FaceDirection::North,
            FaceDirection::North => FaceDirection::South,
        }
    }
}
