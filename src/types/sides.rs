//! Lateral neighbor sets with named fields.
//!
//! A column on a structured horizontal grid has four lateral neighbors.
//! Storing them with named fields removes the need to remember an array
//! index convention, and [`LateralNeighbors::iter`] visits them in a fixed
//! order so that sums over neighbors are reproducible bit for bit.

use std::fmt;

/// Direction of a lateral neighbor relative to the target column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// j - 1
    South,
    /// i + 1
    East,
    /// j + 1
    North,
    /// i - 1
    West,
}

impl Direction {
    /// All directions in visiting order: south, east, north, west.
    pub const ALL: [Direction; 4] = [
        Direction::South,
        Direction::East,
        Direction::North,
        Direction::West,
    ];

    /// Grid offset `(di, dj)` of the neighbor in this direction.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::North => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::South => "south",
            Direction::East => "east",
            Direction::North => "north",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// One value per lateral neighbor.
///
/// # Example
///
/// ```
/// use ocean_column::types::{Direction, LateralNeighbors};
///
/// let mask = LateralNeighbors::new(true, false, true, true);
/// assert_eq!(mask.north, true);
/// assert_eq!(*mask.get(Direction::East), false);
/// assert_eq!(mask.iter().filter(|(_, ocean)| **ocean).count(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LateralNeighbors<T> {
    /// Neighbor at j - 1
    pub south: T,
    /// Neighbor at i + 1
    pub east: T,
    /// Neighbor at j + 1
    pub north: T,
    /// Neighbor at i - 1
    pub west: T,
}

impl<T> LateralNeighbors<T> {
    /// Create a neighbor set with explicit named values.
    ///
    /// Order: south, east, north, west (counterclockwise from bottom)
    pub fn new(south: T, east: T, north: T, west: T) -> Self {
        Self {
            south,
            east,
            north,
            west,
        }
    }

    /// Same value in every direction.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            south: value.clone(),
            east: value.clone(),
            north: value.clone(),
            west: value,
        }
    }

    /// Build a neighbor set by evaluating `f` for each direction.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Direction) -> T,
    {
        Self {
            south: f(Direction::South),
            east: f(Direction::East),
            north: f(Direction::North),
            west: f(Direction::West),
        }
    }

    /// Map a function over all neighbors.
    pub fn map<U, F>(self, mut f: F) -> LateralNeighbors<U>
    where
        F: FnMut(T) -> U,
    {
        LateralNeighbors {
            south: f(self.south),
            east: f(self.east),
            north: f(self.north),
            west: f(self.west),
        }
    }

    /// Borrow the neighbor in a given direction.
    pub fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::South => &self.south,
            Direction::East => &self.east,
            Direction::North => &self.north,
            Direction::West => &self.west,
        }
    }

    /// Iterate over `(direction, value)` pairs in order: south, east, north, west.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        [
            (Direction::South, &self.south),
            (Direction::East, &self.east),
            (Direction::North, &self.north),
            (Direction::West, &self.west),
        ]
        .into_iter()
    }
}

impl<T> LateralNeighbors<Option<T>> {
    /// A neighbor set where every neighbor is masked out.
    pub fn none() -> Self {
        Self {
            south: None,
            east: None,
            north: None,
            west: None,
        }
    }

    /// Number of neighbors that are present.
    pub fn count_present(&self) -> usize {
        self.iter().filter(|(_, n)| n.is_some()).count()
    }
}

impl<T: Default> Default for LateralNeighbors<T> {
    fn default() -> Self {
        Self {
            south: T::default(),
            east: T::default(),
            north: T::default(),
            west: T::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for LateralNeighbors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S:{} E:{} N:{} W:{}",
            self.south, self.east, self.north, self.west
        )
    }
}

impl<T> From<[T; 4]> for LateralNeighbors<T> {
    fn from([south, east, north, west]: [T; 4]) -> Self {
        Self::new(south, east, north, west)
    }
}
