//! Strongly-typed domain types for column kernels.
//!
//! - [`LateralNeighbors`]: named south/east/north/west slots, used as the
//!   fixed set of neighbor descriptors for the curvature stencil
//! - [`ColumnProfile`]: borrowed interface and layer arrays of one column
//! - [`ColumnId`]: horizontal grid position, for diagnostics
//!
//! # Example
//!
//! ```
//! use ocean_column::types::{ColumnProfile, LateralNeighbors};
//!
//! let z = [0.0, 50.0, 100.0];
//! let t = [15.0, 10.0, 5.0];
//! let s = [35.0; 3];
//! let h = [50.0, 50.0];
//! let column = ColumnProfile::new(&z, &t, &s, &h);
//!
//! // Only the western neighbor is ocean
//! let mut neighbors = LateralNeighbors::none();
//! neighbors.west = Some(column);
//! assert_eq!(neighbors.count_present(), 1);
//! ```

mod column;
mod sides;

pub use column::{ColumnId, ColumnProfile, is_monotonic, thickness_from_interfaces};
pub use sides::{Direction, LateralNeighbors};
