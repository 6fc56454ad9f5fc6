//! Small numerical building blocks shared by the column kernels.

mod tridiagonal;

pub use tridiagonal::{TridiagonalSystem, fold_boundaries, solve_tridiagonal};
