//! # ocean-column
//!
//! Per-column vertical kernels for a layered ocean model.
//!
//! This crate provides two independent column operations and the pieces
//! they are built from:
//! - Adaptive vertical coordinate (neutral density curvature, implicit
//!   interface diffusion, minimum thickness floor)
//! - Banded shortwave absorption (in-place heating, TKE sink, bottom
//!   redistribution, penetrating flux profile)
//! - Seawater equation of state behind a derivative trait
//! - Tridiagonal (Thomas) solver
//! - Horizontal driver over a masked `nx × ny` field of columns
//!
//! Interface positions are measured positive downward from the surface.
//! Thicknesses are in the model's thickness unit `H`.

pub mod equations;
pub mod grid;
pub mod numerics;
pub mod shortwave;
pub mod types;
pub mod vertical;

// Re-export main types for convenience
pub use equations::{DensityDerivatives, EquationOfState, LinearEquationOfState};
pub use grid::{ColumnGrid, ShortwaveColumn, absorb_all_columns, regrid_all};
#[cfg(feature = "parallel")]
pub use grid::{absorb_all_columns_parallel, regrid_all_parallel};
pub use numerics::{TridiagonalSystem, solve_tridiagonal};
pub use shortwave::{
    AbsorbInputs, AbsorbOutcome, AbsorbPolicy, AbsorbState, AbsorbStep, Optics, PenetratingFlux,
    ShortwaveConfig, ShortwaveError, absorb_remaining, integrate_penetrating_flux,
};
pub use types::{ColumnId, ColumnProfile, Direction, LateralNeighbors};
pub use vertical::{AdaptControl, AdaptError, AdaptParams, AdaptParamsUpdate};
