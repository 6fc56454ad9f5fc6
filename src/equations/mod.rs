//! Seawater equation of state.
//!
//! The column kernels treat the equation of state as an external
//! collaborator behind the [`DensityDerivatives`] trait. The regridder calls
//! it once per available lateral neighbor and once more for the target
//! column's own vertical gradient.

mod equation_of_state;

pub use equation_of_state::{
    DensityDerivatives, EquationOfState, G, LinearEquationOfState, RHO_0,
};
