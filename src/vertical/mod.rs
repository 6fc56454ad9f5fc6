//! Adaptive vertical coordinate for layered ocean columns.
//!
//! Interface positions are measured positive downward from the surface
//! (surface = 0). Each call to [`AdaptControl::build_adapted_column`] moves
//! the interior interfaces of one column; the surface and bottom interfaces
//! are never altered.
//!
//! # Stages
//!
//! The column build is split into functions that can be used on their own:
//!
//! - [`neutral_curvature`]: lateral neutral density curvature per interface
//! - [`displacement_from_curvature`]: curvature to a bounded displacement
//! - [`layer_diffusivity`]: zoom, stratification and background diffusivity
//! - [`diffuse_interfaces`]: implicit (Thomas) smoothing of interior interfaces
//! - [`apply_thickness_floor`]: optional minimum thickness floor
//!
//! # Example
//!
//! ```
//! use ocean_column::vertical::{AdaptControl, AdaptParamsUpdate};
//!
//! let mut control = AdaptControl::new();
//! control.init(20, vec![10.0; 20]).unwrap();
//!
//! // Near-surface zooming and a minimum thickness floor
//! control
//!     .set_params(&AdaptParamsUpdate {
//!         zoom_coeff: Some(0.5),
//!         do_min: Some(true),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! assert!(control.params().unwrap().do_min);
//! ```

mod adapt;

pub use adapt::{
    AdaptControl, AdaptError, AdaptParams, AdaptParamsUpdate, MIN_VERTICAL_DRHO,
    apply_thickness_floor, diffuse_interfaces, displacement_from_curvature, layer_diffusivity,
    neutral_curvature,
};
