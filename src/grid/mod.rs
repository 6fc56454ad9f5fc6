//! Horizontal driver for the column kernels.
//!
//! [`ColumnGrid`] stores an `nx × ny` field of columns with a land mask and
//! assembles the lateral neighbor set of each ocean column. [`regrid_all`]
//! and [`absorb_all_columns`] apply the vertical kernels column by column.

mod columns;
mod driver;

pub use columns::{ColumnGrid, GridError};
#[cfg(feature = "parallel")]
pub use driver::{absorb_all_columns_parallel, regrid_all_parallel};
pub use driver::{ShortwaveColumn, absorb_all_columns, regrid_all};
