//! Horizontal field of layered columns with a land mask.
//!
//! Columns are stored flattened with `i` fastest: column `(i, j)` has index
//! `j * nx + i`. Neighbors follow [`Direction::offset`], so south is `j − 1`
//! and east is `i + 1`.

use thiserror::Error;

use crate::types::{ColumnId, ColumnProfile, Direction, LateralNeighbors, thickness_from_interfaces};

/// Errors from assembling a column field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Column {i}, {j} outside {nx} x {ny} grid")]
    OutOfBounds { i: usize, j: usize, nx: usize, ny: usize },

    #[error("Dimension mismatch in {field}: expected {expected}, got {actual}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Interface profiles and depths of an `nx × ny` field of columns.
#[derive(Clone, Debug)]
pub struct ColumnGrid {
    nx: usize,
    ny: usize,
    n_layers: usize,
    /// True for ocean columns
    wet: Vec<bool>,
    /// Interface positions, nk + 1 per column [H]
    interface_heights: Vec<f64>,
    /// Interface temperature, nk + 1 per column [degC]
    interface_temperature: Vec<f64>,
    /// Interface salinity, nk + 1 per column [PSU]
    interface_salinity: Vec<f64>,
    /// Layer thickness, nk per column [H]
    layer_thickness: Vec<f64>,
    /// Local bottom depth [H]
    local_depth: Vec<f64>,
}

impl ColumnGrid {
    /// All-ocean grid with every column at rest: interfaces at zero, zero
    /// temperature and salinity.
    pub fn new(nx: usize, ny: usize, n_layers: usize) -> Self {
        let n_columns = nx * ny;
        Self {
            nx,
            ny,
            n_layers,
            wet: vec![true; n_columns],
            interface_heights: vec![0.0; n_columns * (n_layers + 1)],
            interface_temperature: vec![0.0; n_columns * (n_layers + 1)],
            interface_salinity: vec![0.0; n_columns * (n_layers + 1)],
            layer_thickness: vec![0.0; n_columns * n_layers],
            local_depth: vec![0.0; n_columns],
        }
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn n_layers(&self) -> usize {
        self.n_layers
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.nx * self.ny
    }

    /// Flat index of a column.
    #[inline]
    pub fn index(&self, id: ColumnId) -> usize {
        id.j * self.nx + id.i
    }

    /// Column identifier of a flat index.
    #[inline]
    pub fn id(&self, index: usize) -> ColumnId {
        ColumnId::new(index % self.nx, index / self.nx)
    }

    /// All column identifiers in storage order.
    pub fn ids(&self) -> impl Iterator<Item = ColumnId> + '_ {
        (0..self.n_columns()).map(|idx| self.id(idx))
    }

    fn check_bounds(&self, id: ColumnId) -> Result<usize, GridError> {
        if id.i < self.nx && id.j < self.ny {
            Ok(self.index(id))
        } else {
            Err(GridError::OutOfBounds {
                i: id.i,
                j: id.j,
                nx: self.nx,
                ny: self.ny,
            })
        }
    }

    /// Set one column's interface profiles and local depth. Layer thickness
    /// follows from the interface positions.
    pub fn set_column(
        &mut self,
        id: ColumnId,
        interface_heights: &[f64],
        interface_temperature: &[f64],
        interface_salinity: &[f64],
        local_depth: f64,
    ) -> Result<(), GridError> {
        let idx = self.check_bounds(id)?;
        let nz = self.n_layers + 1;
        for (field, len) in [
            ("interface_heights", interface_heights.len()),
            ("interface_temperature", interface_temperature.len()),
            ("interface_salinity", interface_salinity.len()),
        ] {
            if len != nz {
                return Err(GridError::DimensionMismatch {
                    field,
                    expected: nz,
                    actual: len,
                });
            }
        }

        let range = idx * nz..(idx + 1) * nz;
        self.interface_heights[range.clone()].copy_from_slice(interface_heights);
        self.interface_temperature[range.clone()].copy_from_slice(interface_temperature);
        self.interface_salinity[range].copy_from_slice(interface_salinity);
        let nk = self.n_layers;
        self.layer_thickness[idx * nk..(idx + 1) * nk]
            .copy_from_slice(&thickness_from_interfaces(interface_heights));
        self.local_depth[idx] = local_depth;
        Ok(())
    }

    /// Mark a column as land or ocean.
    pub fn set_wet(&mut self, id: ColumnId, is_wet: bool) -> Result<(), GridError> {
        let idx = self.check_bounds(id)?;
        self.wet[idx] = is_wet;
        Ok(())
    }

    #[inline]
    pub fn is_wet(&self, id: ColumnId) -> bool {
        id.i < self.nx && id.j < self.ny && self.wet[self.index(id)]
    }

    pub fn wet_count(&self) -> usize {
        self.wet.iter().filter(|&&w| w).count()
    }

    /// Local bottom depth of a column.
    #[inline]
    pub fn local_depth(&self, id: ColumnId) -> f64 {
        self.local_depth[self.index(id)]
    }

    /// Interface positions of a column, land included.
    pub fn interface_heights(&self, id: ColumnId) -> &[f64] {
        let nz = self.n_layers + 1;
        let idx = self.index(id);
        &self.interface_heights[idx * nz..(idx + 1) * nz]
    }

    /// Borrowed profile of an ocean column; `None` for land or outside the
    /// grid.
    pub fn column(&self, id: ColumnId) -> Option<ColumnProfile<'_>> {
        if !self.is_wet(id) {
            return None;
        }
        let nz = self.n_layers + 1;
        let nk = self.n_layers;
        let idx = self.index(id);
        let interfaces = idx * nz..(idx + 1) * nz;
        Some(ColumnProfile::new(
            &self.interface_heights[interfaces.clone()],
            &self.interface_temperature[interfaces.clone()],
            &self.interface_salinity[interfaces],
            &self.layer_thickness[idx * nk..(idx + 1) * nk],
        ))
    }

    /// Identifier of the neighbor in `direction`, if inside the grid.
    pub fn neighbor_id(&self, id: ColumnId, direction: Direction) -> Option<ColumnId> {
        let (di, dj) = direction.offset();
        let i = id.i.checked_add_signed(di)?;
        let j = id.j.checked_add_signed(dj)?;
        (i < self.nx && j < self.ny).then_some(ColumnId::new(i, j))
    }

    /// Ocean neighbors of a column.
    pub fn neighbors(&self, id: ColumnId) -> LateralNeighbors<Option<ColumnProfile<'_>>> {
        LateralNeighbors::from_fn(|direction| {
            self.neighbor_id(id, direction)
                .and_then(|neighbor| self.column(neighbor))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x2() -> ColumnGrid {
        let mut grid = ColumnGrid::new(3, 2, 2);
        for id in grid.ids().collect::<Vec<_>>() {
            let depth = 100.0 + 10.0 * id.i as f64;
            grid.set_column(
                id,
                &[0.0, 0.5 * depth, depth],
                &[15.0, 10.0, 5.0],
                &[35.0; 3],
                depth,
            )
            .unwrap();
        }
        grid
    }

    #[test]
    fn test_index_round_trip() {
        let grid = grid_3x2();
        assert_eq!(grid.index(ColumnId::new(2, 1)), 5);
        assert_eq!(grid.id(4), ColumnId::new(1, 1));
        assert_eq!(grid.ids().count(), 6);
    }

    #[test]
    fn test_set_column_derives_thickness() {
        let grid = grid_3x2();
        let column = grid.column(ColumnId::new(1, 0)).unwrap();
        assert_eq!(column.layer_thickness, &[55.0, 55.0]);
        assert_eq!(grid.local_depth(ColumnId::new(1, 0)), 110.0);
    }

    #[test]
    fn test_set_column_rejects_bad_input() {
        let mut grid = ColumnGrid::new(2, 2, 2);
        let err = grid
            .set_column(ColumnId::new(0, 0), &[0.0, 1.0], &[0.0; 3], &[0.0; 3], 1.0)
            .unwrap_err();
        assert_eq!(
            err,
            GridError::DimensionMismatch {
                field: "interface_heights",
                expected: 3,
                actual: 2
            }
        );
        let err = grid.set_wet(ColumnId::new(2, 0), false).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { i: 2, .. }));
    }

    #[test]
    fn test_neighbors_at_corner() {
        let grid = grid_3x2();
        let n = grid.neighbors(ColumnId::new(0, 0));
        assert!(n.south.is_none());
        assert!(n.west.is_none());
        assert!(n.north.is_some());
        assert!(n.east.is_some());
        assert_eq!(n.east.unwrap().bottom(), 110.0);
    }

    #[test]
    fn test_land_is_excluded() {
        let mut grid = grid_3x2();
        grid.set_wet(ColumnId::new(1, 1), false).unwrap();
        assert_eq!(grid.wet_count(), 5);
        assert!(grid.column(ColumnId::new(1, 1)).is_none());
        let n = grid.neighbors(ColumnId::new(1, 0));
        assert!(n.north.is_none());
        assert_eq!(n.count_present(), 2);
    }
}
