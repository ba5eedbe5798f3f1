//! Linked-cell neighbour grid over a [`tricmc_geometry::Box`].
//!
//! The grid stores `divs[i] + 2` cells per axis: the extra two are "ghost" cells aliased to
//! their opposite real cell (see [`NeighbourGrid::get_neighbouring_cells`]), so that readers
//! walking the 27-cell stencil around a cell near a box face see the periodic images of the
//! particles on the far side without any special-casing. Writers only ever touch real cells.

mod error;
mod grid;

pub use error::RaceConditionError;
pub use grid::{CellView, NeighbourCellData, NeighbourGrid, NeighboursView};
