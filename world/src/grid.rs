//! Dense terrain grid tracking path and tower cells.

use lane_defence_core::{CellCoord, GridView, MapLayout, Terrain};

#[derive(Clone, Debug)]
pub(crate) struct TerrainGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Terrain>,
}

impl TerrainGrid {
    /// Creates a grid where every cell is open ground.
    pub(crate) fn open(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![Terrain::Open; capacity],
        }
    }

    /// Creates a grid with the layout's path carved in.
    pub(crate) fn from_layout(layout: &MapLayout) -> Self {
        let mut grid = Self::open(layout.columns(), layout.rows());
        for cell in layout.path().cells() {
            grid.set(*cell, Terrain::Path);
        }
        grid
    }

    pub(crate) fn terrain(&self, cell: CellCoord) -> Option<Terrain> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    pub(crate) fn set(&mut self, cell: CellCoord, terrain: Terrain) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = terrain;
            }
        }
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    pub(crate) fn view(&self) -> GridView {
        GridView::new(self.columns, self.rows, self.cells.clone())
    }
}
