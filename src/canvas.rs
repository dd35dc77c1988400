use crate::inventory::Inventory;
use crate::palette::Paint;

/// Grid dimension used by the in-game map item.
pub const DEFAULT_GRID_SIZE: u32 = 128;

/// Largest grid accepted; bigger requests are clamped.
pub const MAX_GRID_SIZE: u32 = 4096;

/// A logical grid coordinate. May lie outside the grid; every mutation clips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// CANVAS — N×N cell grid with a live inventory
// ============================================================================

/// The design raster. Each cell is empty or holds one painted shade.
///
/// The inventory is updated on every cell write, so it is always equal to a
/// full [`Canvas::recount`] of the grid.
#[derive(Clone, Debug)]
pub struct Canvas {
    size: u32,
    cells: Vec<Option<Paint>>,
    inventory: Inventory,
}

impl Canvas {
    /// Create an empty grid of `size`×`size` cells (clamped to 1..=MAX_GRID_SIZE).
    pub fn new(size: u32) -> Self {
        let size = size.clamp(1, MAX_GRID_SIZE);
        Self {
            size,
            cells: vec![None; (size * size) as usize],
            inventory: Inventory::new(),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.size && (y as u32) < self.size
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.size as usize + x as usize)
        } else {
            None
        }
    }

    /// Cell content; out-of-range coordinates read as empty.
    pub fn get(&self, x: i32, y: i32) -> Option<Paint> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Write one cell, keeping the inventory in step. Returns whether the
    /// cell changed; out-of-range writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, paint: Option<Paint>) -> bool {
        let Some(i) = self.index(x, y) else { return false };
        let old = self.cells[i];
        if old == paint {
            return false;
        }
        if let Some(old) = old {
            self.inventory.remove(old);
        }
        if let Some(new) = paint {
            self.inventory.add(new);
        }
        self.cells[i] = paint;
        true
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.inventory.clear();
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Row-major cell slice.
    pub fn cells(&self) -> &[Option<Paint>] {
        &self.cells
    }

    /// Rebuild the inventory from scratch by scanning every cell.
    pub fn recount(&self) -> Inventory {
        let mut inv = Inventory::new();
        for paint in self.cells.iter().flatten() {
            inv.add(*paint);
        }
        inv
    }

    /// Coordinates of all painted cells, row-major.
    pub fn painted(&self) -> impl Iterator<Item = (GridPos, Paint)> + '_ {
        let size = self.size as usize;
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|p| (GridPos::new((i % size) as i32, (i / size) as i32), p))
        })
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}
