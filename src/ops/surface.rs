// ============================================================================
// SURFACE — physical pixel rendering of the grid and read-back sampling
// ============================================================================

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::canvas::{Canvas, MAX_GRID_SIZE};
use crate::inventory::Inventory;
use crate::palette::Catalog;

/// Physical edge length of the drawing surface in the reference layout.
pub const DEFAULT_SURFACE_SIZE: u32 = 420;

/// Largest surface edge ever allocated (twice the largest grid).
pub const MAX_SURFACE_SIZE: u32 = MAX_GRID_SIZE * 2;

/// Samples at or below this alpha are treated as unpainted.
pub const OPAQUE_THRESHOLD: u8 = 200;

/// Mapping between logical cells and physical surface pixels.
///
/// Each cell owns the pixel span `[floor(g·S/N), floor((g+1)·S/N))` with no
/// anti-aliased seams; the surface is kept at least twice the grid size so
/// the sampled centre pixel of a cell always lies inside its own span, and
/// never above [`MAX_SURFACE_SIZE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceGeometry {
    grid: u32,
    surface: u32,
}

impl SurfaceGeometry {
    pub fn new(grid: u32, surface: u32) -> Self {
        let grid = grid.clamp(1, MAX_GRID_SIZE);
        Self {
            grid,
            surface: surface.clamp(grid * 2, MAX_SURFACE_SIZE),
        }
    }

    pub fn grid_size(&self) -> u32 {
        self.grid
    }

    pub fn surface_size(&self) -> u32 {
        self.surface
    }

    /// Physical pixels per cell (generally fractional).
    pub fn cell_size(&self) -> f64 {
        self.surface as f64 / self.grid as f64
    }

    /// Cell owning physical pixel `p` along one axis.
    pub fn cell_of_pixel(&self, p: u32) -> u32 {
        ((p as u64 * self.grid as u64) / self.surface as u64).min(self.grid as u64 - 1) as u32
    }

    /// Pixel sampled for cell `g`: floor(g·size + size/2).
    pub fn cell_center(&self, g: u32) -> u32 {
        (((2 * g as u64 + 1) * self.surface as u64) / (2 * self.grid as u64)) as u32
    }
}

/// Render the grid onto a transparent surface, one flat colour per cell.
pub fn render_surface(canvas: &Canvas, catalog: &Catalog, surface_size: u32) -> RgbaImage {
    let geom = SurfaceGeometry::new(canvas.size(), surface_size);
    let n = canvas.size() as usize;
    let s = geom.surface_size();

    let colors: Vec<Option<[u8; 3]>> = canvas
        .cells()
        .iter()
        .map(|c| c.and_then(|p| catalog.rgb_of(p)))
        .collect();
    let column_cells: Vec<usize> = (0..s).map(|px| geom.cell_of_pixel(px) as usize).collect();

    let mut img = RgbaImage::new(s, s);
    let row_bytes = s as usize * 4;
    let buf: &mut [u8] = &mut img;
    buf.par_chunks_mut(row_bytes).enumerate().for_each(|(py, row)| {
        let gy = geom.cell_of_pixel(py as u32) as usize;
        for (px, out) in row.chunks_exact_mut(4).enumerate() {
            if let Some([r, g, b]) = colors[gy * n + column_cells[px]] {
                out.copy_from_slice(&[r, g, b, 255]);
            }
        }
    });
    img
}

/// Read the centre pixel of cell (`gx`, `gy`). Off-surface reads are transparent.
pub fn sample_cell(img: &RgbaImage, geom: &SurfaceGeometry, gx: u32, gy: u32) -> Rgba<u8> {
    let (px, py) = (geom.cell_center(gx), geom.cell_center(gy));
    if px < img.width() && py < img.height() {
        *img.get_pixel(px, py)
    } else {
        Rgba([0, 0, 0, 0])
    }
}

/// Rebuild an inventory purely from rendered pixels: every cell centre is
/// sampled and matched by exact RGB against all derived shades of the
/// catalog. Transparent and unknown colours are skipped.
pub fn sample_inventory(img: &RgbaImage, grid_size: u32, catalog: &Catalog) -> Inventory {
    let geom = SurfaceGeometry::new(grid_size, img.width().min(img.height()));
    let lookup = catalog.reverse_lookup();
    let mut inv = Inventory::new();
    for gy in 0..geom.grid_size() {
        for gx in 0..geom.grid_size() {
            let px = sample_cell(img, &geom, gx, gy);
            if px[3] <= OPAQUE_THRESHOLD {
                continue;
            }
            if let Some(paint) = lookup.get(&[px[0], px[1], px[2]]) {
                inv.add(*paint);
            }
        }
    }
    inv
}
