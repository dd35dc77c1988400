// ============================================================================
// BRUSH — square-kernel point paint and gap-free line strokes
// ============================================================================

use crate::canvas::{Canvas, GridPos, MAX_GRID_SIZE};
use crate::palette::Paint;

/// Coordinates are pulled into this band before line stepping so that
/// absurd pointer values cannot make a stroke walk billions of cells.
const FAR_LIMIT: i32 = (MAX_GRID_SIZE as i32) * 4;

pub(crate) fn pull_in(p: GridPos) -> GridPos {
    GridPos::new(p.x.clamp(-FAR_LIMIT, FAR_LIMIT), p.y.clamp(-FAR_LIMIT, FAR_LIMIT))
}

/// Cells covered by a `brush_size`-wide square centred (floor) on `at`.
/// Non-positive sizes cover nothing.
pub fn brush_footprint(at: GridPos, brush_size: i32) -> impl Iterator<Item = GridPos> {
    let size = brush_size.max(0);
    let offset = size / 2;
    (0..size).flat_map(move |i| {
        (0..size).map(move |j| GridPos::new(at.x.saturating_add(i - offset), at.y.saturating_add(j - offset)))
    })
}

/// Span `[lo, hi)` of the kernel along one axis, intersected with `[0, size)`.
fn clipped_span(center: i32, brush_size: i32, size: u32) -> (i32, i32) {
    let lo = center as i64 - (brush_size / 2) as i64;
    let hi = lo + brush_size as i64;
    (lo.clamp(0, size as i64) as i32, hi.clamp(0, size as i64) as i32)
}

/// Fill the brush footprint at `at`. Returns the number of cells that changed.
/// Only the part of the kernel inside the grid is visited.
pub fn paint_at(canvas: &mut Canvas, at: GridPos, brush_size: i32, paint: Paint) -> usize {
    if brush_size <= 0 {
        return 0;
    }
    let (x0, x1) = clipped_span(at.x, brush_size, canvas.size());
    let (y0, y1) = clipped_span(at.y, brush_size, canvas.size());
    let mut changed = 0;
    for x in x0..x1 {
        for y in y0..y1 {
            if canvas.set(x, y, Some(paint)) {
                changed += 1;
            }
        }
    }
    changed
}

/// Integer Bresenham walk from `from` to `to`, both endpoints included.
pub fn line_points(from: GridPos, to: GridPos) -> Vec<GridPos> {
    let (from, to) = (pull_in(from), pull_in(to));
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut points = Vec::with_capacity(dx.max(dy) as usize + 1);
    let mut err = dx - dy;
    let (mut x, mut y) = (from.x, from.y);
    loop {
        points.push(GridPos::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Stamp the full brush at every Bresenham step between two cells, so a fast
/// drag leaves no gaps at any brush size.
pub fn paint_line(canvas: &mut Canvas, from: GridPos, to: GridPos, brush_size: i32, paint: Paint) -> usize {
    line_points(from, to)
        .into_iter()
        .map(|p| paint_at(canvas, p, brush_size, paint))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Variant;

    fn paint() -> Paint {
        Paint::new(0, Variant::Normal)
    }

    #[test]
    fn single_point_paints_one_cell() {
        let mut canvas = Canvas::new(128);
        assert_eq!(paint_at(&mut canvas, GridPos::new(10, 10), 1, paint()), 1);
        assert_eq!(canvas.get(10, 10), Some(paint()));
        assert_eq!(canvas.inventory().total(), 1);
    }

    #[test]
    fn brush_is_clipped_at_every_edge() {
        let mut canvas = Canvas::new(16);
        paint_at(&mut canvas, GridPos::new(0, 0), 5, paint());
        // offset 2: columns/rows -2..=2 → only 0..=2 survive
        assert_eq!(canvas.inventory().total(), 9);
        paint_at(&mut canvas, GridPos::new(15, 15), 10, paint());
        paint_at(&mut canvas, GridPos::new(-50, 7), 10, paint());
        paint_at(&mut canvas, GridPos::new(i32::MAX, i32::MIN), 10, paint());
        assert_eq!(canvas.recount(), *canvas.inventory());
        assert!(canvas.painted().all(|(p, _)| canvas.in_bounds(p.x, p.y)));
    }

    #[test]
    fn non_positive_brush_paints_nothing() {
        let mut canvas = Canvas::new(16);
        assert_eq!(paint_at(&mut canvas, GridPos::new(4, 4), 0, paint()), 0);
        assert_eq!(paint_at(&mut canvas, GridPos::new(4, 4), -3, paint()), 0);
        assert!(canvas.inventory().is_empty());
    }

    #[test]
    fn huge_brush_only_visits_the_grid() {
        let mut canvas = Canvas::new(64);
        assert_eq!(paint_at(&mut canvas, GridPos::new(10, 10), 1_000_000, paint()), 64 * 64);
        assert_eq!(paint_at(&mut canvas, GridPos::new(i32::MIN, i32::MAX), i32::MAX, paint()), 0);

        let mut far = Canvas::new(64);
        // kernel spans x in [i32::MAX - 2^29, ...), entirely right of the grid
        assert_eq!(paint_at(&mut far, GridPos::new(i32::MAX, 5), 1 << 30, paint()), 0);
        assert!(far.inventory().is_empty());
    }

    #[test]
    fn paint_at_matches_footprint_when_inside() {
        let mut canvas = Canvas::new(32);
        paint_at(&mut canvas, GridPos::new(9, 12), 4, paint());
        let mut expected: Vec<_> = brush_footprint(GridPos::new(9, 12), 4).collect();
        expected.sort_by_key(|p| (p.y, p.x));
        let painted: Vec<_> = canvas.painted().map(|(p, _)| p).collect();
        assert_eq!(painted, expected);
    }

    #[test]
    fn even_brush_leans_up_left() {
        let cells: Vec<_> = brush_footprint(GridPos::new(5, 5), 2).collect();
        assert_eq!(
            cells,
            vec![GridPos::new(4, 4), GridPos::new(4, 5), GridPos::new(5, 4), GridPos::new(5, 5)]
        );
    }

    #[test]
    fn degenerate_line_equals_point() {
        let mut a = Canvas::new(32);
        let mut b = Canvas::new(32);
        let at = GridPos::new(7, 9);
        paint_line(&mut a, at, at, 3, paint());
        paint_at(&mut b, at, 3, paint());
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn line_is_continuous() {
        let pts = line_points(GridPos::new(0, 0), GridPos::new(9, 4));
        assert_eq!(pts.first(), Some(&GridPos::new(0, 0)));
        assert_eq!(pts.last(), Some(&GridPos::new(9, 4)));
        for w in pts.windows(2) {
            assert!((w[1].x - w[0].x).abs() <= 1 && (w[1].y - w[0].y).abs() <= 1);
        }
        assert_eq!(pts.len(), 10);
    }

    #[test]
    fn wide_line_covers_a_band() {
        let mut canvas = Canvas::new(32);
        paint_line(&mut canvas, GridPos::new(5, 10), GridPos::new(20, 10), 3, paint());
        // 16 columns × 3 rows, plus one column of overhang on each end
        assert_eq!(canvas.inventory().total(), 18 * 3);
    }
}
