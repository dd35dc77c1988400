use crate::canvas::{Canvas, GridPos};
use crate::ops::paint::{line_points, paint_at, pull_in};
use crate::palette::Paint;

/// Available outline primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Square,
    Circle,
    Triangle,
}

impl ShapeKind {
    pub fn label(&self) -> String {
        match self {
            ShapeKind::Square => t!("tool.square"),
            ShapeKind::Circle => t!("tool.circle"),
            ShapeKind::Triangle => t!("tool.triangle"),
        }
    }

    pub fn all() -> &'static [ShapeKind] {
        &[ShapeKind::Square, ShapeKind::Circle, ShapeKind::Triangle]
    }

    /// Centre cells of the outline between an anchor and a release point,
    /// before the brush is applied. May contain duplicates.
    pub fn outline(&self, start: GridPos, end: GridPos) -> Vec<GridPos> {
        let (start, end) = (pull_in(start), pull_in(end));
        match self {
            ShapeKind::Square => square_outline(start, end),
            ShapeKind::Circle => circle_outline(start, end),
            ShapeKind::Triangle => triangle_outline(start, end),
        }
    }

    /// Draw the outline in one pass with the current brush.
    pub fn draw(&self, canvas: &mut Canvas, start: GridPos, end: GridPos, brush_size: i32, paint: Paint) -> usize {
        let reach = brush_size.max(0);
        let near = -reach..(canvas.size() as i32).saturating_add(reach);
        self.outline(start, end)
            .into_iter()
            .filter(|p| near.contains(&p.x) && near.contains(&p.y))
            .map(|p| paint_at(canvas, p, brush_size, paint))
            .sum()
    }
}

/// Four edges of the bounding box of `a` and `b`, unfilled.
pub fn square_outline(a: GridPos, b: GridPos) -> Vec<GridPos> {
    let (left, right) = (a.x.min(b.x), a.x.max(b.x));
    let (top, bottom) = (a.y.min(b.y), a.y.max(b.y));
    let mut pts = Vec::new();
    for x in left..=right {
        pts.push(GridPos::new(x, top));
        pts.push(GridPos::new(x, bottom));
    }
    for y in top..=bottom {
        pts.push(GridPos::new(left, y));
        pts.push(GridPos::new(right, y));
    }
    pts
}

/// Midpoint circle around `center`; the radius is the truncated distance to `rim`.
pub fn circle_outline(center: GridPos, rim: GridPos) -> Vec<GridPos> {
    let dx = (rim.x as f64) - (center.x as f64);
    let dy = (rim.y as f64) - (center.y as f64);
    let radius = (dx * dx + dy * dy).sqrt().floor() as i32;

    let (cx, cy) = (center.x, center.y);
    let mut pts = Vec::new();
    let (mut x, mut y, mut err) = (radius, 0i32, 0i32);
    while x >= y {
        pts.extend_from_slice(&[
            GridPos::new(cx + x, cy + y),
            GridPos::new(cx + y, cy + x),
            GridPos::new(cx - y, cy + x),
            GridPos::new(cx - x, cy + y),
            GridPos::new(cx - x, cy - y),
            GridPos::new(cx - y, cy - x),
            GridPos::new(cx + y, cy - x),
            GridPos::new(cx + x, cy - y),
        ]);
        if err <= 0 {
            y += 1;
            err += 2 * y + 1;
        }
        if err > 0 {
            x -= 1;
            err -= 2 * x + 1;
        }
    }
    pts
}

/// Isosceles triangle: apex at `apex`, one base corner at `corner`, the other
/// mirrored across the vertical through the apex.
pub fn triangle_outline(apex: GridPos, corner: GridPos) -> Vec<GridPos> {
    let mirrored = GridPos::new(apex.x - (corner.x - apex.x), corner.y);
    let mut pts = line_points(apex, corner);
    pts.extend(line_points(corner, mirrored));
    pts.extend(line_points(mirrored, apex));
    pts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Variant;
    use std::collections::HashSet;

    fn paint() -> Paint {
        Paint::new(0, Variant::Normal)
    }

    #[test]
    fn square_paints_exact_perimeter() {
        let mut canvas = Canvas::new(128);
        ShapeKind::Square.draw(&mut canvas, GridPos::new(5, 5), GridPos::new(10, 12), 1, paint());
        let (w, h) = (6, 8);
        assert_eq!(canvas.inventory().total(), 2 * w + 2 * h - 4);
        assert!(canvas.get(5, 5).is_some() && canvas.get(10, 12).is_some());
        assert!(canvas.get(7, 8).is_none());
        for (p, _) in canvas.painted() {
            assert!(p.x == 5 || p.x == 10 || p.y == 5 || p.y == 12);
        }
    }

    #[test]
    fn square_is_order_independent() {
        let a: HashSet<_> = square_outline(GridPos::new(5, 5), GridPos::new(10, 12)).into_iter().collect();
        let b: HashSet<_> = square_outline(GridPos::new(10, 12), GridPos::new(5, 5)).into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn circle_is_symmetric_and_on_radius() {
        let c = GridPos::new(50, 50);
        let pts: HashSet<_> = circle_outline(c, GridPos::new(53, 54)).into_iter().collect();
        assert!(pts.contains(&GridPos::new(55, 50)));
        assert!(pts.contains(&GridPos::new(45, 50)));
        assert!(pts.contains(&GridPos::new(50, 55)));
        assert!(pts.contains(&GridPos::new(50, 45)));
        for p in &pts {
            assert!(pts.contains(&GridPos::new(2 * c.x - p.x, p.y)));
            assert!(pts.contains(&GridPos::new(p.x, 2 * c.y - p.y)));
            let d = (((p.x - c.x).pow(2) + (p.y - c.y).pow(2)) as f64).sqrt();
            assert!((d - 5.0).abs() < 1.0);
        }
    }

    #[test]
    fn zero_radius_circle_is_one_cell() {
        let mut canvas = Canvas::new(16);
        ShapeKind::Circle.draw(&mut canvas, GridPos::new(3, 3), GridPos::new(3, 3), 1, paint());
        assert_eq!(canvas.inventory().total(), 1);
    }

    #[test]
    fn triangle_mirrors_around_apex() {
        let pts: HashSet<_> = triangle_outline(GridPos::new(20, 10), GridPos::new(25, 20)).into_iter().collect();
        assert!(pts.contains(&GridPos::new(20, 10)));
        assert!(pts.contains(&GridPos::new(25, 20)));
        assert!(pts.contains(&GridPos::new(15, 20)));
        for x in 15..=25 {
            assert!(pts.contains(&GridPos::new(x, 20)));
        }
    }

    #[test]
    fn extreme_anchors_clip_without_overflow() {
        let far = [
            (GridPos::new(0, 0), GridPos::new(2_000_000_000, 0)),
            (GridPos::new(-10, 0), GridPos::new(i32::MAX, 0)),
            (GridPos::new(i32::MIN, i32::MIN), GridPos::new(i32::MAX, i32::MAX)),
            (GridPos::new(0, 0), GridPos::new(50_000_000, 0)),
        ];
        for shape in ShapeKind::all() {
            for (a, b) in far {
                let mut canvas = Canvas::new(32);
                shape.draw(&mut canvas, a, b, 3, paint());
                assert_eq!(canvas.recount(), *canvas.inventory());
                assert!(canvas.painted().all(|(p, _)| canvas.in_bounds(p.x, p.y)));
            }
        }
    }

    #[test]
    fn far_square_release_still_draws_visible_edges() {
        let mut canvas = Canvas::new(16);
        ShapeKind::Square.draw(&mut canvas, GridPos::new(2, 2), GridPos::new(50_000_000, 5), 1, paint());
        // top and bottom edges run off the right side; the left edge is whole
        assert_eq!(canvas.inventory().total(), 14 * 2 + 2);
        assert!(canvas.get(2, 3).is_some() && canvas.get(15, 5).is_some());
    }

    #[test]
    fn shapes_clip_outside_grid() {
        let mut canvas = Canvas::new(16);
        ShapeKind::Circle.draw(&mut canvas, GridPos::new(0, 0), GridPos::new(30, 0), 2, paint());
        ShapeKind::Triangle.draw(&mut canvas, GridPos::new(8, -40), GridPos::new(60, 40), 3, paint());
        assert_eq!(canvas.recount(), *canvas.inventory());
    }
}
