use crate::canvas::{Canvas, GridPos};
use crate::palette::Paint;

/// 4-connected flood fill from `start` with `paint`.
///
/// Replaces the connected region of cells whose content equals the start
/// cell's (empty included). Uses an explicit Vec stack and a visited mask, so
/// it terminates after at most N² pops and never recurses. Returns the number
/// of cells filled; a start outside the grid or already holding `paint` is a
/// no-op.
pub fn flood_fill(canvas: &mut Canvas, start: GridPos, paint: Paint) -> usize {
    if !canvas.in_bounds(start.x, start.y) {
        return 0;
    }
    let target = canvas.get(start.x, start.y);
    if target == Some(paint) {
        log_info!("Fill at ({}, {}) skipped: cell already holds the fill shade", start.x, start.y);
        return 0;
    }

    let size = canvas.size();
    let wu = size as usize;
    // mask doubles as the visited array
    let mut visited = vec![false; wu * wu];

    // DFS stack stores packed flat indices: y * size + x
    let seed = start.y as usize * wu + start.x as usize;
    let mut stack: Vec<u32> = Vec::with_capacity(1024);
    visited[seed] = true;
    stack.push(seed as u32);

    let mut filled = 0;
    while let Some(idx) = stack.pop() {
        let x = (idx as usize % wu) as u32;
        let y = (idx as usize / wu) as u32;
        canvas.set(x as i32, y as i32, Some(paint));
        filled += 1;

        let mut visit = |ni: usize, nx: u32, ny: u32| {
            if !visited[ni] && canvas.get(nx as i32, ny as i32) == target {
                visited[ni] = true;
                stack.push(ni as u32);
            }
        };
        // Left
        if x > 0 {
            visit(idx as usize - 1, x - 1, y);
        }
        // Right
        if x + 1 < size {
            visit(idx as usize + 1, x + 1, y);
        }
        // Up
        if y > 0 {
            visit(idx as usize - wu, x, y - 1);
        }
        // Down
        if y + 1 < size {
            visit(idx as usize + wu, x, y + 1);
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::shapes::ShapeKind;
    use crate::palette::Variant;

    #[test]
    fn uniform_grid_fills_completely() {
        let mut canvas = Canvas::new(128);
        let paint = Paint::new(0, Variant::Normal);
        assert_eq!(flood_fill(&mut canvas, GridPos::new(64, 64), paint), 128 * 128);
        assert_eq!(canvas.inventory().total(), 128 * 128);
    }

    #[test]
    fn second_fill_is_a_no_op() {
        let mut canvas = Canvas::new(32);
        let paint = Paint::new(1, Variant::Deep);
        flood_fill(&mut canvas, GridPos::new(3, 3), paint);
        let before = canvas.cells().to_vec();
        assert_eq!(flood_fill(&mut canvas, GridPos::new(3, 3), paint), 0);
        assert_eq!(canvas.cells(), &before[..]);
    }

    #[test]
    fn fill_stops_at_outline() {
        let mut canvas = Canvas::new(32);
        let wall = Paint::new(0, Variant::Shadow);
        let inside = Paint::new(0, Variant::Light);
        ShapeKind::Square.draw(&mut canvas, GridPos::new(5, 5), GridPos::new(10, 12), 1, wall);
        let n = flood_fill(&mut canvas, GridPos::new(7, 7), inside);
        assert_eq!(n, 4 * 6);
        assert_eq!(canvas.inventory().get(inside), 24);
        assert_eq!(canvas.get(0, 0), None);
    }

    #[test]
    fn single_cell_target_fills_one_cell() {
        let mut canvas = Canvas::new(16);
        let other = Paint::new(0, Variant::Normal);
        let fill = Paint::new(0, Variant::Deep);
        canvas.set(4, 4, Some(other));
        assert_eq!(flood_fill(&mut canvas, GridPos::new(4, 4), fill), 1);
        assert_eq!(canvas.inventory().get(fill), 1);
        assert_eq!(canvas.inventory().get(other), 0);
    }

    #[test]
    fn diagonal_neighbours_are_not_connected() {
        let mut canvas = Canvas::new(4);
        let a = Paint::new(0, Variant::Normal);
        canvas.set(0, 0, Some(a));
        canvas.set(1, 1, Some(a));
        flood_fill(&mut canvas, GridPos::new(0, 0), Paint::new(0, Variant::Deep));
        assert_eq!(canvas.get(1, 1), Some(a));
    }

    #[test]
    fn out_of_range_start_is_ignored() {
        let mut canvas = Canvas::new(8);
        assert_eq!(flood_fill(&mut canvas, GridPos::new(-1, 2), Paint::new(0, Variant::Normal)), 0);
        assert_eq!(flood_fill(&mut canvas, GridPos::new(2, 8), Paint::new(0, Variant::Normal)), 0);
        assert!(canvas.inventory().is_empty());
    }
}
