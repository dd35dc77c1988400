use crate::canvas::{Canvas, GridPos};
use crate::palette::{EntryId, Paint, Variant};

/// Side of every stamp bitmap, in bitmap cells.
pub const STAMP_SIDE: i32 = 8;

/// Stamp bitmaps hold shade indices 0..=3 (shadow, normal, light, deep).
type Bitmap = [[u8; 8]; 8];

const GRIN: Bitmap = [
    [0, 0, 0, 0, 0, 0, 0, 0], // hair
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 0], // forehead
    [0, 2, 3, 1, 1, 3, 2, 0], // eyes
    [1, 2, 3, 1, 1, 3, 2, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 2, 2, 2, 2, 3, 3], // teeth
    [1, 1, 2, 2, 2, 2, 1, 1], // chin
];

const DERP: Bitmap = [
    [0, 0, 0, 0, 0, 0, 0, 0], // hair
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 0], // forehead
    [1, 3, 1, 1, 1, 1, 3, 1], // pupils at the edges
    [1, 1, 3, 2, 3, 3, 1, 1], // mouth
    [1, 1, 1, 3, 2, 2, 1, 1],
    [1, 1, 1, 1, 2, 1, 1, 1], // chin
];

/// Named multi-shade figures painted in one click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum StampPattern {
    #[default]
    Grin,
    Derp,
}

impl StampPattern {
    pub fn label(&self) -> String {
        match self {
            StampPattern::Grin => t!("stamp.grin"),
            StampPattern::Derp => t!("stamp.derp"),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            StampPattern::Grin => "grin",
            StampPattern::Derp => "derp",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "grin" => Some(StampPattern::Grin),
            "derp" => Some(StampPattern::Derp),
            _ => None,
        }
    }

    pub fn all() -> &'static [StampPattern] {
        &[StampPattern::Grin, StampPattern::Derp]
    }

    fn bitmap(&self) -> &'static Bitmap {
        match self {
            StampPattern::Grin => &GRIN,
            StampPattern::Derp => &DERP,
        }
    }

    /// Shade at bitmap cell (`col`, `row`).
    pub fn variant_at(&self, col: usize, row: usize) -> Option<Variant> {
        let idx = *self.bitmap().get(row)?.get(col)?;
        Variant::from_index(idx as usize)
    }

    /// Paint the pattern centred on `center`, each bitmap cell blown up to a
    /// `scale`×`scale` block. Cells falling outside the grid are dropped.
    pub fn stamp(&self, canvas: &mut Canvas, center: GridPos, scale: i32, entry: EntryId) -> usize {
        let scale = scale.max(1) as i64;
        let size = canvas.size() as i64;
        let half = (STAMP_SIDE as i64 * scale) / 2;
        // block origin along one axis, clipped to [0, size)
        let span = |c: i32, k: usize| {
            let lo = c as i64 + k as i64 * scale - half;
            (lo.clamp(0, size) as i32, (lo + scale).clamp(0, size) as i32)
        };
        let mut changed = 0;
        for (row, line) in self.bitmap().iter().enumerate() {
            let (y0, y1) = span(center.y, row);
            for (col, &idx) in line.iter().enumerate() {
                let Some(variant) = Variant::from_index(idx as usize) else { continue };
                let paint = Paint::new(entry, variant);
                let (x0, x1) = span(center.x, col);
                for y in y0..y1 {
                    for x in x0..x1 {
                        if canvas.set(x, y, Some(paint)) {
                            changed += 1;
                        }
                    }
                }
            }
        }
        changed
    }
}
