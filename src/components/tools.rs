use std::sync::Arc;

use crate::canvas::{Canvas, GridPos};
use crate::inventory::Inventory;
use crate::ops::fill::flood_fill;
use crate::ops::paint::{paint_at, paint_line};
use crate::ops::shapes::ShapeKind;
use crate::ops::stamp::{STAMP_SIDE, StampPattern};
use crate::ops::surface::{DEFAULT_SURFACE_SIZE, SurfaceGeometry};
use crate::palette::{Catalog, EntryId, Paint, Rgb, Variant, VariantSet};
use crate::settings::EditorSettings;

pub const MIN_BRUSH_SIZE: i32 = 1;
pub const MAX_BRUSH_SIZE: i32 = 10;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 4.0;
pub const ZOOM_STEP: f32 = 0.5;

/// Clamp to 1.0..=4.0 and snap to the 0.5 step.
pub fn clamp_zoom(zoom: f32) -> f32 {
    if !zoom.is_finite() {
        return MIN_ZOOM;
    }
    ((zoom.clamp(MIN_ZOOM, MAX_ZOOM) / ZOOM_STEP).round() * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Brush,
    Fill,
    Square,
    Circle,
    Triangle,
    /// Multi-shade figure ("skin") stamped in one click.
    Stamp,
}

impl Tool {
    pub fn label(&self) -> String {
        match self {
            Tool::Brush => t!("tool.brush"),
            Tool::Fill => t!("tool.fill"),
            Tool::Square => t!("tool.square"),
            Tool::Circle => t!("tool.circle"),
            Tool::Triangle => t!("tool.triangle"),
            Tool::Stamp => t!("tool.stamp"),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Tool::Brush => "brush",
            Tool::Fill => "fill",
            Tool::Square => "square",
            Tool::Circle => "circle",
            Tool::Triangle => "triangle",
            Tool::Stamp => "stamp",
        }
    }

    pub fn from_key(key: &str) -> Option<Tool> {
        match key.trim().to_lowercase().as_str() {
            "brush" => Some(Tool::Brush),
            "fill" | "bucket" => Some(Tool::Fill),
            "square" => Some(Tool::Square),
            "circle" => Some(Tool::Circle),
            "triangle" => Some(Tool::Triangle),
            "stamp" | "skin" => Some(Tool::Stamp),
            _ => None,
        }
    }

    /// Two-phase outline tools: press anchors, release draws.
    pub fn shape(&self) -> Option<ShapeKind> {
        match self {
            Tool::Square => Some(ShapeKind::Square),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Triangle => Some(ShapeKind::Triangle),
            _ => None,
        }
    }

    pub fn all() -> &'static [Tool] {
        &[Tool::Brush, Tool::Fill, Tool::Square, Tool::Circle, Tool::Triangle, Tool::Stamp]
    }
}

/// User-controlled tool parameters. Only direct input mutates these.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    /// Side of the square brush kernel, 1..=10.
    pub brush_size: i32,
    /// View magnification, 1.0..=4.0 in 0.5 steps.
    pub zoom: f32,
    pub variant: Variant,
    pub stamp: StampPattern,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            brush_size: MIN_BRUSH_SIZE,
            zoom: 1.0,
            variant: Variant::Normal,
            stamp: StampPattern::Grin,
        }
    }
}

impl ToolState {
    /// Edge of the cursor preview in cells.
    pub fn preview_cells(&self) -> i32 {
        if self.tool == Tool::Stamp {
            STAMP_SIDE * self.brush_size
        } else {
            self.brush_size
        }
    }
}

/// Tracks the drag in progress for freehand strokes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrokeSession {
    /// Cell where the drag began; axis lock pins to it.
    pub start: GridPos,
    /// Last cell visited; the next move interpolates from here.
    pub last: GridPos,
}

/// Pin the axis with the smaller delta from `start`, giving a straight
/// horizontal or vertical stroke. Ties keep the x of `start`.
pub fn axis_lock(start: GridPos, pos: GridPos) -> GridPos {
    let dx = (pos.x as i64 - start.x as i64).abs();
    let dy = (pos.y as i64 - start.y as i64).abs();
    if dx > dy {
        GridPos::new(pos.x, start.y)
    } else {
        GridPos::new(start.x, pos.y)
    }
}

/// Converts screen-space pointer coordinates to grid cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerMapper {
    /// Screen position of the surface's top-left corner.
    pub origin: (f32, f32),
    /// On-screen edge length of the surface (physical size × zoom).
    pub displayed_size: f32,
    pub grid_size: u32,
}

impl PointerMapper {
    pub fn new(origin: (f32, f32), displayed_size: f32, grid_size: u32) -> Self {
        Self {
            origin,
            displayed_size,
            grid_size: grid_size.max(1),
        }
    }

    /// `floor((screen - origin) / (displayed_size / N))` on each axis.
    /// Results may fall outside the grid; painting clips them.
    pub fn to_grid(&self, sx: f32, sy: f32) -> GridPos {
        let cell = self.displayed_size / self.grid_size as f32;
        if !(cell > 0.0) {
            return GridPos::new(-1, -1);
        }
        let gx = ((sx - self.origin.0) / cell).floor();
        let gy = ((sy - self.origin.1) / cell).floor();
        GridPos::new(gx as i32, gy as i32)
    }
}

/// State-change notifications for anything displaying editor state.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    ToolChanged(Tool),
    BrushSizeChanged(i32),
    ZoomChanged(f32),
    VariantChanged(Variant),
    StampChanged(StampPattern),
    EntrySelected(Option<EntryId>),
    /// The grid was modified; carries the new inventory total.
    InventoryChanged { total: usize },
    Cleared,
}

type Listener = Box<dyn FnMut(&EditorEvent)>;

// ============================================================================
// EDITOR — owns the canvas and routes pointer input to tool operations
// ============================================================================

pub struct Editor {
    canvas: Canvas,
    catalog: Arc<Catalog>,
    tools: ToolState,
    surface_size: u32,
    selected: Option<EntryId>,
    stroke: Option<StrokeSession>,
    shape_anchor: Option<GridPos>,
    listeners: Vec<Listener>,
}

impl Editor {
    pub fn new(catalog: Arc<Catalog>, grid_size: u32) -> Self {
        let canvas = Canvas::new(grid_size);
        let surface_size = SurfaceGeometry::new(canvas.size(), DEFAULT_SURFACE_SIZE).surface_size();
        Self {
            canvas,
            catalog,
            tools: ToolState::default(),
            surface_size,
            selected: None,
            stroke: None,
            shape_anchor: None,
            listeners: Vec::new(),
        }
    }

    pub fn from_settings(catalog: Arc<Catalog>, settings: &EditorSettings) -> Self {
        let mut editor = Self::new(catalog, settings.grid_size);
        editor.surface_size = SurfaceGeometry::new(editor.canvas.size(), settings.surface_size).surface_size();
        editor.tools.brush_size = settings.brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        editor.tools.zoom = clamp_zoom(settings.zoom);
        editor.tools.variant = settings.variant;
        editor.tools.stamp = settings.stamp_pattern;
        editor
    }

    /// Register a callback for every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: EditorEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn emit_inventory(&mut self) {
        let total = self.canvas.inventory().total();
        self.emit(EditorEvent::InventoryChanged { total });
    }

    // ---- read access -----------------------------------------------------

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn inventory(&self) -> &Inventory {
        self.canvas.inventory()
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn surface_size(&self) -> u32 {
        self.surface_size
    }

    pub fn selected_entry(&self) -> Option<EntryId> {
        self.selected
    }

    /// Four shades of the selected entry.
    pub fn variant_colors(&self) -> Option<VariantSet> {
        self.selected
            .and_then(|id| self.catalog.get(id))
            .map(|e| e.variants())
    }

    pub fn active_color(&self) -> Option<Rgb> {
        self.variant_colors().map(|set| set.get(self.tools.variant))
    }

    /// What the brush lays down right now; `None` until an entry is selected.
    pub fn active_paint(&self) -> Option<Paint> {
        self.selected.map(|id| Paint::new(id, self.tools.variant))
    }

    pub fn is_painting(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn shape_anchor(&self) -> Option<GridPos> {
        self.shape_anchor
    }

    /// Screen→grid mapper for a surface drawn at `origin` with the current zoom.
    pub fn pointer_mapper(&self, origin: (f32, f32)) -> PointerMapper {
        PointerMapper::new(origin, self.surface_size as f32 * self.tools.zoom, self.canvas.size())
    }

    // ---- tool state ------------------------------------------------------

    /// Select a catalog entry; unknown ids are ignored.
    pub fn select_entry(&mut self, id: EntryId) -> bool {
        let Some(entry) = self.catalog.get(id) else {
            log_warn!("Ignoring selection of unknown palette entry {}", id);
            return false;
        };
        log_info!("Selected palette entry '{}'", entry.representative_name());
        self.selected = Some(id);
        self.emit(EditorEvent::EntrySelected(Some(id)));
        true
    }

    /// Select the entry listing `name`.
    pub fn select_block(&mut self, name: &str) -> bool {
        match self.catalog.find_by_name(name) {
            Some(id) => self.select_entry(id),
            None => false,
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tools.tool != tool {
            self.tools.tool = tool;
            self.stroke = None;
            self.shape_anchor = None;
            self.emit(EditorEvent::ToolChanged(tool));
        }
    }

    pub fn set_brush_size(&mut self, size: i32) {
        let size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        if self.tools.brush_size != size {
            self.tools.brush_size = size;
            self.emit(EditorEvent::BrushSizeChanged(size));
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        let zoom = clamp_zoom(zoom);
        if self.tools.zoom != zoom {
            self.tools.zoom = zoom;
            self.emit(EditorEvent::ZoomChanged(zoom));
        }
    }

    pub fn set_variant(&mut self, variant: Variant) {
        if self.tools.variant != variant {
            self.tools.variant = variant;
            self.emit(EditorEvent::VariantChanged(variant));
        }
    }

    pub fn set_stamp(&mut self, stamp: StampPattern) {
        if self.tools.stamp != stamp {
            self.tools.stamp = stamp;
            self.emit(EditorEvent::StampChanged(stamp));
        }
    }

    // ---- pointer input ---------------------------------------------------

    /// Press: fill and stamp act at once, outline tools record their anchor,
    /// the brush starts a stroke session.
    pub fn pointer_down(&mut self, pos: GridPos) {
        let size = self.tools.brush_size;
        match self.tools.tool {
            Tool::Fill => {
                if let Some(paint) = self.active_paint() {
                    flood_fill(&mut self.canvas, pos, paint);
                    self.emit_inventory();
                }
            }
            Tool::Stamp => {
                if let Some(entry) = self.selected {
                    self.tools.stamp.stamp(&mut self.canvas, pos, size, entry);
                    self.emit_inventory();
                }
            }
            Tool::Square | Tool::Circle | Tool::Triangle => {
                self.shape_anchor = Some(pos);
            }
            Tool::Brush => {
                self.stroke = Some(StrokeSession { start: pos, last: pos });
                if let Some(paint) = self.active_paint() {
                    paint_at(&mut self.canvas, pos, size, paint);
                }
            }
        }
    }

    /// Drag: extend the active stroke from the last visited cell. With
    /// `lock_axis` the stroke is kept straight relative to its start.
    pub fn pointer_move(&mut self, pos: GridPos, lock_axis: bool) {
        let Some(session) = self.stroke else { return };
        let pos = if lock_axis { axis_lock(session.start, pos) } else { pos };
        if let Some(paint) = self.active_paint() {
            paint_line(&mut self.canvas, session.last, pos, self.tools.brush_size, paint);
        }
        self.stroke = Some(StrokeSession { last: pos, ..session });
    }

    /// Release: finish any pending outline, end the session, publish the
    /// inventory once.
    pub fn pointer_up(&mut self, pos: GridPos) {
        if let Some(anchor) = self.shape_anchor.take()
            && let (Some(shape), Some(paint)) = (self.tools.tool.shape(), self.active_paint())
        {
            shape.draw(&mut self.canvas, anchor, pos, self.tools.brush_size, paint);
        }
        self.stroke = None;
        self.emit_inventory();
    }

    /// Screen-space press through `mapper`.
    pub fn pointer_down_at(&mut self, mapper: &PointerMapper, sx: f32, sy: f32) {
        self.pointer_down(mapper.to_grid(sx, sy));
    }

    pub fn pointer_move_at(&mut self, mapper: &PointerMapper, sx: f32, sy: f32, lock_axis: bool) {
        self.pointer_move(mapper.to_grid(sx, sy), lock_axis);
    }

    pub fn pointer_up_at(&mut self, mapper: &PointerMapper, sx: f32, sy: f32) {
        self.pointer_up(mapper.to_grid(sx, sy));
    }

    /// Erase every cell and reset the inventory.
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.stroke = None;
        self.shape_anchor = None;
        log_info!("Canvas cleared");
        self.emit(EditorEvent::Cleared);
        self.emit_inventory();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteEntry;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn editor() -> Editor {
        let catalog = Catalog::new(vec![PaletteEntry {
            id: 7,
            category: "DIRT".into(),
            rgb: [155, 108, 71],
            names: vec!["Dirt".into()],
        }]);
        let mut editor = Editor::new(Arc::new(catalog), 128);
        assert!(editor.select_entry(0));
        editor
    }

    #[test]
    fn brown_normal_point_scenario() {
        let mut ed = editor();
        assert_eq!(ed.active_color(), Some([133, 93, 61]));
        ed.pointer_down(GridPos::new(10, 10));
        ed.pointer_up(GridPos::new(10, 10));
        let rows = ed.inventory().by_name(ed.catalog(), &crate::i18n::Identity);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.get("Dirt"), Some(&1));
    }

    #[test]
    fn axis_lock_drag_draws_horizontal_line() {
        let mut ed = editor();
        ed.pointer_down(GridPos::new(20, 20));
        ed.pointer_move(GridPos::new(25, 23), true);
        ed.pointer_up(GridPos::new(25, 23));
        let painted: Vec<_> = ed.canvas().painted().map(|(p, _)| p).collect();
        assert_eq!(painted.len(), 6);
        assert!(painted.iter().all(|p| p.y == 20 && (20..=25).contains(&p.x)));
    }

    #[test]
    fn axis_lock_rule() {
        let s = GridPos::new(20, 20);
        assert_eq!(axis_lock(s, GridPos::new(25, 23)), GridPos::new(25, 20));
        assert_eq!(axis_lock(s, GridPos::new(22, 29)), GridPos::new(20, 29));
        assert_eq!(axis_lock(s, GridPos::new(23, 23)), GridPos::new(20, 23));
    }

    #[test]
    fn fast_drag_leaves_no_gaps() {
        let mut ed = editor();
        ed.pointer_down(GridPos::new(0, 0));
        ed.pointer_move(GridPos::new(40, 10), false);
        ed.pointer_move(GridPos::new(40, 60), false);
        ed.pointer_up(GridPos::new(40, 60));
        assert_eq!(ed.canvas().get(40, 35), Some(Paint::new(0, Variant::Normal)));
        assert_eq!(ed.canvas().get(20, 5), Some(Paint::new(0, Variant::Normal)));
    }

    #[test]
    fn move_without_press_paints_nothing() {
        let mut ed = editor();
        ed.pointer_move(GridPos::new(5, 5), false);
        assert!(ed.inventory().is_empty());
        ed.pointer_down(GridPos::new(1, 1));
        ed.pointer_up(GridPos::new(1, 1));
        ed.pointer_move(GridPos::new(9, 9), false);
        assert_eq!(ed.inventory().total(), 1);
    }

    #[test]
    fn shape_is_drawn_on_release_only() {
        let mut ed = editor();
        ed.set_tool(Tool::Square);
        ed.pointer_down(GridPos::new(5, 5));
        ed.pointer_move(GridPos::new(8, 8), false);
        assert!(ed.inventory().is_empty());
        ed.pointer_up(GridPos::new(10, 12));
        assert_eq!(ed.inventory().total(), 24);
        assert_eq!(ed.shape_anchor(), None);
    }

    #[test]
    fn nothing_selected_means_no_paint() {
        let mut ed = Editor::new(Arc::new(Catalog::default()), 16);
        assert!(!ed.select_entry(0));
        for tool in Tool::all() {
            ed.set_tool(*tool);
            ed.pointer_down(GridPos::new(3, 3));
            ed.pointer_move(GridPos::new(9, 9), false);
            ed.pointer_up(GridPos::new(9, 9));
        }
        assert!(ed.inventory().is_empty());
    }

    #[test]
    fn fill_and_stamp_act_on_press() {
        let mut ed = editor();
        ed.set_tool(Tool::Fill);
        ed.set_variant(Variant::Deep);
        ed.pointer_down(GridPos::new(0, 0));
        assert_eq!(ed.inventory().total(), 128 * 128);

        ed.clear();
        assert!(ed.inventory().is_empty());
        ed.set_tool(Tool::Stamp);
        ed.set_brush_size(2);
        ed.pointer_down(GridPos::new(64, 64));
        assert_eq!(ed.inventory().total(), 16 * 16);
    }

    #[test]
    fn setters_clamp_and_notify() {
        let mut ed = editor();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        ed.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        ed.set_brush_size(50);
        ed.set_brush_size(-2);
        ed.set_zoom(2.3);
        ed.set_zoom(9.0);
        ed.set_tool(Tool::Stamp);
        ed.pointer_down(GridPos::new(30, 30));
        ed.clear();

        let events = events.borrow();
        assert_eq!(events[0], EditorEvent::BrushSizeChanged(10));
        assert_eq!(events[1], EditorEvent::BrushSizeChanged(1));
        assert_eq!(events[2], EditorEvent::ZoomChanged(2.5));
        assert_eq!(events[3], EditorEvent::ZoomChanged(4.0));
        assert_eq!(events[4], EditorEvent::ToolChanged(Tool::Stamp));
        assert_eq!(events[5], EditorEvent::InventoryChanged { total: 64 });
        assert_eq!(events[6], EditorEvent::Cleared);
        assert_eq!(events[7], EditorEvent::InventoryChanged { total: 0 });
        assert_eq!(ed.tools().preview_cells(), 8);
    }

    #[test]
    fn every_tool_tolerates_extreme_positions() {
        let extremes = [
            (GridPos::new(0, 0), GridPos::new(2_000_000_000, 0)),
            (GridPos::new(-10, 0), GridPos::new(i32::MAX, 0)),
            (GridPos::new(i32::MAX, 5), GridPos::new(i32::MAX, 5)),
            (GridPos::new(i32::MIN, i32::MAX), GridPos::new(i32::MAX, i32::MIN)),
            (GridPos::new(0, 0), GridPos::new(50_000_000, 0)),
        ];
        for tool in Tool::all() {
            for (down, up) in extremes {
                let mut ed = editor();
                ed.set_tool(*tool);
                ed.set_brush_size(MAX_BRUSH_SIZE);
                ed.pointer_down(down);
                ed.pointer_move(up, false);
                ed.pointer_move(up, true);
                ed.pointer_up(up);
                let canvas = ed.canvas();
                assert_eq!(canvas.recount(), *canvas.inventory(), "{:?} {:?}->{:?}", tool, down, up);
                assert!(canvas.inventory().total() <= 128 * 128);
            }
        }
    }

    #[test]
    fn huge_screen_coordinates_map_and_clip() {
        let mut ed = editor();
        ed.set_tool(Tool::Circle);
        let m = ed.pointer_mapper((0.0, 0.0));
        assert_eq!(m.to_grid(1.0e12, 10.0).x, i32::MAX);
        assert_eq!(m.to_grid(f32::NEG_INFINITY, 10.0).x, i32::MIN);
        ed.pointer_down_at(&m, 30.0, 30.0);
        ed.pointer_up_at(&m, 1.0e12, 10.0);
        ed.set_tool(Tool::Triangle);
        ed.pointer_down_at(&m, f32::NAN, 10.0);
        ed.pointer_up_at(&m, -1.0e12, 1.0e12);
        assert_eq!(ed.canvas().recount(), *ed.inventory());
    }

    #[test]
    fn pointer_mapping_floors_and_scales_with_zoom() {
        let mut ed = editor();
        let m = ed.pointer_mapper((100.0, 50.0));
        // 420 px / 128 cells
        assert_eq!(m.to_grid(100.0, 50.0), GridPos::new(0, 0));
        assert_eq!(m.to_grid(99.0, 50.0), GridPos::new(-1, 0));
        assert_eq!(m.to_grid(100.0 + 3.3 * 10.0, 50.0 + 419.0), GridPos::new(10, 127));

        ed.set_zoom(2.0);
        let m = ed.pointer_mapper((0.0, 0.0));
        ed.pointer_down_at(&m, 840.0 - 1.0, 0.0);
        ed.pointer_up_at(&m, 840.0 - 1.0, 0.0);
        assert_eq!(ed.canvas().get(127, 0), Some(Paint::new(0, Variant::Normal)));
    }
}
