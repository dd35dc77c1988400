// ============================================================================
// EXPORT — PNG output of the design and the block-list report
// ============================================================================

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::canvas::Canvas;
use crate::i18n::Translator;
use crate::inventory::Inventory;
use crate::ops::surface::render_surface;
use crate::palette::Catalog;

/// Load the reference map image used as an underlay.
pub fn load_background(path: &Path) -> Result<RgbaImage, String> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| format!("could not open background '{}': {}", path.display(), e))
}

/// Render the design, optionally over a background stretched to the surface.
/// The background is only drawn underneath; nothing samples it.
pub fn compose(canvas: &Canvas, catalog: &Catalog, surface_size: u32, background: Option<&RgbaImage>) -> RgbaImage {
    let design = render_surface(canvas, catalog, surface_size);
    match background {
        Some(bg) => {
            let (w, h) = design.dimensions();
            let mut base = imageops::resize(bg, w, h, FilterType::Nearest);
            imageops::overlay(&mut base, &design, 0, 0);
            base
        }
        None => design,
    }
}

/// Write `img` as PNG, creating parent directories as needed.
pub fn export_png(img: &RgbaImage, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| format!("could not create '{}': {}", parent.display(), e))?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| format!("could not write '{}': {}", path.display(), e))?;
    log_info!("Exported {}x{} design to {}", img.width(), img.height(), path.display());
    Ok(())
}

/// Plain-text block list: one row per shade, stack split, grand total.
pub fn inventory_report(inventory: &Inventory, catalog: &Catalog, translator: &dyn Translator, stack_size: usize) -> String {
    let rows = inventory.rows(catalog, translator, stack_size);
    let mut out = format!("{}\n", t!("inventory.title"));
    if rows.is_empty() {
        out.push_str(&t!("inventory.empty"));
        out.push('\n');
    }
    let width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    for row in &rows {
        let stacks = t!("inventory.stacks", packs = row.stacks, rest = row.remainder);
        out.push_str(&format!(
            "  {:<width$}  {:>6}  {}\n",
            row.name,
            row.count,
            stacks,
            width = width
        ));
    }
    out.push_str(&format!("{}: {}\n", t!("inventory.total"), inventory.total()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::GridPos;
    use crate::i18n::Identity;
    use crate::ops::paint::paint_at;
    use crate::palette::{Paint, PaletteEntry, Variant};
    use image::Rgba;

    fn catalog() -> Catalog {
        Catalog::new(vec![PaletteEntry {
            id: 1,
            category: "DIRT".into(),
            rgb: [155, 108, 71],
            names: vec!["Dirt".into()],
        }])
    }

    #[test]
    fn background_shows_through_empty_cells() {
        let mut canvas = Canvas::new(16);
        paint_at(&mut canvas, GridPos::new(0, 0), 1, Paint::new(0, Variant::Light));
        let bg = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let img = compose(&canvas, &catalog(), 64, Some(&bg));
        assert_eq!(img.dimensions(), (64, 64));
        assert_eq!(*img.get_pixel(0, 0), Rgba([155, 108, 71, 255]));
        assert_eq!(*img.get_pixel(63, 63), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn export_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("design.png");
        let img = compose(&Canvas::new(8), &catalog(), 16, None);
        export_png(&img, &path).unwrap();
        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (16, 16));
        assert!(load_background(&dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn report_lists_rows_and_total() {
        let mut canvas = Canvas::new(16);
        paint_at(&mut canvas, GridPos::new(5, 5), 3, Paint::new(0, Variant::Deep));
        let report = inventory_report(canvas.inventory(), &catalog(), &Identity, 64);
        assert!(report.contains("Dirt (Deep)"));
        assert!(report.contains("0pack + 9"));
        assert!(report.trim_end().ends_with(": 9"));
    }
}
