//! World map of AERONET sites.
//!
//! Plate carrée projection: longitude maps linearly to x and latitude to y.

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

use aeronet_common::{AeronetError, AeronetResult, Site, SiteCatalog};

use crate::png::create_png_auto;

/// Spacing of the latitude/longitude grid in degrees.
const GRATICULE_STEP: f64 = 30.0;

const OCEAN: [u8; 3] = [232, 240, 247];
const GRID: [u8; 3] = [190, 205, 220];
const EQUATOR: [u8; 3] = [140, 160, 185];
const SITE: [u8; 3] = [102, 170, 230];
const SELECTED: [u8; 3] = [214, 39, 40];

/// Pixel position of a coordinate on a `width` x `height` canvas.
pub fn project(lon: f64, lat: f64, width: u32, height: u32) -> (f32, f32) {
    let x = (lon.clamp(-180.0, 180.0) + 180.0) / 360.0 * width as f64;
    let y = (90.0 - lat.clamp(-90.0, 90.0)) / 180.0 * height as f64;
    (x as f32, y as f32)
}

/// Render every site as a dot, with `selected` highlighted, and encode as PNG.
pub fn render_site_map(sites: &SiteCatalog, selected: Option<&str>, width: u32, height: u32) -> AeronetResult<Vec<u8>> {
    let pixmap = draw_site_map(sites, selected, width, height)?;

    // Every pixel is opaque, so premultiplied and straight RGBA coincide.
    create_png_auto(pixmap.data(), width as usize, height as usize)
}

/// Draw the site map onto a new pixmap.
pub fn draw_site_map(sites: &SiteCatalog, selected: Option<&str>, width: u32, height: u32) -> AeronetResult<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| AeronetError::RenderError(format!("invalid map size {}x{}", width, height)))?;

    pixmap.fill(Color::from_rgba8(OCEAN[0], OCEAN[1], OCEAN[2], 255));
    draw_graticule(&mut pixmap);

    let dot = (width.min(height) as f32 / 150.0).max(2.0);
    let mut highlighted: Option<&Site> = None;

    for site in sites.iter() {
        if Some(site.name.as_str()) == selected {
            highlighted = Some(site);
            continue;
        }
        let (x, y) = project(site.longitude, site.latitude, width, height);
        fill_circle(&mut pixmap, x, y, dot, SITE);
    }

    // Drawn last so it sits on top of neighbouring sites
    if let Some(site) = highlighted {
        let (x, y) = project(site.longitude, site.latitude, width, height);
        fill_circle(&mut pixmap, x, y, dot * 2.5 + 1.5, [255, 255, 255]);
        fill_circle(&mut pixmap, x, y, dot * 2.5, SELECTED);
    }

    debug!(
        sites = sites.len(),
        selected = selected.unwrap_or(""),
        width = width,
        height = height,
        "Rendered site map"
    );

    Ok(pixmap)
}

fn draw_graticule(pixmap: &mut Pixmap) {
    let (w, h) = (pixmap.width(), pixmap.height());

    let mut paint = Paint::default();
    paint.set_color_rgba8(GRID[0], GRID[1], GRID[2], 255);
    paint.anti_alias = false;
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };

    let mut pb = PathBuilder::new();
    let mut lon = -180.0 + GRATICULE_STEP;
    while lon < 180.0 {
        let (x, _) = project(lon, 0.0, w, h);
        pb.move_to(x, 0.0);
        pb.line_to(x, h as f32);
        lon += GRATICULE_STEP;
    }
    let mut lat = -90.0 + GRATICULE_STEP;
    while lat < 90.0 {
        if lat != 0.0 {
            let (_, y) = project(0.0, lat, w, h);
            pb.move_to(0.0, y);
            pb.line_to(w as f32, y);
        }
        lat += GRATICULE_STEP;
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let mut equator = PathBuilder::new();
    let (_, y) = project(0.0, 0.0, w, h);
    equator.move_to(0.0, y);
    equator.line_to(w as f32, y);
    if let Some(path) = equator.finish() {
        paint.set_color_rgba8(EQUATOR[0], EQUATOR[1], EQUATOR[2], 255);
        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn fill_circle(pixmap: &mut Pixmap, x: f32, y: f32, radius: f32, rgb: [u8; 3]) {
    let Some(path) = PathBuilder::from_circle(x, y, radius) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgb[0], rgb[1], rgb[2], 255);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}
