//! Rendering for the AOD explorer.
//!
//! - `map`: world map of sites, rasterized with tiny-skia and PNG encoded
//! - `timeseries`: AOD over time, one series per wavelength (SVG)
//! - `statistics`: box plot per wavelength (SVG)
//! - `export`: CSV download of the displayed rows

pub mod export;
pub mod map;
pub mod palette;
pub mod png;
pub mod statistics;
pub mod timeseries;

pub use export::{export_csv, export_filename, wide_table, WideRow};
pub use map::render_site_map;
pub use palette::{wavelength_color, wavelength_hex};
pub use statistics::render_statistics_svg;
pub use timeseries::render_timeseries_svg;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use aeronet_common::{AeronetError, AeronetResult};

/// Default chart size in pixels.
pub const DEFAULT_PLOT_SIZE: (u32, u32) = (900, 450);

/// Default site map size in pixels.
pub const DEFAULT_MAP_SIZE: (u32, u32) = (720, 360);

pub(crate) fn render_error<E: std::fmt::Display>(e: E) -> AeronetError {
    AeronetError::RenderError(e.to_string())
}

/// Title plus a centered "No data available" message.
pub(crate) fn draw_notice(root: &DrawingArea<SVGBackend<'_>, Shift>, title: &str, size: (u32, u32)) -> AeronetResult<()> {
    let title_style = ("sans-serif", 20).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(title.to_string(), (size.0 as i32 / 2, 10), title_style))
        .map_err(render_error)?;

    let notice_style = ("sans-serif", 18)
        .into_font()
        .color(&BLACK.mix(0.6))
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        "No data available".to_string(),
        (size.0 as i32 / 2, size.1 as i32 / 2),
        notice_style,
    ))
    .map_err(render_error)?;

    Ok(())
}
