//! Box plot of the AOD distribution at each wavelength, rendered to SVG.

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use aeronet_common::{AeronetResult, Measurement, Wavelength};

use crate::palette::wavelength_color;
use crate::{draw_notice, render_error};

const TITLE: &str = "AOD Distribution by Wavelength";

/// One vertical box per wavelength that has data.
pub fn render_statistics_svg(rows: &[Measurement], wavelengths: &[Wavelength], size: (u32, u32)) -> AeronetResult<String> {
    let groups: Vec<(Wavelength, Vec<f64>)> = wavelengths
        .iter()
        .map(|&wl| {
            let values: Vec<f64> = rows.iter().filter(|r| r.wavelength == wl).map(|r| r.aod).collect();
            (wl, values)
        })
        .filter(|(_, values)| !values.is_empty())
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        if groups.is_empty() {
            draw_notice(&root, TITLE, size)?;
        } else {
            draw_boxes(&root, &groups)?;
        }

        root.present().map_err(render_error)?;
    }

    debug!(boxes = groups.len(), bytes = svg.len(), "Rendered statistics plot");
    Ok(svg)
}

fn draw_boxes(root: &DrawingArea<SVGBackend<'_>, Shift>, groups: &[(Wavelength, Vec<f64>)]) -> AeronetResult<()> {
    let labels: Vec<String> = groups.iter().map(|(wl, _)| format!("{} nm", wl.nm())).collect();
    let quartiles: Vec<Quartiles> = groups.iter().map(|(_, values)| Quartiles::new(values.as_slice())).collect();

    let (mut low, mut high) = (f32::INFINITY, f32::NEG_INFINITY);
    for q in &quartiles {
        let [min, _, _, _, max] = q.values();
        low = low.min(min);
        high = high.max(max);
    }
    let pad = ((high - low) * 0.1).max(0.01);

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(labels[..].into_segmented(), (low - pad).min(0.0)..(high + pad))
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Wavelength")
        .y_desc("Aerosol Optical Depth")
        .x_label_formatter(&|v: &SegmentValue<&String>| match v {
            SegmentValue::Exact(label) | SegmentValue::CenterOf(label) => label.to_string(),
            SegmentValue::Last => String::new(),
        })
        .y_label_formatter(&|v: &f32| format!("{:.2}", v))
        .light_line_style(BLACK.mix(0.08))
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(groups.iter().zip(labels.iter()).zip(quartiles.iter()).map(|(((wl, _), label), q)| {
            Boxplot::new_vertical(SegmentValue::CenterOf(label), q)
                .width(30)
                .whisker_width(0.5)
                .style(wavelength_color(*wl).stroke_width(2))
        }))
        .map_err(render_error)?;

    Ok(())
}
