//! AOD time-series chart rendered to SVG.

use chrono::{Duration, NaiveDateTime};
use plotters::coord::types::RangedDateTime;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use aeronet_common::{AeronetResult, Measurement, Wavelength};

use crate::palette::wavelength_color;
use crate::{draw_notice, render_error};

type Series = (Wavelength, Vec<(NaiveDateTime, f64)>);

/// One line+marker series per wavelength, AOD against time.
///
/// Wavelengths with no rows are left out of the legend. With no rows at all
/// the chart is replaced by a "No data available" notice.
pub fn render_timeseries_svg(
    rows: &[Measurement],
    wavelengths: &[Wavelength],
    title: &str,
    size: (u32, u32),
) -> AeronetResult<String> {
    let series: Vec<Series> = wavelengths
        .iter()
        .map(|&wl| {
            let points = rows
                .iter()
                .filter(|r| r.wavelength == wl)
                .map(|r| (r.timestamp.naive_utc(), r.aod))
                .collect::<Vec<_>>();
            (wl, points)
        })
        .filter(|(_, points)| !points.is_empty())
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        if series.is_empty() {
            draw_notice(&root, title, size)?;
        } else {
            draw_chart(&root, &series, title)?;
        }

        root.present().map_err(render_error)?;
    }

    debug!(series = series.len(), bytes = svg.len(), "Rendered time series");
    Ok(svg)
}

fn draw_chart(root: &DrawingArea<SVGBackend<'_>, Shift>, series: &[Series], title: &str) -> AeronetResult<()> {
    let (mut start, mut end) = (series[0].1[0].0, series[0].1[0].0);
    let (mut low, mut high) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(t, v) in series.iter().flat_map(|(_, points)| points.iter()) {
        start = start.min(t);
        end = end.max(t);
        low = low.min(v);
        high = high.max(v);
    }
    if start == end {
        start -= Duration::hours(1);
        end += Duration::hours(1);
    }
    let pad = ((high - low) * 0.1).max(0.01);
    let y_range = (low - pad).min(0.0)..(high + pad);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(RangedDateTime::from(start..end), y_range)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Aerosol Optical Depth")
        .x_labels(8)
        .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%Y-%m-%d").to_string())
        .y_label_formatter(&|v: &f64| format!("{:.2}", v))
        .light_line_style(BLACK.mix(0.08))
        .draw()
        .map_err(render_error)?;

    for (wl, points) in series {
        let color = wavelength_color(*wl);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(render_error)?
            .label(format!("{} nm", wl.nm()))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
            .map_err(render_error)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.4))
        .draw()
        .map_err(render_error)?;

    Ok(())
}
