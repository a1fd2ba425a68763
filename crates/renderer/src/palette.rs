//! Colors assigned to AOD wavelengths.
//!
//! Short wavelengths run violet to blue, long ones orange to dark red, so a
//! series keeps its color across plots regardless of which others are shown.

use plotters::style::RGBColor;

use aeronet_common::Wavelength;

pub fn wavelength_color(wavelength: Wavelength) -> RGBColor {
    match wavelength.nm() {
        340 => RGBColor(117, 63, 163),
        380 => RGBColor(68, 84, 196),
        440 => RGBColor(31, 119, 180),
        500 => RGBColor(44, 160, 44),
        675 => RGBColor(255, 127, 14),
        870 => RGBColor(214, 39, 40),
        1020 => RGBColor(140, 86, 75),
        _ => RGBColor(127, 127, 127),
    }
}

/// CSS hex color for HTML tables, e.g. `#1f77b4`.
pub fn wavelength_hex(wavelength: Wavelength) -> String {
    let RGBColor(r, g, b) = wavelength_color(wavelength);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_wavelength_has_distinct_color() {
        let colors: std::collections::HashSet<String> = Wavelength::all().into_iter().map(wavelength_hex).collect();
        assert_eq!(colors.len(), 7);
    }

    #[test]
    fn test_hex_format() {
        assert_eq!(wavelength_hex(Wavelength::new(440).unwrap()), "#1f77b4");
    }
}
