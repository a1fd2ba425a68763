//! Tests for the site map.

use aeronet_client::parse_sites;
use renderer::map::{draw_site_map, project};
use renderer::png::PNG_SIGNATURE;
use renderer::render_site_map;
use test_utils::sites;

fn rgb_at(pixmap: &tiny_skia::Pixmap, lon: f64, lat: f64) -> (u8, u8, u8) {
    let (x, y) = project(lon, lat, pixmap.width(), pixmap.height());
    let px = pixmap.pixel(x as u32, y as u32).unwrap();
    (px.red(), px.green(), px.blue())
}

#[test]
fn test_map_is_png() {
    let catalog = parse_sites(sites::SAMPLE_LOCATIONS).unwrap();
    let png = render_site_map(&catalog, Some("GSFC"), 720, 360).unwrap();
    assert_eq!(&png[..8], &PNG_SIGNATURE);
}

#[test]
fn test_selected_site_is_red() {
    let catalog = parse_sites(sites::SAMPLE_LOCATIONS).unwrap();
    let pixmap = draw_site_map(&catalog, Some("GSFC"), 720, 360).unwrap();

    assert_eq!(rgb_at(&pixmap, -76.839833, 38.9925), (214, 39, 40));
    assert_eq!(rgb_at(&pixmap, -155.576, 19.536), (102, 170, 230));
}

#[test]
fn test_no_selection_draws_every_site_alike() {
    let catalog = parse_sites(sites::SAMPLE_LOCATIONS).unwrap();
    let pixmap = draw_site_map(&catalog, None, 720, 360).unwrap();

    for site in catalog.iter() {
        assert_eq!(rgb_at(&pixmap, site.longitude, site.latitude), (102, 170, 230), "{}", site.name);
    }
}

#[test]
fn test_empty_ocean_background() {
    let catalog = parse_sites(sites::SAMPLE_LOCATIONS).unwrap();
    let pixmap = draw_site_map(&catalog, None, 720, 360).unwrap();
    // Southern Pacific, away from grid lines and sites
    assert_eq!(rgb_at(&pixmap, -130.0, -50.0), (232, 240, 247));
}

#[test]
fn test_zero_size_rejected() {
    let catalog = parse_sites(sites::SAMPLE_LOCATIONS).unwrap();
    assert!(render_site_map(&catalog, None, 0, 100).is_err());
}
