//! Tests for PNG encoding.
//!
//! Chunks are walked by hand and the image data inflated again with flate2,
//! so the checks do not depend on a PNG decoder.

use std::io::Read;

use renderer::png::{create_png, create_png_auto, create_png_indexed, PNG_SIGNATURE};

// ============================================================================
// Helper functions
// ============================================================================

struct Chunk {
    kind: String,
    data: Vec<u8>,
    crc: u32,
}

fn chunks(png: &[u8]) -> Vec<Chunk> {
    assert_eq!(&png[..8], &PNG_SIGNATURE);
    let mut out = Vec::new();
    let mut pos = 8;
    while pos < png.len() {
        let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
        let kind = String::from_utf8(png[pos + 4..pos + 8].to_vec()).unwrap();
        let data = png[pos + 8..pos + 8 + len].to_vec();
        let crc = u32::from_be_bytes(png[pos + 8 + len..pos + 12 + len].try_into().unwrap());
        out.push(Chunk { kind, data, crc });
        pos += 12 + len;
    }
    out
}

fn color_type(png: &[u8]) -> u8 {
    chunks(png)[0].data[9]
}

fn inflate_idat(png: &[u8]) -> Vec<u8> {
    let idat: Vec<u8> = chunks(png)
        .into_iter()
        .filter(|c| c.kind == "IDAT")
        .flat_map(|c| c.data)
        .collect();
    let mut raw = Vec::new();
    flate2::read::ZlibDecoder::new(&idat[..]).read_to_end(&mut raw).unwrap();
    raw
}

fn two_color_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            if (x + y) % 2 == 0 {
                pixels.extend_from_slice(&[232, 240, 247, 255]);
            } else {
                pixels.extend_from_slice(&[214, 39, 40, 255]);
            }
        }
    }
    pixels
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_chunk_order_and_crc() {
    let png = create_png_auto(&two_color_pixels(4, 3), 4, 3).unwrap();
    let chunks = chunks(&png);

    let kinds: Vec<&str> = chunks.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, vec!["IHDR", "PLTE", "IDAT", "IEND"]);

    for chunk in &chunks {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(chunk.kind.as_bytes());
        hasher.update(&chunk.data);
        assert_eq!(hasher.finalize(), chunk.crc, "bad CRC on {}", chunk.kind);
    }
}

#[test]
fn test_header_dimensions() {
    let png = create_png(&two_color_pixels(5, 7), 5, 7).unwrap();
    let ihdr = &chunks(&png)[0].data;
    assert_eq!(u32::from_be_bytes(ihdr[0..4].try_into().unwrap()), 5);
    assert_eq!(u32::from_be_bytes(ihdr[4..8].try_into().unwrap()), 7);
    assert_eq!(ihdr[8], 8);
}

// ============================================================================
// Format selection
// ============================================================================

#[test]
fn test_few_colors_use_palette() {
    let png = create_png_auto(&two_color_pixels(8, 8), 8, 8).unwrap();
    assert_eq!(color_type(&png), 3);

    let plte = chunks(&png).into_iter().find(|c| c.kind == "PLTE").unwrap();
    assert_eq!(plte.data.len(), 2 * 3);
}

#[test]
fn test_many_colors_fall_back_to_rgba() {
    let pixels: Vec<u8> = (0..300u32).flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7, 255]).collect();
    let png = create_png_auto(&pixels, 300, 1).unwrap();
    assert_eq!(color_type(&png), 6);
}

#[test]
fn test_transparency_adds_trns() {
    let pixels = [255, 0, 0, 255, 0, 0, 0, 0];
    let png = create_png_auto(&pixels, 2, 1).unwrap();
    let trns = chunks(&png).into_iter().find(|c| c.kind == "tRNS").unwrap();
    assert_eq!(trns.data, vec![255, 0]);
}

#[test]
fn test_large_image_uses_parallel_path() {
    // 128x128 is above the parallel threshold
    let pixels = two_color_pixels(128, 128);
    let png = create_png_auto(&pixels, 128, 128).unwrap();
    assert_eq!(color_type(&png), 3);
    assert_eq!(inflate_idat(&png).len(), 128 * (1 + 128));
}

// ============================================================================
// Image data
// ============================================================================

#[test]
fn test_rgba_scanlines_round_trip() {
    let pixels = two_color_pixels(3, 2);
    let raw = inflate_idat(&create_png(&pixels, 3, 2).unwrap());

    assert_eq!(raw.len(), 2 * (1 + 3 * 4));
    assert_eq!(raw[0], 0);
    assert_eq!(&raw[1..13], &pixels[0..12]);
    assert_eq!(raw[13], 0);
    assert_eq!(&raw[14..26], &pixels[12..24]);
}

#[test]
fn test_indexed_scanlines() {
    let palette = [(0, 0, 0, 255), (255, 255, 255, 255)];
    let indices = [0, 1, 1, 0];
    let raw = inflate_idat(&create_png_indexed(2, 2, &palette, &indices).unwrap());
    assert_eq!(raw, vec![0, 0, 1, 0, 1, 0]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_buffer_size_mismatch_rejected() {
    assert!(create_png(&[0; 12], 2, 2).is_err());
    assert!(create_png_auto(&[], 0, 0).is_err());
    assert!(create_png_indexed(2, 2, &[(0, 0, 0, 255)], &[0, 0, 0]).is_err());
}
