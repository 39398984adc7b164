//! Tests for PNG encoding, checked by decoding with the `image` crate.

use renderer::png::create_png_rgb;

/// Horizontal red-to-blue ramp
fn ramp_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for _ in 0..height {
        for x in 0..width {
            let t = (x * 255 / (width - 1)) as u8;
            pixels.extend_from_slice(&[255 - t, 0, t, 255]);
        }
    }
    pixels
}

#[test]
fn test_encoded_png_decodes_to_same_rgb() {
    let (width, height) = (17, 9);
    let pixels = ramp_pixels(width, height);
    let png = create_png_rgb(&pixels, width, height, Some(600)).unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (width as u32, height as u32));
    for (x, y, px) in decoded.enumerate_pixels() {
        let idx = (y as usize * width + x as usize) * 4;
        assert_eq!(px.0, [pixels[idx], pixels[idx + 1], pixels[idx + 2]]);
    }
}

#[test]
fn test_large_image_spans_several_idat_chunks() {
    // Noise-like data compresses poorly, forcing more than 1 MiB of IDAT
    let (width, height) = (1024, 512);
    let mut state = 0x2545_f491u32;
    let pixels: Vec<u8> = (0..width * height * 4)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    let png = create_png_rgb(&pixels, width, height, None).unwrap();

    let idat_count = png.windows(4).filter(|w| *w == b"IDAT").count();
    assert!(idat_count >= 2, "expected split IDAT, got {}", idat_count);

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 1024);
}
