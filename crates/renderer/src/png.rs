//! PNG encoding for rendered maps.
//!
//! Maps are fully opaque, so the encoder writes truecolor RGB (color type 2)
//! and drops the alpha channel. A `pHYs` chunk records the print resolution
//! and the compressed stream is split across several IDAT chunks.

use std::io::Write;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum payload per IDAT chunk
const IDAT_CHUNK_SIZE: usize = 1 << 20;

const METERS_PER_INCH: f64 = 0.0254;

/// Create an RGB PNG from RGBA pixel data.
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel); alpha is discarded
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
/// - `dpi`: Optional resolution written to the `pHYs` chunk
pub fn create_png_rgb(
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: Option<u32>,
) -> Result<Vec<u8>, String> {
    if pixels.len() != width * height * 4 {
        return Err(format!(
            "pixel buffer has {} bytes, expected {} for {}x{}",
            pixels.len(),
            width * height * 4,
            width,
            height
        ));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(2); // color type 2 = truecolor RGB
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // pHYs chunk (pixels per meter, unit = meter)
    if let Some(dpi) = dpi {
        let ppm = (dpi as f64 / METERS_PER_INCH).round() as u32;
        let mut phys = Vec::with_capacity(9);
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.push(1);
        write_chunk(&mut png, b"pHYs", &phys);
    }

    // IDAT chunks (image data)
    let idat_data = deflate_idat_rgb(pixels, width, height)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    for chunk in idat_data.chunks(IDAT_CHUNK_SIZE) {
        write_chunk(&mut png, b"IDAT", chunk);
    }

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    // Write length
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());

    // Write chunk type
    png.extend_from_slice(chunk_type);

    // Write data
    png.extend_from_slice(data);

    // Write CRC over type and data
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGB scanlines, built row by row from RGBA input.
fn deflate_idat_rgb(
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    let mut row = Vec::with_capacity(1 + width * 3);

    for y in 0..height {
        row.clear();
        row.push(0); // filter type: none
        let start = y * width * 4;
        for px in pixels[start..start + width * 4].chunks_exact(4) {
            row.extend_from_slice(&px[..3]);
        }
        encoder.write_all(&row)?;
    }

    Ok(encoder.finish()?)
}
