//! Pass-through PNG embedding.
//!
//! A non-interlaced 8-bit PNG's concatenated IDAT payload is a zlib stream
//! of filtered scanlines, which PDF readers decode directly with
//! `/FlateDecode` and a PNG predictor. Only the chunk structure is parsed;
//! pixels are never decompressed.

use std::path::Path;

use sst_common::{AtlasError, AtlasResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// A PNG ready to be written as an image XObject.
#[derive(Debug, Clone, PartialEq)]
pub struct PngImage {
    pub width: u32,
    pub height: u32,
    /// Color components per pixel (1 = gray, 3 = RGB)
    pub colors: u8,
    /// Concatenated IDAT payloads
    pub data: Vec<u8>,
}

impl PngImage {
    /// Read and parse a PNG file.
    pub fn read(path: &Path) -> AtlasResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Parse PNG bytes. Only 8-bit gray or RGB without interlacing can be
    /// passed through; other layouts are rejected.
    pub fn parse(bytes: &[u8]) -> AtlasResult<Self> {
        if bytes.len() < 8 || bytes[..8] != PNG_SIGNATURE {
            return Err(AtlasError::report("not a PNG file"));
        }

        let mut header: Option<(u32, u32, u8)> = None;
        let mut data = Vec::new();
        let mut pos = 8;

        while pos + 8 <= bytes.len() {
            let len = u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
                as usize;
            let kind = &bytes[pos + 4..pos + 8];
            let start = pos + 8;
            let end = start
                .checked_add(len)
                .filter(|&end| end + 4 <= bytes.len())
                .ok_or_else(|| AtlasError::report("truncated PNG chunk"))?;
            let body = &bytes[start..end];

            match kind {
                b"IHDR" => header = Some(parse_ihdr(body)?),
                b"IDAT" => data.extend_from_slice(body),
                b"IEND" => break,
                _ => {}
            }
            pos = end + 4;
        }

        let (width, height, colors) =
            header.ok_or_else(|| AtlasError::report("PNG has no IHDR chunk"))?;
        if data.is_empty() {
            return Err(AtlasError::report("PNG has no image data"));
        }

        Ok(Self {
            width,
            height,
            colors,
            data,
        })
    }

    /// PDF color space name for the image.
    pub fn color_space(&self) -> &'static str {
        if self.colors == 1 {
            "/DeviceGray"
        } else {
            "/DeviceRGB"
        }
    }
}

fn parse_ihdr(body: &[u8]) -> AtlasResult<(u32, u32, u8)> {
    if body.len() != 13 {
        return Err(AtlasError::report("malformed IHDR chunk"));
    }
    let width = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
    let height = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
    let bit_depth = body[8];
    let color_type = body[9];
    let interlace = body[12];

    if width == 0 || height == 0 {
        return Err(AtlasError::report("PNG has zero size"));
    }
    if bit_depth != 8 || interlace != 0 {
        return Err(AtlasError::report(format!(
            "unsupported PNG layout (bit depth {}, interlace {})",
            bit_depth, interlace
        )));
    }
    let colors = match color_type {
        0 => 1,
        2 => 3,
        other => {
            return Err(AtlasError::report(format!(
                "unsupported PNG color type {}",
                other
            )))
        }
    };
    Ok((width, height, colors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn chunk(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(kind);
        out.extend_from_slice(body);
        // CRC is not checked by the parser
        out.extend_from_slice(&[0, 0, 0, 0]);
        out
    }

    fn ihdr(width: u32, height: u32, depth: u8, color: u8) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&width.to_be_bytes());
        body.extend_from_slice(&height.to_be_bytes());
        body.extend_from_slice(&[depth, color, 0, 0, 0]);
        chunk(b"IHDR", &body)
    }

    fn png(header: Vec<u8>, idat: &[&[u8]]) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        out.extend(header);
        for part in idat {
            out.extend(chunk(b"IDAT", part));
        }
        out.extend(chunk(b"IEND", &[]));
        out
    }

    #[test]
    fn test_concatenates_idat_chunks() {
        let bytes = png(ihdr(3, 2, 8, 2), &[b"abc", b"def"]);
        let image = PngImage::parse(&bytes).unwrap();
        assert_eq!((image.width, image.height, image.colors), (3, 2, 3));
        assert_eq!(image.data, b"abcdef".to_vec());
        assert_eq!(image.color_space(), "/DeviceRGB");
    }

    #[test]
    fn test_rejects_alpha_and_16_bit() {
        assert!(PngImage::parse(&png(ihdr(1, 1, 8, 6), &[b"x"])).is_err());
        assert!(PngImage::parse(&png(ihdr(1, 1, 16, 2), &[b"x"])).is_err());
    }

    #[test]
    fn test_rejects_garbage_and_truncation() {
        assert!(PngImage::parse(b"not a png").is_err());
        let mut bytes = png(ihdr(1, 1, 8, 0), &[b"xyz"]);
        bytes.truncate(bytes.len() - 20);
        assert!(PngImage::parse(&bytes).is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = std::env::temp_dir().join("sst-atlas-png-embed-missing");
        assert!(PngImage::read(&dir.join("nope.png")).is_err());
    }

    #[test]
    fn test_idat_is_a_zlib_stream() {
        // Gray 2x1 image, filter byte 0 then two samples
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&[0, 10, 200]).unwrap();
        let idat = encoder.finish().unwrap();
        let image = PngImage::parse(&png(ihdr(2, 1, 8, 0), &[&idat])).unwrap();

        let mut decoder = flate2::read::ZlibDecoder::new(&image.data[..]);
        let mut raw = Vec::new();
        std::io::Read::read_to_end(&mut decoder, &mut raw).unwrap();
        assert_eq!(raw, vec![0, 10, 200]);
    }
}
