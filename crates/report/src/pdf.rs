//! Minimal PDF 1.4 object writer.
//!
//! Objects are numbered in insertion order starting at 1. `finish` lays
//! them out, then appends the cross-reference table and trailer.

use chrono::{DateTime, Offset, TimeZone};
use sst_common::{AtlasError, AtlasResult};

/// Indirect object number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId(pub usize);

impl ObjectId {
    /// Indirect reference, e.g. `5 0 R`.
    pub fn reference(self) -> String {
        format!("{} 0 R", self.0)
    }
}

#[derive(Debug, Default)]
pub struct PdfWriter {
    objects: Vec<Option<Vec<u8>>>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an object number to be filled in later with [`set`](Self::set).
    pub fn reserve(&mut self) -> ObjectId {
        self.objects.push(None);
        ObjectId(self.objects.len())
    }

    pub fn set(&mut self, id: ObjectId, body: impl Into<Vec<u8>>) {
        self.objects[id.0 - 1] = Some(body.into());
    }

    pub fn add(&mut self, body: impl Into<Vec<u8>>) -> ObjectId {
        self.objects.push(Some(body.into()));
        ObjectId(self.objects.len())
    }

    /// Add a stream object. `dict` holds the dictionary entries other
    /// than `/Length`.
    pub fn add_stream(&mut self, dict: &str, data: &[u8]) -> ObjectId {
        let dict = if dict.is_empty() {
            format!("<< /Length {} >>", data.len())
        } else {
            format!("<< {} /Length {} >>", dict, data.len())
        };
        let mut body = format!("{}\nstream\n", dict).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.add(body)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Serialize the document with `root` as catalog.
    pub fn finish(self, root: ObjectId, info: Option<ObjectId>) -> AtlasResult<Vec<u8>> {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");

        let mut offsets = Vec::with_capacity(self.objects.len());
        for (index, object) in self.objects.into_iter().enumerate() {
            let body = object.ok_or_else(|| {
                AtlasError::report(format!("object {} was reserved but never written", index + 1))
            })?;
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            out.extend_from_slice(&body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        let size = offsets.len() + 1;
        out.extend_from_slice(format!("xref\n0 {}\n", size).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        let mut trailer = format!("trailer\n<< /Size {} /Root {}", size, root.reference());
        if let Some(info) = info {
            trailer.push_str(&format!(" /Info {}", info.reference()));
        }
        trailer.push_str(&format!(" >>\nstartxref\n{}\n%%EOF\n", xref_offset));
        out.extend_from_slice(trailer.as_bytes());

        Ok(out)
    }
}

/// Literal string `( ... )` with delimiters and backslashes escaped.
pub fn literal_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &b in bytes {
        if matches!(b, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.push(b')');
    out
}

/// Text string for the document info dictionary: a literal for ASCII,
/// otherwise UTF-16BE hex with a byte order mark.
pub fn text_string(text: &str) -> String {
    if text.is_ascii() {
        return String::from_utf8_lossy(&literal_string(text.as_bytes())).into_owned();
    }
    let mut hex = String::from("<FEFF");
    for unit in text.encode_utf16() {
        hex.push_str(&format!("{:04X}", unit));
    }
    hex.push('>');
    hex
}

/// Date string such as `D:20251016143005-06'00'`.
pub fn pdf_date<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    let offset = time.offset().fix().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let minutes = offset.abs() / 60;
    format!(
        "D:{}{}{:02}'{:02}'",
        time.naive_local().format("%Y%m%d%H%M%S"),
        sign,
        minutes / 60,
        minutes % 60
    )
}

/// Number formatted for content streams: at most two decimals, no
/// trailing zeros.
pub fn num(value: f32) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
