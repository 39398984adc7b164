//! Standard Type 1 Helvetica faces: metrics and WinAnsi text encoding.
//!
//! The base-14 fonts need no embedding, so only their advance widths are
//! kept here (from the Adobe AFM files, 1/1000 em) for line wrapping.

/// Helvetica advance widths for 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('€', 0x80), ('‚', 0x82), ('ƒ', 0x83), ('„', 0x84), ('…', 0x85), ('†', 0x86),
    ('‡', 0x87), ('ˆ', 0x88), ('‰', 0x89), ('Š', 0x8A), ('‹', 0x8B), ('Œ', 0x8C),
    ('Ž', 0x8E), ('\u{2018}', 0x91), ('\u{2019}', 0x92), ('\u{201C}', 0x93),
    ('\u{201D}', 0x94), ('•', 0x95), ('–', 0x96), ('—', 0x97), ('˜', 0x98),
    ('™', 0x99), ('š', 0x9A), ('›', 0x9B), ('œ', 0x9C), ('ž', 0x9E), ('Ÿ', 0x9F),
];

/// The four Helvetica faces used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdfFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl PdfFont {
    pub const ALL: [PdfFont; 4] = [
        PdfFont::Helvetica,
        PdfFont::HelveticaBold,
        PdfFont::HelveticaOblique,
        PdfFont::HelveticaBoldOblique,
    ];

    /// PostScript name used as `/BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            PdfFont::Helvetica => "Helvetica",
            PdfFont::HelveticaBold => "Helvetica-Bold",
            PdfFont::HelveticaOblique => "Helvetica-Oblique",
            PdfFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Key in the page `/Font` resource dictionary.
    pub fn resource_name(self) -> &'static str {
        match self {
            PdfFont::Helvetica => "F1",
            PdfFont::HelveticaBold => "F2",
            PdfFont::HelveticaOblique => "F3",
            PdfFont::HelveticaBoldOblique => "F4",
        }
    }

    /// Bold variant of this face.
    pub fn bold(self) -> Self {
        match self {
            PdfFont::Helvetica | PdfFont::HelveticaBold => PdfFont::HelveticaBold,
            PdfFont::HelveticaOblique | PdfFont::HelveticaBoldOblique => {
                PdfFont::HelveticaBoldOblique
            }
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, PdfFont::HelveticaBold | PdfFont::HelveticaBoldOblique)
    }

    /// Advance width of one character in 1/1000 em.
    ///
    /// Obliques share the upright metrics. Accented letters take the width
    /// of their base letter; characters outside WinAnsi measure as `?`.
    pub fn char_width(self, c: char) -> u16 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        let ascii = |c: char| table[c as usize - 0x20];

        match c {
            ' '..='~' => ascii(c),
            '\u{A0}' => ascii(' '),
            '°' => 400,
            '©' | '®' => 737,
            '¡' => 333,
            '¿' => 611,
            '«' | '»' => 556,
            '·' => 278,
            '•' => 350,
            '–' => 556,
            '—' | '…' | '‰' => 1000,
            '\u{2018}' | '\u{2019}' => {
                if self.is_bold() {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' => {
                if self.is_bold() {
                    500
                } else {
                    333
                }
            }
            '€' => 556,
            _ => match base_letter(c) {
                Some(base) => ascii(base),
                None if win_ansi_byte(c).is_some() => 556,
                None => ascii('?'),
            },
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// Unaccented letter for Latin-1 accented letters.
fn base_letter(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'Š' => 'S',
        'š' => 's',
        'Ž' => 'Z',
        'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

fn win_ansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(c as u32 as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|&(_, byte)| byte),
    }
}

/// Encode text as WinAnsi bytes. Characters with no WinAnsi code become
/// `?`; tabs and newlines become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => b' ',
            _ => win_ansi_byte(c).unwrap_or(b'?'),
        })
        .collect()
}
