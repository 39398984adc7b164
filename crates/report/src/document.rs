//! Flowable document layout.
//!
//! A report is a list of flowables (paragraphs, spacers, images) placed top
//! to bottom inside a page frame. Paragraphs word-wrap with Helvetica
//! metrics; anything that does not fit on the current page moves to the
//! next one.

use crate::fonts::{encode_win_ansi, PdfFont};
use crate::pdf::{literal_string, num, text_string, ObjectId, PdfWriter};
use crate::png_embed::PngImage;
use sst_common::AtlasResult;

/// US Letter
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;

const FIT_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font: PdfFont,
    pub size: f32,
    pub leading: f32,
    pub align: Align,
    pub space_after: f32,
}

impl ParagraphStyle {
    /// Centered bold heading.
    pub fn title() -> Self {
        Self {
            font: PdfFont::HelveticaBold,
            size: 18.0,
            leading: 22.0,
            align: Align::Center,
            space_after: 6.0,
        }
    }

    /// Body text.
    pub fn normal() -> Self {
        Self {
            font: PdfFont::Helvetica,
            size: 10.0,
            leading: 12.0,
            align: Align::Left,
            space_after: 0.0,
        }
    }

    pub fn italic() -> Self {
        Self {
            font: PdfFont::HelveticaOblique,
            ..Self::normal()
        }
    }
}

/// A piece of paragraph text, optionally bold.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub spans: Vec<Span>,
    pub style: ParagraphStyle,
}

/// Consecutive text in one font within a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub font: PdfFont,
    pub text: String,
}

/// One wrapped line and its width in points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub runs: Vec<Run>,
    pub width: f32,
}

impl Line {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

struct Word {
    text: String,
    font: PdfFont,
    space_before: bool,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: ParagraphStyle) -> Self {
        Self {
            spans: vec![Span {
                text: text.into(),
                bold: false,
            }],
            style,
        }
    }

    /// Bold `label` followed by `value`, e.g. "**Dominio:** [...]".
    pub fn labeled(label: &str, value: &str, style: ParagraphStyle) -> Self {
        Self {
            spans: vec![
                Span {
                    text: label.to_string(),
                    bold: true,
                },
                Span {
                    text: format!(" {}", value),
                    bold: false,
                },
            ],
            style,
        }
    }

    /// All span text concatenated.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn words(&self) -> Vec<Word> {
        let mut words = Vec::new();
        let mut pending_space = false;
        for span in &self.spans {
            let font = if span.bold {
                self.style.font.bold()
            } else {
                self.style.font
            };
            if span.text.starts_with(char::is_whitespace) {
                pending_space = true;
            }
            for (k, text) in span.text.split_whitespace().enumerate() {
                words.push(Word {
                    text: text.to_string(),
                    font,
                    space_before: pending_space || k > 0,
                });
                pending_space = false;
            }
            if span.text.ends_with(char::is_whitespace) {
                pending_space = true;
            }
        }
        words
    }

    /// Greedy word wrap to `width` points. Runs of whitespace collapse to a
    /// single space; a word wider than `width` gets a line of its own.
    pub fn wrap(&self, width: f32) -> Vec<Line> {
        let size = self.style.size;
        let mut lines = Vec::new();
        let mut current: Vec<Word> = Vec::new();
        let mut current_width = 0.0;

        for word in self.words() {
            let word_width = word.font.text_width(&word.text, size);
            if current.is_empty() {
                current_width = word_width;
                current.push(word);
                continue;
            }
            let space = if word.space_before {
                word.font.text_width(" ", size)
            } else {
                0.0
            };
            if current_width + space + word_width > width + FIT_TOLERANCE {
                lines.push(build_line(std::mem::take(&mut current), current_width));
                current_width = word_width;
            } else {
                current_width += space + word_width;
            }
            current.push(word);
        }
        if !current.is_empty() {
            lines.push(build_line(current, current_width));
        }
        lines
    }
}

fn build_line(words: Vec<Word>, width: f32) -> Line {
    let mut runs: Vec<Run> = Vec::new();
    for (k, word) in words.into_iter().enumerate() {
        let sep = if k > 0 && word.space_before { " " } else { "" };
        match runs.last_mut() {
            Some(run) if run.font == word.font => {
                run.text.push_str(sep);
                run.text.push_str(&word.text);
            }
            _ => runs.push(Run {
                font: word.font,
                text: format!("{}{}", sep, word.text),
            }),
        }
    }
    Line { runs, width }
}

/// An image drawn at a fixed size in points.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub image: PngImage,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Paragraph(Paragraph),
    /// Vertical gap in points, dropped at the top of a page
    Spacer(f32),
    Image(ImageBlock),
}

/// Printable area of a page; `y` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    /// Letter page inside one-inch margins.
    pub fn letter() -> Self {
        Self {
            x: MARGIN,
            y: MARGIN,
            width: PAGE_WIDTH - 2.0 * MARGIN,
            height: PAGE_HEIGHT - 2.0 * MARGIN,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Positioned drawing operation in page coordinates (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// One line of text with its baseline at `y`
    Text {
        x: f32,
        y: f32,
        size: f32,
        runs: Vec<Run>,
    },
    /// The `index`-th image flowable with its lower-left corner at (x, y)
    Image {
        index: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text of every line on the page, one per entry.
    pub fn lines(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { runs, .. } => {
                    Some(runs.iter().map(|r| r.text.as_str()).collect::<String>())
                }
                DrawOp::Image { .. } => None,
            })
            .collect()
    }
}

/// Place flowables on pages. Always returns at least one page.
pub fn layout(flowables: &[Flowable], frame: &Frame) -> Vec<Page> {
    let mut pages = vec![Page::default()];
    let mut y = frame.top();
    let mut image_index = 0;

    for flowable in flowables {
        match flowable {
            Flowable::Spacer(height) => {
                if y >= frame.top() {
                    continue;
                }
                if y - height < frame.y - FIT_TOLERANCE {
                    pages.push(Page::default());
                    y = frame.top();
                } else {
                    y -= height;
                }
            }
            Flowable::Paragraph(paragraph) => {
                let style = paragraph.style;
                for line in paragraph.wrap(frame.width) {
                    if y - style.leading < frame.y - FIT_TOLERANCE && y < frame.top() {
                        pages.push(Page::default());
                        y = frame.top();
                    }
                    let x = match style.align {
                        Align::Left => frame.x,
                        Align::Center => frame.x + (frame.width - line.width) / 2.0,
                    };
                    push_op(
                        &mut pages,
                        DrawOp::Text {
                            x,
                            y: y - style.size,
                            size: style.size,
                            runs: line.runs,
                        },
                    );
                    y -= style.leading;
                }
                y -= style.space_after;
            }
            Flowable::Image(block) => {
                if y - block.height < frame.y - FIT_TOLERANCE && y < frame.top() {
                    pages.push(Page::default());
                    y = frame.top();
                }
                push_op(
                    &mut pages,
                    DrawOp::Image {
                        index: image_index,
                        x: frame.x + (frame.width - block.width) / 2.0,
                        y: y - block.height,
                        width: block.width,
                        height: block.height,
                    },
                );
                image_index += 1;
                y -= block.height;
            }
        }
    }

    pages
}

fn push_op(pages: &mut [Page], op: DrawOp) {
    if let Some(page) = pages.last_mut() {
        page.ops.push(op);
    }
}

/// Document information dictionary entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub producer: String,
    /// PDF date string, e.g. `D:20251016143005-06'00'`
    pub creation_date: String,
}

/// Serialize laid-out pages to PDF bytes. `images` are the image
/// flowables in document order.
pub fn write_pdf(pages: &[Page], images: &[&PngImage], info: &DocumentInfo) -> AtlasResult<Vec<u8>> {
    let mut writer = PdfWriter::new();
    let catalog = writer.reserve();
    let page_tree = writer.reserve();

    let mut font_dict = String::from("/Font <<");
    for font in PdfFont::ALL {
        let id = writer.add(format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            font.base_font()
        ));
        font_dict.push_str(&format!(" /{} {}", font.resource_name(), id.reference()));
    }
    font_dict.push_str(" >>");

    let mut resources = font_dict;
    if !images.is_empty() {
        resources.push_str(" /XObject <<");
        for (index, image) in images.iter().enumerate() {
            let id = add_image(&mut writer, image);
            resources.push_str(&format!(" /Im{} {}", index + 1, id.reference()));
        }
        resources.push_str(" >>");
    }

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let contents = writer.add_stream("", &page_content(page));
        kids.push(writer.add(format!(
            "<< /Type /Page /Parent {} /MediaBox [0 0 {} {}] /Resources << {} >> /Contents {} >>",
            page_tree.reference(),
            num(PAGE_WIDTH),
            num(PAGE_HEIGHT),
            resources,
            contents.reference()
        )));
    }

    let kid_refs: Vec<String> = kids.iter().map(|id| id.reference()).collect();
    writer.set(
        page_tree,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kid_refs.join(" "),
            kids.len()
        ),
    );
    writer.set(
        catalog,
        format!("<< /Type /Catalog /Pages {} >>", page_tree.reference()),
    );

    let info_id = writer.add(format!(
        "<< /Title {} /Author {} /Producer {} /CreationDate {} >>",
        text_string(&info.title),
        text_string(&info.author),
        text_string(&info.producer),
        text_string(&info.creation_date)
    ));

    writer.finish(catalog, Some(info_id))
}

fn add_image(writer: &mut PdfWriter, image: &PngImage) -> ObjectId {
    let dict = format!(
        "/Type /XObject /Subtype /Image /Width {w} /Height {h} /ColorSpace {cs} \
         /BitsPerComponent 8 /Filter /FlateDecode \
         /DecodeParms << /Predictor 15 /Colors {c} /BitsPerComponent 8 /Columns {w} >>",
        w = image.width,
        h = image.height,
        cs = image.color_space(),
        c = image.colors,
    );
    writer.add_stream(&dict, &image.data)
}

/// Uncompressed content stream for one page.
fn page_content(page: &Page) -> Vec<u8> {
    let mut out = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Text { x, y, size, runs } => {
                out.extend_from_slice(format!("BT\n{} {} Td\n", num(*x), num(*y)).as_bytes());
                for run in runs {
                    out.extend_from_slice(
                        format!("/{} {} Tf\n", run.font.resource_name(), num(*size)).as_bytes(),
                    );
                    out.extend_from_slice(&literal_string(&encode_win_ansi(&run.text)));
                    out.extend_from_slice(b" Tj\n");
                }
                out.extend_from_slice(b"ET\n");
            }
            DrawOp::Image {
                index,
                x,
                y,
                width,
                height,
            } => {
                out.extend_from_slice(
                    format!(
                        "q\n{} 0 0 {} {} {} cm\n/Im{} Do\nQ\n",
                        num(*width),
                        num(*height),
                        num(*x),
                        num(*y),
                        index + 1
                    )
                    .as_bytes(),
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str) -> Flowable {
        Flowable::Paragraph(Paragraph::new(text, ParagraphStyle::normal()))
    }

    #[test]
    fn test_labeled_paragraph_runs() {
        let p = Paragraph::labeled("Dominio:", "[-87.0, -82.0, 10.5, 15.0]", ParagraphStyle::normal());
        let lines = p.wrap(468.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].runs.len(), 2);
        assert_eq!(lines[0].runs[0].font, PdfFont::HelveticaBold);
        assert_eq!(lines[0].runs[0].text, "Dominio:");
        assert_eq!(lines[0].runs[1].font, PdfFont::Helvetica);
        assert_eq!(lines[0].runs[1].text, " [-87.0, -82.0, 10.5, 15.0]");
    }

    #[test]
    fn test_italic_label_is_bold_oblique() {
        let p = Paragraph::labeled("Créditos:", "x", ParagraphStyle::italic());
        let lines = p.wrap(468.0);
        assert_eq!(lines[0].runs[0].font, PdfFont::HelveticaBoldOblique);
        assert_eq!(lines[0].runs[1].font, PdfFont::HelveticaOblique);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "palabra ".repeat(60);
        let p = Paragraph::new(text.trim(), ParagraphStyle::normal());
        let lines = p.wrap(200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 200.0 + 1e-3);
            let measured = PdfFont::Helvetica.text_width(&line.text(), 10.0);
            assert!((measured - line.width).abs() < 1e-3);
        }
        let rejoined: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(rejoined.join(" "), text.trim());
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        let p = Paragraph::new("(SST)  - Nicaragua", ParagraphStyle::normal());
        let lines = p.wrap(468.0);
        assert_eq!(lines[0].text(), "(SST) - Nicaragua");
    }

    #[test]
    fn test_long_word_gets_own_line() {
        let p = Paragraph::new("a Supercalifragilistic b", ParagraphStyle::normal());
        let lines = p.wrap(30.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text(), "Supercalifragilistic");
    }

    #[test]
    fn test_centered_title_position() {
        let frame = Frame::letter();
        let p = Paragraph::new("Nicaragua", ParagraphStyle::title());
        let pages = layout(&[Flowable::Paragraph(p)], &frame);
        let width = PdfFont::HelveticaBold.text_width("Nicaragua", 18.0);
        match &pages[0].ops[0] {
            DrawOp::Text { x, y, size, .. } => {
                assert!((x - (72.0 + (468.0 - width) / 2.0)).abs() < 1e-3);
                assert!((y - (720.0 - 18.0)).abs() < 1e-3);
                assert_eq!(*size, 18.0);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_pagination_moves_overflow_to_next_page() {
        // 648 pt frame / 12 pt leading = 54 lines per page
        let flowables: Vec<Flowable> = (0..60).map(|k| body(&format!("line {}", k))).collect();
        let pages = layout(&flowables, &Frame::letter());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines().len(), 54);
        assert_eq!(pages[1].lines()[0], "line 54");
    }

    #[test]
    fn test_spacer_at_page_top_is_dropped() {
        let flowables = vec![Flowable::Spacer(100.0), body("first")];
        let pages = layout(&flowables, &Frame::letter());
        match &pages[0].ops[0] {
            DrawOp::Text { y, .. } => assert!((y - 710.0).abs() < 1e-3),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_image_that_does_not_fit_starts_new_page() {
        let image = PngImage {
            width: 2,
            height: 2,
            colors: 3,
            data: vec![0; 4],
        };
        let mut flowables: Vec<Flowable> = (0..40).map(|k| body(&format!("line {}", k))).collect();
        flowables.push(Flowable::Image(ImageBlock {
            image,
            width: 468.0,
            height: 324.0,
        }));
        let pages = layout(&flowables, &Frame::letter());
        assert_eq!(pages.len(), 2);
        match &pages[1].ops[0] {
            DrawOp::Image { index, x, y, .. } => {
                assert_eq!(*index, 0);
                assert!((x - 72.0).abs() < 1e-3);
                assert!((y - (720.0 - 324.0)).abs() < 1e-3);
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_write_pdf_structure() {
        let frame = Frame::letter();
        let pages = layout(&[body("Informe Nicaragua (a)")], &frame);
        let info = DocumentInfo {
            title: "Informe".into(),
            author: "Autor".into(),
            producer: "sst-atlas".into(),
            creation_date: "D:20251016120000+00'00'".into(),
        };
        let pdf = write_pdf(&pages, &[], &info).unwrap();
        let text = String::from_utf8_lossy(&pdf);

        assert!(pdf.starts_with(b"%PDF-1.4"));
        // catalog, page tree, four fonts, content stream, page
        assert!(text.contains("/Type /Pages /Kids [8 0 R] /Count 1"));
        assert!(text.contains("/Contents 7 0 R"));
        assert!(text.contains("/BaseFont /Helvetica-BoldOblique"));
        assert!(text.contains("(Informe Nicaragua \\(a\\)) Tj"));
        assert!(text.contains("/Producer (sst-atlas)"));
        assert!(!text.contains("/XObject"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }
}
