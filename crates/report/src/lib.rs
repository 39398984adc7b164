//! PDF report generation for the SST atlas.
//!
//! The document is written directly as PDF 1.4 objects using the standard
//! Helvetica faces, so no font files are needed. The map PNG is embedded
//! without re-encoding.

pub mod document;
pub mod fonts;
pub mod pdf;
pub mod png_embed;
pub mod report;

pub use document::{Flowable, Frame, Paragraph, ParagraphStyle};
pub use png_embed::PngImage;
pub use report::{build_report, report_flowables, report_title, ReportSummary, PLACEHOLDER_TEXT};
