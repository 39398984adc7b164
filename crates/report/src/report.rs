//! The SST report: content assembly and PDF output.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use sst_common::{AtlasError, AtlasResult, MapOutcome, RegionConfig};
use tracing::{debug, info, warn};

use crate::document::{
    layout, write_pdf, DocumentInfo, Flowable, Frame, ImageBlock, Paragraph, ParagraphStyle,
};
use crate::pdf::pdf_date;
use crate::png_embed::PngImage;

/// Map size on the page: 6.5 x 4.5 in.
pub const IMAGE_WIDTH_PT: f32 = 6.5 * 72.0;
pub const IMAGE_HEIGHT_PT: f32 = 4.5 * 72.0;

/// Shown in place of the map when no image can be embedded.
pub const PLACEHOLDER_TEXT: &str = "Imagen no encontrada. No se pudo incluir el mapa.";

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const PRODUCER: &str = "sst-atlas";

/// What `build_report` wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub pages: usize,
    pub image_embedded: bool,
}

/// Report heading, e.g.
/// "Informe de Temperatura Superficial del Mar (SST)  - Nicaragua -Taller ...".
pub fn report_title(config: &RegionConfig) -> String {
    format!(
        "Informe de Temperatura Superficial del Mar (SST)  - {} -{}",
        config.name, config.report.event
    )
}

/// Report content in reading order. `image` of `None` puts the
/// placeholder paragraph where the map would go.
pub fn report_flowables<Tz>(
    config: &RegionConfig,
    image: Option<PngImage>,
    generated_at: &DateTime<Tz>,
) -> Vec<Flowable>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let normal = ParagraphStyle::normal();
    let para = |p: Paragraph| Flowable::Paragraph(p);

    let mut flowables = vec![
        para(Paragraph::new(report_title(config), ParagraphStyle::title())),
        Flowable::Spacer(12.0),
        para(Paragraph::labeled(
            "Fecha de generación:",
            &generated_at.format(TIMESTAMP_FORMAT).to_string(),
            normal,
        )),
        para(Paragraph::labeled("Dominio:", &config.bbox.to_string(), normal)),
        para(Paragraph::labeled(
            "Resolución:",
            &format!("{}x{} puntos", config.resolution, config.resolution),
            normal,
        )),
        para(Paragraph::labeled("Fuente:", &config.report.source, normal)),
        Flowable::Spacer(12.0),
        para(Paragraph::new(config.narrative(), normal)),
        Flowable::Spacer(12.0),
    ];

    flowables.push(match image {
        Some(image) => Flowable::Image(ImageBlock {
            image,
            width: IMAGE_WIDTH_PT,
            height: IMAGE_HEIGHT_PT,
        }),
        None => para(Paragraph::new(PLACEHOLDER_TEXT, normal)),
    });

    flowables.extend([
        Flowable::Spacer(20.0),
        para(Paragraph::labeled("Elaborado por:", &config.report.author, normal)),
        Flowable::Spacer(12.0),
        para(Paragraph::labeled(
            "Créditos:",
            &config.report.credits,
            ParagraphStyle::italic(),
        )),
    ]);

    flowables
}

/// Resolve the map outcome to an embeddable image, degrading to `None`
/// when there is nothing usable on disk.
fn load_map_image(outcome: &MapOutcome) -> Option<PngImage> {
    match outcome {
        MapOutcome::Unavailable(reason) => {
            warn!(reason = %reason, "Map image unavailable, report will show a placeholder");
            None
        }
        MapOutcome::Rendered(map) => match PngImage::read(&map.path) {
            Ok(image) => {
                debug!(
                    path = %map.path.display(),
                    width = image.width,
                    height = image.height,
                    "Embedding map image"
                );
                Some(image)
            }
            Err(e) => {
                warn!(
                    path = %map.path.display(),
                    error = %e,
                    "Map image not found, report will show a placeholder"
                );
                None
            }
        },
    }
}

/// Build the PDF report and write it to `path`, replacing any existing
/// file.
pub fn build_report<Tz>(
    config: &RegionConfig,
    outcome: &MapOutcome,
    path: &Path,
    generated_at: &DateTime<Tz>,
) -> AtlasResult<ReportSummary>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let image = load_map_image(outcome);
    let image_embedded = image.is_some();

    let flowables = report_flowables(config, image, generated_at);
    let pages = layout(&flowables, &Frame::letter());
    let images: Vec<&PngImage> = flowables
        .iter()
        .filter_map(|f| match f {
            Flowable::Image(block) => Some(&block.image),
            _ => None,
        })
        .collect();

    let info = DocumentInfo {
        title: report_title(config),
        author: config.report.author.clone(),
        producer: PRODUCER.to_string(),
        creation_date: pdf_date(generated_at),
    };
    let bytes = write_pdf(&pages, &images, &info)?;

    std::fs::write(path, &bytes).map_err(|e| {
        AtlasError::report(format!("cannot write {}: {}", path.display(), e))
    })?;

    info!(
        path = %path.display(),
        pages = pages.len(),
        bytes = bytes.len(),
        image_embedded,
        "Saved PDF report"
    );

    Ok(ReportSummary {
        path: path.to_path_buf(),
        pages: pages.len(),
        image_embedded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn fixed_time() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(6 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 10, 16, 9, 5, 3)
            .unwrap()
    }

    fn paragraph_texts(flowables: &[Flowable]) -> Vec<String> {
        flowables
            .iter()
            .filter_map(|f| match f {
                Flowable::Paragraph(p) => Some(p.text()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_title_format() {
        let config = RegionConfig::nicaragua().unwrap();
        assert_eq!(
            report_title(&config),
            "Informe de Temperatura Superficial del Mar (SST)  - Nicaragua -Taller intermedio OCEAN HACK WEEK- 2025"
        );
    }

    #[test]
    fn test_content_order() {
        let config = RegionConfig::nicaragua().unwrap();
        let texts = paragraph_texts(&report_flowables(&config, None, &fixed_time()));

        assert!(texts[0].starts_with("Informe de Temperatura"));
        assert_eq!(texts[1], "Fecha de generación: 16/10/2025 09:05:03");
        assert_eq!(texts[2], "Dominio: [-87.0, -82.0, 10.5, 15.0]");
        assert_eq!(texts[3], "Resolución: 600x600 puntos");
        assert_eq!(texts[4], "Fuente: Datos sintéticos para demostración (Atlas)");
        assert!(texts[5].contains("región de Nicaragua"));
        assert_eq!(texts[6], PLACEHOLDER_TEXT);
        assert!(texts[7].starts_with("Elaborado por:"));
        assert!(texts[8].starts_with("Créditos:"));
    }

    #[test]
    fn test_image_replaces_placeholder() {
        let config = RegionConfig::nicaragua().unwrap();
        let image = PngImage {
            width: 4,
            height: 2,
            colors: 3,
            data: vec![1, 2, 3],
        };
        let flowables = report_flowables(&config, Some(image), &fixed_time());
        assert!(!paragraph_texts(&flowables).contains(&PLACEHOLDER_TEXT.to_string()));
        let block = flowables
            .iter()
            .find_map(|f| match f {
                Flowable::Image(block) => Some(block),
                _ => None,
            })
            .unwrap();
        assert_eq!((block.width, block.height), (468.0, 324.0));
    }

    #[test]
    fn test_unavailable_outcome_loads_nothing() {
        assert!(load_map_image(&MapOutcome::Unavailable("boom".into())).is_none());
    }
}
