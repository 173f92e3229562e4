//! PDF export: rasterizes the live preview element and embeds the image in a
//! single A4 page, width-fitted, height proportional to the image.
//!
//! Rasterization is delegated through the `Rasterizer` trait. The production
//! backend shells out to an HTML-to-PNG command (wkhtmltoimage by default).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::models::resume::{is_present, ResumeDocument};
use crate::render::html::to_html_document;
use crate::render::node::Node;
use crate::render::PREVIEW_ELEMENT_ID;

/// Up-scaling factor applied when rasterizing the preview.
pub const RASTER_SCALE: f32 = 2.0;
/// A4 portrait, in PDF points (210mm × 297mm).
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

const FALLBACK_FILE_STEM: &str = "resume";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("resume preview not found")]
    PreviewNotFound,

    #[error("rasterizer failed: {0}")]
    Rasterize(String),

    #[error("rasterizer produced an empty image")]
    EmptyRaster,

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF assembly error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a rendered element into pixels at the given scale.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, element: &Node, scale: f32) -> Result<RgbImage, ExportError>;
}

/// Runs `<program> --quiet --zoom <scale> --format png <in.html> <out.png>`
/// in a scratch directory and decodes the PNG it writes.
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: String,
}

impl CommandRasterizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Rasterizer for CommandRasterizer {
    async fn rasterize(&self, element: &Node, scale: f32) -> Result<RgbImage, ExportError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("preview.html");
        let output = scratch.path().join("preview.png");

        tokio::fs::write(&input, to_html_document("Resume", element)).await?;

        let result = Command::new(&self.program)
            .arg("--quiet")
            .arg("--zoom")
            .arg(scale.to_string())
            .arg("--format")
            .arg("png")
            .arg(&input)
            .arg(&output)
            .output()
            .await?;

        if !result.status.success() {
            return Err(ExportError::Rasterize(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        let png = tokio::fs::read(&output).await?;
        decode_png(&png)
    }
}

pub fn decode_png(png: &[u8]) -> Result<RgbImage, ExportError> {
    Ok(image::load_from_memory_with_format(png, ImageFormat::Png)?.to_rgb8())
}

/// A finished export, ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Locates the preview, rasterizes it once, and assembles the PDF.
#[derive(Clone)]
pub struct PdfExporter {
    rasterizer: Arc<dyn Rasterizer>,
    /// When set, every export is also written here.
    output_dir: Option<PathBuf>,
}

impl PdfExporter {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, output_dir: Option<PathBuf>) -> Self {
        Self {
            rasterizer,
            output_dir,
        }
    }

    pub async fn export(
        &self,
        page: &Node,
        document: &ResumeDocument,
    ) -> Result<ExportedPdf, ExportError> {
        let element = page
            .find_by_id(PREVIEW_ELEMENT_ID)
            .ok_or(ExportError::PreviewNotFound)?;

        let image = self.rasterizer.rasterize(element, RASTER_SCALE).await?;
        debug!("Rasterized preview to {}x{}", image.width(), image.height());

        let bytes = build_pdf(&image)?;
        let file_name = pdf_file_name(document);

        // The on-disk copy is best effort; the download does not depend on it.
        if let Some(dir) = &self.output_dir {
            match write_export(dir, &file_name, &bytes).await {
                Ok(path) => info!("Wrote {} ({} bytes)", path.display(), bytes.len()),
                Err(e) => warn!("Could not write {file_name} to {}: {e}", dir.display()),
            }
        }

        Ok(ExportedPdf {
            file_name,
            bytes: Bytes::from(bytes),
        })
    }
}

async fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// `<name>.pdf`, or `resume.pdf` when the name is blank. Path separators and
/// control characters are replaced so the name is always a single file.
pub fn pdf_file_name(document: &ResumeDocument) -> String {
    let name = document.personal_info.name.trim();
    let stem = if is_present(name) {
        name.chars()
            .map(|c| match c {
                '/' | '\\' | '"' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    } else {
        FALLBACK_FILE_STEM.to_string()
    };
    format!("{stem}.pdf")
}

/// Height in points of an image drawn at full page width.
pub fn placed_height(image_width: u32, image_height: u32) -> f32 {
    image_height as f32 * A4_WIDTH_PT / image_width as f32
}

/// Embeds the image in a one-page A4 PDF, anchored at the top edge.
pub fn build_pdf(image: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyRaster);
    }
    let draw_height = placed_height(width, height);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        image.as_raw().clone(),
    ));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { "Im0" => image_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    A4_WIDTH_PT.into(),
                    0.into(),
                    0.into(),
                    draw_height.into(),
                    0.into(),
                    (A4_HEIGHT_PT - draw_height).into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH_PT.into(), A4_HEIGHT_PT.into()],
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buffer)
}


#[cfg(test)]
mod tests {
    use super::testing::FakeRasterizer;
    use super::*;
    use crate::render::fixtures::jane_doe;
    use crate::render::node::el;
    use crate::render::{render_preview, TemplateId};

    fn exporter(rasterizer: Arc<FakeRasterizer>, dir: Option<PathBuf>) -> PdfExporter {
        PdfExporter::new(rasterizer, dir)
    }

    #[tokio::test]
    async fn test_missing_preview_aborts_before_rasterizing() {
        let rasterizer = Arc::new(FakeRasterizer::new(100, 200));
        let page: Node = el("div").id("something-else").into();

        let err = exporter(rasterizer.clone(), None)
            .export(&page, &jane_doe())
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::PreviewNotFound));
        assert!(err.to_string().contains("not found"));
        assert_eq!(rasterizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_export_rasterizes_once_and_names_file_after_person() {
        let rasterizer = Arc::new(FakeRasterizer::new(100, 200));
        let doc = jane_doe();
        let page = render_preview(&doc, TemplateId::Modern);

        let pdf = exporter(rasterizer.clone(), None)
            .export(&page, &doc)
            .await
            .unwrap();

        assert_eq!(rasterizer.calls(), 1);
        assert_eq!(pdf.file_name, "Jane Doe.pdf");
        assert!(pdf.bytes.starts_with(b"%PDF-1.5"));
    }

    #[tokio::test]
    async fn test_export_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = Arc::new(FakeRasterizer::new(10, 10));
        let doc = ResumeDocument::new();
        let page = render_preview(&doc, TemplateId::Creative);

        let pdf = exporter(rasterizer, Some(dir.path().join("out")))
            .export(&page, &doc)
            .await
            .unwrap();

        assert_eq!(pdf.file_name, "resume.pdf");
        let written = std::fs::read(dir.path().join("out").join("resume.pdf")).unwrap();
        assert_eq!(written, pdf.bytes.to_vec());
    }

    #[tokio::test]
    async fn test_unwritable_output_dir_still_returns_pdf() {
        let scratch = tempfile::tempdir().unwrap();
        let blocker = scratch.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let rasterizer = Arc::new(FakeRasterizer::new(100, 200));
        let doc = jane_doe();
        let page = render_preview(&doc, TemplateId::Modern);

        let pdf = exporter(rasterizer.clone(), Some(blocker.join("exports")))
            .export(&page, &doc)
            .await
            .unwrap();

        assert_eq!(rasterizer.calls(), 1);
        assert_eq!(pdf.file_name, "Jane Doe.pdf");
        assert!(pdf.bytes.starts_with(b"%PDF-1.5"));
        assert!(!blocker.join("exports").exists());
    }

    #[tokio::test]
    async fn test_rasterizer_failure_surfaces_as_error() {
        let rasterizer = Arc::new(FakeRasterizer::failing());
        let doc = jane_doe();
        let page = render_preview(&doc, TemplateId::Modern);

        let err = exporter(rasterizer.clone(), None)
            .export(&page, &doc)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Rasterize(_)));
        assert_eq!(rasterizer.calls(), 1);
    }

    #[test]
    fn test_pdf_file_name_fallback_and_sanitizing() {
        let mut doc = ResumeDocument::new();
        assert_eq!(pdf_file_name(&doc), "resume.pdf");

        doc.personal_info.name = "   ".to_string();
        assert_eq!(pdf_file_name(&doc), "resume.pdf");

        doc.personal_info.name = "../etc/passwd".to_string();
        assert_eq!(pdf_file_name(&doc), ".._etc_passwd.pdf");
    }

    #[test]
    fn test_placed_height_keeps_aspect_ratio() {
        assert!((placed_height(100, 200) - 2.0 * A4_WIDTH_PT).abs() < 0.01);
        assert!((placed_height(1190, 1684) - 842.37).abs() < 0.1);
    }

    #[test]
    fn test_build_pdf_single_a4_page() {
        let image = RgbImage::from_pixel(50, 70, image::Rgb([0, 0, 0]));
        let bytes = build_pdf(&image).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page = doc.get_object(pages[&1]).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert!((media_box[2].as_f32().unwrap() - A4_WIDTH_PT).abs() < 0.01);
        assert!((media_box[3].as_f32().unwrap() - A4_HEIGHT_PT).abs() < 0.01);
    }

    #[test]
    fn test_build_pdf_rejects_empty_image() {
        let image = RgbImage::new(0, 0);
        assert!(matches!(build_pdf(&image), Err(ExportError::EmptyRaster)));
    }

    #[test]
    fn test_decode_png_reads_encoded_image() {
        let image = RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let mut png = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let decoded = decode_png(&png).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0), &image::Rgb([10, 20, 30]));
    }
}
