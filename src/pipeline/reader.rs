//! Document reading: open a PDF and pull out its embedded raster images.
//!
//! The pipeline talks to PDFs through two small traits: [`DocumentReader`]
//! opens a path, and [`Document`] enumerates pages and images. The production
//! backend is [`PdfiumReader`], which wraps `pdfium-render`; tests drive the
//! pipeline with an in-memory implementation.
//!
//! A [`Document`] is closed by dropping it. The pipeline owns the box for
//! the duration of one run, so the handle is released exactly once on every
//! exit path, including `?` returns partway through a page.

use crate::error::PdfOcrError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Position of an embedded image inside a document (both 0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId {
    pub page_index: usize,
    pub image_index: usize,
}

impl ImageId {
    pub fn new(page_index: usize, image_index: usize) -> Self {
        Self {
            page_index,
            image_index,
        }
    }

    /// 1-indexed page number, as used in file names and messages.
    pub fn page_num(&self) -> usize {
        self.page_index + 1
    }

    /// 1-indexed image number within the page.
    pub fn image_num(&self) -> usize {
        self.image_index + 1
    }

    /// Shared file stem: `page_{p}_image_{i}`.
    pub fn stem(&self) -> String {
        format!("page_{}_image_{}", self.page_num(), self.image_num())
    }
}

/// An image found on a page, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub id: ImageId,
    /// Backend-specific handle. For pdfium: the object index on the page,
    /// followed by one index per enclosing form XObject.
    pub object_path: Vec<usize>,
}

/// Shape of a page's object tree, reduced to what image enumeration needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectNode {
    Image,
    /// A form XObject and its child objects, in content order.
    Form(Vec<ObjectNode>),
    Other,
}

/// Object paths of every image in `objects`, depth-first in content order,
/// so images nested in form XObjects are numbered where they are drawn.
pub fn image_paths(objects: &[ObjectNode]) -> Vec<Vec<usize>> {
    fn walk(objects: &[ObjectNode], prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        for (index, node) in objects.iter().enumerate() {
            prefix.push(index);
            match node {
                ObjectNode::Image => out.push(prefix.clone()),
                ObjectNode::Form(children) => walk(children, prefix, out),
                ObjectNode::Other => {}
            }
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(objects, &mut Vec::new(), &mut out);
    out
}

/// Decoded 8-bit samples of one embedded image.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
    /// Interleaved samples per pixel, alpha included.
    pub channels: u8,
    pub has_alpha: bool,
    pub samples: Vec<u8>,
}

impl EmbeddedImage {
    /// Wrap a decoded image, keeping its native channel layout when it is
    /// 8-bit and widening anything else to RGBA8.
    pub fn from_dynamic(id: ImageId, image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, has_alpha, samples) = match image {
            DynamicImage::ImageLuma8(buf) => (1, false, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (2, true, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, false, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, true, buf.into_raw()),
            other => (4, true, other.to_rgba8().into_raw()),
        };
        Self {
            id,
            width,
            height,
            channels,
            has_alpha,
            samples,
        }
    }

    /// Colour channels, i.e. channels minus the alpha channel.
    pub fn colorants(&self) -> u8 {
        self.channels.saturating_sub(u8::from(self.has_alpha))
    }
}

/// An opened PDF document.
pub trait Document {
    fn page_count(&self) -> usize;

    /// Images on a page in document order; empty when the page has none.
    fn list_images(&self, page_index: usize) -> Result<Vec<ImageDescriptor>, PdfOcrError>;

    fn extract_image(&self, descriptor: &ImageDescriptor) -> Result<EmbeddedImage, PdfOcrError>;
}

/// Opens documents. Any failure here is an open error and ends the run.
pub trait DocumentReader {
    fn open<'r>(&'r self, path: &Path) -> Result<Box<dyn Document + 'r>, PdfOcrError>;
}

// ── pdfium backend ───────────────────────────────────────────────────────

/// [`DocumentReader`] backed by a bound pdfium library.
pub struct PdfiumReader {
    pdfium: Pdfium,
    password: Option<String>,
}

impl PdfiumReader {
    /// Bind pdfium from an explicit library file or directory, or from the
    /// system library when `lib_path` is `None`.
    pub fn bind(lib_path: Option<&Path>, password: Option<String>) -> Result<Self, PdfOcrError> {
        let bindings = match lib_path {
            Some(path) if path.is_dir() => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
            }
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| PdfOcrError::PdfiumBindingFailed(format!("{:?}", e)))?;

        debug!("pdfium bound ({:?})", lib_path);
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            password,
        })
    }
}

impl DocumentReader for PdfiumReader {
    fn open<'r>(&'r self, path: &Path) -> Result<Box<dyn Document + 'r>, PdfOcrError> {
        check_pdf_path(path)?;

        let password = self.password.as_deref();
        let document = self.pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    PdfOcrError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    PdfOcrError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                PdfOcrError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        info!(
            "PDF loaded: {} ({} pages)",
            path.display(),
            document.pages().len()
        );
        Ok(Box::new(PdfiumDocument {
            document,
            path: path.to_path_buf(),
        }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
}

impl<'a> PdfiumDocument<'a> {
    fn page(&self, page_index: usize) -> Result<PdfPage<'a>, PdfOcrError> {
        self.document
            .pages()
            .get(page_index as PdfPageIndex)
            .map_err(|e| PdfOcrError::PageAccessFailed {
                page: page_index + 1,
                detail: format!("{:?}", e),
            })
    }
}

impl Document for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn list_images(&self, page_index: usize) -> Result<Vec<ImageDescriptor>, PdfOcrError> {
        let page = self.page(page_index)?;
        let tree = object_tree(page.objects()).map_err(|e| PdfOcrError::PageAccessFailed {
            page: page_index + 1,
            detail: format!("{:?}", e),
        })?;
        let descriptors: Vec<ImageDescriptor> = image_paths(&tree)
            .into_iter()
            .enumerate()
            .map(|(image_index, object_path)| ImageDescriptor {
                id: ImageId::new(page_index, image_index),
                object_path,
            })
            .collect();

        debug!(
            "Page {}: {} embedded images",
            page_index + 1,
            descriptors.len()
        );
        Ok(descriptors)
    }

    fn extract_image(&self, descriptor: &ImageDescriptor) -> Result<EmbeddedImage, PdfOcrError> {
        let id = descriptor.id;
        let decode_err = |detail: String| PdfOcrError::ImageDecodeFailed {
            page: id.page_num(),
            image: id.image_num(),
            detail,
        };

        let (&first, nested) = descriptor
            .object_path
            .split_first()
            .ok_or_else(|| decode_err("empty object path".into()))?;
        let page = self.page(id.page_index)?;
        let object = page
            .objects()
            .get(first)
            .map_err(|e| decode_err(format!("{:?}", e)))?;
        let raw = raw_image_at(&object, nested).map_err(decode_err)?;

        debug!(
            "Extracted {} → {}x{} {:?}",
            id.stem(),
            raw.width(),
            raw.height(),
            raw.color()
        );
        Ok(EmbeddedImage::from_dynamic(id, raw))
    }
}

fn object_tree<'a>(
    objects: &impl PdfPageObjectsCommon<'a>,
) -> Result<Vec<ObjectNode>, PdfiumError> {
    (0..objects.len())
        .map(|index| -> Result<ObjectNode, PdfiumError> {
            let object = objects.get(index)?;
            Ok(match object.object_type() {
                PdfPageObjectType::Image => ObjectNode::Image,
                PdfPageObjectType::XObjectForm => match object.as_x_object_form_object() {
                    Some(form) => ObjectNode::Form(object_tree(form)?),
                    None => ObjectNode::Other,
                },
                _ => ObjectNode::Other,
            })
        })
        .collect()
}

/// Follow `path` through nested form XObjects and decode the image at its end.
fn raw_image_at(object: &PdfPageObject<'_>, path: &[usize]) -> Result<DynamicImage, String> {
    match path.split_first() {
        None => object
            .as_image_object()
            .ok_or_else(|| "page object is not an image".to_string())?
            .get_raw_image()
            .map_err(|e| format!("{:?}", e)),
        Some((&index, rest)) => {
            let form = object
                .as_x_object_form_object()
                .ok_or_else(|| "page object is not a form XObject".to_string())?;
            let child = form.get(index).map_err(|e| format!("{:?}", e))?;
            raw_image_at(&child, rest)
        }
    }
}

impl Drop for PdfiumDocument<'_> {
    fn drop(&mut self) {
        debug!("Closing PDF: {}", self.path.display());
    }
}

/// Validate that `path` exists, is readable, and starts with `%PDF`.
///
/// pdfium reports every failure as a generic load error; checking up front
/// gives callers a specific open error instead.
pub fn check_pdf_path(path: &Path) -> Result<(), PdfOcrError> {
    if !path.exists() {
        return Err(PdfOcrError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdfOcrError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfOcrError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(PdfOcrError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}
