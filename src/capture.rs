//! Capture: turns a drop or file-picker event into the single room photo.
//!
//! Nothing here touches the network or the disk; the display reference is
//! a `data:` URL built in memory.

use crate::{
    error::CaptureError,
    models::{FileCandidate, ImageFormat, UploadedImage},
};
use std::io::Cursor;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Capture {
    max_bytes: usize,
}

impl Default for Capture {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Accepts exactly one JPEG or PNG. A drop with several files is refused
    /// as a whole rather than silently keeping the first.
    pub fn capture(&self, mut files: Vec<FileCandidate>) -> Result<UploadedImage, CaptureError> {
        let file = match files.len() {
            0 => return Err(CaptureError::NoFile),
            1 => files.remove(0),
            n => return Err(CaptureError::TooManyFiles(n)),
        };

        if file.bytes.is_empty() {
            return Err(CaptureError::EmptyFile(file.name));
        }

        if file.bytes.len() > self.max_bytes {
            return Err(CaptureError::TooLarge {
                name: file.name,
                size: file.bytes.len(),
                limit: self.max_bytes,
            });
        }

        let declared = declared_format(&file)?;

        let sniffed = image::guess_format(&file.bytes)
            .ok()
            .and_then(ImageFormat::from_sniffed)
            .ok_or_else(|| CaptureError::UnsupportedType {
                name: file.name.clone(),
                detail: "content is not a JPEG or PNG image".to_string(),
            })?;

        if sniffed != declared {
            log::warn!("{} declared as {} but content is {}", file.name, declared, sniffed);
            return Err(CaptureError::UnsupportedType {
                name: file.name,
                detail: format!("declared {} but content is {}", declared, sniffed),
            });
        }

        let dimensions = image::ImageReader::new(Cursor::new(&file.bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());

        log::debug!(
            "Captured {} ({}, {} bytes, {:?})",
            file.name,
            sniffed,
            file.bytes.len(),
            dimensions
        );

        Ok(UploadedImage::new(file.name, sniffed, file.bytes, dimensions))
    }
}

fn declared_format(file: &FileCandidate) -> Result<ImageFormat, CaptureError> {
    match file.mime_type.as_deref().filter(|mime| !mime.trim().is_empty()) {
        Some(mime) => ImageFormat::from_mime(mime).ok_or_else(|| CaptureError::UnsupportedType {
            name: file.name.clone(),
            detail: format!("type {}", mime),
        }),
        None => file
            .extension()
            .and_then(|ext| ImageFormat::from_extension(&ext))
            .ok_or_else(|| CaptureError::UnsupportedType {
                name: file.name.clone(),
                detail: "unknown file extension".to_string(),
            }),
    }
}
