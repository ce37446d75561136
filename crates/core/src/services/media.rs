//! Photo transformation: bounded re-encode plus square thumbnail.

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::warn;

/// Upload size ceiling in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Bounding box for the stored rendition.
pub const MAX_WIDTH: u32 = 1920;
/// Bounding box for the stored rendition.
pub const MAX_HEIGHT: u32 = 1080;

/// Thumbnail edge length.
pub const THUMBNAIL_SIZE: u32 = 300;

const PHOTO_JPEG_QUALITY: u8 = 85;
const THUMBNAIL_JPEG_QUALITY: u8 = 80;

/// Accepted upload MIME types.
const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Accepted upload file extensions.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Result of transforming an uploaded photo.
#[derive(Debug)]
pub struct ProcessedPhoto {
    /// Bytes to store as the photo itself.
    pub data: Vec<u8>,
    /// Thumbnail bytes, absent when encoding degraded.
    pub thumbnail: Option<Vec<u8>>,
    /// Pixel width of the original upload.
    pub width: Option<u32>,
    /// Pixel height of the original upload.
    pub height: Option<u32>,
    /// MIME type of the stored bytes.
    pub mime_type: String,
}

/// Transforms uploaded photos into the stored rendition and thumbnail.
#[derive(Clone, Default)]
pub struct MediaProcessor;

impl MediaProcessor {
    /// Create a new media processor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether an upload's declared type and file name are acceptable.
    #[must_use]
    pub fn is_supported(&self, mime_type: &str, filename: &str) -> bool {
        if !ALLOWED_MIME_TYPES.contains(&mime_type.to_lowercase().as_str()) {
            return false;
        }

        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        ALLOWED_EXTENSIONS.contains(&ext.as_str())
    }

    /// Transform an upload.
    ///
    /// Dimensions are read from the original bytes. The stored rendition is
    /// bounded to 1920x1080 (aspect preserved) and re-encoded as JPEG; the
    /// thumbnail is a 300x300 cover crop. When decoding or re-encoding fails
    /// the original bytes are stored unmodified with no thumbnail; a broken
    /// transform never fails the upload.
    #[must_use]
    pub fn process(&self, data: &[u8], mime_type: &str) -> ProcessedPhoto {
        let img = match image::load_from_memory(data) {
            Ok(img) => img,
            Err(e) => {
                warn!(error = %e, "failed to decode upload, storing original bytes");
                return ProcessedPhoto {
                    data: data.to_vec(),
                    thumbnail: None,
                    width: None,
                    height: None,
                    mime_type: mime_type.to_string(),
                };
            }
        };

        let width = img.width();
        let height = img.height();

        let encoded = match encode_bounded(&img) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to re-encode upload, storing original bytes");
                return ProcessedPhoto {
                    data: data.to_vec(),
                    thumbnail: None,
                    width: Some(width),
                    height: Some(height),
                    mime_type: mime_type.to_string(),
                };
            }
        };

        let thumbnail = match encode_thumbnail(&img) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(error = %e, "failed to encode thumbnail");
                None
            }
        };

        ProcessedPhoto {
            data: encoded,
            thumbnail,
            width: Some(width),
            height: Some(height),
            mime_type: "image/jpeg".to_string(),
        }
    }
}

fn encode_bounded(img: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let bounded = if img.width() > MAX_WIDTH || img.height() > MAX_HEIGHT {
        img.resize(MAX_WIDTH, MAX_HEIGHT, FilterType::Lanczos3)
    } else {
        img.clone()
    };

    encode_jpeg(&bounded, PHOTO_JPEG_QUALITY)
}

fn encode_thumbnail(img: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let cropped = img.resize_to_fill(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);
    encode_jpeg(&cropped, THUMBNAIL_JPEG_QUALITY)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    rgb.write_with_encoder(encoder)?;
    Ok(buf)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, _| {
            Rgb([u8::try_from(x % 256).unwrap_or(0), 64, 128])
        });
        let mut buf = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_is_supported_accepts_allowed_types() {
        let media = MediaProcessor::new();
        assert!(media.is_supported("image/jpeg", "salon.jpg"));
        assert!(media.is_supported("image/png", "salon.PNG"));
        assert!(media.is_supported("image/webp", "salon.webp"));
    }

    #[test]
    fn test_is_supported_rejects_other_types() {
        let media = MediaProcessor::new();
        assert!(!media.is_supported("image/gif", "salon.gif"));
        assert!(!media.is_supported("application/pdf", "salon.pdf"));
        assert!(!media.is_supported("image/jpeg", "salon.exe"));
    }

    #[test]
    fn test_process_reads_original_dimensions() {
        let media = MediaProcessor::new();
        let processed = media.process(&png_bytes(640, 480), "image/png");

        assert_eq!(processed.width, Some(640));
        assert_eq!(processed.height, Some(480));
        assert_eq!(processed.mime_type, "image/jpeg");
        assert!(processed.thumbnail.is_some());
    }

    #[test]
    fn test_process_bounds_large_images() {
        let media = MediaProcessor::new();
        let processed = media.process(&png_bytes(3840, 2160), "image/png");

        // Original dimensions are reported even though the stored rendition
        // was shrunk.
        assert_eq!(processed.width, Some(3840));
        assert_eq!(processed.height, Some(2160));

        let stored = image::load_from_memory(&processed.data).unwrap();
        assert!(stored.width() <= MAX_WIDTH);
        assert!(stored.height() <= MAX_HEIGHT);
    }

    #[test]
    fn test_process_thumbnail_is_square() {
        let media = MediaProcessor::new();
        let processed = media.process(&png_bytes(800, 400), "image/png");

        let thumb = image::load_from_memory(&processed.thumbnail.unwrap()).unwrap();
        assert_eq!(thumb.width(), THUMBNAIL_SIZE);
        assert_eq!(thumb.height(), THUMBNAIL_SIZE);
    }

    #[test]
    fn test_process_undecodable_bytes_degrade_to_original() {
        let media = MediaProcessor::new();
        let garbage = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let processed = media.process(&garbage, "image/jpeg");

        assert_eq!(processed.data, garbage);
        assert!(processed.thumbnail.is_none());
        assert_eq!(processed.width, None);
        assert_eq!(processed.mime_type, "image/jpeg");
    }
}
