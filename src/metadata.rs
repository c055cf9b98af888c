//! Container-level metadata: format, alpha, density and EXIF tags.

use std::collections::BTreeMap;
use std::io::Cursor;

use image::ImageFormat;
use serde::Serialize;

/// Container format as seen by the compression analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ContainerFormat {
    Jpeg,
    Png,
    Webp,
    Tiff,
    Gif,
    Other,
}

impl From<ImageFormat> for ContainerFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => Self::Jpeg,
            ImageFormat::Png => Self::Png,
            ImageFormat::WebP => Self::Webp,
            ImageFormat::Tiff => Self::Tiff,
            ImageFormat::Gif => Self::Gif,
            _ => Self::Other,
        }
    }
}

impl ContainerFormat {
    /// Lowercase format name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Tiff => "tiff",
            Self::Gif => "gif",
            Self::Other => "other",
        }
    }
}

/// Metadata read from the image container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerMetadata {
    /// Container format.
    pub format: ContainerFormat,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Whether the decoded image carries an alpha channel.
    pub has_alpha: bool,
    /// Horizontal resolution in pixels per unit, if recorded.
    pub density: Option<u32>,
    /// EXIF tags of the primary image, keyed by tag name.
    pub exif_tags: BTreeMap<String, String>,
    /// Length of the original input in bytes.
    pub raw_byte_length: u64,
}

/// Parse the EXIF block of a container, if it has one that can be read.
#[must_use]
pub fn parse_exif(bytes: &[u8]) -> Option<exif::Exif> {
    let mut cursor = Cursor::new(bytes);
    exif::Reader::new().read_from_container(&mut cursor).ok()
}

/// Primary-IFD EXIF tags keyed by tag name.
#[must_use]
pub fn exif_tags(exif: &exif::Exif) -> BTreeMap<String, String> {
    exif.fields()
        .filter(|f| f.ifd_num == exif::In::PRIMARY)
        .map(|f| (f.tag.to_string(), field_text(f)))
        .collect()
}

/// Textual value of a field; ASCII values are joined without quotes.
fn field_text(field: &exif::Field) -> String {
    match &field.value {
        exif::Value::Ascii(parts) => parts
            .iter()
            .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string())
            .collect::<Vec<_>>()
            .join(" "),
        _ => field.display_value().to_string(),
    }
}

/// Horizontal resolution from the EXIF `XResolution` tag.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn density(exif: &exif::Exif) -> Option<u32> {
    let field = exif.get_field(exif::Tag::XResolution, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Rational(values) => {
            let r = values.first()?;
            if r.denom == 0 {
                return None;
            }
            Some(r.to_f64().round() as u32)
        }
        other => other.get_uint(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_format_from_image_format() {
        assert_eq!(ContainerFormat::from(ImageFormat::Jpeg), ContainerFormat::Jpeg);
        assert_eq!(ContainerFormat::from(ImageFormat::WebP), ContainerFormat::Webp);
        assert_eq!(ContainerFormat::from(ImageFormat::Bmp), ContainerFormat::Other);
    }

    #[test]
    fn garbage_has_no_exif() {
        assert!(parse_exif(b"not an image").is_none());
    }

    #[test]
    fn plain_png_has_no_exif() {
        let img = image::RgbImage::new(4, 4);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        assert!(parse_exif(&bytes).is_none());
    }
}
