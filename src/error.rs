//! Error types for the ai-image-detect crate.

/// Errors that abort an analysis.
///
/// Only whole-image failures end up here. Failures inside a single signal
/// analyzer are absorbed as [`FilterError`] and never surface to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    DecodeFailed(image::ImageError),

    /// The decoded image has zero area.
    #[error("image has no pixels ({width}x{height})")]
    EmptyRaster {
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },

    /// The input exceeds the configured size limit.
    #[error("input is {size} bytes, limit is {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected input in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// The input is not an image format the detector accepts.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The detector configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// An I/O error occurred while reading files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable failure inside a re-decoding filter pass.
///
/// The analyzer that hits one of these falls back to the neutral baseline.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// The filter could not re-decode the original bytes.
    #[error("filter re-decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The filter produced no samples.
    #[error("filter produced an empty image")]
    EmptyImage,
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("bmp".to_string());
        assert!(unsupported.to_string().contains("bmp"));

        let empty = Error::EmptyRaster {
            width: 0,
            height: 20,
        };
        assert!(empty.to_string().contains("0x20"));

        let too_large = Error::InputTooLarge {
            size: 2048,
            limit: 1024,
        };
        let msg = too_large.to_string();
        assert!(msg.contains("2048"));
        assert!(msg.contains("1024"));
    }

    #[test]
    fn filter_error_display() {
        assert_eq!(
            FilterError::EmptyImage.to_string(),
            "filter produced an empty image"
        );
    }
}
