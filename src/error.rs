use image::ImageError;
use thiserror::Error;

use std::io::Error as IOError;
use std::path::PathBuf;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct PlateError(PlateErrorKind);

#[derive(Debug, Error)]
pub enum PlateErrorKind {
    #[error("io error: {0}")]
    IOError(#[from] IOError),
    #[error("image error: {0}")]
    ImageError(#[from] ImageError),
    #[error("malformed annotation payload: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    ConfigError(String),
    #[error("font could not be loaded from {0}")]
    FontError(PathBuf),
    /// The text detection service failed, timed out or answered garbage.
    #[error("text detection failed: {message}")]
    DetectorError { message: String },
    #[error("image file {0} does not exist")]
    MissingImage(PathBuf),
}

impl PlateError {
    pub fn kind(&self) -> &PlateErrorKind {
        &self.0
    }

    pub fn detector(message: impl Into<String>) -> Self {
        Self(PlateErrorKind::DetectorError { message: message.into() })
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self(PlateErrorKind::ConfigError(message.into()))
    }

    pub fn is_detector_failure(&self) -> bool {
        matches!(self.0, PlateErrorKind::DetectorError { .. })
    }
}

impl<T> From<T> for PlateError
where T: Into<PlateErrorKind>
{
    fn from(e: T) -> Self {
        Self(e.into())
    }
}

impl From<toml::de::Error> for PlateErrorKind {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::{PlateError, PlateErrorKind};

    use std::io;

    #[test]
    fn io_errors_convert_through_kind() {
        let err: PlateError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err.kind(), PlateErrorKind::IOError(_)));
        assert!(!err.is_detector_failure());
        assert_eq!(err.to_string(), "io error: gone");
    }

    #[test]
    fn detector_failures_are_flagged() {
        let err = PlateError::detector("exit status 2");
        assert!(err.is_detector_failure());
        assert_eq!(err.to_string(), "text detection failed: exit status 2");
    }
}
