// src/error.rs
use thiserror::Error;

use crate::font::FontSelectionError;
use crate::traits::BackendError;

/// Error hierarchy for the overlay.
///
/// Only fatal conditions are represented here. A missing or vanished target
/// window is not an error: it is absorbed into [`crate::OverlayState`].
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Windowing platform unavailable: {message}")]
    PlatformUnavailable { message: String },

    #[error("Font subsystem unavailable: {message}")]
    FontSystemUnavailable { message: String },

    #[error("Failed to create overlay resources: {message}")]
    ResourceCreationFailed { message: String },

    #[error("Font selection failed: {source}")]
    Font {
        #[from]
        source: FontSelectionError,
    },

    #[error("Backend error: {source}")]
    Backend {
        #[from]
        source: BackendError,
    },
}

impl OverlayError {
    /// Classify a failure to open the platform connection
    pub fn from_connect(err: BackendError) -> Self {
        match err {
            BackendError::Font(message) => OverlayError::FontSystemUnavailable { message },
            other => OverlayError::PlatformUnavailable {
                message: other.to_string(),
            },
        }
    }
}

pub type OverlayResult<T> = Result<T, OverlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_failure_classification() {
        let cases = [
            (BackendError::Connection("no display".to_string()), false),
            (BackendError::Window("bad root".to_string()), false),
            (BackendError::Rendering("no visual".to_string()), false),
            (BackendError::Font("no fontconfig".to_string()), true),
        ];
        for (err, font_system) in cases {
            // Exhaustive so a new backend variant has to be classified here too
            match &err {
                BackendError::Connection(_)
                | BackendError::Window(_)
                | BackendError::Rendering(_)
                | BackendError::Font(_) => {}
            }
            let message = err.to_string();
            match OverlayError::from_connect(err) {
                OverlayError::FontSystemUnavailable { message: m } => {
                    assert!(font_system);
                    assert_eq!(m, "no fontconfig");
                }
                OverlayError::PlatformUnavailable { message: m } => {
                    assert!(!font_system);
                    assert_eq!(m, message);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
