use overlay_core::BackendError;
use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

/// Failures inside the X11 backend.
///
/// Converted into [`BackendError`] at the trait boundary.
#[derive(Error, Debug)]
pub enum X11Error {
    #[error("Failed to connect to X server: {0}")]
    Connect(#[from] ConnectError),

    #[error("X11 connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X11 request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("X11 resource allocation failed: {0}")]
    ReplyOrId(#[from] ReplyOrIdError),

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Cairo surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("No 32-bit TrueColor visual on screen {screen}")]
    NoArgbVisual { screen: usize },

    #[error("Font system unavailable: {message}")]
    FontSystem { message: String },

    #[error("Unknown {kind} handle {id}")]
    UnknownHandle { kind: &'static str, id: u32 },
}

impl X11Error {
    /// True when the server rejected a request, as it does for a destroyed
    /// window. Connection failures are not in this class.
    pub fn is_window_gone(&self) -> bool {
        matches!(self, X11Error::Reply(ReplyError::X11Error(_)))
    }
}

impl From<X11Error> for BackendError {
    fn from(err: X11Error) -> Self {
        match err {
            X11Error::Connect(_) | X11Error::Connection(_) => BackendError::Connection(err.to_string()),
            X11Error::Cairo(_) | X11Error::Borrow(_) => BackendError::Rendering(err.to_string()),
            X11Error::FontSystem { message } => BackendError::Font(message),
            X11Error::Reply(_) | X11Error::ReplyOrId(_) | X11Error::NoArgbVisual { .. } | X11Error::UnknownHandle { .. } => {
                BackendError::Window(err.to_string())
            }
        }
    }
}
