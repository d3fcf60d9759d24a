use err_derive::Error;

/// This is the primary error type of the library
#[derive(Debug, Error)]
pub enum Error {
    /// Raised by the transport when a request could not be exchanged
    #[error(display = "Transport error: {}", _0)]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// Raised when a request or reply could not be mapped to json
    #[error(display = "Malformed camera message")]
    Json(#[error(source)] serde_json::Error),

    /// Raised when a reply parsed but its content was not understood
    #[error(display = "Communication error on {}: {}", path, why)]
    UnintelligibleReply {
        /// The endpoint that sent the reply
        path: &'static str,
        /// The message attached to the error
        why: &'static str,
    },

    /// Raised when inferences are requested while the preview is off
    #[error(display = "Preview not started")]
    PreviewNotStarted,

    /// Raised when inferences are requested while video analytics are off
    #[error(display = "VAM not started")]
    AnalyticsNotStarted,

    /// Raised when a switch token is neither on nor off
    #[error(display = "Invalid state: {:?} should be on/off", _0)]
    InvalidSwitchState(String),

    /// Raised when an overlay kind is neither inference nor text
    #[error(display = "Invalid overlay type {:?} use (inference/text)", _0)]
    InvalidOverlayKind(String),

    /// Raised when the current resolution has no known frame size
    #[error(display = "Unknown preview resolution {:?}", _0)]
    UnknownResolution(String),

    /// Raised when the camera did not publish an analytics stream url
    #[error(display = "Camera did not provide a stream url")]
    NoStreamUrl,

    /// Raised when a stream url has no port separator
    #[error(display = "Malformed stream url {:?}", _0)]
    MalformedStreamUrl(String),

    /// Raised when the mirrored selection is not one of the camera's capabilities
    #[error(display = "{} {} is not a supported value", field, value)]
    NotInCapabilities {
        /// The video setting being resolved
        field: &'static str,
        /// The value that could not be found
        value: String,
    },

    /// Raised when the snapshot data is not valid base64
    #[error(display = "Snapshot decoding error")]
    SnapshotDecode(#[error(source)] base64::DecodeError),

    /// Raised when the config file fails to deserlize
    #[error(display = "Configuration parsing error")]
    Config(#[error(source)] toml::de::Error),

    /// Raised when the config file fails validataion
    #[error(display = "Validation error")]
    Validation(#[error(source)] validator::ValidationErrors),

    /// Raised when there is an IO error such as unable to find
    /// config file
    #[error(display = "I/O error")]
    Io(#[error(source)] std::io::Error),
}

impl Error {
    /// Wraps a failure raised by a [`super::Transport`] implementation
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }
}
