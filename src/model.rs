#![allow(non_snake_case)]

use serde::{Deserialize, Serialize};

/// Capability lists and current selection of the preview encoder
pub const PATH_VIDEO: &str = "/video";
/// Switch and url of the rtsp preview
pub const PATH_PREVIEW: &str = "/preview";
/// Switch and url of the video analytics metadata stream
pub const PATH_VAM: &str = "/vam";
/// Switch of the on device recording
pub const PATH_RECORDING: &str = "/recording";
/// Content of the video overlay
pub const PATH_OVERLAY_CONFIG: &str = "/overlayconfig";
/// Switch of the video overlay
pub const PATH_OVERLAY: &str = "/overlay";
/// Snapshot trigger
pub const PATH_CAPTURE_IMAGE: &str = "/captureimage";

/// Value of [`CaptureReply::error`] when the snapshot succeeded
pub const CAPTURE_NO_ERROR: &str = "none";

/// Index into one of the capability lists of [`VideoSettings`]
///
/// The camera selects values by their position in the list it reported
/// so this is what goes over the wire
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectIndex(pub usize);

/// Reply that only carries the success flag
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReply {
    /// True if the camera accepted the request
    #[serde(default)]
    pub status: bool,
}

/// Reply of the video query
///
/// Only `status` is guaranteed, the other fields are filled when it is true
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoSettings {
    /// True if the camera answered the query
    #[serde(default)]
    pub status: bool,
    /// Supported resolutions such as `1080P`
    #[serde(rename = "resolution", default)]
    pub resolutions: Vec<String>,
    /// Supported codecs
    #[serde(rename = "encodeMode", default)]
    pub encode_modes: Vec<String>,
    /// Supported bitrates
    #[serde(rename = "bitRate", default)]
    pub bitrates: Vec<String>,
    /// Supported frame rates
    #[serde(rename = "fps", default)]
    pub framerates: Vec<u32>,
    /// Currently selected resolution
    #[serde(rename = "resolutionSelectVal", default)]
    pub resolution_select: SelectIndex,
    /// Currently selected codec
    #[serde(rename = "encodeModeSelectVal", default)]
    pub encode_mode_select: SelectIndex,
    /// Currently selected bitrate
    #[serde(rename = "bitRateSelectVal", default)]
    pub bitrate_select: SelectIndex,
    /// Currently selected frame rate
    #[serde(rename = "fpsSelectVal", default)]
    pub framerate_select: SelectIndex,
    /// 1 if the HDMI output is enabled
    #[serde(rename = "displayOut", default)]
    pub display_out: u8,
}

/// Sent to change the preview encoder, every field is an index except `display_out`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoSelect {
    /// Index into the resolutions
    #[serde(rename = "resolutionSelectVal")]
    pub resolution: SelectIndex,
    /// Index into the codecs
    #[serde(rename = "encodeModeSelectVal")]
    pub encode_mode: SelectIndex,
    /// Index into the bitrates
    #[serde(rename = "bitRateSelectVal")]
    pub bitrate: SelectIndex,
    /// Index into the frame rates
    #[serde(rename = "fpsSelectVal")]
    pub framerate: SelectIndex,
    /// 0 or 1
    #[serde(rename = "displayOut")]
    pub display_out: u8,
}

/// Turns one of the camera subsystems on or off
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Switch {
    /// Requested state
    #[serde(rename = "switchStatus")]
    pub switch_status: bool,
    /// Analytics model, only sent to the vam endpoint
    #[serde(rename = "vamconfig", skip_serializing_if = "Option::is_none")]
    pub vam_config: Option<String>,
}

impl Switch {
    /// A plain switch
    pub fn new(switch_status: bool) -> Self {
        Self {
            switch_status,
            vam_config: None,
        }
    }

    /// The analytics switch which also selects the motion detection model
    pub fn vam(switch_status: bool) -> Self {
        Self {
            switch_status,
            vam_config: Some("MD".to_string()),
        }
    }
}

/// Reply of the preview and vam queries
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamInfo {
    /// True if the stream is running
    #[serde(default)]
    pub status: bool,
    /// Where the camera publishes the stream, as seen from the camera
    #[serde(default)]
    pub url: Option<String>,
}

/// Overlay content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayConfig {
    /// 0 is user text, 5 draws the inference results
    pub ov_type_SelectVal: u8,
    /// Position preset
    pub ov_position_SelectVal: u8,
    /// Packed colour
    pub ov_color: String,
    /// Text to draw
    pub ov_usertext: Option<String>,
    /// Left of the overlay box
    pub ov_start_x: u32,
    /// Top of the overlay box
    pub ov_start_y: u32,
    /// Width of the overlay box
    pub ov_width: u32,
    /// Height of the overlay box
    pub ov_height: u32,
}

impl OverlayConfig {
    const COLOR: &'static str = "869007615";

    fn with_type(ov_type: u8, text: Option<String>) -> Self {
        Self {
            ov_type_SelectVal: ov_type,
            ov_position_SelectVal: 0,
            ov_color: Self::COLOR.to_string(),
            ov_usertext: text,
            ov_start_x: 0,
            ov_start_y: 0,
            ov_width: 0,
            ov_height: 0,
        }
    }

    /// Overlay that draws the inference results with a placeholder caption
    pub fn inference() -> Self {
        Self::with_type(5, Some("Text".to_string()))
    }

    /// Overlay that draws the given text
    pub fn text<T: Into<String>>(text: Option<T>) -> Self {
        Self::with_type(0, text.map(|t| t.into()))
    }
}

/// Reply of the snapshot trigger
///
/// This endpoint reports failures through `Error` instead of `status`
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct CaptureReply {
    /// Some firmwares answer with the usual flag instead of `Error`
    #[serde(default)]
    pub status: Option<bool>,
    /// `none` on success, otherwise the reason of the failure
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    /// When the image was taken
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<serde_json::Value>,
    /// Base64 encoded jpeg
    #[serde(rename = "Data", default)]
    pub data: Option<String>,
}

impl CaptureReply {
    /// True when the camera took the snapshot
    pub fn succeeded(&self) -> bool {
        match &self.error {
            Some(error) => error == CAPTURE_NO_ERROR,
            None => self.status.unwrap_or(false),
        }
    }
}
