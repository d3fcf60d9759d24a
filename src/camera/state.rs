//! The mirror of the camera settings held by a [`super::CameraClient`]

use super::{Error, Result};
use crate::model::{SelectIndex, VideoSettings, PATH_VIDEO};

/// An ordered list of values the camera supports for one setting
///
/// The position of a value is what the camera expects when selecting it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability<T> {
    values: Vec<T>,
}

impl<T> Default for Capability<T> {
    fn default() -> Self {
        Self { values: vec![] }
    }
}

impl<T: PartialEq> Capability<T> {
    /// Wrap the list as reported by the camera
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    /// The wire index of a value if the camera supports it
    pub fn index_of(&self, value: &T) -> Option<SelectIndex> {
        self.values.iter().position(|v| v == value).map(SelectIndex)
    }

    /// The value selected by a wire index
    pub fn get(&self, index: SelectIndex) -> Option<&T> {
        self.values.get(index.0)
    }

    /// All supported values in camera order
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// Everything the camera can be configured to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Such as `4K`, `1080P`, `720P`, `480P`
    pub resolutions: Capability<String>,
    /// Codecs
    pub encode_types: Capability<String>,
    /// Bitrates
    pub bitrates: Capability<String>,
    /// Frames per second
    pub framerates: Capability<u32>,
}

/// The video settings currently applied on the camera
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentConfig {
    /// One of [`Capabilities::resolutions`]
    pub resolution: String,
    /// One of [`Capabilities::encode_types`]
    pub codec: String,
    /// One of [`Capabilities::bitrates`]
    pub bitrate: String,
    /// One of [`Capabilities::framerates`]
    pub framerate: u32,
    /// 1 if the HDMI output is enabled
    pub display_out: u8,
}

/// Running flag and endpoint of a camera stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    pub(crate) running: bool,
    pub(crate) url: Option<String>,
}

impl StreamState {
    /// True if the camera last reported the stream as running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The client reachable url, only while the stream is running
    pub fn url(&self) -> Option<&str> {
        match self.running {
            true => self.url.as_deref().filter(|url| !url.is_empty()),
            false => None,
        }
    }
}

/// All the state a client mirrors for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    /// What the camera supports
    pub capabilities: Capabilities,
    /// What the camera is currently set to
    pub current: CurrentConfig,
    /// The rtsp preview
    pub preview: StreamState,
    /// The video analytics metadata stream
    pub vam: StreamState,
    pub(crate) recording: bool,
    pub(crate) overlay: bool,
}

impl DeviceState {
    /// True if the camera is recording
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// True if the overlay was last switched on successfully
    pub fn is_overlay_on(&self) -> bool {
        self.overlay
    }
}

fn select<T: PartialEq + Clone>(
    capability: &Capability<T>,
    index: SelectIndex,
    why: &'static str,
) -> Result<T> {
    capability
        .get(index)
        .cloned()
        .ok_or(Error::UnintelligibleReply {
            path: PATH_VIDEO,
            why,
        })
}

/// Split a video query reply into the capability lists and the selection they index
pub(crate) fn mirror_video_settings(
    settings: VideoSettings,
) -> Result<(Capabilities, CurrentConfig)> {
    let capabilities = Capabilities {
        resolutions: Capability::new(settings.resolutions),
        encode_types: Capability::new(settings.encode_modes),
        bitrates: Capability::new(settings.bitrates),
        framerates: Capability::new(settings.framerates),
    };
    let current = CurrentConfig {
        resolution: select(
            &capabilities.resolutions,
            settings.resolution_select,
            "Selected resolution is not in the resolution list",
        )?,
        codec: select(
            &capabilities.encode_types,
            settings.encode_mode_select,
            "Selected encode mode is not in the encode mode list",
        )?,
        bitrate: select(
            &capabilities.bitrates,
            settings.bitrate_select,
            "Selected bitrate is not in the bitrate list",
        )?,
        framerate: select(
            &capabilities.framerates,
            settings.framerate_select,
            "Selected fps is not in the fps list",
        )?,
        display_out: settings.display_out,
    };
    Ok((capabilities, current))
}
