use super::{CameraClient, Error, Result};
use crate::model::*;
use log::*;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The camera subsystems that can be switched on and off
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// The rtsp preview stream
    Preview,
    /// The video analytics and their metadata stream
    Analytics,
    /// Recording on the camera storage
    Recording,
    /// The overlay drawn on the video
    Overlay,
}

impl Subsystem {
    fn path(self) -> &'static str {
        match self {
            Subsystem::Preview => PATH_PREVIEW,
            Subsystem::Analytics => PATH_VAM,
            Subsystem::Recording => PATH_RECORDING,
            Subsystem::Overlay => PATH_OVERLAY,
        }
    }
}

impl Display for Subsystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Subsystem::Preview => "preview",
            Subsystem::Analytics => "vam",
            Subsystem::Recording => "recording",
            Subsystem::Overlay => "overlay",
        };
        write!(f, "{}", name)
    }
}

/// Target state of a switch
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SwitchState {
    /// Turn the subsystem on
    On,
    /// Turn the subsystem off
    Off,
}

impl From<SwitchState> for bool {
    fn from(state: SwitchState) -> Self {
        state == SwitchState::On
    }
}

/// Accepts `on` and `off` in any case
impl FromStr for SwitchState {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token.to_lowercase().as_str() {
            "on" => Ok(SwitchState::On),
            "off" => Ok(SwitchState::Off),
            _ => Err(Error::InvalidSwitchState(token.to_string())),
        }
    }
}

fn parse_token(token: &str) -> Result<SwitchState> {
    token.parse().map_err(|e| {
        error!("{}", e);
        e
    })
}

impl CameraClient {
    /// Switch a subsystem on or off
    ///
    /// The running flag of the subsystem only becomes the target when the
    /// camera accepted the request. For the preview and the analytics the
    /// stream info is queried afterwards which updates the flag and the url
    /// from what the camera reports.
    ///
    /// Returns the success flag of the camera for the switch request
    pub async fn set_state(&mut self, subsystem: Subsystem, state: SwitchState) -> Result<bool> {
        let target: bool = state.into();
        let switch = match subsystem {
            Subsystem::Analytics => Switch::vam(target),
            _ => Switch::new(target),
        };
        let reply: StatusReply = self.post_reply(subsystem.path(), &switch).await?;
        if reply.status {
            debug!("{} switched {:?}", subsystem, state);
            *self.running_flag(subsystem) = target;
        } else {
            warn!("Camera refused to switch {} {:?}", subsystem, state);
        }

        match subsystem {
            Subsystem::Preview => {
                self.get_preview_info().await?;
            }
            Subsystem::Analytics => {
                self.get_vam_info().await?;
            }
            Subsystem::Recording | Subsystem::Overlay => {}
        }
        Ok(reply.status)
    }

    fn running_flag(&mut self, subsystem: Subsystem) -> &mut bool {
        match subsystem {
            Subsystem::Preview => &mut self.state.preview.running,
            Subsystem::Analytics => &mut self.state.vam.running,
            Subsystem::Recording => &mut self.state.recording,
            Subsystem::Overlay => &mut self.state.overlay,
        }
    }

    async fn set_state_token(&mut self, subsystem: Subsystem, token: &str) -> Result<bool> {
        let state = parse_token(token)?;
        self.set_state(subsystem, state).await
    }

    /// Switch the preview with `on` or `off`
    ///
    /// Any other token is an error and nothing is sent to the camera
    pub async fn set_preview_state(&mut self, state: &str) -> Result<bool> {
        self.set_state_token(Subsystem::Preview, state).await
    }

    /// Switch the video analytics with `on` or `off`
    pub async fn set_analytics_state(&mut self, state: &str) -> Result<bool> {
        self.set_state_token(Subsystem::Analytics, state).await
    }

    /// Switch the recording with `on` or `off`
    pub async fn set_recording_state(&mut self, state: &str) -> Result<bool> {
        self.set_state_token(Subsystem::Recording, state).await
    }

    /// Switch the overlay with `on` or `off`
    pub async fn set_overlay_state(&mut self, state: &str) -> Result<bool> {
        self.set_state_token(Subsystem::Overlay, state).await
    }
}
