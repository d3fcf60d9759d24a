use super::{CameraClient, Error, Result};
use crate::model::*;
use log::*;
use std::str::FromStr;

/// What the overlay draws on the video
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// The boxes and labels of the analytics
    Inference,
    /// Text chosen by the user
    Text,
}

impl FromStr for OverlayKind {
    type Err = Error;

    fn from_str(kind: &str) -> Result<Self> {
        match kind {
            "inference" => Ok(OverlayKind::Inference),
            "text" => Ok(OverlayKind::Text),
            _ => Err(Error::InvalidOverlayKind(kind.to_string())),
        }
    }
}

impl CameraClient {
    /// Configure the overlay content, `text` is only used by [`OverlayKind::Text`]
    ///
    /// Returns the success flag of the camera
    pub async fn set_overlay_config(&self, kind: OverlayKind, text: Option<&str>) -> Result<bool> {
        let config = match kind {
            OverlayKind::Inference => OverlayConfig::inference(),
            OverlayKind::Text => OverlayConfig::text(text),
        };
        let reply: StatusReply = self.post_reply(PATH_OVERLAY_CONFIG, &config).await?;
        if !reply.status {
            warn!("Camera refused the {:?} overlay", kind);
        }
        Ok(reply.status)
    }

    /// Configure the overlay content from `inference` or `text`
    ///
    /// Any other kind is an error and nothing is sent to the camera
    pub async fn configure_overlay(&self, kind: &str, text: Option<&str>) -> Result<bool> {
        let kind: OverlayKind = kind.parse().map_err(|e| {
            error!("{}", e);
            e
        })?;
        self.set_overlay_config(kind, text).await
    }
}
