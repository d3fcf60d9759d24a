use super::{CameraClient, Result};
use crate::model::*;
use base64::Engine;
use log::*;

/// A snapshot taken by the camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// When the camera took it, as the camera formats it
    pub timestamp: String,
    /// Base64 encoded jpeg
    pub data: String,
}

impl Snapshot {
    /// The jpeg bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.data)?)
    }
}

impl CameraClient {
    /// Take a snapshot
    ///
    /// Returns `None` when the camera reports an error
    pub async fn capture_image(&self) -> Result<Option<Snapshot>> {
        let reply: CaptureReply = self
            .post_reply(PATH_CAPTURE_IMAGE, &serde_json::json!({}))
            .await?;
        if !reply.succeeded() {
            error!(
                "Snapshot failed: {}",
                reply.error.as_deref().unwrap_or("no error given")
            );
            return Ok(None);
        }

        let timestamp = match reply.timestamp {
            Some(serde_json::Value::String(timestamp)) => timestamp,
            Some(timestamp) => timestamp.to_string(),
            None => String::new(),
        };
        trace!("Got snapshot taken at {}", timestamp);
        Ok(reply.data.map(|data| Snapshot { timestamp, data }))
    }
}
