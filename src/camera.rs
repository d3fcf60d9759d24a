use log::*;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

mod capture;
mod errors;
mod inference;
#[cfg(test)]
mod mock;
mod overlay;
mod session;
mod snap;
mod state;
mod stream_info;
mod switch;
mod transport;
mod video;

pub use capture::{CapturePolicy, InferenceOutput, InferenceRecord};
pub use errors::Error;
pub use inference::{
    BoundingBox, FrameSize, InferenceDecoder, InferenceFrame, InferenceFrames, InferenceObject,
    InferenceSession,
};
pub use overlay::OverlayKind;
pub use snap::Snapshot;
pub use state::{Capabilities, Capability, CurrentConfig, DeviceState, StreamState};
pub use stream_info::{resolve_stream_url, substitute_null_address};
pub use switch::{Subsystem, SwitchState};
pub use transport::Transport;
pub use video::VideoRequest;

pub(crate) use crate::Result;

///
/// This is the primary struct of this library when interacting with the camera
///
/// It mirrors what the camera reported about its video settings and streams.
/// The mirror is only changed by the operations of this struct and only after
/// the camera acknowledged the change.
///
pub struct CameraClient {
    transport: Arc<dyn Transport>,
    state: DeviceState,
}

impl CameraClient {
    /// Wrap an already connected transport
    ///
    /// Nothing is queried yet, see [`CameraClient::connect`] for the usual
    /// way to get a client
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            state: Default::default(),
        }
    }

    /// Everything that is known about the camera
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Capability lists reported by the camera
    pub fn capabilities(&self) -> &Capabilities {
        &self.state.capabilities
    }

    /// The video settings the camera last confirmed
    pub fn current(&self) -> &CurrentConfig {
        &self.state.current
    }

    /// The address of the camera as known to the transport
    pub fn ip_address(&self) -> &str {
        self.transport.ip_address()
    }

    async fn get_reply<R: DeserializeOwned>(&self, path: &'static str) -> Result<R> {
        let params = serde_json::Value::Object(Default::default());
        let reply = self.transport.get(path, params).await?;
        trace!("GET {} => {:?}", path, reply);
        Ok(serde_json::from_value(reply)?)
    }

    async fn post_reply<P: Serialize, R: DeserializeOwned>(
        &self,
        path: &'static str,
        payload: &P,
    ) -> Result<R> {
        let payload = serde_json::to_value(payload)?;
        trace!("POST {} <= {:?}", path, payload);
        let reply = self.transport.post(path, payload).await?;
        trace!("POST {} => {:?}", path, reply);
        Ok(serde_json::from_value(reply)?)
    }
}
