use super::stream_info::substitute_null_address;
use super::{CameraClient, Error, Result};
use futures::stream::{BoxStream, Stream};
use log::*;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Position of a detected object in the preview frame, in pixels
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BoundingBox {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

/// One object detected by the analytics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceObject {
    /// Identifier of the object
    pub id: String,
    /// Class label as sent by the camera, may carry trailing noise
    pub label: String,
    /// Confidence of the detection, 0 to 100
    pub confidence: f32,
    /// Where the object is
    pub position: BoundingBox,
}

/// All the objects detected in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceFrame {
    /// Detected objects
    pub objects: Vec<InferenceObject>,
}

/// Pixel size of the preview frames
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl FrameSize {
    /// Frame size of a resolution name reported by the camera
    pub fn from_resolution(resolution: &str) -> Option<Self> {
        let (width, height) = match resolution {
            "4K" => (3840, 2160),
            "1080P" => (1920, 1080),
            "720P" => (1280, 720),
            "480P" => (640, 480),
            _ => return None,
        };
        Some(Self { width, height })
    }
}

/// The frames of an analytics metadata stream, pulled one at a time
pub type InferenceFrames = BoxStream<'static, Result<InferenceFrame>>;

/// Decodes the analytics metadata stream of the camera
///
/// A decoder is started once per [`InferenceSession`] and always stopped
/// when that session ends
pub trait InferenceDecoder: Send {
    /// Connect to the metadata stream at `url`
    fn start(&mut self, url: &str, size: FrameSize) -> Result<InferenceFrames>;

    /// Release the stream
    fn stop(&mut self);
}

/// A handle on a running inference stream
///
/// Frames are pulled with [`futures::StreamExt::next`]
///
/// When this object is dropped the decoder is stopped
pub struct InferenceSession<'a> {
    decoder: &'a mut dyn InferenceDecoder,
    frames: Option<InferenceFrames>,
}

impl<'a> Stream for InferenceSession<'a> {
    type Item = Result<InferenceFrame>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.get_mut().frames.as_mut() {
            Some(frames) => frames.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

impl<'a> Drop for InferenceSession<'a> {
    fn drop(&mut self) {
        self.frames.take();
        self.decoder.stop();
        debug!("Inference stream stopped");
    }
}

impl CameraClient {
    ///
    /// Start consuming the inferences of the video analytics
    ///
    /// Both the preview and the analytics must be running. The returned
    /// session yields the frames of the metadata stream and stops the
    /// decoder when dropped, including when an error is returned after the
    /// decoder was handed over.
    ///
    /// Only one session should be active per client
    ///
    pub async fn get_inferences<'d>(
        &mut self,
        decoder: &'d mut dyn InferenceDecoder,
    ) -> Result<InferenceSession<'d>> {
        if !self.state.preview.running {
            return Err(Error::PreviewNotStarted);
        }
        if !self.state.vam.running {
            return Err(Error::AnalyticsNotStarted);
        }

        let resolution = &self.state.current.resolution;
        let size = FrameSize::from_resolution(resolution)
            .ok_or_else(|| Error::UnknownResolution(resolution.clone()))?;

        let mut session = InferenceSession {
            decoder,
            frames: None,
        };
        match self.open_inferences(&mut session, size).await {
            Ok(()) => Ok(session),
            Err(e) => {
                error!("Could not start the inference stream: {}", e);
                Err(e)
            }
        }
    }

    async fn open_inferences(
        &mut self,
        session: &mut InferenceSession<'_>,
        size: FrameSize,
    ) -> Result<()> {
        if self.state.vam.url().is_none() {
            self.get_vam_info().await?;
        }
        let url = self.state.vam.url().ok_or(Error::NoStreamUrl)?;
        let url = substitute_null_address(url);

        info!(
            "Starting inferences from {} at {}x{}",
            url, size.width, size.height
        );
        session.frames = Some(session.decoder.start(&url, size)?);
        Ok(())
    }
}
