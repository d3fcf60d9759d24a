//! Snapshots triggered by the inferences of the analytics

use super::{CameraClient, InferenceDecoder, InferenceObject, Result, Snapshot};
use futures::StreamExt;
use log::*;
use serde::Serialize;
use tokio::time::{Duration, Instant};

/// Characters the camera leaves around its labels
const LABEL_NOISE: &[char] = &[' ', '.', '\t', '\n'];

/// A cleaned up inference, only lives for one callback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRecord {
    /// Identifier of the object
    pub id: String,
    /// Class label
    pub label: String,
    /// Confidence of the detection, 0 to 100
    pub confidence: f32,
    /// Left edge
    pub position_x: u32,
    /// Top edge
    pub position_y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl From<&InferenceObject> for InferenceRecord {
    fn from(object: &InferenceObject) -> Self {
        Self {
            id: object.id.clone(),
            label: object.label.trim_matches(LABEL_NOISE).to_string(),
            confidence: object.confidence,
            position_x: object.position.x,
            position_y: object.position.y,
            width: object.position.width,
            height: object.position.height,
        }
    }
}

impl InferenceRecord {
    /// The record as a json object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// When an inference should trigger a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct CapturePolicy {
    /// No snapshot is taken when false
    pub enabled: bool,
    /// Confidence must be above this
    pub min_confidence: f32,
    /// Confidence must be below this
    pub max_confidence: f32,
    /// Frames arriving sooner than this after the last handled inference are skipped
    pub interval: Duration,
}

impl Default for CapturePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            min_confidence: 50.0,
            max_confidence: 70.0,
            interval: Duration::from_secs(5),
        }
    }
}

impl CapturePolicy {
    /// True if an inference of this confidence should be captured
    ///
    /// Both bounds are exclusive
    pub fn admits(&self, confidence: f32) -> bool {
        self.enabled && self.min_confidence < confidence && confidence < self.max_confidence
    }
}

/// Trait used as part of [`CameraClient::watch_inferences`] to receive the inferences
pub trait InferenceOutput {
    /// This is the callback used for every inference
    ///
    /// `snapshot` is set when the inference triggered a successful capture
    ///
    /// If result is `Ok(true)` more inferences will be sent
    ///
    /// If result if `Ok(false)` then the stream will be stopped
    ///
    /// If result is `Err(E)` then the stream will be stopped
    /// and the error returned
    fn inference_recv(
        &mut self,
        record: InferenceRecord,
        snapshot: Option<Snapshot>,
    ) -> Result<bool>;
}

impl CameraClient {
    /// Consume the inferences, taking a snapshot of those the policy admits
    ///
    /// Runs until the stream ends or the output asks to stop. The decoder is
    /// stopped on return.
    pub async fn watch_inferences<T: InferenceOutput>(
        &mut self,
        decoder: &mut dyn InferenceDecoder,
        policy: &CapturePolicy,
        data_out: &mut T,
    ) -> Result<()> {
        let mut frames = self.get_inferences(decoder).await?;
        let mut last_time = Instant::now();

        while let Some(frame) = frames.next().await {
            let frame = frame.map_err(|e| {
                error!("Inference stream failed: {}", e);
                e
            })?;
            if last_time.elapsed() < policy.interval {
                continue;
            }

            for object in &frame.objects {
                let record = InferenceRecord::from(object);
                let snapshot = if policy.admits(record.confidence) {
                    debug!(
                        "Capturing {} at confidence {}",
                        record.label, record.confidence
                    );
                    let snapshot = self.capture_image().await.map_err(|e| {
                        error!("Capture failed: {}", e);
                        e
                    })?;
                    if snapshot.is_none() {
                        warn!("capture image failed");
                    }
                    snapshot
                } else {
                    None
                };
                last_time = Instant::now();

                if !data_out.inference_recv(record, snapshot)? {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}
