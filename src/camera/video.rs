use super::state::{mirror_video_settings, Capability};
use super::{CameraClient, Error, Result};
use crate::model::*;
use log::*;
use std::fmt::Debug;

/// The video settings to change with [`CameraClient::configure_preview`]
///
/// Fields left as `None` keep their current value on the camera
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoRequest {
    /// A value from [`super::Capabilities::resolutions`]
    pub resolution: Option<String>,
    /// A value from [`super::Capabilities::encode_types`]
    pub encode: Option<String>,
    /// A value from [`super::Capabilities::bitrates`]
    pub bitrate: Option<String>,
    /// A value from [`super::Capabilities::framerates`]
    pub framerate: Option<u32>,
    /// 0 or 1 to disable or enable the HDMI output
    pub display_out: Option<u8>,
}

// A supported requested value wins, anything else keeps the current value
fn resolve_index<T: PartialEq + Debug>(
    field: &'static str,
    capability: &Capability<T>,
    requested: Option<&T>,
    current: &T,
) -> Result<SelectIndex> {
    if let Some(value) = requested {
        match capability.index_of(value) {
            Some(index) => return Ok(index),
            None => warn!(
                "{} {:?} is not supported, keeping {:?}",
                field, value, current
            ),
        }
    }
    capability
        .index_of(current)
        .ok_or_else(|| Error::NotInCapabilities {
            field,
            value: format!("{:?}", current),
        })
}

impl CameraClient {
    /// Query the capability lists and the current selection of the camera
    ///
    /// Returns the success flag of the camera. When it is false the
    /// previous mirror is kept.
    pub async fn refresh_video_settings(&mut self) -> Result<bool> {
        let settings: VideoSettings = self.get_reply(PATH_VIDEO).await?;
        if !settings.status {
            warn!("Camera refused the video settings query");
            return Ok(false);
        }

        let (capabilities, current) = mirror_video_settings(settings)?;
        info!("resolutions: {:?}", capabilities.resolutions.values());
        info!("encodetype: {:?}", capabilities.encode_types.values());
        info!("bitrates: {:?}", capabilities.bitrates.values());
        info!("framerates: {:?}", capabilities.framerates.values());

        info!("Current preview settings:");
        info!("resolution: {}", current.resolution);
        info!("encodetype: {}", current.codec);
        info!("bitrate: {}", current.bitrate);
        info!("framerate: {}", current.framerate);
        info!("display_out: {}", current.display_out);

        self.state.capabilities = capabilities;
        self.state.current = current;
        Ok(true)
    }

    /// Change a subset of the preview settings
    ///
    /// Every field of the request that is missing or not supported by the
    /// camera keeps its current value. The mirror is updated only when the
    /// camera accepts the change.
    ///
    /// Returns the success flag of the camera
    pub async fn configure_preview(&mut self, request: &VideoRequest) -> Result<bool> {
        let capabilities = &self.state.capabilities;
        let current = &self.state.current;

        let select = VideoSelect {
            resolution: resolve_index(
                "resolution",
                &capabilities.resolutions,
                request.resolution.as_ref(),
                &current.resolution,
            )?,
            encode_mode: resolve_index(
                "encodetype",
                &capabilities.encode_types,
                request.encode.as_ref(),
                &current.codec,
            )?,
            bitrate: resolve_index(
                "bitrate",
                &capabilities.bitrates,
                request.bitrate.as_ref(),
                &current.bitrate,
            )?,
            framerate: resolve_index(
                "framerate",
                &capabilities.framerates,
                request.framerate.as_ref(),
                &current.framerate,
            )?,
            display_out: match request.display_out {
                Some(display_out @ 0..=1) => display_out,
                Some(invalid) => {
                    error!(
                        "Invalid value: display_out should 0/1 got: {}",
                        invalid
                    );
                    current.display_out
                }
                None => current.display_out,
            },
        };

        let reply: StatusReply = self.post_reply(PATH_VIDEO, &select).await?;
        if reply.status {
            self.mirror_selection(&select);
        } else {
            warn!("Camera refused the video settings {:?}", select);
        }
        Ok(reply.status)
    }

    fn mirror_selection(&mut self, select: &VideoSelect) {
        let capabilities = &self.state.capabilities;
        let current = &mut self.state.current;

        // The indices were all resolved against these same lists
        if let Some(resolution) = capabilities.resolutions.get(select.resolution) {
            if &current.resolution != resolution {
                current.resolution = resolution.clone();
                info!("resolution now: {}", current.resolution);
            }
        }
        if let Some(codec) = capabilities.encode_types.get(select.encode_mode) {
            if &current.codec != codec {
                current.codec = codec.clone();
                info!("encodetype now: {}", current.codec);
            }
        }
        if let Some(bitrate) = capabilities.bitrates.get(select.bitrate) {
            if &current.bitrate != bitrate {
                current.bitrate = bitrate.clone();
                info!("bitrate now: {}", current.bitrate);
            }
        }
        if let Some(framerate) = capabilities.framerates.get(select.framerate) {
            if &current.framerate != framerate {
                current.framerate = *framerate;
                info!("framerate now: {}", current.framerate);
            }
        }
        if current.display_out != select.display_out {
            current.display_out = select.display_out;
            info!("display_out now: {}", current.display_out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::*;
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn last_video_post(transport: &MockTransport) -> serde_json::Value {
        transport
            .requests()
            .into_iter()
            .filter(|r| r.verb == Verb::Post && r.path == PATH_VIDEO)
            .last()
            .map(|r| r.payload)
            .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_mirrors_selection() {
        let (_, client) = connected().await;
        assert_eq!(
            client.capabilities().resolutions.values(),
            ["4K", "1080P", "720P", "480P"]
        );
        assert_eq!(client.capabilities().framerates.values(), [24, 30]);
        assert_eq!(client.current().resolution, "1080P");
        assert_eq!(client.current().codec, "AVC/H.264");
        assert_eq!(client.current().bitrate, "2Mbps");
        assert_eq!(client.current().framerate, 30);
        assert_eq!(client.current().display_out, 0);
    }

    #[tokio::test]
    async fn test_refresh_refused_keeps_state() {
        let (_, mut client) = connected().await;
        let before = client.state().clone();

        let refusing = MockTransport::new("203.0.113.9", |_, _, _| Ok(json!({"status": false})));
        client.transport = refusing;
        assert!(!client.refresh_video_settings().await.unwrap());
        assert_eq!(client.state(), &before);
    }

    #[tokio::test]
    async fn test_empty_request_round_trips() {
        let (transport, mut client) = connected().await;
        let before = client.current().clone();

        assert!(client
            .configure_preview(&VideoRequest::default())
            .await
            .unwrap());
        assert_eq!(client.current(), &before);
        assert_eq!(
            last_video_post(&transport),
            json!({
                "resolutionSelectVal": 1,
                "encodeModeSelectVal": 1,
                "bitRateSelectVal": 2,
                "fpsSelectVal": 1,
                "displayOut": 0,
            })
        );
    }

    #[tokio::test]
    async fn test_partial_request_keeps_other_fields() {
        let (transport, mut client) = connected().await;

        let request = VideoRequest {
            resolution: Some("720P".to_string()),
            display_out: Some(1),
            ..Default::default()
        };
        assert!(client.configure_preview(&request).await.unwrap());
        assert_eq!(
            last_video_post(&transport),
            json!({
                "resolutionSelectVal": 2,
                "encodeModeSelectVal": 1,
                "bitRateSelectVal": 2,
                "fpsSelectVal": 1,
                "displayOut": 1,
            })
        );
        assert_eq!(client.current().resolution, "720P");
        assert_eq!(client.current().codec, "AVC/H.264");
        assert_eq!(client.current().display_out, 1);
    }

    #[tokio::test]
    async fn test_unsupported_values_fall_back_to_current() {
        let (transport, mut client) = connected().await;

        // Move away from the initial selection first so the fallback can
        // not be mistaken for index zero or the camera default
        let request = VideoRequest {
            resolution: Some("480P".to_string()),
            bitrate: Some("4Mbps".to_string()),
            ..Default::default()
        };
        assert!(client.configure_preview(&request).await.unwrap());

        let request = VideoRequest {
            resolution: Some("8K".to_string()),
            encode: Some("MJPEG".to_string()),
            bitrate: Some("3Mbps".to_string()),
            framerate: Some(60),
            display_out: Some(7),
        };
        assert!(client.configure_preview(&request).await.unwrap());
        assert_eq!(
            last_video_post(&transport),
            json!({
                "resolutionSelectVal": 3,
                "encodeModeSelectVal": 1,
                "bitRateSelectVal": 3,
                "fpsSelectVal": 1,
                "displayOut": 0,
            })
        );
        assert_eq!(client.current().resolution, "480P");
        assert_eq!(client.current().bitrate, "4Mbps");
    }

    #[tokio::test]
    async fn test_refused_change_not_mirrored() {
        init();
        let transport = MockTransport::new("203.0.113.9", |verb, path, _| match (verb, path) {
            (Verb::Post, PATH_VIDEO) => Ok(json!({"status": false})),
            (verb, path) => Ok(camera_reply(verb, path)),
        });
        let mut client = CameraClient::connect(transport.clone()).await.unwrap();
        let before = client.current().clone();

        let request = VideoRequest {
            resolution: Some("4K".to_string()),
            framerate: Some(24),
            ..Default::default()
        };
        assert!(!client.configure_preview(&request).await.unwrap());
        assert_eq!(client.current(), &before);
        assert_eq!(transport.count(Verb::Post, PATH_VIDEO), 1);
    }

    #[tokio::test]
    async fn test_configure_without_capabilities() {
        init();
        let transport = MockTransport::camera("203.0.113.9");
        let mut client = CameraClient::new(transport.clone());

        let request = VideoRequest {
            resolution: Some("1080P".to_string()),
            ..Default::default()
        };
        assert_matches!(
            client.configure_preview(&request).await,
            Err(Error::NotInCapabilities {
                field: "resolution",
                ..
            })
        );
        assert_eq!(transport.count(Verb::Post, PATH_VIDEO), 0);
    }
}
