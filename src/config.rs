use crate::camera::{CapturePolicy, OverlayKind, VideoRequest};
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::{Validate, ValidationError};
use validator_derive::Validate;

lazy_static! {
    static ref RE_RESOLUTION: Regex = Regex::new(r"^(4K|1080P|720P|480P)$").unwrap();
    static ref RE_OVERLAY: Regex = Regex::new(r"^(inference|text)$").unwrap();
}

/// Top level of the configuration file
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// The cameras to control
    #[validate]
    pub cameras: Vec<CameraConfig>,
}

/// One camera and the settings to apply to it
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CameraConfig {
    /// Name used to find the camera in the config
    #[validate(length(min = 1, message = "Camera name cannot be empty", code = "name"))]
    pub name: String,

    /// Ip address of the camera
    #[serde(rename = "address")]
    pub camera_addr: String,

    /// Username to login with
    #[serde(default = "default_username")]
    pub username: String,
    /// Password to login with
    pub password: Option<String>,

    /// Preview resolution
    #[validate(regex(
        path = "RE_RESOLUTION",
        message = "Incorrect resolution",
        code = "resolution"
    ))]
    pub resolution: Option<String>,
    /// Preview codec
    pub encode: Option<String>,
    /// Preview bitrate
    pub bitrate: Option<String>,
    /// Preview frame rate
    pub framerate: Option<u32>,
    /// 1 to enable the HDMI output
    #[validate(range(min = 0, max = 1, message = "Invalid display_out", code = "display_out"))]
    pub display_out: Option<u8>,

    /// Overlay kind, `inference` or `text`
    #[validate(regex(path = "RE_OVERLAY", message = "Incorrect overlay", code = "overlay"))]
    #[serde(default = "default_overlay")]
    pub overlay: String,
    /// Text of a `text` overlay
    pub overlay_text: Option<String>,

    /// When inferences trigger snapshots
    #[validate]
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Snapshot trigger settings
#[derive(Debug, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = "validate_confidence_window"))]
pub struct CaptureConfig {
    /// Set to false to never take snapshots
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Exclusive lower bound of the confidence
    #[validate(range(min = 0.0, max = 100.0, message = "Invalid confidence", code = "min_confidence"))]
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Exclusive upper bound of the confidence
    #[validate(range(min = 0.0, max = 100.0, message = "Invalid confidence", code = "max_confidence"))]
    #[serde(default = "default_max_confidence")]
    pub max_confidence: f32,

    /// Seconds between handled inferences
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            min_confidence: default_min_confidence(),
            max_confidence: default_max_confidence(),
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_overlay() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_confidence() -> f32 {
    50.0
}

fn default_max_confidence() -> f32 {
    70.0
}

fn default_interval_secs() -> u64 {
    5
}

fn validate_confidence_window(capture: &CaptureConfig) -> std::result::Result<(), ValidationError> {
    if capture.min_confidence >= capture.max_confidence {
        return Err(ValidationError::new(
            "min_confidence must be below max_confidence",
        ));
    }
    Ok(())
}

impl Config {
    /// Parse and validate a toml configuration
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a toml configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Find a camera by its name
    pub fn get_camera_config(&self, name: &str) -> Option<&CameraConfig> {
        self.cameras.iter().find(|c| c.name == name)
    }
}

impl CameraConfig {
    /// The preview settings to apply
    pub fn video_request(&self) -> VideoRequest {
        VideoRequest {
            resolution: self.resolution.clone(),
            encode: self.encode.clone(),
            bitrate: self.bitrate.clone(),
            framerate: self.framerate,
            display_out: self.display_out,
        }
    }

    /// The overlay kind to configure
    pub fn overlay_kind(&self) -> Result<OverlayKind> {
        self.overlay.parse()
    }
}

impl CaptureConfig {
    /// The capture policy these settings describe
    pub fn policy(&self) -> CapturePolicy {
        CapturePolicy {
            enabled: self.enabled,
            min_confidence: self.min_confidence,
            max_confidence: self.max_confidence,
            interval: Duration::from_secs(self.interval_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use assert_matches::assert_matches;
    use indoc::indoc;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml(indoc! {r#"
            [[cameras]]
            name = "lobby"
            address = "203.0.113.9"
        "#})
        .unwrap();

        let camera = config.get_camera_config("lobby").unwrap();
        assert_eq!(camera.username, "admin");
        assert_eq!(camera.password, None);
        assert_eq!(camera.overlay_kind().unwrap(), OverlayKind::Text);
        assert_eq!(camera.video_request(), VideoRequest::default());
        assert_eq!(camera.capture.policy(), CapturePolicy::default());
        assert!(config.get_camera_config("garage").is_none());
    }

    #[test]
    fn test_full_camera() {
        let config = Config::from_toml(indoc! {r#"
            [[cameras]]
            name = "lobby"
            address = "203.0.113.9"
            username = "operator"
            password = "secret"
            resolution = "1080P"
            framerate = 30
            display_out = 1
            overlay = "inference"

            [cameras.capture]
            enabled = false
            min_confidence = 80.0
            max_confidence = 95.0
            interval_secs = 0
        "#})
        .unwrap();

        let camera = &config.cameras[0];
        let request = camera.video_request();
        assert_eq!(request.resolution.as_deref(), Some("1080P"));
        assert_eq!(request.framerate, Some(30));
        assert_eq!(request.display_out, Some(1));
        assert_eq!(camera.overlay_kind().unwrap(), OverlayKind::Inference);

        let policy = camera.capture.policy();
        assert!(!policy.enabled);
        assert_eq!(policy.interval, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values() {
        for camera in [
            r#"resolution = "8K""#,
            r#"overlay = "banner""#,
            r#"display_out = 2"#,
            "[cameras.capture]\nmin_confidence = 70.0\nmax_confidence = 50.0",
            "[cameras.capture]\nmax_confidence = 150.0",
        ] {
            let text = format!(
                "[[cameras]]\nname = \"lobby\"\naddress = \"203.0.113.9\"\n{}\n",
                camera
            );
            assert_matches!(Config::from_toml(&text), Err(Error::Validation(_)));
        }
    }

    #[test]
    fn test_parse_error() {
        assert_matches!(
            Config::from_toml("[[cameras]]\nname = 3"),
            Err(Error::Config(_))
        );
    }
}
