#![warn(missing_docs)]
//! # Vamlink
//!
//! Vamlink is a rust library for controlling network cameras that run video
//! analytics on the device.
//!
//! Most high level camera controls are in the [`camera`] module.
//!
//! The library does not speak to the network itself. A [`camera::Transport`]
//! carries the request/reply exchanges and a [`camera::InferenceDecoder`]
//! turns the analytics endpoint into a stream of inference frames.
//!
//! A session is opened with
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use vamlink::camera::{CameraClient, Transport};
//! # async fn demo(transport: Arc<dyn Transport>) -> vamlink::Result<()> {
//! let status = CameraClient::with_session(transport, |camera| {
//!     Box::pin(async move {
//!         camera.set_preview_state("on").await?;
//!         camera.set_analytics_state("on").await
//!     })
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! For further commands see the [`camera::CameraClient`] struct.
//!

/// Contains high level interfaces for the camera
pub mod camera;
/// Contains the toml configuration of the cameras
pub mod config;
/// Contains the request and reply structures exchanged with the camera
pub mod model;

/// This is the top level error structure of the library
///
/// Most commands will either return their `Ok(result)` or this `Err(Error)`
pub use camera::Error;

/// Result type used by the whole library
pub type Result<T> = std::result::Result<T, Error>;
