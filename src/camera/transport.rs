use super::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The authenticated request/reply channel to the camera
///
/// Requests and replies are json objects. Every reply carries at least a
/// boolean `status` except the snapshot reply.
///
/// Failures to exchange a message should be returned as
/// [`super::Error::Transport`]. Retries, timeouts and encryption belong to
/// the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Address of the camera, used to rewrite the stream urls
    fn ip_address(&self) -> &str;

    /// Open the session with the camera
    async fn connect(&self) -> Result<()>;

    /// Query an endpoint
    async fn get(&self, path: &str, params: Value) -> Result<Value>;

    /// Send a change to an endpoint
    async fn post(&self, path: &str, payload: Value) -> Result<Value>;

    /// Close the session, true if the camera acknowledged it
    async fn logout(&self) -> Result<bool>;
}
