use super::{CameraClient, Error, Result, StreamState};
use crate::model::*;
use log::*;
use std::net::Ipv4Addr;

/// Urls of streams published on the null address are reached through the loopback
const NULL_IP: &str = "0.0.0.0";
const LOOPBACK_IP: &str = "127.0.0.1";

/// Network of the container bridge, cameras addressed from it are reached directly
const BRIDGE_NETWORK: [u8; 2] = [172, 17];

fn on_bridge_network(device_ip: &str) -> bool {
    device_ip
        .parse::<Ipv4Addr>()
        .map(|ip| ip.octets()[..2] == BRIDGE_NETWORK)
        .unwrap_or(false)
}

/// Rewrite a stream url published by the camera into one the client can reach
///
/// The host is replaced by `device_ip` and everything from the last `:` is
/// kept. On the bridge network the url is already reachable and returned
/// as it is.
///
/// ```
/// # use vamlink::camera::resolve_stream_url;
/// assert_eq!(
///     resolve_stream_url("rtsp://10.0.0.5:8554/live", "203.0.113.9").unwrap(),
///     "rtsp://203.0.113.9:8554/live"
/// );
/// ```
pub fn resolve_stream_url(raw_url: &str, device_ip: &str) -> Result<String> {
    let port_idx = raw_url
        .rfind(':')
        .ok_or_else(|| Error::MalformedStreamUrl(raw_url.to_string()))?;
    if on_bridge_network(device_ip) {
        Ok(raw_url.to_string())
    } else {
        Ok(format!("rtsp://{}{}", device_ip, &raw_url[port_idx..]))
    }
}

/// Replace the null address in a url by the loopback address
pub fn substitute_null_address(url: &str) -> String {
    url.replace(NULL_IP, LOOPBACK_IP)
}

impl CameraClient {
    async fn get_stream_info(&self, path: &'static str) -> Result<StreamState> {
        let info: StreamInfo = self.get_reply(path).await?;
        let url = match info.url {
            Some(raw_url) => Some(resolve_stream_url(&raw_url, self.ip_address())?),
            None => None,
        };
        Ok(StreamState {
            running: info.status,
            url,
        })
    }

    /// Query the preview status and url
    ///
    /// Returns the client reachable url if the camera published one
    pub async fn get_preview_info(&mut self) -> Result<Option<String>> {
        let preview = self.get_stream_info(PATH_PREVIEW).await?;
        info!("preview url: {:?}", preview.url);
        self.state.preview = preview;
        Ok(self.state.preview.url.clone())
    }

    /// Query the video analytics status and url
    ///
    /// Returns the client reachable url if the camera published one
    pub async fn get_vam_info(&mut self) -> Result<Option<String>> {
        let vam = self.get_stream_info(PATH_VAM).await?;
        info!("vam url: {:?}", vam.url);
        self.state.vam = vam;
        Ok(self.state.vam.url.clone())
    }
}
