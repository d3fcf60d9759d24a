use super::{CameraClient, Result, Transport};
use futures::Future;
use log::*;
use std::pin::Pin;
use std::sync::Arc;

/// Logs out of the camera when dropped while still armed
///
/// Covers a session future that is dropped before it completes, such as one
/// cancelled by a timeout. The logout is spawned on the current runtime.
struct LogoutGuard {
    transport: Option<Arc<dyn Transport>>,
}

impl LogoutGuard {
    fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    fn disarm(&mut self) {
        self.transport.take();
    }
}

impl Drop for LogoutGuard {
    fn drop(&mut self) {
        let transport = match self.transport.take() {
            Some(transport) => transport,
            None => return,
        };
        debug!("{}: Session dropped, logging out", transport.ip_address());
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = transport.logout().await {
                        warn!("{}: Logout failed: {}", transport.ip_address(), e);
                    }
                });
            }
            Err(_) => warn!(
                "{}: No runtime left to log out with",
                transport.ip_address()
            ),
        }
    }
}

impl CameraClient {
    ///
    /// Open a session on the transport and mirror the camera settings
    ///
    /// If the settings can not be read the session is closed again before
    /// the error is returned. A camera that refuses the query still gives a
    /// client, with empty capabilities.
    ///
    pub async fn connect(transport: Arc<dyn Transport>) -> Result<Self> {
        transport.connect().await?;
        debug!("{}: Connected", transport.ip_address());

        let mut camera = Self::new(transport);
        if let Err(e) = camera.refresh_video_settings().await {
            error!("{}: {}", camera.ip_address(), e);
            if let Err(logout_err) = camera.transport.logout().await {
                warn!("{}: Logout failed: {}", camera.ip_address(), logout_err);
            }
            return Err(e);
        }
        Ok(camera)
    }

    /// Run a task on a camera session and always log out afterwards
    ///
    /// The error of the task is logged and returned unchanged. A failing
    /// logout is only reported when the task itself succeeded. If the
    /// returned future is dropped before it completes the logout is spawned
    /// in the background.
    pub async fn with_session<F, T>(transport: Arc<dyn Transport>, task: F) -> Result<T>
    where
        F: for<'a> FnOnce(
            &'a mut CameraClient,
        ) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>,
    {
        transport.connect().await?;
        debug!("{}: Connected", transport.ip_address());
        let mut guard = LogoutGuard::new(transport.clone());

        let mut camera = Self::new(transport.clone());
        let result = match camera.refresh_video_settings().await {
            Ok(_) => task(&mut camera).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!("{}: {}", transport.ip_address(), e);
        }

        guard.disarm();
        match (transport.logout().await, result) {
            (Ok(acknowledged), result) => {
                if !acknowledged {
                    warn!("{}: Camera did not acknowledge logout", transport.ip_address());
                }
                result
            }
            (Err(logout_err), Ok(_)) => Err(logout_err),
            (Err(logout_err), Err(e)) => {
                warn!("{}: Logout failed: {}", transport.ip_address(), logout_err);
                Err(e)
            }
        }
    }

    /// Logout from the camera
    ///
    /// Returns true if the camera acknowledged it
    pub async fn logout(self) -> Result<bool> {
        let status = self.transport.logout().await?;
        debug!("{}: Logged out", self.ip_address());
        Ok(status)
    }
}
