//! In memory transport and decoder used by the unit tests

use super::*;
use async_trait::async_trait;
use env_logger::Env;
use futures::stream;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Verb {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Request {
    pub(crate) verb: Verb,
    pub(crate) path: String,
    pub(crate) payload: Value,
}

type Responder = Box<dyn Fn(Verb, &str, &Value) -> Result<Value> + Send + Sync>;

/// Records every request and answers with the responder
pub(crate) struct MockTransport {
    ip: String,
    responder: Responder,
    requests: Mutex<Vec<Request>>,
    pub(crate) connects: AtomicUsize,
    pub(crate) logouts: AtomicUsize,
    pub(crate) fail_logout: AtomicBool,
}

impl MockTransport {
    pub(crate) fn new<F>(ip: &str, responder: F) -> Arc<Self>
    where
        F: Fn(Verb, &str, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        Arc::new(Self {
            ip: ip.to_string(),
            responder: Box::new(responder),
            requests: Mutex::new(vec![]),
            connects: AtomicUsize::new(0),
            logouts: AtomicUsize::new(0),
            fail_logout: AtomicBool::new(false),
        })
    }

    /// A camera that accepts everything and runs every stream
    pub(crate) fn camera(ip: &str) -> Arc<Self> {
        Self::new(ip, |verb, path, _| Ok(camera_reply(verb, path)))
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, verb: Verb, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.verb == verb && r.path == path)
            .count()
    }

    fn handle(&self, verb: Verb, path: &str, payload: Value) -> Result<Value> {
        let reply = (self.responder)(verb, path, &payload);
        self.requests.lock().unwrap().push(Request {
            verb,
            path: path.to_string(),
            payload,
        });
        reply
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn ip_address(&self) -> &str {
        &self.ip
    }

    async fn connect(&self) -> Result<()> {
        self.connects.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn get(&self, path: &str, params: Value) -> Result<Value> {
        self.handle(Verb::Get, path, params)
    }

    async fn post(&self, path: &str, payload: Value) -> Result<Value> {
        self.handle(Verb::Post, path, payload)
    }

    async fn logout(&self) -> Result<bool> {
        self.logouts.fetch_add(1, Ordering::Relaxed);
        if self.fail_logout.load(Ordering::Relaxed) {
            return Err(Error::transport("logout rejected"));
        }
        Ok(true)
    }
}

pub(crate) fn video_settings() -> Value {
    json!({
        "status": true,
        "resolution": ["4K", "1080P", "720P", "480P"],
        "encodeMode": ["HEVC/H.265", "AVC/H.264"],
        "bitRate": ["512Kbps", "1Mbps", "2Mbps", "4Mbps"],
        "fps": [24, 30],
        "resolutionSelectVal": 1,
        "encodeModeSelectVal": 1,
        "bitRateSelectVal": 2,
        "fpsSelectVal": 1,
        "displayOut": 0,
    })
}

/// The replies of a well behaved camera
pub(crate) fn camera_reply(verb: Verb, path: &str) -> Value {
    match (verb, path) {
        (Verb::Get, crate::model::PATH_VIDEO) => video_settings(),
        (Verb::Get, crate::model::PATH_PREVIEW) => {
            json!({"status": true, "url": "rtsp://10.0.0.5:8900/live"})
        }
        (Verb::Get, crate::model::PATH_VAM) => {
            json!({"status": true, "url": "tcp://10.0.0.5:1234"})
        }
        (Verb::Post, crate::model::PATH_CAPTURE_IMAGE) => {
            json!({"Error": "none", "Timestamp": 1565000000, "Data": "aGVsbG8="})
        }
        _ => json!({"status": true}),
    }
}

/// Hands out the given frames and counts its start/stop calls
#[derive(Default)]
pub(crate) struct MockDecoder {
    frames: Vec<InferenceFrame>,
    pub(crate) started: Option<(String, FrameSize)>,
    pub(crate) starts: usize,
    pub(crate) stops: usize,
    pub(crate) fail_start: bool,
    /// Ends the stream with an error after the frames
    pub(crate) fail_stream: bool,
}

impl MockDecoder {
    pub(crate) fn new(frames: Vec<InferenceFrame>) -> Self {
        Self {
            frames,
            ..Default::default()
        }
    }
}

impl InferenceDecoder for MockDecoder {
    fn start(&mut self, url: &str, size: FrameSize) -> Result<InferenceFrames> {
        self.starts += 1;
        if self.fail_start {
            return Err(Error::transport("decoder could not open the stream"));
        }
        self.started = Some((url.to_string(), size));
        let mut frames: Vec<Result<InferenceFrame>> = self.frames.drain(..).map(Ok).collect();
        if self.fail_stream {
            frames.push(Err(Error::transport("metadata stream lost")));
        }
        Ok(Box::pin(stream::iter(frames)))
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

pub(crate) fn object(id: &str, label: &str, confidence: f32) -> InferenceObject {
    InferenceObject {
        id: id.to_string(),
        label: label.to_string(),
        confidence,
        position: BoundingBox {
            x: 10,
            y: 20,
            width: 30,
            height: 40,
        },
    }
}

/// A client on a well behaved camera with its settings already mirrored
pub(crate) async fn connected() -> (Arc<MockTransport>, CameraClient) {
    init();
    let transport = MockTransport::camera("203.0.113.9");
    let client = CameraClient::connect(transport.clone()).await.unwrap();
    (transport, client)
}
