//! Shared test doubles: a scripted transport and a recording sink.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use fleetsync::{ApiRequest, FailedResponse, HttpTransport, NotificationSink, RawResponse};

/// Routes test log output through env_logger; safe to call repeatedly.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

type Handler =
    dyn FnMut(&ApiRequest) -> Result<RawResponse, FailedResponse> + Send + 'static;

/// Transport that answers requests from a scripted handler and records every
/// request it sees.
pub struct MockTransport {
    handler: Mutex<Box<Handler>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new(
        handler: impl FnMut(&ApiRequest) -> Result<RawResponse, FailedResponse> + Send + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Mutex::new(Box::new(handler)),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Number of recorded requests whose path contains `fragment`.
    pub fn count_requests(&self, fragment: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path.contains(fragment))
            .count()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn request(&self, request: ApiRequest) -> Result<RawResponse, FailedResponse> {
        self.log.lock().unwrap().push(request.clone());
        (self.handler.lock().unwrap())(&request)
    }
}

/// A 200 response carrying the given JSON payload.
pub fn json_response(value: serde_json::Value) -> RawResponse {
    let body = serde_json::to_vec(&value).unwrap();
    RawResponse {
        status: 200,
        content_type: Some("application/json".to_owned()),
        content_length: Some(body.len() as u64),
        body: Bytes::from(body),
    }
}

/// A failed exchange with the given status and JSON body.
pub fn failed_response(status: u16, body: &str) -> FailedResponse {
    FailedResponse {
        url: "https://server/api/v2".to_owned(),
        status: Some(status),
        status_text: String::new(),
        content_type: Some("application/json".to_owned()),
        body: body.to_owned(),
    }
}

/// Sink that records every message instead of displaying it.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_owned());
    }
}
