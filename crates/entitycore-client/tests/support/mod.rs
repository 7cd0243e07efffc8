#![allow(dead_code)] // each test binary uses a different subset of helpers

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use bytes::Bytes;

use entitycore_client::{Client, ProjectContext, Settings};
use entitycore_core::TransportError;
use entitycore_transfer::{HttpTransport, Method, Request, Response};

type Scripted = Result<Response, TransportError>;

pub const API_URL: &str = "http://api/entitycore";

/// Scripted transport: responses are queued per `METHOD url` key and popped
/// in order; every request is recorded for later inspection.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&self, method: Method, url: &str, result: Scripted) {
        self.script
            .lock()
            .unwrap()
            .entry(key(method, url))
            .or_default()
            .push_back(result);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, method: Method, url: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url == url)
            .collect()
    }
}

impl HttpTransport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let key = key(request.method, &request.url);
        self.requests.lock().unwrap().push(request);

        let mut script = self.script.lock().unwrap();
        let queue = script
            .get_mut(&key)
            .unwrap_or_else(|| panic!("unexpected request: {key}"));
        queue
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for: {key}"))
    }
}

fn key(method: Method, url: &str) -> String {
    format!("{} {url}", method.as_str())
}

pub fn json_response(status: u16, value: serde_json::Value) -> Scripted {
    Ok(Response {
        status,
        body: Bytes::from(value.to_string()),
    })
}

pub fn bytes_response(status: u16, body: &[u8]) -> Scripted {
    Ok(Response {
        status,
        body: Bytes::copy_from_slice(body),
    })
}

pub fn client(transport: MockTransport) -> Client<MockTransport> {
    Client::builder()
        .api_url(API_URL)
        .project_context(ProjectContext::new(
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
        ))
        .token_provider("test-token")
        .settings(Settings::default())
        .build_with_transport(transport)
        .unwrap()
}
