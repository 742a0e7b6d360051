use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::MetadataError;
use crate::transport::Transport;

/// Canned responses keyed by `path?k=v&k=v` (params in request order).
/// Unknown requests answer 404.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, Result<Value, String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, request: &str, body: Value) -> Self {
        self.responses.insert(request.to_string(), Ok(body));
        self
    }

    pub fn fail(mut self, request: &str, reason: &str) -> Self {
        self.responses
            .insert(request.to_string(), Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn request_key(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{path}?{}", query.join("&"))
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, MetadataError> {
        let key = request_key(path, params);
        self.calls.lock().unwrap().push(key.clone());
        match self.responses.get(&key) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => Err(MetadataError::Network(reason.clone())),
            None => Err(MetadataError::NotFound),
        }
    }
}
