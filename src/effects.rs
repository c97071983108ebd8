//! Asynchronous side effects. Nodes never block the evaluation pass;
//! they hand requests to the bridge, which runs them on the tokio runtime
//! and feeds completions back into the next tick.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::json;
use tokio::sync::mpsc;

use crate::graph::NodeId;
use crate::value::HttpMethod;

/// One effect slot: a node at one loop index. A newer request from the same
/// slot supersedes any older one still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectKey {
    pub node: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: serde_json::Value,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkResponse {
    pub status: u16,
    pub body: serde_json::Value,
    pub headers: serde_json::Value,
    pub error: Option<String>,
}

impl NetworkResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        NetworkResponse {
            error: Some(message.into()),
            ..NetworkResponse::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectRequest {
    pub key: EffectKey,
    pub request: NetworkRequest,
}

/// How requests actually hit the network. Swapped for a fake in tests.
#[async_trait]
pub trait NetworkTransport: Send + Sync {
    async fn perform(&self, request: NetworkRequest) -> NetworkResponse;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::new()
    }
}

#[async_trait]
impl NetworkTransport for HttpTransport {
    async fn perform(&self, request: NetworkRequest) -> NetworkResponse {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url).json(&request.body),
        };
        if let Some(headers) = request.headers.as_object() {
            for (name, value) in headers {
                if let Some(value) = value.as_str() {
                    builder = builder.header(name, value);
                }
            }
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => return NetworkResponse::failed(err.to_string()),
        };
        let status = response.status().as_u16();
        let headers = json!(response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect::<HashMap<_, _>>());
        let body = match response.json::<serde_json::Value>().await {
            Ok(body) => body,
            Err(_) => serde_json::Value::Null,
        };
        NetworkResponse {
            status,
            body,
            headers,
            error: None,
        }
    }
}

struct Completion {
    key: EffectKey,
    stamp: u64,
    response: NetworkResponse,
}

/// Dispatches requests onto the runtime and surfaces completions to the
/// next tick, dropping responses that a newer request has superseded.
pub struct EffectBridge {
    transport: Arc<dyn NetworkTransport>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    inflight: HashMap<EffectKey, u64>,
    /// Monotonic over the process lifetime; restart clears inflight but
    /// never rewinds the sequence.
    seq: u64,
}

impl EffectBridge {
    pub fn new(transport: Arc<dyn NetworkTransport>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        EffectBridge {
            transport,
            tx,
            rx,
            inflight: HashMap::new(),
            seq: 0,
        }
    }

    pub fn is_inflight(&self, key: EffectKey) -> bool {
        self.inflight.contains_key(&key)
    }

    /// Launch a request. Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, effect: EffectRequest) {
        self.seq += 1;
        let stamp = self.seq;
        self.inflight.insert(effect.key, stamp);
        debug!(
            "dispatching {:?} {} for node {} lane {}",
            effect.request.method, effect.request.url, effect.key.node, effect.key.index
        );

        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        let key = effect.key;
        tokio::spawn(async move {
            let response = transport.perform(effect.request).await;
            // Receiver gone means the engine was dropped; nothing to do.
            let _ = tx.send(Completion {
                key,
                stamp,
                response,
            });
        });
    }

    /// Collect finished requests. A completion whose stamp no longer
    /// matches the inflight entry belongs to a superseded request and is
    /// discarded.
    pub fn drain(&mut self) -> Vec<(EffectKey, NetworkResponse)> {
        let mut completed = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            match self.inflight.get(&completion.key) {
                Some(stamp) if *stamp == completion.stamp => {
                    self.inflight.remove(&completion.key);
                    completed.push((completion.key, completion.response));
                }
                _ => {
                    warn!(
                        "dropping stale response for node {} lane {}",
                        completion.key.node, completion.key.index
                    );
                }
            }
        }
        completed
    }

    /// Forget everything in flight. Responses still arriving will fail the
    /// stamp check and be dropped.
    pub fn clear(&mut self) {
        self.inflight.clear();
    }
}
