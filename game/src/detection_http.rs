use bytes::Bytes;
use http_body_util::Full;
use hyper::{Request, header};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tokio::runtime::Handle;

use crate::detection::{DetectionLink, DetectionSignal};

/// Outbound signal transport: POSTs each signal to the detection service
/// as JSON. Strictly fire-and-forget — requests run on the bridge runtime
/// and failures are logged and dropped, matching the no-acknowledgment
/// contract of the detection subsystem.
pub struct HttpDetectionLink {
    handle: Handle,
    client: Client<HttpConnector, Full<Bytes>>,
    endpoint: String,
}

impl HttpDetectionLink {
    /// `endpoint` is the detection service base URL, e.g.
    /// `http://127.0.0.1:5000`; a trailing slash is tolerated.
    pub fn new(handle: Handle, endpoint: impl Into<String>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            handle,
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn signal_uri(&self) -> String {
        format!("{}/api/detection", self.endpoint)
    }
}

pub fn signal_body(signal: DetectionSignal) -> String {
    serde_json::json!({ "event": signal.wire_name() }).to_string()
}

impl DetectionLink for HttpDetectionLink {
    fn send(&self, signal: DetectionSignal) {
        let client = self.client.clone();
        let uri = self.signal_uri();
        let body = signal_body(signal);

        self.handle.spawn(async move {
            let request = Request::post(uri.as_str())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(body)));
            let request = match request {
                Ok(request) => request,
                Err(err) => {
                    log::warn!("detection signal {}: bad request: {err}", signal.wire_name());
                    return;
                }
            };
            if let Err(err) = client.request(request).await {
                log::warn!("detection signal {} not delivered: {err}", signal.wire_name());
            }
        });
    }
}
