//! Local HTTP stub for integration tests. Every request gets the same canned
//! response and is recorded for later inspection.

#![allow(dead_code)]

use std::io::Read;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

pub struct MockServer {
    pub base_url: String,
    requests: Receiver<RecordedRequest>,
}

impl MockServer {
    pub fn start(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind mock server");
        let addr = server.server_addr().to_ip().expect("tcp listener");
        let body = body.into();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut received = String::new();
                let _ = request.as_reader().read_to_string(&mut received);
                let authorization = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Authorization"))
                    .map(|h| h.value.as_str().to_string());

                let _ = tx.send(RecordedRequest {
                    method: request.method().to_string(),
                    path: request.url().to_string(),
                    body: received,
                    authorization,
                });

                let header = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
                    .expect("valid header");
                let response = Response::from_string(body.clone())
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests: rx,
        }
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::start(status, "application/json", body.to_string())
    }

    pub fn html(status: u16, body: &str) -> Self {
        Self::start(status, "text/html; charset=utf-8", body)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.try_iter().collect()
    }
}

/// A URL on a port nothing is listening on
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub const PRICING_PAGE: &str = r##"<!doctype html>
<html><body>
<h1>Gradient Platform Pricing</h1>
<h2>Foundation Model Usage</h2>
<div class="tabs">
  <label for="tab-openai">OpenAI</label>
  <div class="tab-content">
    <table>
      <thead><tr><th>Model</th><th>Serverless Inference</th></tr></thead>
      <tbody>
        <tr><td>gpt-oss-120b</td><td>$0.10 per 1M input tokens<br>$0.70 per 1M output tokens</td></tr>
        <tr><td>GPT-5 mini</td><td>$0.25 per 1M input tokens<br>$2.00 per 1M output tokens</td></tr>
      </tbody>
    </table>
  </div>
  <label for="tab-meta">Meta</label>
  <div class="tab-content">
    <table>
      <tbody>
        <tr><td>Llama 3.3 Instruct-70B</td><td>$0.65 per 1M tokens</td></tr>
      </tbody>
    </table>
  </div>
</div>
<h2>Knowledge Bases</h2>
<table><tr><td>Embeddings</td><td>$0.09 per 1M tokens</td></tr></table>
</body></html>
"##;
