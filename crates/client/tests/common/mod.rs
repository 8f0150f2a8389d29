// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-process HTTP server that records every request it receives

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, mpsc},
    thread,
};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
};
use tokio::sync::oneshot;

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method:  Method,
    pub path:    String,
    pub query:   Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body:    String,
}

impl Recorded {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn param_names(&self) -> Vec<&str> { self.query.iter().map(|(k, _)| k.as_str()).collect() }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct MockState {
    status:   StatusCode,
    body:     String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockServer {
    addr:     SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockServer {
    /// Starts a server answering every request with `status` and `body`
    pub fn start(status: StatusCode, body: &str) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body: body.to_string(),
            requests: requests.clone(),
        };
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("Failed to bind mock server");
                addr_tx
                    .send(listener.local_addr().expect("Failed to read address"))
                    .expect("Failed to report address");

                let app = Router::new().fallback(record).with_state(state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("Mock server failed");
            });
        });

        let addr = addr_rx.recv().expect("Mock server did not start");
        Self {
            addr,
            requests,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn ok(body: &str) -> Self { Self::start(StatusCode::OK, body) }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> String { format!("http://{}", self.addr) }

    pub fn requests(&self) -> Vec<Recorded> { self.requests.lock().unwrap().clone() }

    pub fn single_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one request, got {requests:?}");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let query = url::form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
        .into_owned()
        .collect();
    state.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        query,
        headers,
        body,
    });
    (state.status, state.body.clone())
}
