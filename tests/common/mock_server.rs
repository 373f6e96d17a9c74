//! Local stand-in for the directory-listing server

use serde_json::json;
use std::io::Read;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

/// What the mock answers to one request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Status code and raw body
    Body(u16, String),
    /// Answer after a pause
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    /// `200 {"error": null, "snapshots": [...]}`
    pub fn listing(entries: serde_json::Value) -> Self {
        MockReply::Body(200, json!({ "error": null, "snapshots": entries }).to_string())
    }

    /// `200 {"error": message}`
    pub fn app_error(message: &str) -> Self {
        MockReply::Body(200, json!({ "error": message }).to_string())
    }

    pub fn after(self, delay: Duration) -> Self {
        MockReply::Delayed(delay, Box::new(self))
    }
}

/// One request as received by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The `path` field of the JSON body
    pub fn listed_path(&self) -> Option<String> {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()?
            .get("path")?
            .as_str()
            .map(str::to_string)
    }
}

type Handler = Box<dyn Fn(&str) -> MockReply + Send>;

/// HTTP server on an ephemeral loopback port
///
/// Requests are answered one at a time by a handler that receives the
/// requested path. The server stops when dropped.
pub struct MockListingServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    stop_tx: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl MockListingServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> MockReply + Send + 'static,
    {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
        let port = server.server_addr().to_ip().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handler: Handler = Box::new(handler);

        let thread = thread::spawn(move || loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }

            match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(mut request)) => {
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);
                    let content_type = request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Content-Type"))
                        .map(|h| h.value.as_str().to_string());
                    let record = RecordedRequest {
                        method: request.method().to_string(),
                        url: request.url().to_string(),
                        content_type,
                        body,
                    };
                    let path = record.listed_path().unwrap_or_default();
                    recorded.lock().unwrap().push(record);

                    let (status, body) = resolve(handler(&path));
                    let response = tiny_http::Response::from_string(body)
                        .with_status_code(status)
                        .with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"application/json"[..],
                            )
                            .unwrap(),
                        );
                    let _ = request.respond(response);
                }
                Ok(None) => {}
                Err(_) => break,
            }
        });

        Self {
            base_url,
            requests,
            stop_tx,
            thread: Some(thread),
        }
    }

    /// Serve a fixed tree: `tree[path]` is the listing for `path`, anything
    /// else is refused with an application error
    pub fn with_tree(tree: Vec<(&'static str, serde_json::Value)>) -> Self {
        Self::start(move |path| {
            tree.iter()
                .find(|(p, _)| *p == path)
                .map(|(_, entries)| MockReply::listing(entries.clone()))
                .unwrap_or_else(|| MockReply::app_error(&format!("no such directory: {}", path)))
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(RecordedRequest::listed_path)
            .collect()
    }
}

impl Drop for MockListingServer {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn resolve(reply: MockReply) -> (u16, String) {
    match reply {
        MockReply::Body(status, body) => (status, body),
        MockReply::Delayed(delay, reply) => {
            thread::sleep(delay);
            resolve(*reply)
        }
    }
}

/// `{"file_name", "full_path", "type": 0}`
pub fn file(name: &str, full_path: &str) -> serde_json::Value {
    json!({ "file_name": name, "full_path": full_path, "type": 0 })
}

/// `{"file_name", "full_path", "type": 1, "snapshots": null}`
pub fn dir(name: &str, full_path: &str) -> serde_json::Value {
    json!({ "file_name": name, "full_path": full_path, "type": 1, "snapshots": null })
}

/// The tree most tests browse: `/home` with a file and two directories
pub fn home_server() -> MockListingServer {
    MockListingServer::with_tree(vec![
        (
            "/home",
            json!([
                file("a.txt", "home/a.txt"),
                dir("docs", "home/docs"),
                dir("src", "home/src"),
            ]),
        ),
        (
            "./home/docs",
            json!([file("guide.md", "home/docs/guide.md"), dir("img", "home/docs/img")]),
        ),
        ("./home/docs/img", json!([file("logo.png", "home/docs/img/logo.png")])),
        ("./home/src", json!([file("main.rs", "home/src/main.rs")])),
    ])
}
