//! Stand-in for the music generation API
//!
//! Serves the generate and clips endpoints on an ephemeral port and records
//! what it was sent.

#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use serde_json::{json, Value};
use tiny_http::{Method, Response, Server};

pub const TOKEN: &str = "test-token";

/// What the stand-in should answer
#[derive(Debug, Clone)]
pub struct Script {
    /// Status returned by the generate endpoint
    pub generate_status: u16,
    /// Poll number (1-based) from which the clip reports `complete`; `None` never
    pub ready_on_poll: Option<u32>,
    /// Polls (1-based) answered with HTTP 503
    pub failing_polls: Vec<u32>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            generate_status: 200,
            ready_on_poll: Some(1),
            failing_polls: Vec::new(),
        }
    }
}

/// Everything the stand-in observed
#[derive(Debug, Default)]
pub struct Recorded {
    pub generate_bodies: Vec<Value>,
    pub auth_headers: Vec<String>,
    pub poll_urls: Vec<String>,
    pub generated: u32,
}

impl Recorded {
    pub fn polls(&self) -> usize {
        self.poll_urls.len()
    }
}

pub struct FakeSuno {
    server: Arc<Server>,
    recorded: Arc<Mutex<Recorded>>,
    thread: Option<JoinHandle<()>>,
}

impl FakeSuno {
    pub fn start(script: Script) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind fake upstream"));
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let thread = {
            let server = Arc::clone(&server);
            let recorded = Arc::clone(&recorded);
            std::thread::spawn(move || {
                for mut request in server.incoming_requests() {
                    let auth = request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Authorization"))
                        .map(|h| h.value.as_str().to_string())
                        .unwrap_or_default();

                    let mut rec = recorded.lock().unwrap();
                    rec.auth_headers.push(auth);

                    let url = request.url().to_string();
                    let (status, body) = if *request.method() == Method::Post
                        && url == "/api/v2/external/hackmit/generate"
                    {
                        let mut raw = String::new();
                        request.as_reader().read_to_string(&mut raw).unwrap();
                        rec.generate_bodies
                            .push(serde_json::from_str(&raw).unwrap_or(Value::Null));

                        if script.generate_status == 200 {
                            rec.generated += 1;
                            let id = format!("clip-{}", rec.generated);
                            (200, json!({ "id": id, "status": "submitted" }))
                        } else {
                            (script.generate_status, json!({ "detail": "rejected" }))
                        }
                    } else if url.starts_with("/api/v2/external/hackmit/clips?ids=") {
                        rec.poll_urls.push(url.clone());
                        let poll = rec.polls() as u32;
                        let id = url.rsplit('=').next().unwrap_or_default().to_string();

                        if script.failing_polls.contains(&poll) {
                            (503, json!({ "detail": "busy" }))
                        } else {
                            match script.ready_on_poll {
                                Some(n) if poll >= n => (
                                    200,
                                    json!([{
                                        "id": id,
                                        "status": "complete",
                                        "audio_url": format!("https://cdn.example/{}.mp3", id)
                                    }]),
                                ),
                                _ if poll % 2 == 0 => (
                                    200,
                                    json!([{ "id": id, "status": "queued", "audio_url": null }]),
                                ),
                                _ => (200, json!([])),
                            }
                        }
                    } else {
                        (404, json!({ "detail": "not found" }))
                    };
                    drop(rec);

                    let response = Response::from_string(body.to_string()).with_status_code(status);
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            server,
            recorded,
            thread: Some(thread),
        }
    }

    pub fn base_url(&self) -> String {
        let addr = self.server.server_addr().to_ip().expect("tcp listener");
        format!("http://{}", addr)
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}

impl Drop for FakeSuno {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
