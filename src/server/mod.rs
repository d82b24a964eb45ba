//! HTTP server
//!
//! A blocking `tiny_http` accept loop feeding requests into tokio tasks, so
//! one slow clip poll never holds up another request.

pub mod routes;

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use tiny_http::{Header, Request, Response, Server};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{CadenceError, Result};
use crate::service::MusicSession;

pub use routes::{dispatch, parse_pace, route, Reply, Route};

/// Serves the music endpoints on a bound socket
pub struct HttpServer {
    server: Arc<Server>,
    session: Arc<MusicSession>,
}

/// Stops a running [`HttpServer`] from another task
#[derive(Clone)]
pub struct ShutdownHandle {
    server: Arc<Server>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.server.unblock();
    }
}

impl HttpServer {
    /// Bind to `addr`. Port 0 picks a free port.
    pub fn bind(addr: SocketAddr, session: Arc<MusicSession>) -> Result<Self> {
        let server = Server::http(addr).map_err(|e| CadenceError::Server {
            reason: format!("cannot listen on {}: {}", addr, e),
        })?;

        Ok(Self {
            server: Arc::new(server),
            session,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            server: Arc::clone(&self.server),
        }
    }

    /// Accept requests until shut down. Must be called inside a tokio runtime.
    pub async fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Handle::current();
        let server = Arc::clone(&self.server);
        let session = Arc::clone(&self.session);

        if let Some(addr) = self.local_addr() {
            tracing::info!(%addr, "listening");
        }

        tokio::task::spawn_blocking(move || {
            for request in server.incoming_requests() {
                let session = Arc::clone(&session);
                runtime.spawn(handle_request(session, request));
            }
        })
        .await
        .map_err(|e| CadenceError::Server {
            reason: format!("accept loop panicked: {}", e),
        })?;

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn handle_request(session: Arc<MusicSession>, request: Request) {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        id = %request_id,
        method = %request.method(),
        url = %request.url()
    );

    async move {
        let route = route(request.method(), request.url());
        let reply = dispatch(&session, route).await;
        tracing::info!(status = reply.status, "responding");

        let response = json_response(&reply);
        let written = tokio::task::spawn_blocking(move || request.respond(response)).await;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to write response"),
            Err(e) => tracing::error!(error = %e, "response writer panicked"),
        }
    }
    .instrument(span)
    .await
}

fn json_response(reply: &Reply) -> Response<Cursor<Vec<u8>>> {
    let response = Response::from_string(reply.body.to_string()).with_status_code(reply.status);
    match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
