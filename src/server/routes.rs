//! Request routing
//!
//! Maps method + URL onto a [`Route`] and a route onto a JSON reply. Kept free
//! of socket handling so it can be exercised directly.

use std::borrow::Cow;

use serde_json::{json, Value};
use tiny_http::Method;

use crate::error::{CadenceError, Result};
use crate::service::MusicSession;
use crate::tempo::PaceRequest;

/// What an inbound request asks for
#[derive(Debug, PartialEq, Eq)]
pub enum Route {
    Health,
    GenerateMusic(PaceRequest),
    BadRequest { message: String },
    MethodNotAllowed,
    NotFound,
}

/// Status code and JSON body to send back
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, json!({ "error": message.into() }))
    }
}

impl From<&CadenceError> for Reply {
    fn from(err: &CadenceError) -> Self {
        Reply::error(err.http_status(), err.client_message())
    }
}

/// Resolve a request line into a route
pub fn route(method: &Method, url: &str) -> Route {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };

    let known = matches!(path, "/" | "/generate-music");
    if !known {
        return Route::NotFound;
    }
    if *method != Method::Get {
        return Route::MethodNotAllowed;
    }

    match path {
        "/generate-music" => match parse_pace(query) {
            Ok(pace) => Route::GenerateMusic(pace),
            Err(err) => Route::BadRequest {
                message: err.client_message(),
            },
        },
        _ => Route::Health,
    }
}

/// Read `user_bpm` / `goal_bpm` from a query string, falling back to defaults
pub fn parse_pace(query: &str) -> Result<PaceRequest> {
    let mut pace = PaceRequest::default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key, raw_key)?;
        let value = decode_component(&key, raw)?;

        let slot = match &*key {
            "user_bpm" => &mut pace.user_bpm,
            "goal_bpm" => &mut pace.goal_bpm,
            _ => continue,
        };
        *slot = value
            .trim()
            .parse()
            .map_err(|_| CadenceError::InvalidParameter {
                param: key.to_string(),
                value: value.to_string(),
                expected: "an integer".to_string(),
            })?;
    }

    Ok(pace)
}

fn decode_component<'a>(param: &str, raw: &'a str) -> Result<Cow<'a, str>> {
    // Form encoding uses '+' for spaces
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map_err(|_| CadenceError::InvalidParameter {
        param: param.to_string(),
        value: raw.to_string(),
        expected: "UTF-8 text".to_string(),
    })?;
    if decoded == raw {
        Ok(Cow::Borrowed(raw))
    } else {
        Ok(Cow::Owned(decoded.into_owned()))
    }
}

/// Produce the reply for a route
pub async fn dispatch(session: &MusicSession, route: Route) -> Reply {
    match route {
        Route::Health => Reply::new(200, json!({ "message": "It works!" })),
        Route::GenerateMusic(pace) => match session.generate_music(pace).await {
            Ok(clip) => Reply::new(200, json!({ "success": true, "clip": clip })),
            Err(err) => {
                tracing::warn!(
                    code = err.error_code(),
                    transient = err.is_transient(),
                    error = %err,
                    "generate-music failed"
                );
                Reply::from(&err)
            }
        },
        Route::BadRequest { message } => Reply::error(400, message),
        Route::MethodNotAllowed => Reply::error(405, "Method not allowed"),
        Route::NotFound => Reply::error(404, "Not found"),
    }
}
