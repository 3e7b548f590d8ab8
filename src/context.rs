use axum::http::{HeaderMap, Method};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::{map::Entry, Map, Value};
use std::borrow::Cow;

/// What the echo handler made of the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EchoBody {
    Structured(Value),
    Raw(String),
    Absent,
}

impl EchoBody {
    pub fn is_absent(&self) -> bool {
        matches!(self, EchoBody::Absent)
    }
}

/// Parses a request body: JSON first, then raw text. GET and HEAD bodies are
/// never read, and an empty body is absent.
pub fn parse_body(method: &Method, bytes: &[u8]) -> EchoBody {
    if *method == Method::GET || *method == Method::HEAD {
        return EchoBody::Absent;
    }

    if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
        return EchoBody::Structured(value);
    }

    if bytes.is_empty() {
        EchoBody::Absent
    } else {
        EchoBody::Raw(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Percent-decodes a URI path. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw).decode_utf8_lossy()
}

/// Collects the request headers in arrival order. Repeated headers are
/// folded into one comma-separated value.
pub fn collect_headers(headers: &HeaderMap) -> Map<String, Value> {
    let mut collected: Map<String, Value> = Map::with_capacity(headers.keys_len());

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        match collected.entry(name.as_str()) {
            Entry::Occupied(mut entry) => {
                if let Value::String(existing) = entry.get_mut() {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(Value::String(value.into_owned()));
            }
        }
    }

    collected
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub path: String,
    pub method: String,
    pub headers: Map<String, Value>,
    pub body: EchoBody,
}

impl RequestContext {
    pub fn new(path: &str, method: &Method, headers: &HeaderMap, body: &[u8]) -> Self {
        let path = decode_path(path);
        Self {
            path: format!("/{}", path.strip_prefix('/').unwrap_or(&*path)),
            method: method.to_string(),
            headers: collect_headers(headers),
            body: parse_body(method, body),
        }
    }
}
