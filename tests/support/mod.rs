// tests/support/mod.rs

#![allow(dead_code)]

pub mod server;

use base64::Engine as _;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};

/// Response body helper.
pub fn body(text: impl Into<String>) -> Full<Bytes> {
    Full::new(Bytes::from(text.into()))
}

/// Splits a request and collects its body into a `String`.
pub async fn read_body(
    req: http::Request<hyper::body::Incoming>,
) -> (http::request::Parts, String) {
    let (parts, body) = req.into_parts();
    let bytes = body.collect().await.expect("request body").to_bytes();
    let text = String::from_utf8(bytes.to_vec()).expect("utf-8 request body");
    (parts, text)
}

/// The Authorization value a Basic client should present.
pub fn basic_authorization(username: &str, password: &str) -> String {
    let raw = format!("{username}:{password}");
    let encoded = base64::engine::general_purpose::STANDARD.encode(raw.as_bytes());
    format!("Basic {encoded}")
}
