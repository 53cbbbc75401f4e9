// src/backend/curl.rs

//! libcurl transport.
//!
//! libcurl carries the actual credential handshakes (SSPI on Windows, GSS
//! elsewhere), which makes it the reference backend for every scheme the
//! harness can configure. A fresh `Easy` handle is built per round trip;
//! nothing is shared between calls.

use std::collections::HashMap;

use curl::easy::{Auth, Easy, List};

use super::{EchoRequest, HttpBackend, WireAuth, WireResponse};
use crate::credential::Credential;
use crate::error;
use crate::Result;

pub(crate) struct CurlBackend;

impl CurlBackend {
    pub(crate) fn new() -> CurlBackend {
        CurlBackend
    }
}

/// Explicit credentials, or the `":"`/`""` pair libcurl interprets as the
/// current OS identity.
fn apply_identity(easy: &mut Easy, credential: Option<&Credential>) -> Result<()> {
    match credential {
        Some(credential) => {
            easy.username(&credential.username).map_err(error::transport)?;
            easy.password(&credential.secret).map_err(error::transport)?;
        }
        None => {
            easy.username(":").map_err(error::transport)?;
            easy.password("").map_err(error::transport)?;
        }
    }
    Ok(())
}

impl HttpBackend for CurlBackend {
    fn name(&self) -> &'static str {
        "curl"
    }

    fn supports(&self, _auth: &WireAuth) -> bool {
        true
    }

    fn execute(&self, request: &EchoRequest) -> Result<WireResponse> {
        let mut easy = Easy::new();

        easy.url(request.url.as_str()).map_err(error::transport)?;
        easy.post(true).map_err(error::transport)?;
        easy.timeout(request.timeout).map_err(error::transport)?;

        match &request.auth {
            WireAuth::Anonymous => {}
            WireAuth::Basic(credential) => {
                let mut auth = Auth::new();
                auth.basic(true);
                easy.http_auth(&auth).map_err(error::transport)?;
                apply_identity(&mut easy, Some(credential))?;
            }
            WireAuth::Digest(credential) => {
                let mut auth = Auth::new();
                auth.digest(true);
                easy.http_auth(&auth).map_err(error::transport)?;
                apply_identity(&mut easy, Some(credential))?;
            }
            WireAuth::Ntlm(credential) => {
                let mut auth = Auth::new();
                auth.ntlm(true);
                easy.http_auth(&auth).map_err(error::transport)?;
                apply_identity(&mut easy, credential.as_ref())?;
            }
            WireAuth::Negotiate(credential) => {
                let mut auth = Auth::new();
                auth.gssnegotiate(true);
                easy.http_auth(&auth).map_err(error::transport)?;
                apply_identity(&mut easy, credential.as_ref())?;
            }
        }

        if !request.headers.is_empty() {
            let mut headers = List::new();
            for (name, value) in &request.headers {
                headers.append(&format!("{name}: {value}")).map_err(error::transport)?;
            }
            easy.http_headers(headers).map_err(error::transport)?;
        }

        let body_bytes = request.body.as_bytes();
        easy.post_field_size(body_bytes.len() as u64).map_err(error::transport)?;
        easy.post_fields_copy(body_bytes).map_err(error::transport)?;

        if request.accept_invalid_certs {
            easy.ssl_verify_peer(false).map_err(error::transport)?;
            easy.ssl_verify_host(false).map_err(error::transport)?;
        }

        let mut response_body = Vec::new();
        let mut response_headers = HashMap::new();
        let mut status_line = String::new();

        {
            let mut transfer = easy.transfer();

            transfer
                .header_function(|header| {
                    if let Ok(header_str) = std::str::from_utf8(header) {
                        let header_str = header_str.trim();
                        if header_str.starts_with("HTTP/") {
                            // Keep the last status line; earlier ones belong
                            // to intermediate handshake responses.
                            status_line = header_str.to_string();
                            response_headers.clear();
                        } else if let Some(colon_pos) = header_str.find(':') {
                            let name = header_str[..colon_pos].trim().to_ascii_lowercase();
                            let value = header_str[colon_pos + 1..].trim().to_string();
                            response_headers.insert(name, value);
                        }
                    }
                    true
                })
                .map_err(error::transport)?;

            transfer
                .write_function(|data| {
                    response_body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(error::transport)?;

            transfer.perform().map_err(error::transport)?;
        }

        let status = easy.response_code().map_err(error::transport)? as u16;
        let status_text = status_line
            .splitn(3, ' ')
            .nth(2)
            .unwrap_or("")
            .to_string();

        Ok(WireResponse {
            status,
            status_text,
            headers: response_headers,
            body: response_body,
        })
    }
}
