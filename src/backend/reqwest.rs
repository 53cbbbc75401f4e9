// src/backend/reqwest.rs

//! reqwest transport.
//!
//! Covers anonymous and preemptive Basic round trips. Challenge/response
//! schemes (Digest, NTLM, Negotiate) are outside reqwest's reach, so this
//! backend declines them up front through `supports`.

use std::collections::HashMap;

use http::header::AUTHORIZATION;

use super::{EchoRequest, HttpBackend, WireAuth, WireResponse};
use crate::error;
use crate::Result;

pub(crate) struct ReqwestBackend {
    runtime: tokio::runtime::Runtime,
}

impl ReqwestBackend {
    pub(crate) fn new() -> ReqwestBackend {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build backend runtime");
        ReqwestBackend { runtime }
    }
}

impl HttpBackend for ReqwestBackend {
    fn name(&self) -> &'static str {
        "reqwest"
    }

    fn supports(&self, auth: &WireAuth) -> bool {
        matches!(auth, WireAuth::Anonymous | WireAuth::Basic(_))
    }

    fn execute(&self, request: &EchoRequest) -> Result<WireResponse> {
        if !self.supports(&request.auth) {
            return Err(error::config(
                "authentication scheme not supported by the reqwest backend",
            ));
        }

        self.runtime.block_on(async {
            let mut builder = reqwest::Client::builder().timeout(request.timeout);
            if request.accept_invalid_certs {
                builder = builder.danger_accept_invalid_certs(true);
            }
            let client = builder.build().map_err(error::transport)?;

            let mut outgoing = client
                .post(request.url.as_str())
                .body(request.body.clone());
            for (name, value) in &request.headers {
                outgoing = outgoing.header(name.as_str(), value.as_str());
            }
            if let WireAuth::Basic(credential) = &request.auth {
                outgoing = outgoing.header(AUTHORIZATION, credential.basic_authorization());
            }

            let response = outgoing.send().await.map_err(error::transport)?;

            let status = response.status().as_u16();
            let status_text = response
                .status()
                .canonical_reason()
                .unwrap_or("")
                .to_string();

            let mut headers = HashMap::new();
            for (name, value) in response.headers() {
                if let Ok(value) = value.to_str() {
                    headers.insert(name.as_str().to_string(), value.to_string());
                }
            }

            let body = response.bytes().await.map_err(error::transport)?.to_vec();

            Ok(WireResponse {
                status,
                status_text,
                headers,
                body,
            })
        })
    }
}
