// src/backend/mod.rs

//! HTTP transport backends.
//!
//! The harness drives the wire through this seam so the authentication
//! handshakes stay the transport's job: libcurl (default) performs Basic,
//! Digest, NTLM and Negotiate for real (SSPI on Windows, GSS elsewhere),
//! while the reqwest backend covers anonymous and preemptive Basic round
//! trips.

#[cfg(feature = "backend-curl")]
mod curl;

#[cfg(feature = "backend-reqwest")]
mod reqwest;

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::credential::Credential;
use crate::Result;

/// Wire-level authentication directive for one round trip.
///
/// `None` inside the NTLM/Negotiate variants means the ambient OS identity.
#[derive(Debug, Clone)]
pub(crate) enum WireAuth {
    Anonymous,
    Basic(Credential),
    Digest(Credential),
    Ntlm(Option<Credential>),
    Negotiate(Option<Credential>),
}

/// One echo round trip, fully resolved: endpoint, merged headers, payload.
#[derive(Debug, Clone)]
pub(crate) struct EchoRequest {
    pub url: Url,
    pub auth: WireAuth,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

/// Raw response surfaced by a backend.
#[derive(Debug)]
pub(crate) struct WireResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport backend contract: one bounded, blocking round trip per call.
pub(crate) trait HttpBackend: Send {
    /// Name of the backend, for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this backend can perform the given authentication directive.
    fn supports(&self, auth: &WireAuth) -> bool;

    /// Executes the round trip, performing whatever handshake the server
    /// demands. Network faults and timeouts surface as transport errors;
    /// HTTP status handling is the caller's job.
    fn execute(&self, request: &EchoRequest) -> Result<WireResponse>;
}

/// The backend selected at compile time.
pub(crate) fn default_backend() -> Box<dyn HttpBackend> {
    #[cfg(feature = "backend-curl")]
    {
        Box::new(curl::CurlBackend::new())
    }

    #[cfg(all(feature = "backend-reqwest", not(feature = "backend-curl")))]
    {
        Box::new(reqwest::ReqwestBackend::new())
    }

    #[cfg(all(not(feature = "backend-curl"), not(feature = "backend-reqwest")))]
    {
        compile_error!("Either the backend-curl or backend-reqwest feature must be enabled");
        unreachable!()
    }
}
