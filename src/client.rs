// src/client.rs

//! Client configuration, call-scoped headers, and the echo round trip.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use url::Url;

use crate::backend::{self, EchoRequest, HttpBackend, WireAuth};
use crate::credential::Credential;
use crate::error;
use crate::scheme::{Scheme, SecurityMode};
use crate::Result;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds a client bound to one endpoint/scheme/credential triple.
///
/// Validates that `scheme` may be carried under `mode`, that the endpoint
/// parses, and that the credential fits the scheme: Basic and Digest need
/// an explicit credential, NTLM and Windows fall back to the ambient OS
/// identity, anonymous access takes none. A credential with an empty
/// username is refused as an invalid argument.
///
/// The returned handle is bound to exactly one configuration and is meant
/// for one logical call sequence; build a fresh one per scenario.
pub fn configure(
    scheme: Scheme,
    mode: SecurityMode,
    endpoint: &str,
    credential: Option<Credential>,
) -> Result<ClientHandle> {
    if !mode.accepts(scheme) {
        return Err(error::config(format!(
            "authentication scheme {scheme} cannot be used with security mode {mode}"
        )));
    }

    if let Some(credential) = &credential {
        if scheme == Scheme::None {
            return Err(error::config(
                "a credential was supplied but the anonymous scheme does not take one",
            ));
        }
        if credential.username.is_empty() {
            return Err(error::invalid_argument(
                "username must not be empty for a credentialed scheme",
            ));
        }
    }

    let endpoint = Url::parse(endpoint)
        .map_err(|e| error::config(format!("invalid endpoint address '{endpoint}': {e}")))?;

    let auth = match scheme {
        Scheme::None => WireAuth::Anonymous,
        Scheme::Ntlm => WireAuth::Ntlm(credential),
        Scheme::Windows => WireAuth::Negotiate(credential),
        Scheme::Basic | Scheme::Digest => {
            let credential = credential.ok_or_else(|| {
                error::config(format!("scheme {scheme} requires an explicit credential"))
            })?;
            match scheme {
                Scheme::Basic => WireAuth::Basic(credential),
                _ => WireAuth::Digest(credential),
            }
        }
    };

    let backend = backend::default_backend();
    if !backend.supports(&auth) {
        return Err(error::config(format!(
            "the {} backend cannot perform {scheme} authentication",
            backend.name()
        )));
    }

    let mut base_headers = HashMap::new();
    base_headers.insert(
        "content-type".to_string(),
        "text/plain; charset=utf-8".to_string(),
    );

    Ok(ClientHandle {
        backend,
        scheme,
        mode,
        endpoint,
        auth,
        base_headers,
        timeout: DEFAULT_TIMEOUT,
        accept_invalid_certs: false,
    })
}

/// An HTTP client bound to one endpoint, scheme and credential.
///
/// Not thread-safe beyond a single logical call sequence; scenarios running
/// in parallel each construct their own handle.
pub struct ClientHandle {
    backend: Box<dyn HttpBackend>,
    scheme: Scheme,
    mode: SecurityMode,
    endpoint: Url,
    auth: WireAuth,
    base_headers: HashMap<String, String>,
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl ClientHandle {
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn security_mode(&self) -> SecurityMode {
        self.mode
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Overrides the round-trip timeout (default 60 seconds). On expiry the
    /// call fails with a transport error; nothing is retried.
    pub fn timeout(mut self, timeout: Duration) -> ClientHandle {
        self.timeout = timeout;
        self
    }

    /// Accept untrusted TLS roots. Test rigs without an installed root
    /// certificate need this; real endpoints do not.
    pub fn accept_invalid_certs(mut self, accept: bool) -> ClientHandle {
        self.accept_invalid_certs = accept;
        self
    }

    /// Adds a header to every request issued through this handle. Header
    /// names are case-insensitive; a later insert of the same name wins.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> ClientHandle {
        self.base_headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Runs `body` with a context whose requests carry `headers` merged
    /// over the handle's own header set, same-named headers overwritten.
    ///
    /// The binding is strictly call-local: the context only exists inside
    /// `body`, so the headers are gone on every exit path, panics included.
    /// Overlapping scopes on one handle are not prevented and not promised
    /// to compose.
    pub fn with_scoped_headers<T>(
        &self,
        headers: &[(&str, &str)],
        body: impl FnOnce(&RequestContext<'_>) -> T,
    ) -> T {
        let mut merged = self.base_headers.clone();
        for (name, value) in headers {
            merged.insert(name.to_ascii_lowercase(), (*value).to_string());
        }
        body(&RequestContext {
            handle: self,
            headers: merged,
        })
    }

    /// Echo without any call-scoped headers.
    pub fn echo(&self, text: &str) -> Result<String> {
        RequestContext {
            handle: self,
            headers: self.base_headers.clone(),
        }
        .echo(text)
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("scheme", &self.scheme)
            .field("mode", &self.mode)
            .field("endpoint", &self.endpoint.as_str())
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// The explicit per-call context one round trip uses.
///
/// Holds the merged header set for exactly one logical operation; it cannot
/// outlive the `with_scoped_headers` body that created it.
pub struct RequestContext<'a> {
    handle: &'a ClientHandle,
    headers: HashMap<String, String>,
}

impl RequestContext<'_> {
    /// Sends `text` to the remote echo operation and returns the reply.
    ///
    /// The reply is returned exactly as received; callers compare
    /// byte-for-byte. A 401 or 403 after the backend's handshake maps to a
    /// rejection error naming the scheme; any other non-success status,
    /// timeout or network fault is a transport error. Single round trip,
    /// no retries.
    pub fn echo(&self, text: &str) -> Result<String> {
        let handle = self.handle;
        validate_headers(&self.headers)?;

        let request = EchoRequest {
            url: handle.endpoint.clone(),
            auth: handle.auth.clone(),
            headers: self.headers.clone(),
            body: text.to_string(),
            timeout: handle.timeout,
            accept_invalid_certs: handle.accept_invalid_certs,
        };

        log::debug!(
            "echo round trip: scheme={} endpoint={} backend={}",
            handle.scheme,
            handle.endpoint,
            handle.backend.name()
        );

        let response = handle
            .backend
            .execute(&request)
            .map_err(|e| e.with_url(handle.endpoint.clone()))?;

        if response.status == 401 || response.status == 403 {
            if let Some(challenge) = response.headers.get("www-authenticate") {
                log::debug!("server challenge after denial: {challenge}");
            }
            return Err(error::rejected(format!(
                "HTTP request was forbidden with client authentication scheme '{}'",
                handle.scheme
            ))
            .with_url(handle.endpoint.clone()));
        }

        if !response.is_success() {
            return Err(error::transport_msg(format!(
                "unexpected HTTP status {} {}",
                response.status, response.status_text
            ))
            .with_url(handle.endpoint.clone()));
        }

        String::from_utf8(response.body)
            .map_err(|e| error::transport_msg(format!("echo response was not valid UTF-8: {e}")))
    }
}

fn validate_headers(headers: &HashMap<String, String>) -> Result<()> {
    for (name, value) in headers {
        HeaderName::try_from(name.as_str())
            .map_err(|_| error::invalid_argument(format!("invalid header name '{name}'")))?;
        HeaderValue::try_from(value.as_str())
            .map_err(|_| error::invalid_argument(format!("invalid value for header '{name}'")))?;
    }
    Ok(())
}
