// src/lib.rs

//! Conformance harness for authenticated HTTP transports.
//!
//! `authprobe` checks that an HTTP client stack can authenticate to a
//! service over TLS-protected HTTP using Basic, Digest, NTLM or Windows
//! (Negotiate) credentials. It builds a client bound to one
//! endpoint/scheme/credential triple, performs a single echo round trip
//! with optional call-scoped headers, and classifies the result against
//! the scenario's expectation.
//!
//! The authentication handshakes themselves are the transport's job. The
//! default backend drives libcurl, which performs all four schemes for
//! real (SSPI on Windows, GSS elsewhere); a reqwest backend behind the
//! `backend-reqwest` feature covers anonymous and Basic round trips.
//!
//! ```no_run
//! use authprobe::{classify, configure, Credential, Expectation, Outcome};
//! use authprobe::{Scheme, SecurityMode};
//!
//! # fn run() -> authprobe::Result<()> {
//! let handle = configure(
//!     Scheme::Basic,
//!     SecurityMode::TransportEncryptedWithCredential,
//!     "https://svc/basic",
//!     Some(Credential::new("ab12cd34", "0123456789abcdef")),
//! )?;
//!
//! let outcome = Outcome::from_echo(handle.echo("I am a test"));
//! let verdict = classify(&Expectation::Success("I am a test".into()), &outcome);
//! assert!(verdict.is_pass());
//! # Ok(())
//! # }
//! ```
//!
//! Higher up, [`EchoScenario`] packages the same flow with capability
//! gating and environment-issued credentials, so whole suites can be
//! declared and run uniformly.

mod backend;
mod capability;
mod client;
mod credential;
mod error;
mod outcome;
mod scenario;
mod scheme;

pub use crate::capability::{Capabilities, Capability};
pub use crate::client::{configure, ClientHandle, RequestContext};
pub use crate::credential::{
    Credential, CredentialProvider, EXPLICIT_PASSWORD_VAR, EXPLICIT_USERNAME_VAR,
};
pub use crate::error::{Error, Result};
pub use crate::outcome::{classify, Expectation, FailureKind, Outcome, Verdict};
pub use crate::scenario::{CredentialSource, EchoScenario, ScenarioResult};
pub use crate::scheme::{Scheme, SecurityMode};
