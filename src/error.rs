// src/error.rs

//! Error taxonomy for the harness.
//!
//! A single opaque `Error` covers the four failure classes a scenario can
//! observe: incompatible configuration, malformed credential input,
//! server-side credential rejection, and transport faults. Callers never
//! match on internals; they use the `is_*` predicates and the message text.

use std::error::Error as StdError;
use std::fmt;

use url::Url;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// A `Result` alias where the `Err` case is `authprobe::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// The errors produced while configuring a client or driving a round trip.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    message: String,
    url: Option<Url>,
    source: Option<BoxError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Config,
    InvalidArgument,
    Rejected,
    Transport,
}

impl Error {
    pub(crate) fn new(kind: Kind, message: impl Into<String>) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                message: message.into(),
                url: None,
                source: None,
            }),
        }
    }

    pub(crate) fn with_url(mut self, url: Url) -> Error {
        self.inner.url = Some(url);
        self
    }

    pub(crate) fn with_source(mut self, source: impl Into<BoxError>) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    /// Returns true if the scheme/security-mode pairing or the endpoint was
    /// unusable. Fatal: the scenario cannot run.
    pub fn is_config(&self) -> bool {
        self.inner.kind == Kind::Config
    }

    /// Returns true if credential input was malformed, e.g. an empty
    /// username. Some scenarios expect and assert on this.
    pub fn is_invalid_argument(&self) -> bool {
        self.inner.kind == Kind::InvalidArgument
    }

    /// Returns true if the server denied the presented credentials.
    pub fn is_rejected(&self) -> bool {
        self.inner.kind == Kind::Rejected
    }

    /// Returns true for any other transport or network fault.
    pub fn is_transport(&self) -> bool {
        self.inner.kind == Kind::Transport
    }

    /// The endpoint this error relates to, when known.
    pub fn url(&self) -> Option<&Url> {
        self.inner.url.as_ref()
    }

    /// The failure text. Negative scenarios match substrings against this.
    pub fn message(&self) -> &str {
        &self.inner.message
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("authprobe::Error");
        builder.field("kind", &self.inner.kind);
        builder.field("message", &self.inner.message);
        if let Some(url) = &self.inner.url {
            builder.field("url", &url.as_str());
        }
        if let Some(source) = &self.inner.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.message)?;
        if let Some(url) = &self.inner.url {
            write!(f, " (endpoint {url})")?;
        }
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

// Constructor helpers used throughout the crate.

pub(crate) fn config(message: impl Into<String>) -> Error {
    Error::new(Kind::Config, message)
}

pub(crate) fn invalid_argument(message: impl Into<String>) -> Error {
    Error::new(Kind::InvalidArgument, message)
}

pub(crate) fn rejected(message: impl Into<String>) -> Error {
    Error::new(Kind::Rejected, message)
}

pub(crate) fn transport<E: Into<BoxError>>(source: E) -> Error {
    Error::new(Kind::Transport, "transport fault").with_source(source)
}

pub(crate) fn transport_msg(message: impl Into<String>) -> Error {
    Error::new(Kind::Transport, message)
}
