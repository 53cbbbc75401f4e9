// src/credential.rs

//! Identity material for credentialed schemes.

use std::env;
use std::fmt;

use base64::Engine as _;
use rand::Rng;

/// Environment key for the externally issued username (Digest scenarios).
pub const EXPLICIT_USERNAME_VAR: &str = "ExplicitUserName";

/// Environment key for the externally issued password.
pub const EXPLICIT_PASSWORD_VAR: &str = "ExplicitPassword";

/// A username/secret pair presented to the server.
///
/// Created fresh per scenario and discarded after the round trip. The
/// secret never appears in `Debug` output, logs, or diagnostics.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub secret: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Credential {
        Credential {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Value for a preemptive `Authorization: Basic` header.
    pub(crate) fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.username, self.secret);
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw.as_bytes());
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &format_args!("*** {} bytes ***", self.secret.len()))
            .finish()
    }
}

/// Sources identity material for scenarios.
///
/// Explicit identities are injected at construction (or read once from the
/// process environment); ephemeral identities are generated per call and
/// never reused.
#[derive(Debug, Clone, Default)]
pub struct CredentialProvider {
    explicit: Option<Credential>,
}

impl CredentialProvider {
    pub fn new(explicit: Option<Credential>) -> CredentialProvider {
        CredentialProvider { explicit }
    }

    /// Reads `ExplicitUserName` / `ExplicitPassword` from the process
    /// environment. Either value missing or empty leaves the provider
    /// without an explicit identity; scenarios that need one then skip.
    pub fn from_env() -> CredentialProvider {
        let username = env::var(EXPLICIT_USERNAME_VAR).ok().filter(|v| !v.is_empty());
        let password = env::var(EXPLICIT_PASSWORD_VAR).ok().filter(|v| !v.is_empty());
        match (username, password) {
            (Some(username), Some(password)) => {
                CredentialProvider::new(Some(Credential::new(username, password)))
            }
            _ => CredentialProvider::new(None),
        }
    }

    /// The externally issued identity, if one was supplied.
    pub fn explicit(&self) -> Option<&Credential> {
        self.explicit.as_ref()
    }

    /// A fresh random identity: 8 hex characters of username, 16 of secret.
    pub fn ephemeral(&self) -> Credential {
        let mut rng = rand::thread_rng();
        let username = format!("{:08x}", rng.gen::<u32>());
        let secret = format!("{:016x}", rng.gen::<u64>());
        log::trace!("generated ephemeral identity '{username}'");
        Credential::new(username, secret)
    }
}
