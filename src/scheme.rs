// src/scheme.rs

//! Authentication schemes and transport security modes.

use std::fmt;

/// The authentication mechanism negotiated between client and server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Anonymous access, no client credential.
    None,
    /// HTTP Basic: username and password presented up front.
    Basic,
    /// HTTP Digest challenge/response.
    Digest,
    /// NTLM challenge/response.
    Ntlm,
    /// Windows integrated authentication (Negotiate: Kerberos/SPNEGO).
    Windows,
}

impl Scheme {
    /// Whether the scheme can authenticate with the ambient OS identity
    /// when no explicit credential is supplied.
    pub fn supports_ambient_identity(self) -> bool {
        matches!(self, Scheme::Ntlm | Scheme::Windows)
    }

    /// Whether the scheme must be carried over an encrypted transport.
    pub fn requires_encryption(self) -> bool {
        matches!(self, Scheme::Basic | Scheme::Digest | Scheme::Ntlm)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::None => f.write_str("None"),
            Scheme::Basic => f.write_str("Basic"),
            Scheme::Digest => f.write_str("Digest"),
            Scheme::Ntlm => f.write_str("NTLM"),
            Scheme::Windows => f.write_str("Windows"),
        }
    }
}

/// Policy governing whether transport encryption and/or a client credential
/// are required for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityMode {
    /// Encrypted transport, anonymous client.
    TransportEncryptedOnly,
    /// Encrypted transport carrying a client credential.
    TransportEncryptedWithCredential,
    /// Client credential over an unencrypted transport.
    TransportCredentialOnly,
}

impl SecurityMode {
    /// Whether the transport is TLS-protected under this mode.
    pub fn is_encrypted(self) -> bool {
        !matches!(self, SecurityMode::TransportCredentialOnly)
    }

    /// Whether `scheme` may be carried under this mode.
    ///
    /// Basic, Digest and NTLM put reusable or replayable material on the
    /// wire and are only accepted over an encrypted transport. Windows
    /// (Negotiate) may also run credential-only without TLS.
    pub fn accepts(self, scheme: Scheme) -> bool {
        match self {
            SecurityMode::TransportEncryptedOnly => scheme == Scheme::None,
            SecurityMode::TransportEncryptedWithCredential => scheme != Scheme::None,
            SecurityMode::TransportCredentialOnly => {
                matches!(scheme, Scheme::None | Scheme::Windows)
            }
        }
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityMode::TransportEncryptedOnly => f.write_str("TransportEncryptedOnly"),
            SecurityMode::TransportEncryptedWithCredential => {
                f.write_str("TransportEncryptedWithCredential")
            }
            SecurityMode::TransportCredentialOnly => f.write_str("TransportCredentialOnly"),
        }
    }
}
