// src/capability.rs

//! Environment capability probes, consumed as booleans.
//!
//! The harness never runs these checks itself. The embedder probes its
//! environment (certificate stores, domain membership, available security
//! packages) and reports the results here; scenarios with unmet
//! requirements are skipped, not failed.

use std::fmt;

/// A single environment precondition a scenario may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The service's root certificate is installed and trusted.
    RootCertificateInstalled,
    /// NTLM authentication is available on this host.
    NtlmAvailable,
    /// Windows integrated authentication is available.
    WindowsAuthAvailable,
    /// The service offers Digest authentication.
    DigestAuthAvailable,
    /// The service machine is domain-joined.
    ServerDomainJoined,
    /// The process runs on Windows.
    RunningOnWindows,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::RootCertificateInstalled => f.write_str("root certificate installed"),
            Capability::NtlmAvailable => f.write_str("NTLM available"),
            Capability::WindowsAuthAvailable => f.write_str("Windows authentication available"),
            Capability::DigestAuthAvailable => f.write_str("Digest authentication available"),
            Capability::ServerDomainJoined => f.write_str("server domain-joined"),
            Capability::RunningOnWindows => f.write_str("running on Windows"),
        }
    }
}

/// The probe results for one test environment. Everything defaults to
/// unavailable; the embedder switches on what it verified.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capabilities {
    root_certificate_installed: bool,
    ntlm_available: bool,
    windows_auth_available: bool,
    digest_auth_available: bool,
    server_domain_joined: bool,
    running_on_windows: bool,
}

impl Capabilities {
    pub fn new() -> Capabilities {
        Capabilities::default()
    }

    pub fn root_certificate_installed(mut self, available: bool) -> Capabilities {
        self.root_certificate_installed = available;
        self
    }

    pub fn ntlm_available(mut self, available: bool) -> Capabilities {
        self.ntlm_available = available;
        self
    }

    pub fn windows_auth_available(mut self, available: bool) -> Capabilities {
        self.windows_auth_available = available;
        self
    }

    pub fn digest_auth_available(mut self, available: bool) -> Capabilities {
        self.digest_auth_available = available;
        self
    }

    pub fn server_domain_joined(mut self, available: bool) -> Capabilities {
        self.server_domain_joined = available;
        self
    }

    pub fn running_on_windows(mut self, available: bool) -> Capabilities {
        self.running_on_windows = available;
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::RootCertificateInstalled => self.root_certificate_installed,
            Capability::NtlmAvailable => self.ntlm_available,
            Capability::WindowsAuthAvailable => self.windows_auth_available,
            Capability::DigestAuthAvailable => self.digest_auth_available,
            Capability::ServerDomainJoined => self.server_domain_joined,
            Capability::RunningOnWindows => self.running_on_windows,
        }
    }

    /// The subset of `required` this environment does not satisfy.
    pub fn missing(&self, required: &[Capability]) -> Vec<Capability> {
        required
            .iter()
            .copied()
            .filter(|capability| !self.has(*capability))
            .collect()
    }
}
