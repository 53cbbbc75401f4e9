// src/scenario.rs

//! Scenario runner: gate on capabilities, configure, round trip, classify.
//!
//! Each scenario is a self-contained unit: one handle, one scoped-header
//! block, one round trip, one verdict. Scenarios share no mutable state and
//! may run from parallel threads.

use std::time::Duration;

use crate::capability::{Capabilities, Capability};
use crate::client::configure;
use crate::credential::{Credential, CredentialProvider};
use crate::outcome::{classify, Expectation, Outcome, Verdict};
use crate::scheme::{Scheme, SecurityMode};

/// Where a scenario's identity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// No explicit credential; NTLM/Windows use the ambient OS identity.
    Ambient,
    /// A fresh random identity generated for this run.
    Ephemeral,
    /// The externally issued identity from the provider; absent means the
    /// scenario is skipped, not failed.
    Explicit,
}

/// One self-contained conformance scenario.
#[derive(Debug, Clone)]
pub struct EchoScenario {
    name: String,
    scheme: Scheme,
    mode: SecurityMode,
    endpoint: String,
    credential: CredentialSource,
    scoped_headers: Vec<(String, String)>,
    payload: String,
    expectation: Option<Expectation>,
    requires: Vec<Capability>,
    timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl EchoScenario {
    /// A scenario with the default payload, a success expectation on that
    /// payload, and the scheme's natural credential source: ephemeral for
    /// Basic, explicit for Digest, ambient for NTLM/Windows and anonymous.
    pub fn new(
        name: impl Into<String>,
        scheme: Scheme,
        mode: SecurityMode,
        endpoint: impl Into<String>,
    ) -> EchoScenario {
        let credential = match scheme {
            Scheme::Basic => CredentialSource::Ephemeral,
            Scheme::Digest => CredentialSource::Explicit,
            Scheme::None | Scheme::Ntlm | Scheme::Windows => CredentialSource::Ambient,
        };
        EchoScenario {
            name: name.into(),
            scheme,
            mode,
            endpoint: endpoint.into(),
            credential,
            scoped_headers: Vec::new(),
            payload: "I am a test".to_string(),
            expectation: None,
            requires: Vec::new(),
            timeout: None,
            accept_invalid_certs: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credential_source(mut self, source: CredentialSource) -> EchoScenario {
        self.credential = source;
        self
    }

    /// Attaches a header to the scenario's single scoped call.
    pub fn scoped_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> EchoScenario {
        self.scoped_headers.push((name.into(), value.into()));
        self
    }

    pub fn payload(mut self, payload: impl Into<String>) -> EchoScenario {
        self.payload = payload.into();
        self
    }

    /// Overrides the expectation. Without this the scenario expects the
    /// payload echoed back unchanged.
    pub fn expect(mut self, expectation: Expectation) -> EchoScenario {
        self.expectation = Some(expectation);
        self
    }

    /// Declares capability probes that must hold for the scenario to run.
    pub fn requires(mut self, capabilities: &[Capability]) -> EchoScenario {
        self.requires.extend_from_slice(capabilities);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> EchoScenario {
        self.timeout = Some(timeout);
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> EchoScenario {
        self.accept_invalid_certs = accept;
        self
    }

    /// Gates, executes and classifies the scenario. Exactly one verdict per
    /// run; the diagnostic names the scenario and endpoint but never the
    /// secret.
    pub fn run(
        &self,
        capabilities: &Capabilities,
        provider: &CredentialProvider,
    ) -> ScenarioResult {
        let missing = capabilities.missing(&self.requires);
        if !missing.is_empty() {
            let unmet = missing
                .iter()
                .map(|capability| capability.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let reason = format!("requires unmet capabilities: {unmet}");
            log::info!("skipping scenario '{}': {reason}", self.name);
            return ScenarioResult::Skipped(reason);
        }

        let credential = match self.credential {
            CredentialSource::Ambient => None,
            CredentialSource::Ephemeral => Some(provider.ephemeral()),
            CredentialSource::Explicit => match provider.explicit() {
                Some(credential) => Some(credential.clone()),
                None => {
                    let reason = "explicit credentials not available in the environment";
                    log::info!("skipping scenario '{}': {reason}", self.name);
                    return ScenarioResult::Skipped(reason.to_string());
                }
            },
        };

        let expectation = self
            .expectation
            .clone()
            .unwrap_or_else(|| Expectation::Success(self.payload.clone()));

        let outcome = self.execute(credential);
        match classify(&expectation, &outcome) {
            Verdict::Pass => {
                log::debug!("scenario '{}' passed", self.name);
                ScenarioResult::Passed
            }
            Verdict::ExpectedMismatch(detail) | Verdict::Unexpected(detail) => {
                ScenarioResult::Failed(format!(
                    "scenario '{}' using address '{}': {detail}",
                    self.name, self.endpoint
                ))
            }
        }
    }

    fn execute(&self, credential: Option<Credential>) -> Outcome {
        let handle = match configure(self.scheme, self.mode, &self.endpoint, credential) {
            Ok(handle) => handle,
            Err(e) => return Outcome::from_echo(Err(e)),
        };
        let mut handle = handle.accept_invalid_certs(self.accept_invalid_certs);
        if let Some(timeout) = self.timeout {
            handle = handle.timeout(timeout);
        }

        let scoped: Vec<(&str, &str)> = self
            .scoped_headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        let result = handle.with_scoped_headers(&scoped, |context| context.echo(&self.payload));
        Outcome::from_echo(result)
    }
}

/// Aggregated result of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioResult {
    Passed,
    /// The verdict diagnostic, prefixed with scenario name and endpoint.
    Failed(String),
    /// Why the scenario did not run.
    Skipped(String),
}

impl ScenarioResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, ScenarioResult::Passed)
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, ScenarioResult::Skipped(_))
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            ScenarioResult::Passed => None,
            ScenarioResult::Failed(diagnostic) | ScenarioResult::Skipped(diagnostic) => {
                Some(diagnostic)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmet_capability_skips_with_reason() {
        let scenario = EchoScenario::new(
            "ntlm echo",
            Scheme::Ntlm,
            SecurityMode::TransportEncryptedWithCredential,
            "https://svc/ntlm",
        )
        .requires(&[Capability::NtlmAvailable, Capability::RootCertificateInstalled]);

        let result = scenario.run(&Capabilities::new(), &CredentialProvider::default());
        assert!(result.is_skip());
        let reason = result.diagnostic().unwrap();
        assert!(reason.contains("NTLM available"));
        assert!(reason.contains("root certificate installed"));
    }

    #[test]
    fn missing_explicit_credentials_skip_instead_of_failing() {
        let scenario = EchoScenario::new(
            "digest echo",
            Scheme::Digest,
            SecurityMode::TransportEncryptedWithCredential,
            "https://svc/digest",
        );

        let result = scenario.run(&Capabilities::new(), &CredentialProvider::new(None));
        assert!(result.is_skip());
        assert!(result.diagnostic().unwrap().contains("not available"));
    }

    #[test]
    fn incompatible_configuration_fails_with_scenario_context() {
        let scenario = EchoScenario::new(
            "basic without tls",
            Scheme::Basic,
            SecurityMode::TransportCredentialOnly,
            "http://svc/basic",
        );

        let result = scenario.run(&Capabilities::new(), &CredentialProvider::default());
        let diagnostic = result.diagnostic().unwrap();
        assert!(!result.is_pass());
        assert!(!result.is_skip());
        assert!(diagnostic.contains("basic without tls"));
        assert!(diagnostic.contains("http://svc/basic"));
    }

    #[test]
    fn empty_username_scenario_passes_when_invalid_argument_is_expected() {
        let scenario = EchoScenario::new(
            "basic empty user",
            Scheme::Basic,
            SecurityMode::TransportEncryptedWithCredential,
            "https://svc/basic",
        )
        .expect(Expectation::InvalidArgument("username".into()));

        let provider = CredentialProvider::new(Some(Credential::new("", "NoUserName")));
        let result = scenario
            .credential_source(CredentialSource::Explicit)
            .run(&Capabilities::new(), &provider);
        assert!(result.is_pass(), "{result:?}");
    }
}
