// demos/echo_probe.rs

//! Manual conformance driver: one authenticated echo round trip against a
//! live service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example echo_probe -- https://svc/basic --scheme basic -u user:pass
//! ```
//!
//! Expect a rejection instead of an echo:
//! ```bash
//! cargo run --example echo_probe -- https://svc/basic --scheme basic \
//!     -u user:wrongpass --expect-forbidden
//! ```
//!
//! Windows integrated authentication over plain HTTP, ambient identity:
//! ```bash
//! cargo run --example echo_probe -- http://svc/windows --scheme windows --credential-only
//! ```

use std::env;
use std::process;
use std::time::Duration;

use authprobe::{
    classify, configure, Credential, Expectation, Outcome, Scheme, SecurityMode, Verdict,
};

fn print_usage() {
    eprintln!("Usage: echo_probe <url> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scheme <name>      none | basic | digest | ntlm | windows (default: none)");
    eprintln!("  -u, --user <user:pass>  Explicit credential");
    eprintln!("  --credential-only    Send the credential without transport encryption");
    eprintln!("                       (Windows scheme and anonymous access only)");
    eprintln!("  --payload <text>     Payload to echo (default: 'I am a test')");
    eprintln!("  -H, --header <name:value>  Add a call-scoped header");
    eprintln!("  --expect-forbidden   Expect the server to deny the credential");
    eprintln!("  --timeout <secs>     Round-trip timeout (default: 60)");
    eprintln!("  -k, --insecure       Accept untrusted TLS roots");
    eprintln!("  -h, --help           Show this help");
}

fn parse_user_pass(s: &str) -> (String, String) {
    if let Some(colon_pos) = s.find(':') {
        let user = s[..colon_pos].to_string();
        let pass = s[colon_pos + 1..].to_string();
        (user, pass)
    } else {
        (s.to_string(), String::new())
    }
}

fn parse_scheme(s: &str) -> Option<Scheme> {
    match s.to_ascii_lowercase().as_str() {
        "none" => Some(Scheme::None),
        "basic" => Some(Scheme::Basic),
        "digest" => Some(Scheme::Digest),
        "ntlm" => Some(Scheme::Ntlm),
        "windows" | "negotiate" => Some(Scheme::Windows),
        _ => None,
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || args.contains(&"-h".to_string()) || args.contains(&"--help".to_string())
    {
        print_usage();
        process::exit(if args.is_empty() { 1 } else { 0 });
    }

    let url = args[0].clone();
    let mut scheme = Scheme::None;
    let mut credential: Option<Credential> = None;
    let mut credential_only = false;
    let mut payload = "I am a test".to_string();
    let mut headers: Vec<(String, String)> = Vec::new();
    let mut expect_forbidden = false;
    let mut timeout = Duration::from_secs(60);
    let mut insecure = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scheme" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --scheme requires an argument");
                    process::exit(1);
                }
                scheme = match parse_scheme(&args[i + 1]) {
                    Some(scheme) => scheme,
                    None => {
                        eprintln!("Error: unknown scheme '{}'", args[i + 1]);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "-u" | "--user" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: {} requires an argument", args[i]);
                    process::exit(1);
                }
                let (user, pass) = parse_user_pass(&args[i + 1]);
                credential = Some(Credential::new(user, pass));
                i += 1;
            }
            "--credential-only" => {
                credential_only = true;
            }
            "--payload" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --payload requires an argument");
                    process::exit(1);
                }
                payload = args[i + 1].clone();
                i += 1;
            }
            "-H" | "--header" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: {} requires an argument", args[i]);
                    process::exit(1);
                }
                if let Some(colon_pos) = args[i + 1].find(':') {
                    let name = args[i + 1][..colon_pos].trim().to_string();
                    let value = args[i + 1][colon_pos + 1..].trim().to_string();
                    headers.push((name, value));
                } else {
                    eprintln!("Error: header must be in format 'Name: Value'");
                    process::exit(1);
                }
                i += 1;
            }
            "--expect-forbidden" => {
                expect_forbidden = true;
            }
            "--timeout" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --timeout requires an argument");
                    process::exit(1);
                }
                let secs: u64 = match args[i + 1].parse() {
                    Ok(secs) => secs,
                    Err(_) => {
                        eprintln!("Error: invalid timeout '{}'", args[i + 1]);
                        process::exit(1);
                    }
                };
                timeout = Duration::from_secs(secs);
                i += 1;
            }
            "-k" | "--insecure" => {
                insecure = true;
            }
            _ => {
                eprintln!("Error: unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = if credential_only {
        SecurityMode::TransportCredentialOnly
    } else if scheme == Scheme::None {
        SecurityMode::TransportEncryptedOnly
    } else {
        SecurityMode::TransportEncryptedWithCredential
    };

    println!("=== Authenticated Echo Probe ===");
    println!("URL: {url}");
    println!("Scheme: {scheme}");
    println!("Mode: {mode}");
    println!();

    let handle = match configure(scheme, mode, &url, credential) {
        Ok(handle) => handle.timeout(timeout).accept_invalid_certs(insecure),
        Err(e) => {
            eprintln!("✗ Configuration failed: {e}");
            process::exit(1);
        }
    };

    let scoped: Vec<(&str, &str)> = headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    println!("Sending request...");
    let outcome =
        Outcome::from_echo(handle.with_scoped_headers(&scoped, |context| context.echo(&payload)));

    let expectation = if expect_forbidden {
        Expectation::Rejection("forbidden".to_string())
    } else {
        Expectation::Success(payload.clone())
    };

    println!();
    println!("Outcome: {outcome}");
    match classify(&expectation, &outcome) {
        Verdict::Pass => {
            println!("✓ Pass");
        }
        Verdict::ExpectedMismatch(diagnostic) => {
            eprintln!("✗ Expected-content mismatch: {diagnostic}");
            process::exit(1);
        }
        Verdict::Unexpected(diagnostic) => {
            eprintln!("✗ Unexpected outcome: {diagnostic}");
            process::exit(1);
        }
    }
}
