// tests/basic_auth.rs

//! Basic authentication round trips against a local echo service.

mod support;
use support::server;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use authprobe::{configure, Credential, Scheme, SecurityMode};

/// Header names for the plaintext username/password handshake variant one
/// scenario layers on top of transport authentication.
const BASIC_USERNAME_HEADER: &str = "BasicUsername";
const BASIC_PASSWORD_HEADER: &str = "BasicPassword";

/// Echo service guarded by Basic credentials: echoes the request body when
/// the Authorization header matches, denies with 403 otherwise.
fn echo_service(username: &str, password: &str) -> server::Server {
    let expected = support::basic_authorization(username, password);
    server::http(move |req| {
        let expected = expected.clone();
        async move {
            let (parts, body) = support::read_body(req).await;
            let authorized = parts
                .headers
                .get(http::header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(|value| value == expected)
                .unwrap_or(false);

            if authorized {
                http::Response::builder()
                    .status(http::StatusCode::OK)
                    .body(support::body(body))
                    .unwrap()
            } else {
                http::Response::builder()
                    .status(http::StatusCode::FORBIDDEN)
                    .header(http::header::WWW_AUTHENTICATE, "Basic realm=\"echo\"")
                    .body(support::body("denied"))
                    .unwrap()
            }
        }
    })
}

#[test]
fn basic_authentication_round_trips_echo() {
    let _ = env_logger::try_init();
    let server = echo_service("ab12cd34", "0123456789abcdef");

    let handle = configure(
        Scheme::Basic,
        SecurityMode::TransportEncryptedWithCredential,
        &server.url("/basic"),
        Some(Credential::new("ab12cd34", "0123456789abcdef")),
    )
    .unwrap();

    let result = handle.with_scoped_headers(
        &[
            (BASIC_USERNAME_HEADER, "ab12cd34"),
            (BASIC_PASSWORD_HEADER, "0123456789abcdef"),
        ],
        |context| context.echo("I am a test"),
    );

    assert_eq!(result.unwrap(), "I am a test");
}

#[test]
fn echo_returns_the_payload_byte_for_byte() {
    let server = echo_service("user", "pass");

    let handle = configure(
        Scheme::Basic,
        SecurityMode::TransportEncryptedWithCredential,
        &server.url("/basic"),
        Some(Credential::new("user", "pass")),
    )
    .unwrap();

    let payload = "h\u{e9}llo \u{2206}, no normalization";
    assert_eq!(handle.echo(payload).unwrap(), payload);
}

#[test]
fn invalid_password_is_rejected_as_forbidden() {
    let server = echo_service("ab12cd34", "0123456789abcdef");

    let handle = configure(
        Scheme::Basic,
        SecurityMode::TransportEncryptedWithCredential,
        &server.url("/basic"),
        Some(Credential::new("ab12cd34", "0123456789abcdefInvalid")),
    )
    .unwrap();

    let err = handle.echo("I am a test").unwrap_err();
    assert!(err.is_rejected(), "{err:?}");
    assert!(
        err.to_string().to_lowercase().contains("forbidden"),
        "message was: {err}"
    );
}

#[test]
fn plaintext_header_pair_reaches_the_service() {
    // The custom handshake variant: the service reads the two caller-defined
    // headers instead of the Authorization header.
    let server = server::http(move |req| async move {
        let (parts, body) = support::read_body(req).await;
        let username = parts
            .headers
            .get(BASIC_USERNAME_HEADER)
            .and_then(|value| value.to_str().ok());
        let password = parts
            .headers
            .get(BASIC_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok());

        if username == Some("ab12cd34") && password == Some("0123456789abcdef") {
            http::Response::builder()
                .status(http::StatusCode::OK)
                .body(support::body(body))
                .unwrap()
        } else {
            http::Response::builder()
                .status(http::StatusCode::FORBIDDEN)
                .body(support::body("denied"))
                .unwrap()
        }
    });

    let handle = configure(
        Scheme::Basic,
        SecurityMode::TransportEncryptedWithCredential,
        &server.url("/custom"),
        Some(Credential::new("ab12cd34", "0123456789abcdef")),
    )
    .unwrap();

    let result = handle.with_scoped_headers(
        &[
            (BASIC_USERNAME_HEADER, "ab12cd34"),
            (BASIC_PASSWORD_HEADER, "0123456789abcdef"),
        ],
        |context| context.echo("I am a test"),
    );

    assert_eq!(result.unwrap(), "I am a test");
}

#[test]
fn scoped_headers_do_not_leak_into_later_calls() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();

    let server = server::http(move |req| {
        let seen = seen_clone.clone();
        async move {
            let (parts, body) = support::read_body(req).await;
            seen.lock()
                .unwrap()
                .push(parts.headers.contains_key("x-scope-probe"));
            http::Response::builder()
                .status(http::StatusCode::OK)
                .body(support::body(body))
                .unwrap()
        }
    });

    let handle = configure(
        Scheme::None,
        SecurityMode::TransportCredentialOnly,
        &server.url("/echo"),
        None,
    )
    .unwrap();

    let scoped = handle.with_scoped_headers(&[("x-scope-probe", "1")], |context| {
        context.echo("first")
    });
    assert_eq!(scoped.unwrap(), "first");

    // A fresh scope must not inherit the earlier binding.
    assert_eq!(handle.echo("second").unwrap(), "second");

    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
}

#[test]
fn unexpected_status_is_a_transport_fault() {
    let server = server::http(move |_req| async move {
        http::Response::builder()
            .status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .body(support::body("boom"))
            .unwrap()
    });

    let handle = configure(
        Scheme::None,
        SecurityMode::TransportCredentialOnly,
        &server.url("/echo"),
        None,
    )
    .unwrap();

    let err = handle.echo("ping").unwrap_err();
    assert!(err.is_transport(), "{err:?}");
    assert!(err.to_string().contains("500"));
}

#[test]
fn unreachable_endpoint_is_a_transport_fault() {
    // Bind a port, then drop the listener so connecting to it is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let handle = configure(
        Scheme::None,
        SecurityMode::TransportCredentialOnly,
        &format!("http://{addr}/echo"),
        None,
    )
    .unwrap()
    .timeout(Duration::from_secs(5));

    let err = handle.echo("ping").unwrap_err();
    assert!(err.is_transport(), "{err:?}");
}

#[test]
fn slow_service_times_out_instead_of_hanging() {
    let server = server::http(move |req| async move {
        let (_parts, body) = support::read_body(req).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        http::Response::builder()
            .status(http::StatusCode::OK)
            .body(support::body(body))
            .unwrap()
    });

    let handle = configure(
        Scheme::None,
        SecurityMode::TransportCredentialOnly,
        &server.url("/echo"),
        None,
    )
    .unwrap()
    .timeout(Duration::from_millis(500));

    let err = handle.echo("ping").unwrap_err();
    assert!(err.is_transport(), "{err:?}");
}
