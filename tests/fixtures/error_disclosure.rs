//! Error information-disclosure tests.
//!
//! `Error::into_response` must not forward internal details to the client.

use canary::Error;

fn body_of(err: Error) -> String {
    let body = err.into_response().into_body();
    let bytes = tokio_test::block_on(http_body_util::BodyExt::collect(body))
        .unwrap()
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn internal_error_is_hidden() {
    let body_str = body_of(Error::Internal("pod web-1 rejected token abc123".into()));
    assert!(
        !body_str.contains("abc123"),
        "Internal detail leaked to client: {body_str}"
    );
    assert!(
        body_str.contains("Internal server error"),
        "Expected generic error message, got: {body_str}"
    );
}

#[test]
fn io_error_paths_are_hidden() {
    let io_err = std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "No such file: /proc/sys/crypto/fips_enabled",
    );
    let body_str = body_of(Error::Io(io_err));
    assert!(
        !body_str.contains("/proc/sys"),
        "Filesystem path leaked to client: {body_str}"
    );
    assert!(body_str.contains("Internal server error"));
}

#[test]
fn crypto_error_is_hidden() {
    let body_str = body_of(Error::Crypto("des-ede-cbc: key must be 16 bytes".into()));
    assert!(!body_str.contains("des-ede-cbc"), "{body_str}");
}

#[test]
fn every_error_is_a_server_error() {
    let errors = [
        Error::Config("sync needs a target".into()),
        Error::Crypto("bad iv".into()),
        Error::Internal("join failed".into()),
    ];
    for err in errors {
        assert_eq!(err.status_code(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
