//! End-to-end tests against the live mock backend.
//!
//! # Design
//! Starts the mock server on a random port, then drives every conversion
//! through the real `reqwest` transport. Validates that request building,
//! multipart encoding, error normalization and the forms agree with the
//! server's wire format.

use std::net::SocketAddr;

use chemvision_client::{download, run_conversion, Conversion, ReqwestTransport};
use chemvision_core::validation::MAX_IMAGE_BYTES;
use chemvision_core::{
    ApiError, ChemVisionClient, ConversionApi, Converter, FormStatus, ImageFile, RouteFamily, Source,
    UNEXPECTED_ERROR_MESSAGE,
};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Boot the mock server on its own runtime thread and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn converter(addr: SocketAddr, routes: RouteFamily) -> Converter<ReqwestTransport> {
    let client = ChemVisionClient::new(&format!("http://{addr}")).with_routes(routes);
    Converter::new(client, ReqwestTransport::new().unwrap())
}

fn png_file() -> ImageFile {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(&[0; 64]);
    ImageFile::sniffed("molecule.png", bytes)
}

#[test]
fn conversions_over_http() {
    let addr = start_server();

    for routes in [RouteFamily::Hyphenated, RouteFamily::Compact] {
        let api = converter(addr, routes);

        // Health.
        assert_eq!(api.health().unwrap().status, "ok", "{routes}");

        // Demo name converts.
        let result = api.name_to_structure("isopentane").unwrap();
        assert_eq!(result.smiles, "CC(C)CC", "{routes}");
        assert_eq!(result.source, Source::Demo);

        // Unknown name: structured envelope, correlation id echoed from our header.
        let err = api.name_to_structure("hexane").unwrap_err();
        let backend = err.as_backend().expect("typed error");
        assert_eq!(backend.status_code, 501);
        assert_eq!(backend.error_code, "NOT_IMPLEMENTED");
        assert!(backend.correlation_id.parse::<uuid::Uuid>().is_ok());

        // Structure to name is not implemented by the backend.
        let err = api.structure_to_name("CC(C)CC").unwrap_err();
        assert_eq!(err.as_backend().unwrap().error_code, "NOT_IMPLEMENTED");

        // Server-side validation comes back as a joined 422 message.
        let long_name = "a".repeat(501);
        let err = api.name_to_structure(&long_name).unwrap_err();
        let backend = err.as_backend().unwrap();
        assert_eq!(backend.error_code, "VALIDATION_ERROR");
        assert_eq!(backend.message, "String should have at most 500 characters");

        // Multipart upload is accepted as an image and reaches recognition.
        let err = api.image_to_structure(&png_file()).unwrap_err();
        let backend = err.as_backend().unwrap();
        assert_eq!(backend.status_code, 501, "{routes}");
        assert!(backend.message.contains("OCSR"));

        // Declared type is what the server checks.
        let gif = ImageFile::new("anim.gif", "image/gif", b"GIF89a".to_vec());
        let err = api.image_to_structure(&gif).unwrap_err();
        assert_eq!(err.as_backend().unwrap().error_code, "INVALID_IMAGE_TYPE");
    }
}

#[test]
fn unknown_route_normalizes_plain_detail() {
    let addr = start_server();
    // A hyphenated backend path under the wrong prefix.
    let client = ChemVisionClient::new(&format!("http://{addr}/v9"));
    let api = Converter::new(client, ReqwestTransport::new().unwrap());

    let err = api.name_to_structure("isopentane").unwrap_err();
    let backend = err.as_backend().unwrap();
    assert_eq!(backend.status_code, 404);
    assert_eq!(backend.message, "Not Found");
    assert_eq!(backend.error_code, "UNKNOWN_ERROR");
    assert_ne!(backend.correlation_id, "unknown");
}

#[test]
fn unreachable_backend_is_untyped() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let api = converter(addr, RouteFamily::Hyphenated);

    let err = api.name_to_structure("isopentane").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.user_message(), UNEXPECTED_ERROR_MESSAGE);
}

#[test]
fn cli_flow_renders_and_downloads() {
    let addr = start_server();
    let api = converter(addr, RouteFamily::Hyphenated);
    let dir = tempfile::tempdir().unwrap();

    let outcome = run_conversion(&api, &Conversion::Name("isopentane".to_string())).unwrap();
    assert!(outcome.succeeded());
    assert!(outcome.rendered.contains("CC(C)CC"));
    assert!(outcome.rendered.contains("Demo"));

    let card = outcome.card.unwrap();
    let saved = download(&card, dir.path()).unwrap();
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "CC(C)CC");

    let outcome = run_conversion(&api, &Conversion::Smiles("CC(C)CC".to_string())).unwrap();
    assert_eq!(outcome.status, FormStatus::Error);
    assert!(outcome.rendered.contains("not yet implemented"));
}

#[test]
fn cli_rejects_bad_files_before_sending() {
    // No server: any request would fail as a transport error instead.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let api = converter(addr, RouteFamily::Hyphenated);
    let dir = tempfile::tempdir().unwrap();

    let text = dir.path().join("notes.txt");
    std::fs::write(&text, "not an image").unwrap();
    let outcome = run_conversion(&api, &Conversion::Image(text)).unwrap();
    assert_eq!(outcome.status, FormStatus::Error);
    assert!(outcome.rendered.contains("valid image file"));

    let big = dir.path().join("huge.png");
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.resize(MAX_IMAGE_BYTES + 1, 0);
    std::fs::write(&big, bytes).unwrap();
    let outcome = run_conversion(&api, &Conversion::Image(big)).unwrap();
    assert!(outcome.rendered.contains("less than 10MB"));

    let outcome = run_conversion(&api, &Conversion::Name(String::new())).unwrap();
    assert_eq!(outcome.status, FormStatus::Idle);
    assert_eq!(outcome.rendered, "Please enter a chemical name");
}
