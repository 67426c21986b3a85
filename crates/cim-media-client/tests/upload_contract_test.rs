//! Contract tests for the media client against a simulated media host.
//!
//! Uses wiremock to stand in for the live media host. Verifies the upload
//! path, the auth header, success decoding, and error surfacing for
//! non-2xx responses and undecodable bodies.

use cim_media_client::{MediaClient, MediaConfig, MediaError};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn test_client(mock_server: &MockServer) -> MediaClient {
    let config = MediaConfig::local_mock(&mock_server.uri()).unwrap();
    MediaClient::new(config).unwrap()
}

fn sample_bytes() -> Vec<u8> {
    b"\x89PNG\r\n\x1a\nfakeimagedata".to_vec()
}

#[tokio::test]
async fn upload_posts_multipart_and_decodes_receipt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header_exists("authorization"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "secure_url": "https://media.example/complaint-evidence/abc123.png",
            "public_id": "complaint-evidence/abc123"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let receipt = client
        .upload(sample_bytes(), "fix.png".into(), "image/png".into())
        .await
        .unwrap();

    assert_eq!(
        receipt.secure_url,
        "https://media.example/complaint-evidence/abc123.png"
    );
    assert_eq!(receipt.public_id, "complaint-evidence/abc123");
}

#[tokio::test]
async fn upload_surfaces_upstream_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(507).set_body_string("insufficient storage"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let err = client
        .upload(sample_bytes(), "fix.png".into(), "image/png".into())
        .await
        .unwrap_err();

    match err {
        MediaError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 507);
            assert!(body.contains("insufficient storage"));
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn upload_rejects_undecodable_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let err = client
        .upload(sample_bytes(), "fix.png".into(), "image/png".into())
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::Decode { .. }), "got: {err:?}");
}
