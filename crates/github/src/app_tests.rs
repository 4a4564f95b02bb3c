use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::client::{http_client, parse_base_url};

const PRIVATE_KEY: &[u8] = include_bytes!("../testdata/unused_insecure_rsa_key.pem");
const PUBLIC_KEY: &[u8] = include_bytes!("../testdata/unused_insecure_rsa_key.pub.pem");

#[test]
fn test_jwt_claims() {
    let credentials = AppCredentials::from_pem(17, PRIVATE_KEY).unwrap();
    let now = Utc::now().timestamp();
    let token = credentials.jwt(now).unwrap();

    assert_eq!(decode_header(&token).unwrap().alg, Algorithm::RS256);
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY).unwrap();
    let data = decode::<Claims>(&token, &key, &Validation::new(Algorithm::RS256)).unwrap();
    assert_eq!(data.claims.iss, "17");
    assert_eq!(data.claims.iat, now - 60);
    assert_eq!(data.claims.exp, now + 600);
}

#[test]
fn test_invalid_pem_is_rejected() {
    assert!(matches!(
        AppCredentials::from_pem(17, b"-----BEGIN NONSENSE-----"),
        Err(GitHubError::Jwt { .. })
    ));
}

#[test]
fn test_missing_key_file() {
    let err = AppCredentials::from_pem_file(17, Path::new("testdata/does-not-exist.pem"))
        .unwrap_err();
    assert!(matches!(err, GitHubError::PrivateKeyFile { .. }));
    assert!(err.to_string().contains("does-not-exist.pem"));
}

#[test]
fn test_debug_redacts_key() {
    let credentials = AppCredentials::from_pem(17, PRIVATE_KEY).unwrap();
    assert_eq!(
        format!("{credentials:?}"),
        r#"AppCredentials { app_id: 17, key: "<redacted>" }"#
    );
}

#[tokio::test]
async fn test_installation_token_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/installations/402617/access_tokens"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "ghs_installation",
            "expires_at": "2019-02-17T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = AppCredentials::from_pem(17, PRIVATE_KEY).unwrap();
    let token = installation_token(
        &http_client().unwrap(),
        &parse_base_url(&server.uri()).unwrap(),
        &credentials,
        InstallationId::new(402617),
    )
    .await
    .unwrap();
    assert_eq!(token, "ghs_installation");
}

#[tokio::test]
async fn test_rejected_exchange_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("A JSON web token could not be decoded"))
        .mount(&server)
        .await;

    let credentials = AppCredentials::from_pem(17, PRIVATE_KEY).unwrap();
    let err = installation_token(
        &http_client().unwrap(),
        &parse_base_url(&server.uri()).unwrap(),
        &credentials,
        InstallationId::new(1),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GitHubError::Status { status: 401, .. }));
}
