use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workflow::{IssueNumber, IssueTarget, LabelName, RepositoryName, RepositoryOwner};

use super::*;

const PRIVATE_KEY: &[u8] = include_bytes!("../testdata/unused_insecure_rsa_key.pem");

fn target() -> IssueTarget {
    IssueTarget::new(
        RepositoryOwner::new("octo-org").unwrap(),
        RepositoryName::new("webhook-poc").unwrap(),
        IssueNumber::new(3),
    )
}

async fn mount_add_labels(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/repos/octo-org/webhook-poc/issues/3/labels"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "name": "review/triage" }])),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_no_installation_uses_personal_token() {
    let server = MockServer::start().await;
    mount_add_labels(&server, "ghp_personal").await;

    let provider = GitHubClientProvider::new(&server.uri())
        .unwrap()
        .with_personal_token("ghp_personal");
    let editor = provider.editor_for(None).await.unwrap();
    editor
        .add_labels(&target(), &[LabelName::new("review/triage").unwrap()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_installation_uses_app_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/installations/402617/access_tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "ghs_installation"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_add_labels(&server, "ghs_installation").await;

    let provider = GitHubClientProvider::new(&server.uri())
        .unwrap()
        .with_personal_token("ghp_personal")
        .with_app(AppCredentials::from_pem(17, PRIVATE_KEY).unwrap());
    let editor = provider
        .editor_for(Some(InstallationId::new(402617)))
        .await
        .unwrap();
    editor
        .add_labels(&target(), &[LabelName::new("review/triage").unwrap()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_personal_token() {
    let provider = GitHubClientProvider::new("https://api.github.com").unwrap();
    let err = provider.editor_for(None).await.err().unwrap();
    match err {
        WorkflowError::ClientUnavailable { message } => {
            assert!(message.contains("GITHUB_AUTH_TOKEN"), "{message}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_app_credentials() {
    let provider = GitHubClientProvider::new("https://api.github.com")
        .unwrap()
        .with_personal_token("ghp_personal");
    let err = provider
        .editor_for(Some(InstallationId::new(1)))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, WorkflowError::ClientUnavailable { .. }));
}

#[tokio::test]
async fn test_failed_exchange_is_client_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let provider = GitHubClientProvider::new(&server.uri())
        .unwrap()
        .with_app(AppCredentials::from_pem(17, PRIVATE_KEY).unwrap());
    let err = provider
        .editor_for(Some(InstallationId::new(5)))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, WorkflowError::ClientUnavailable { .. }));
}

#[test]
fn test_debug_redacts_token() {
    let provider = GitHubClientProvider::new("https://api.github.com")
        .unwrap()
        .with_personal_token("ghp_personal");
    assert!(!format!("{provider:?}").contains("ghp_personal"));
}
