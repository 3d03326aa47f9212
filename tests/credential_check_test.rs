mod common;

use termweave::credential::{CredentialChecker, CredentialStatus, FUNCTIONAL_CHECK_MODEL};

use common::fake_openai::FakeOpenAi;

const MODELS: &str = r#"{
    "object": "list",
    "data": [{"id": "text-embedding-3-small", "object": "model"}]
}"#;

#[tokio::test]
async fn valid_key() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(200, MODELS).await?;
    let checker = CredentialChecker::with_base_url(server.base_url());

    assert_eq!(checker.check(Some("sk-good")).await, CredentialStatus::Valid);

    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/v1/models");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer sk-good"));
    Ok(())
}

#[tokio::test]
async fn invalid_key() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(
        401,
        r#"{"error": {
            "message": "Incorrect API key provided: sk-bad.",
            "code": "invalid_api_key"
        }}"#,
    )
    .await?;
    let checker = CredentialChecker::with_base_url(server.base_url());

    assert_eq!(checker.check(Some("sk-bad")).await, CredentialStatus::InvalidKey);
    Ok(())
}

#[tokio::test]
async fn missing_key_reported_by_server() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(
        401,
        r#"{"error": {
            "message": "You didn't provide an API key. You need to provide your API key."
        }}"#,
    )
    .await?;
    let checker = CredentialChecker::with_base_url(server.base_url());

    assert_eq!(checker.check(Some("x")).await, CredentialStatus::MissingKey);
    Ok(())
}

#[tokio::test]
async fn blank_key_is_not_sent() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(200, MODELS).await?;
    let checker = CredentialChecker::with_base_url(server.base_url());

    assert_eq!(checker.check(Some("")).await, CredentialStatus::MissingKey);
    assert_eq!(checker.check(None).await, CredentialStatus::MissingKey);
    assert!(server.requests().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn rate_limited() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(
        429,
        r#"{"error": {"message": "Rate limit reached for requests"}}"#,
    )
    .await?;
    let checker = CredentialChecker::with_base_url(server.base_url());

    assert_eq!(checker.check(Some("sk-good")).await, CredentialStatus::RateLimited);
    Ok(())
}

#[tokio::test]
async fn server_error_is_other() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(500, r#"{"error": {"message": "boom"}}"#).await?;
    let checker = CredentialChecker::with_base_url(server.base_url());

    match checker.check(Some("sk-good")).await {
        CredentialStatus::OtherError(reason) => assert!(reason.contains("boom")),
        other => panic!("unexpected status: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_other() -> std::io::Result<()> {
    // Bind and drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let checker = CredentialChecker::with_base_url(format!("http://{addr}/v1"));
    assert!(matches!(
        checker.check(Some("sk-good")).await,
        CredentialStatus::OtherError(_)
    ));
    Ok(())
}

#[tokio::test]
async fn functional_check_embeds_one_input() -> std::io::Result<()> {
    let server = FakeOpenAi::embeddings(|_| vec![0.0, 1.0]).await?;
    let checker = CredentialChecker::with_base_url(server.base_url());

    assert_eq!(
        checker
            .check_functional(Some("sk-good"), FUNCTIONAL_CHECK_MODEL)
            .await,
        CredentialStatus::Valid
    );

    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/v1/embeddings");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer sk-good"));

    let body = requests[0].json();
    assert_eq!(body["model"], FUNCTIONAL_CHECK_MODEL);
    assert_eq!(body["input"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn functional_check_reports_api_errors() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(
        404,
        r#"{"error": {"message": "The model `text-embedding-4` does not exist"}}"#,
    )
    .await?;
    let checker = CredentialChecker::with_base_url(server.base_url());

    match checker
        .check_functional(Some("sk-good"), "text-embedding-4")
        .await
    {
        CredentialStatus::OtherError(reason) => assert!(reason.contains("does not exist")),
        other => panic!("unexpected status: {other:?}"),
    }
    Ok(())
}
