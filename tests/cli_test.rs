mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::fake_openai::FakeOpenAi;

fn command(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_termweave"));
    command.args(args).env_remove("OPENAI_API_KEY");
    command
}

fn termweave(args: &[&str]) -> Output {
    command(args).output().expect("failed to run termweave")
}

fn termweave_in(dir: &Path, args: &[&str]) -> Output {
    command(args)
        .current_dir(dir)
        .output()
        .expect("failed to run termweave")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn lookup_prints_json() {
    let output = termweave(&["-f", "json", "lookup", "NYC"]);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["term"], "nyc");
    assert_eq!(value["found"], true);
    assert!(
        value["expansions"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("the big apple"))
    );
}

#[test]
fn expand_with_local_model() {
    let output = termweave(&["-f", "json", "expand", "NYC", "LA", "--semantic", "off"]);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["model"], "hashing-trigram");
    assert_eq!(value["inputs"].as_array().unwrap().len(), 2);
    let union: Vec<&str> = value["union"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(union.contains(&"the big apple"));
    assert!(union.contains(&"los angeles"));
    assert!(union.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn expand_detailed_human_output() {
    let output = termweave(&["expand", "nyc", "--detailed", "--no-original"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("nyc:"));
    assert!(stdout.contains("exact"));
}

#[test]
fn invalid_threshold_fails() {
    let output = termweave(&["expand", "nyc", "--threshold", "1.5"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn check_key_without_key_exits_non_zero() {
    let output = termweave(&["-f", "json", "check-key", "--base-url", "http://127.0.0.1:9/v1"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["status"], "missing_key");
}

#[tokio::test]
async fn check_key_against_server() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(200, r#"{"object": "list", "data": []}"#).await?;
    let base_url = server.base_url();

    let output = tokio::task::spawn_blocking(move || {
        termweave(&["check-key", "--api-key", "sk-good", "--base-url", &base_url])
    })
    .await
    .expect("check-key task panicked");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("valid"));
    Ok(())
}

#[tokio::test]
async fn check_key_functional_success() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(200, r#"{"object": "list", "data": []}"#).await?;
    let base_url = server.base_url();

    let output = tokio::task::spawn_blocking(move || {
        termweave(&[
            "check-key",
            "--api-key",
            "sk-good",
            "--base-url",
            &base_url,
            "--functional",
        ])
    })
    .await
    .expect("check-key task panicked");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("API is fully functional"));

    let paths: Vec<String> = server.requests().await.into_iter().map(|r| r.path).collect();
    assert_eq!(paths, ["/v1/models", "/v1/embeddings"]);
    Ok(())
}

#[tokio::test]
async fn check_key_functional_failure_is_reported_separately() -> std::io::Result<()> {
    let server = FakeOpenAi::start(|request| match request.path.as_str() {
        "/v1/models" => (200, r#"{"object": "list", "data": []}"#.to_string()),
        _ => (
            500,
            r#"{"error": {"message": "embedding backend down"}}"#.to_string(),
        ),
    })
    .await?;
    let base_url = server.base_url();

    let output = tokio::task::spawn_blocking(move || {
        termweave(&[
            "-f",
            "json",
            "check-key",
            "--api-key",
            "sk-good",
            "--base-url",
            &base_url,
            "--functional",
        ])
    })
    .await
    .expect("check-key task panicked");

    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert_eq!(value["status"], "valid");
    assert_eq!(value["functional"]["status"], "other_error");
    assert!(
        value["functional"]["reason"]
            .as_str()
            .unwrap()
            .contains("embedding backend down")
    );
    Ok(())
}

#[tokio::test]
async fn check_key_reads_dotenv_file() -> std::io::Result<()> {
    let server = FakeOpenAi::fixed(200, r#"{"object": "list", "data": []}"#).await?;
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join(".env"), "OPENAI_API_KEY=sk-from-dotenv\n")?;

    let base_url = server.base_url();
    let workdir = dir.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        termweave_in(&workdir, &["check-key", "--base-url", &base_url])
    })
    .await
    .expect("check-key task panicked");
    assert!(output.status.success());

    // The process environment takes precedence over `.env`.
    let base_url = server.base_url();
    let workdir = dir.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        command(&["check-key", "--base-url", &base_url])
            .current_dir(&workdir)
            .env("OPENAI_API_KEY", "sk-from-env")
            .output()
            .expect("failed to run termweave")
    })
    .await
    .expect("check-key task panicked");
    assert!(output.status.success());

    let keys: Vec<Option<String>> = server
        .requests()
        .await
        .into_iter()
        .map(|r| r.authorization)
        .collect();
    assert_eq!(
        keys,
        [
            Some("Bearer sk-from-dotenv".to_string()),
            Some("Bearer sk-from-env".to_string())
        ]
    );
    Ok(())
}

#[tokio::test]
async fn expand_embeds_each_term_once() -> std::io::Result<()> {
    let server = FakeOpenAi::embeddings(|text| {
        let mut vector = vec![0.0; 1536];
        vector[if text.contains("york") { 0 } else { 1 }] = 1.0;
        vector
    })
    .await?;

    let mut config = tempfile::NamedTempFile::new()?;
    serde_json::to_writer(
        &mut config,
        &serde_json::json!({
            "model": "text-embedding-3-small",
            "api_key": "sk-test",
            "api_base_url": server.base_url(),
            "semantic_mode": "always",
        }),
    )?;
    let config_path = config.path().to_string_lossy().to_string();

    let output = tokio::task::spawn_blocking(move || {
        termweave(&["-f", "json", "expand", "NYC", "Gotham", "--config", &config_path])
    })
    .await
    .expect("expand task panicked");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["model"], "text-embedding-3-small");

    // One batch for the index, then one request per input term.
    let requests = server.requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].json()["input"], serde_json::json!(["nyc"]));
    assert_eq!(requests[2].json()["input"], serde_json::json!(["gotham"]));
    Ok(())
}
