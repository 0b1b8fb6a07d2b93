// tests/cli_flow.rs

use evrythng::{
    cli::{self, catalog::builtin_registry, handlers::Invocation},
    constants::API_KEY_LENGTH,
    core::switches::SwitchError,
    models::{CliConfig, KeyEntry, Outcome},
    state::ConfigState,
    system::prompt::ScriptedPrompt,
};
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Helpers ---

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn api_key() -> String {
    "k".repeat(API_KEY_LENGTH)
}

/// A configuration whose active key points at the mock server.
fn config_for(server: &MockServer) -> ConfigState {
    let mut config = CliConfig::default();
    config.regions.insert("mock".to_string(), server.uri());
    config.keys.insert(
        "test".to_string(),
        KeyEntry {
            api_key: api_key(),
            region: "mock".to_string(),
        },
    );
    config.using = "test".to_string();
    ConfigState::new(PathBuf::from("unused.toml"), config)
}

async fn run_line(line: &[&str], config: &mut ConfigState, prompt: &ScriptedPrompt) -> (anyhow::Result<Outcome>, String) {
    let registry = builtin_registry().unwrap();
    let mut out = Vec::new();
    let result = {
        let mut inv = Invocation { config, prompt, out: &mut out };
        cli::run(&args(line), &registry, &mut inv).await
    };
    (result, String::from_utf8(out).unwrap())
}

// --- Requests ---

#[tokio::test]
async fn test_list_with_per_page_prints_pretty_json() {
    let server = MockServer::start().await;
    let products = json!([{"id": "U5hk8aQ8s7e3tYwwR3f8Nbgp", "name": "Fridge"}]);
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("perPage", "5"))
        .and(header("authorization", api_key().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(products.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    let prompt = ScriptedPrompt::new();
    let (result, printed) = run_line(&["products", "list", "--per-page", "5"], &mut config, &prompt).await;

    assert_eq!(result.unwrap(), Outcome::Completed(products.clone()));
    assert!(printed.contains(&serde_json::to_string_pretty(&products).unwrap()));
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.options.no_confirm = false;
    let prompt = ScriptedPrompt::new().with_confirmations(&[false]);
    let (result, printed) = run_line(&["thngs", "abc123", "delete"], &mut config, &prompt).await;

    assert_eq!(result.unwrap(), Outcome::Declined);
    assert!(printed.contains("Cancelled"));
}

#[tokio::test]
async fn test_confirmed_delete_reports_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/thngs/abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.options.no_confirm = false;
    let prompt = ScriptedPrompt::new().with_confirmations(&[true]);
    let (result, printed) = run_line(&["t", "abc123", "d"], &mut config, &prompt).await;

    // `d` is not a shorthand for delete.
    assert!(result.is_err());
    assert!(!printed.contains("Deleted"));

    let (result, printed) = run_line(&["t", "abc123", "delete"], &mut config, &prompt).await;
    assert_eq!(result.unwrap(), Outcome::Completed(Value::Null));
    assert!(printed.contains("Deleted /thngs/abc123"));
}

#[tokio::test]
async fn test_create_posts_payload_and_field_selects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/thngs"))
        .and(body_json(json!({"name": "Pallet"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "UkxCQSHYGqBwQ2wwRhg4XbPr", "name": "Pallet"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    let prompt = ScriptedPrompt::new();
    let (result, printed) = run_line(
        &["thngs", "create", r#"{"name":"Pallet"}"#, "--field", "id"],
        &mut config,
        &prompt,
    )
    .await;

    assert_eq!(result.unwrap(), Outcome::Completed(json!("UkxCQSHYGqBwQ2wwRhg4XbPr")));
    assert!(printed.contains("UkxCQSHYGqBwQ2wwRhg4XbPr"));
}

#[tokio::test]
async fn test_api_error_surfaces_first_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/thngs/UkxCQSHYGqBwQ2wwRhg4XbPr"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "errors": ["The thng was not found."]
        })))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    let prompt = ScriptedPrompt::new();
    let (result, _) = run_line(&["thngs", "UkxCQSHYGqBwQ2wwRhg4XbPr", "read"], &mut config, &prompt).await;

    let message = result.unwrap_err().to_string();
    assert_eq!(message, "API Error (404): The thng was not found.");
}

#[tokio::test]
async fn test_import_from_json_creates_each_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "U5hk8aQ8s7e3tYwwR3f8Nbgp"})))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let file = dir.path().join("products.json");
    std::fs::write(&file, r#"[{"name": "One"}, {"name": "Two"}]"#).unwrap();

    let mut config = config_for(&server);
    let prompt = ScriptedPrompt::new();
    let file_arg = file.to_string_lossy().to_string();
    let (result, printed) = run_line(&["products", "create", "--from-json", &file_arg], &mut config, &prompt).await;

    assert!(matches!(result.unwrap(), Outcome::Completed(Value::Array(items)) if items.len() == 2));
    assert!(printed.contains("Created 2 resources."));
}

// --- Failures before any request ---

#[tokio::test]
async fn test_bogus_flag_fails_before_dispatch() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    let prompt = ScriptedPrompt::new();
    let (result, _) = run_line(&["--bogus-flag"], &mut config, &prompt).await;

    let error = result.unwrap_err();
    assert_eq!(
        error.downcast_ref::<SwitchError>(),
        Some(&SwitchError::Invalid("--bogus-flag".to_string()))
    );
}

#[tokio::test]
async fn test_missing_key_is_reported() {
    let mut config = ConfigState::new(PathBuf::from("unused.toml"), CliConfig::default());
    let prompt = ScriptedPrompt::new();
    let (result, _) = run_line(&["thngs", "list"], &mut config, &prompt).await;
    assert!(result.is_err());
}
