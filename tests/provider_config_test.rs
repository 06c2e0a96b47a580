// Configuration to provider wiring
//
// Verifies that:
// 1. TOML sections and environment overrides produce the expected ModelConfig
// 2. The provider factory honors provider type, base_url and credentials
// 3. A session built from parsed config talks to the configured endpoint

use anyhow::Result;
use mockito::Matcher;
use std::collections::HashMap;
use tempfile::TempDir;

use otravoce::chat::ChatSession;
use otravoce::classify::Language;
use otravoce::config::{apply_env, parse_config};
use otravoce::crisis::{connection_error_message, RiskAssessor};
use otravoce::providers::create_provider;
use otravoce::store::{LocalStorage, Sender};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_custom_provider_from_toml() -> Result<()> {
    let config = parse_config(
        r#"
        [model]
        provider = "custom"
        api_key = "local-key"
        base_url = "http://localhost:9999"
        model = "tiny"
        "#,
    )?;

    let provider = create_provider(&config.model)?;
    assert_eq!(provider.name(), "custom");
    assert_eq!(provider.default_model(), "tiny");
    Ok(())
}

#[test]
fn test_env_key_enables_provider() -> Result<()> {
    let mut config = parse_config("")?;
    assert!(create_provider(&config.model).is_err());

    apply_env(&mut config, env(&[("GROQ_API_KEY", "gsk-from-env")]));
    let provider = create_provider(&config.model)?;
    assert_eq!(provider.name(), "groq");
    Ok(())
}

#[test]
fn test_blank_env_key_is_ignored() -> Result<()> {
    let mut config = parse_config("[model]\napi_key = \"from-file\"\n")?;
    apply_env(&mut config, env(&[("GROQ_API_KEY", "   ")]));
    assert_eq!(config.model.api_key.as_deref(), Some("from-file"));
    Ok(())
}

#[test]
fn test_missing_key_error_explains_fix() {
    let config = parse_config("[model]\nprovider = \"openai\"\n").unwrap();
    let err = create_provider(&config.model).err().unwrap().to_string();
    assert!(err.contains("openai"));
    assert!(err.contains("GROQ_API_KEY"));
}

#[test]
fn test_custom_without_base_url_fails() {
    let config = parse_config("[model]\nprovider = \"custom\"\napi_key = \"k\"\n").unwrap();
    assert!(create_provider(&config.model).is_err());
}

#[tokio::test]
async fn test_session_uses_configured_endpoint() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "tiny",
            "max_tokens": 200,
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"c1","model":"tiny","choices":[{"index":0,"message":{"role":"assistant","content":"Halo juga, aku di sini."},"finish_reason":"stop"}]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let config = parse_config(&format!(
        "[model]\nprovider = \"custom\"\napi_key = \"test-key\"\nbase_url = \"{}\"\nmodel = \"tiny\"\nmax_tokens = 200\n",
        server.url()
    ))?;

    let dir = TempDir::new()?;
    let provider = create_provider(&config.model)?;
    let mut session = ChatSession::open(
        LocalStorage::new(dir.path()),
        config.model.clone(),
        RiskAssessor::default(),
    )
    .with_provider(provider);

    let reply = session
        .send_message("halo, aku mau cerita soal kuliah")
        .await?
        .expect("a reply");

    mock.assert_async().await;
    assert_eq!(reply.sender, Sender::Ai);
    assert!(reply.content.starts_with("Halo juga, aku di sini."));
    assert_eq!(session.messages().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_server_error_becomes_apology() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .with_body("unavailable")
        .expect(1)
        .create_async()
        .await;

    let config = parse_config(&format!(
        "[model]\nprovider = \"custom\"\napi_key = \"test-key\"\nbase_url = \"{}\"\n",
        server.url()
    ))?;

    let dir = TempDir::new()?;
    let mut session = ChatSession::open(
        LocalStorage::new(dir.path()),
        config.model.clone(),
        RiskAssessor::default(),
    )
    .with_provider(create_provider(&config.model)?);

    let reply = session
        .send_message("I want to talk about my exams")
        .await?
        .expect("a reply");

    mock.assert_async().await;
    assert_eq!(reply.content, connection_error_message(Language::English));
    Ok(())
}
