// Remote copy of user messages
//
// Every user message is inserted into a hosted table (Supabase REST). The
// insert runs detached from the chat flow: failures are logged and never
// reach the user.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::MirrorConfig;

#[async_trait]
pub trait MessageMirror: Send + Sync {
    /// Insert one user message
    async fn insert(&self, text: &str) -> Result<()>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Spawn the insert as a background task
///
/// The returned handle may be dropped; the task keeps running.
pub fn mirror_detached(mirror: Arc<dyn MessageMirror>, text: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        match mirror.insert(&text).await {
            Ok(()) => tracing::debug!("Mirrored user message to {}", mirror.name()),
            Err(e) => tracing::error!("Failed to mirror user message to {}: {:#}", mirror.name(), e),
        }
    })
}

/// Build the configured mirror, or a no-op when none is configured
pub fn create_mirror(config: Option<&MirrorConfig>) -> Result<Arc<dyn MessageMirror>> {
    match config {
        Some(config) => Ok(Arc::new(SupabaseMirror::new(config)?)),
        None => Ok(Arc::new(NoopMirror)),
    }
}

#[derive(Serialize)]
struct InsertRow<'a> {
    user_message: &'a str,
}

/// Supabase REST insert: `POST {url}/rest/v1/{table}`
pub struct SupabaseMirror {
    client: Client,
    url: String,
    api_key: String,
    table: String,
}

impl SupabaseMirror {
    pub fn new(config: &MirrorConfig) -> Result<Self> {
        let client = Client::builder().build().context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }
}

#[async_trait]
impl MessageMirror for SupabaseMirror {
    async fn insert(&self, text: &str) -> Result<()> {
        let rows = [InsertRow { user_message: text }];

        let response = self
            .client
            .post(self.endpoint())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Insert into '{}' failed ({}): {}", self.table, status, body);
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "supabase"
    }
}

/// Mirror used when no remote table is configured
#[derive(Debug, Default)]
pub struct NoopMirror;

#[async_trait]
impl MessageMirror for NoopMirror {
    async fn insert(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config_for(url: String) -> MirrorConfig {
        MirrorConfig {
            url,
            api_key: "anon-key".to_string(),
            table: "user_responses".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_request_shape() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/user_responses")
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .match_body(Matcher::Json(serde_json::json!([{ "user_message": "halo" }])))
            .with_status(201)
            .create_async()
            .await;

        let mirror = SupabaseMirror::new(&config_for(server.url())).unwrap();
        mirror.insert("halo").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_insert_failure_is_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/user_responses")
            .with_status(401)
            .with_body("{\"message\":\"Invalid API key\"}")
            .expect(1)
            .create_async()
            .await;

        let mirror = SupabaseMirror::new(&config_for(server.url())).unwrap();
        let err = mirror.insert("halo").await.unwrap_err();
        assert!(err.to_string().contains("401"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_detached_failure_does_not_panic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/user_responses")
            .with_status(500)
            .create_async()
            .await;

        let mirror = create_mirror(Some(&config_for(server.url()))).unwrap();
        let handle = mirror_detached(mirror, "halo".to_string());
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_noop_when_unconfigured() {
        let mirror = create_mirror(None).unwrap();
        assert_eq!(mirror.name(), "none");
        assert!(mirror.insert("anything").await.is_ok());
    }
}
