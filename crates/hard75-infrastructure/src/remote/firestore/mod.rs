mod wire;

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info};
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use hard75_domain::day_record::DayKey;
use hard75_domain::identity::Identity;
use hard75_domain::remote_log::{LogFeed, RemoteLogEntry, RemoteLogStore};
use hard75_domain::shared::DomainError;

use super::retry::{execute_with_retry, RetryConfig};
use crate::config::{RemoteConfig, TimeoutConfig};
use crate::ResultExt;

const USER_AGENT: &str = concat!("hard75/", env!("CARGO_PKG_VERSION"));

/// `RemoteLogStore` over the Firestore REST API.
///
/// REST has no push listener, so `watch` polls and emits only when the
/// snapshot differs from the last one it sent.
#[derive(Clone)]
pub struct FirestoreLogStore {
    client: Client,
    config: RemoteConfig,
    base_url: Url,
    retry_config: RetryConfig,
    poll_interval: Duration,
}

impl FirestoreLogStore {
    pub fn new(config: RemoteConfig, timeouts: &TimeoutConfig) -> Result<Self, DomainError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            DomainError::Config(format!("Invalid Firestore URL {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeouts.http_request)
            .build()
            .to_infra_err()?;

        info!(
            "[sync] firestore store ready project={} poll={:?}",
            config.project_id, timeouts.remote_poll
        );

        Ok(Self {
            client,
            config,
            base_url,
            retry_config: RetryConfig::default(),
            poll_interval: timeouts.remote_poll,
        })
    }

    fn endpoint(&self, relative: &str) -> Result<Url, DomainError> {
        self.base_url
            .join(&format!("{}{}", self.config.documents_root(), relative))
            .map_err(|e| DomainError::Config(format!("Invalid Firestore path: {}", e)))
    }

    fn document_name(&self, identity: &Identity, date: DayKey) -> String {
        format!(
            "{}/{}",
            self.config.documents_root(),
            wire::log_document_path(identity.uid.as_str(), date)
        )
    }

    fn authorize(&self, request: RequestBuilder, identity: &Identity) -> RequestBuilder {
        let mut request = request;
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &identity.id_token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn post_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        identity: &Identity,
        body: &Value,
    ) -> anyhow::Result<T> {
        let response = self
            .authorize(self.client.post(url.clone()), identity)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let parsed = serde_json::from_str(if text.trim().is_empty() { "null" } else { &text })?;
        Ok(parsed)
    }

    async fn delete_once(&self, url: &Url, identity: &Identity) -> anyhow::Result<()> {
        self.authorize(self.client.delete(url.clone()), identity)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl RemoteLogStore for FirestoreLogStore {
    async fn write_day(
        &self,
        identity: &Identity,
        date: DayKey,
        complete: bool,
    ) -> Result<(), DomainError> {
        let url = self.endpoint(":commit")?;
        let body = wire::commit_body(&self.document_name(identity, date), date, complete);

        execute_with_retry(&self.retry_config, "write_day", || {
            self.post_once::<IgnoredAny>(&url, identity, &body)
        })
        .await
        .to_remote_err("Write remote log")?;

        debug!(
            "[sync] wrote remote log uid={} date={} complete={}",
            identity.uid, date, complete
        );
        Ok(())
    }

    async fn delete_day(&self, identity: &Identity, date: DayKey) -> Result<(), DomainError> {
        let url = self.endpoint(&format!(
            "/{}",
            wire::log_document_path(identity.uid.as_str(), date)
        ))?;

        execute_with_retry(&self.retry_config, "delete_day", || {
            self.delete_once(&url, identity)
        })
        .await
        .to_remote_err("Delete remote log")?;

        debug!("[sync] deleted remote log uid={} date={}", identity.uid, date);
        Ok(())
    }

    async fn fetch_recent(
        &self,
        identity: &Identity,
        limit: usize,
    ) -> Result<Vec<RemoteLogEntry>, DomainError> {
        let url = self.endpoint(&format!("/users/{}:runQuery", identity.uid))?;
        let body = wire::recent_logs_query(limit);

        let items = execute_with_retry(&self.retry_config, "fetch_recent", || {
            self.post_once::<Vec<wire::RunQueryItem>>(&url, identity, &body)
        })
        .await
        .to_remote_err("Fetch remote logs")?;

        Ok(wire::entries_from_query(items))
    }

    async fn watch(&self, identity: &Identity, limit: usize) -> Result<LogFeed, DomainError> {
        let store = self.clone();
        let identity = identity.clone();
        let interval = self.poll_interval;

        let feed = futures::stream::unfold(
            (store, identity, None::<Vec<RemoteLogEntry>>),
            move |(store, identity, last)| async move {
                loop {
                    tokio::time::sleep(interval).await;
                    match store.fetch_recent(&identity, limit).await {
                        Ok(entries) if last.as_ref() == Some(&entries) => continue,
                        Ok(entries) => {
                            let next = Some(entries.clone());
                            return Some((Ok(entries), (store, identity, next)));
                        }
                        Err(e) => return Some((Err(e), (store, identity, last))),
                    }
                }
            },
        );

        Ok(feed.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FirestoreLogStore {
        let config = RemoteConfig::new("hard75").with_api_key("k");
        FirestoreLogStore::new(config, &TimeoutConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoints() {
        let store = store();
        assert_eq!(
            store.endpoint(":commit").unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/hard75/databases/(default)/documents:commit"
        );
        assert_eq!(
            store.endpoint("/users/u1:runQuery").unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/hard75/databases/(default)/documents/users/u1:runQuery"
        );
    }

    #[test]
    fn test_document_name() {
        let store = store();
        let date = DayKey::parse("2025-04-02").unwrap();
        assert_eq!(
            store.document_name(&Identity::new("u1"), date),
            "projects/hard75/databases/(default)/documents/users/u1/logs/2025-04-02"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = RemoteConfig::new("hard75").with_base_url("not a url");
        let err = FirestoreLogStore::new(config, &TimeoutConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::Config(_)));
    }
}
