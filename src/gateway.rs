use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::api_url;
use crate::error::RequestFailed;
use crate::model::{LanguageRecord, SearchResult, SubscribeAck, TextRecord};

/// Gateway to the archive API. Cacheable resources (languages, featured
/// texts, text-by-id) go through an in-memory cache keyed by logical
/// resource name; once populated a key is never invalidated or refreshed
/// for the lifetime of the gateway. Search and newsletter subscription
/// always reach the network.
pub struct DataGateway {
    base_url: String,
    client: Client,
    cache: Mutex<HashMap<String, Value>>,
}

impl DataGateway {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("grantha/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        DataGateway {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Cache-then-network fetch. The cache is consulted by exact key match
    /// only; a successful fetch writes exactly one entry before returning.
    /// Two in-flight fetches for the same key both reach the network and
    /// the cache keeps whichever completion writes last.
    pub async fn fetch_resource(&self, key: &str, path: &str) -> Result<Value, RequestFailed> {
        if let Some(hit) = self.cached(key) {
            debug!(key, "cache hit");
            return Ok(hit);
        }

        let data = self.get_json(key, path).await?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key.to_string(), data.clone());
        }
        Ok(data)
    }

    pub async fn fetch_languages(&self) -> Result<Vec<LanguageRecord>, RequestFailed> {
        let data = self.fetch_resource("languages", "/languages").await?;
        decode("languages", data)
    }

    pub async fn fetch_featured_texts(&self) -> Result<Vec<TextRecord>, RequestFailed> {
        let data = self.fetch_resource("featured-texts", "/texts/featured").await?;
        decode("featured-texts", data)
    }

    pub async fn fetch_text_by_id(&self, id: &str) -> Result<TextRecord, RequestFailed> {
        let key = format!("text-{}", id);
        let path = format!("/texts/{}", id);
        let data = self.fetch_resource(&key, &path).await?;
        decode(&key, data)
    }

    /// Never cached.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, RequestFailed> {
        let path = format!("/search?q={}", urlencoding::encode(query));
        let data = self.get_json("search", &path).await?;
        decode("search", data)
    }

    /// Never cached.
    pub async fn subscribe(&self, email: &str) -> Result<SubscribeAck, RequestFailed> {
        let url = api_url(&self.base_url, "/newsletter/subscribe");
        debug!(%url, "subscribing");
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| RequestFailed::transport("subscribe", e))?;

        if !response.status().is_success() {
            return Err(RequestFailed::http("subscribe", response.status().as_u16()));
        }

        response
            .json::<SubscribeAck>()
            .await
            .map_err(|e| RequestFailed::transport("subscribe", e))
    }

    async fn get_json(&self, resource: &str, path: &str) -> Result<Value, RequestFailed> {
        let url = api_url(&self.base_url, path);
        debug!(resource, %url, "fetching");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RequestFailed::transport(resource, e))?;

        if !response.status().is_success() {
            return Err(RequestFailed::http(resource, response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RequestFailed::transport(resource, e))
    }

    fn cached(&self, key: &str) -> Option<Value> {
        self.cache.lock().ok()?.get(key).cloned()
    }
}

fn decode<T: DeserializeOwned>(resource: &str, data: Value) -> Result<T, RequestFailed> {
    serde_json::from_value(data).map_err(|e| RequestFailed::transport(resource, e))
}
