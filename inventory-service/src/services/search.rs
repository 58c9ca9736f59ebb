//! Elasticsearch collaborator: write-through indexing and full-text queries.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::resource::Page;

use crate::config::SearchConfig;
use crate::models::ItemResponse;

/// One ranked search match.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub score: f64,
    pub item: ItemResponse,
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    hits: RawHits,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: ItemResponse,
}

/// Build the query body sent to the search index.
fn build_query(q: &str, sku: Option<&str>, page: Page) -> Value {
    let mut query = json!({
        "bool": {
            "must": [{
                "multi_match": {
                    "query": q,
                    "fields": ["name^2", "description", "sku"]
                }
            }]
        }
    });

    if let Some(sku) = sku {
        query["bool"]["filter"] = json!([{ "term": { "sku.keyword": sku } }]);
    }

    json!({
        "from": page.offset(),
        "size": page.size(),
        "query": query,
    })
}

#[derive(Clone)]
pub struct SearchIndex {
    client: Client,
    base_url: String,
    index: String,
}

impl SearchIndex {
    pub fn new(settings: &SearchConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.url.trim_end_matches('/').to_string(),
            index: settings.index.clone(),
        }
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, id)
    }

    /// Index (or re-index) one item document under its id.
    pub async fn index_item(&self, item: &ItemResponse) -> Result<(), AppError> {
        let url = self.doc_url(&item.id);
        let response = self
            .client
            .put(&url)
            .json(item)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(anyhow::anyhow!("search index: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamError(anyhow::anyhow!(
                "search index returned {} for {}",
                response.status(),
                url
            )));
        }
        Ok(())
    }

    /// Remove one item document. Absence is not an error.
    pub async fn remove_item(&self, id: &str) -> Result<(), AppError> {
        let url = self.doc_url(id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(anyhow::anyhow!("search index: {}", e)))?;

        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(AppError::UpstreamError(anyhow::anyhow!(
                "search index returned {} for {}",
                response.status(),
                url
            )));
        }
        Ok(())
    }

    /// Run a ranked full-text query.
    pub async fn search(
        &self,
        q: &str,
        sku: Option<&str>,
        page: Page,
    ) -> Result<Vec<SearchHit>, AppError> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let body = build_query(q, sku, page);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Search request to {} failed: {}", url, e);
                AppError::UpstreamError(anyhow::anyhow!("search index: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamError(anyhow::anyhow!(
                "search index returned {}",
                response.status()
            )));
        }

        let parsed: RawSearchResponse = response.json().await.map_err(|e| {
            tracing::error!("Malformed search response: {}", e);
            AppError::UpstreamError(anyhow::anyhow!("malformed search response: {}", e))
        })?;

        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                score: hit.score.unwrap_or(0.0),
                item: hit.source,
            })
            .collect())
    }
}
