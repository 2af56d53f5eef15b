//! Catalog service HTTP client

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{CatalogError, Result};
use super::models::*;
use super::Catalog;
use crate::utils::normalize_path;

/// HTTP client for the catalog REST API
#[derive(Clone)]
pub struct CatalogClient {
    base_url: Url,
    http_client: Client,
}

// FastAPI error body
#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

impl CatalogClient {
    /// Create a new catalog client for a server root such as `http://127.0.0.1:8000`
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = base_url.trim().trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)
            .map_err(|e| CatalogError::Validation(format!("bad server URL {:?}: {}", base_url, e)))?;

        let http_client = Client::builder()
            .user_agent(concat!("albumnav/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(CatalogError::Transport)?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an absolute URL under `/api/`
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("api");
            for part in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(part);
            }
        }
        url
    }

    /// Build the album listing URL for one of the in-memory scopes
    fn albums_url(&self, scope: &str, parent: Option<&str>, keyword: &str) -> Url {
        let mut url = self.endpoint("albums");
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("scope", scope);
            if scope == "children" {
                query.append_pair("sort_by", "name");
                query.append_pair("order", "asc");
            }
            if let Some(parent) = parent.map(normalize_path).filter(|p| !p.is_empty()) {
                query.append_pair("parent_path", &parent);
            }
            let keyword = keyword.trim();
            if !keyword.is_empty() {
                query.append_pair("keyword", keyword);
            }
        }
        url
    }

    /// URL of the server-sent event stream
    pub fn events_url(&self) -> Url {
        self.endpoint("events/stream")
    }

    /// URL of an album's cover thumbnail
    pub fn cover_url(&self, id: i64, width: u32, height: u32, fit: CoverFit) -> Url {
        let mut url = self.endpoint(&format!("albums/{}/cover", id));
        url.query_pairs_mut()
            .append_pair("w", &width.to_string())
            .append_pair("h", &height.to_string())
            .append_pair("fit", fit.as_str());
        url
    }

    /// Test connection to the catalog server
    pub async fn health(&self) -> Result<()> {
        let url = self.endpoint("health");
        let response: HealthResponse = self.get_json(url.clone()).await?;
        if response.status == "ok" {
            Ok(())
        } else {
            Err(CatalogError::decode(
                url.path(),
                format!("unexpected health status {:?}", response.status),
            ))
        }
    }

    /// Fetch the server's runtime settings
    pub async fn settings(&self) -> Result<ServerSettings> {
        self.get_json(self.endpoint("settings")).await
    }

    /// Download a cover thumbnail
    pub async fn fetch_cover(&self, id: i64, width: u32, height: u32, fit: CoverFit) -> Result<Bytes> {
        let url = self.cover_url(id, width, height, fit);
        debug!("Fetching cover {}: {}", id, url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(CatalogError::Transport)?;
        let response = Self::error_for_status(response).await?;

        response.bytes().await.map_err(CatalogError::Transport)
    }

    /// Return the open connection to the event stream
    pub async fn open_event_stream(&self) -> Result<Response> {
        let url = self.events_url();
        debug!("Connecting to event stream: {}", url);

        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(CatalogError::Transport)?;
        Self::error_for_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(CatalogError::Transport)?;
        Self::read_json(url, response).await
    }

    async fn read_json<T: DeserializeOwned>(url: Url, response: Response) -> Result<T> {
        let response = Self::error_for_status(response).await?;
        let body = response.text().await.map_err(CatalogError::Transport)?;
        serde_json::from_str(&body).map_err(|e| CatalogError::decode(url.path(), e))
    }

    /// Turn a non-success response into [`CatalogError::Status`]
    async fn error_for_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorDetail>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        Err(CatalogError::Status { status, body })
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn fetch_tree(&self, parent: Option<&str>, keyword: &str) -> Result<Vec<TreeNode>> {
        let url = self.albums_url("tree", parent, keyword);
        let response: TreeResponse = self.get_json(url).await?;
        debug!("Tree returned {} root nodes", response.items.len());
        Ok(response.items)
    }

    async fn fetch_children(&self, parent: Option<&str>, keyword: &str) -> Result<GridSnapshot> {
        let url = self.albums_url("children", parent, keyword);
        let grid: GridSnapshot = self.get_json(url).await?;
        debug!(
            "Children returned {} items ({} ancestors)",
            grid.items.len(),
            grid.ancestors.len()
        );
        Ok(grid)
    }

    async fn submit_scan(&self, paths: &[String], recursive: bool) -> Result<()> {
        if paths.is_empty() {
            return Err(CatalogError::Validation("no paths to scan".into()));
        }

        let url = self.endpoint("albums/scan");
        debug!("POST {} ({} paths, recursive={})", url, paths.len(), recursive);

        let response = self
            .http_client
            .post(url)
            .json(&ScanRequest::new(paths.to_vec(), recursive))
            .send()
            .await
            .map_err(CatalogError::Transport)?;
        Self::error_for_status(response).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<RefreshSummary> {
        let url = self.endpoint("albums/refresh");
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(url.clone())
            .send()
            .await
            .map_err(CatalogError::Transport)?;
        Self::read_json(url, response).await
    }

    async fn delete_album(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&format!("albums/{}", id));
        debug!("DELETE {}", url);

        let response = self
            .http_client
            .delete(url)
            .send()
            .await
            .map_err(CatalogError::Transport)?;
        Self::error_for_status(response).await?;
        Ok(())
    }
}
