//! DataDash REST API Client
//!
//! HTTP client for the DataDash backend. No retry, caching or offline
//! queue: a failed call is returned to the caller, which decides how to
//! surface it.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::error::{ClientError, ClientResult};
use super::query::{AlertQuery, SeriesQuery};
use super::DashboardApi;
use crate::model::{Alert, AlertUpdate, ChartData, DataPoint, NewAlert, Paginated, SummaryData};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Configuration for the DataDash client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl From<&crate::config::ApiConfig> for ClientConfig {
    fn from(api: &crate::config::ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            request_timeout_ms: api.request_timeout_secs.saturating_mul(1000),
        }
    }
}

/// DataDash REST API client
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    config: ClientConfig,
}

impl DashboardClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    /// Send a request, tagging it with a request id and mapping failures
    async fn send(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> ClientResult<Response> {
        let request_id = Uuid::new_v4().to_string();

        let response = builder
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(%request_id, %method, path, error = %e, "DataDash request failed");
                ClientError::from_transport(e)
            })?;

        let status = response.status();
        tracing::debug!(%request_id, %method, path, status = status.as_u16(), "DataDash response");

        if status.is_success() {
            Ok(response)
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::ApiError {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    async fn fetch_json<T>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, builder).await?;
        response.json().await.map_err(ClientError::from_transport)
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        self.fetch_json(Method::GET, path, builder).await
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(method.clone(), path).json(body);
        self.fetch_json(method, path, builder).await
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn list_data_points(&self, query: &SeriesQuery) -> ClientResult<Paginated<DataPoint>> {
        self.get_json("/api/datapoints/", query).await
    }

    async fn chart_data(&self, query: &SeriesQuery) -> ClientResult<Vec<ChartData>> {
        self.get_json("/api/datapoints/chart_data/", query).await
    }

    async fn summary(&self) -> ClientResult<Vec<SummaryData>> {
        let path = "/api/datapoints/summary/";
        let builder = self.request(Method::GET, path);
        self.fetch_json(Method::GET, path, builder).await
    }

    async fn list_alerts(&self, query: &AlertQuery) -> ClientResult<Paginated<Alert>> {
        self.get_json("/api/alerts/", query).await
    }

    async fn create_alert(&self, alert: &NewAlert) -> ClientResult<Alert> {
        self.send_json(Method::POST, "/api/alerts/", alert).await
    }

    async fn update_alert(&self, id: i64, update: &AlertUpdate) -> ClientResult<Alert> {
        let path = format!("/api/alerts/{}/", id);
        self.send_json(Method::PATCH, &path, update).await
    }

    async fn delete_alert(&self, id: i64) -> ClientResult<()> {
        let path = format!("/api/alerts/{}/", id);
        let builder = self.request(Method::DELETE, &path);
        self.send(Method::DELETE, &path, builder).await?;
        Ok(())
    }
}
