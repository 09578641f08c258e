//! モデル一覧の取得（tags 形 / models 形の振り分け）

use common::domain::ModelName;
use common::error::Error;
use common::llm::models::LISTING_TIMEOUT;
use common::llm::ListingRequest;
use common::ports::outbound::{now_iso8601, HttpGetJson, Log, LogLevel, LogRecord};
use std::sync::Arc;

#[derive(Clone)]
pub struct ModelDirectory {
    http: Arc<dyn HttpGetJson>,
    log: Arc<dyn Log>,
}

impl ModelDirectory {
    pub fn new(http: Arc<dyn HttpGetJson>, log: Arc<dyn Log>) -> Self {
        Self { http, log }
    }

    /// 辞書順のモデル ID 一覧。失敗はすべて Error::Discovery（呼び出し側は空一覧で続行する）
    pub fn list_models(&self, endpoint_url: &str, api_key: &str) -> Result<Vec<ModelName>, Error> {
        let result = self.fetch(endpoint_url, api_key);
        if let Err(ref e) = result {
            let _ = self.log.log(&LogRecord {
                ts: now_iso8601(),
                level: LogLevel::Warn,
                message: e.to_string(),
                layer: Some("usecase".to_string()),
                kind: Some("error".to_string()),
                fields: None,
            });
        }
        result
    }

    fn fetch(&self, endpoint_url: &str, api_key: &str) -> Result<Vec<ModelName>, Error> {
        let endpoint_url = endpoint_url.trim();
        if endpoint_url.is_empty() {
            return Err(Error::discovery("endpoint URL is not set"));
        }
        let request = ListingRequest::plan(endpoint_url, api_key);
        let body = self
            .http
            .get_json(&request.url, request.bearer.as_deref(), LISTING_TIMEOUT)?;
        Ok(request
            .extract_ids(&body)
            .into_iter()
            .map(ModelName::from)
            .collect())
    }
}
