//! reqwest（blocking）による HttpGetJson 実装

use crate::error::Error;
use crate::ports::outbound::HttpGetJson;
use serde_json::Value;
use std::time::Duration;

/// reqwest::blocking で GET して JSON を返す
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttp;

impl HttpGetJson for ReqwestHttp {
    fn get_json(&self, url: &str, bearer: Option<&str>, timeout: Duration) -> Result<Value, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::discovery(format!("Failed to build HTTP client: {}", e)))?;

        let mut builder = client.get(url);
        if let Some(token) = bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = builder
            .send()
            .map_err(|e| Error::discovery(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::discovery(format!("Failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(Error::discovery(format!("HTTP {} from {}: {}", status, url, body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::discovery(format!("Failed to parse response JSON: {}", e)))
    }
}
