//! OpenAI Chat Completions 互換 (/v1/chat/completions) プロバイダ
//!
//! base_url で任意のエンドポイントを指定可能。SSE の `data:` 行を 1 断片ずつ読み進める。

use crate::error::Error;
use crate::llm::provider::{ChatRequest, DeltaStream, LlmProvider};
use serde_json::Value;
use std::io::{BufRead, BufReader};

/// OpenAI Chat Completions 互換プロバイダ
pub struct OpenAiCompatProvider {
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `base_url` - ベース URL（末尾の `/` は除去し、`/v1` で終わらなければ付け足す）
    /// * `api_key` - 空文字列のときは Authorization を付けない
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        let mut base = base_url.trim_end_matches('/').to_string();
        if !base.ends_with("/v1") {
            base.push_str("/v1");
        }
        Self {
            base_url: base,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn auth_header(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| format!("Bearer {}", key))
    }
}

impl LlmProvider for OpenAiCompatProvider {
    fn open_stream(&self, request: &ChatRequest) -> Result<Box<dyn DeltaStream>, Error> {
        let body = serde_json::to_string(request)
            .map_err(|e| Error::stream(format!("Failed to serialize request: {}", e)))?;

        // 生成が終わるまで待つため、ストリームにはタイムアウトを設けない
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| Error::stream(format!("Failed to build HTTP client: {}", e)))?;

        let mut builder = client
            .post(self.url())
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .body(body);

        if let Some(auth) = self.auth_header() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .map_err(|e| Error::stream(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response
                .text()
                .map_err(|e| Error::stream(format!("Failed to read response: {}", e)))?;
            let error_msg = if let Ok(v) = serde_json::from_str::<Value>(&response_text) {
                v["error"]["message"]
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("HTTP {}: {}", status, response_text))
            } else {
                format!("HTTP {}: {}", status, response_text)
            };
            return Err(Error::stream(format!("Chat completions error: {}", error_msg)));
        }

        Ok(Box::new(SseDeltaStream::new(BufReader::new(response))))
    }
}

/// SSE 本文から content 断片を 1 つずつ取り出す DeltaStream
///
/// reader を手放した時点（終端・失敗・stop）で以降は常に None。
pub struct SseDeltaStream<R> {
    reader: Option<R>,
}

impl<R: BufRead + Send> SseDeltaStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<R: BufRead + Send> DeltaStream for SseDeltaStream<R> {
    fn next_delta(&mut self) -> Option<Result<String, Error>> {
        loop {
            let reader = self.reader.as_mut()?;
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.reader = None;
                    return Some(Err(Error::stream(format!(
                        "Failed to read stream line: {}",
                        e
                    ))));
                }
            }

            let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
            let data = match line.strip_prefix("data:") {
                Some(d) => d.trim(),
                None => continue,
            };
            if data == "[DONE]" {
                self.reader = None;
                return None;
            }

            match parse_chunk(data) {
                Ok(Some(text)) => return Some(Ok(text)),
                Ok(None) => continue,
                Err(e) => {
                    self.reader = None;
                    return Some(Err(e));
                }
            }
        }
    }

    fn stop(&mut self) {
        self.reader = None;
    }
}

/// `data:` 1 行分の JSON から choices[0].delta.content を取り出す。
/// choices を持たないチャンク（usage のみ等）は Ok(None)。
fn parse_chunk(data: &str) -> Result<Option<String>, Error> {
    let v: Value = serde_json::from_str(data)
        .map_err(|e| Error::stream(format!("Malformed stream chunk: {}", e)))?;

    if let Some(err) = v.get("error") {
        let msg = err["message"].as_str().unwrap_or("Unknown error");
        return Err(Error::stream(format!("API error: {}", msg)));
    }

    let delta = match v["choices"].get(0).and_then(|c| c.get("delta")) {
        Some(d) => d,
        None => return Ok(None),
    };

    // content: 文字列のほか、content parts 配列にも対応。null は空の断片
    let text = match &delta["content"] {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<String>(),
        _ => String::new(),
    };
    Ok(Some(text))
}
