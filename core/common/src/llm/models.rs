//! モデル一覧の取得方法（2 種類のエンドポイント形）
//!
//! `<host>:11434` の平文 HTTP はローカル推論サーバとみなして `/api/tags` を、
//! それ以外はクラウド型の `/models`（Bearer 認証）を問い合わせる。
//! どのプロバイダでも通用する判定ではなく、あくまでこの 2 形の振り分け。

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;

/// モデル一覧取得のタイムアウト
pub const LISTING_TIMEOUT: Duration = Duration::from_secs(10);

const LOCAL_PREFIX: &str = "http://localhost:11434";

fn local_server_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^http://[a-zA-Z0-9.-]+:11434$").expect("static regex must compile")
    })
}

/// 一覧エンドポイントの形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStyle {
    /// `GET /api/tags` → `{"models":[{"name":...}]}`
    Tags,
    /// `GET /models` → `{"data":[{"id":...}]}`
    Models,
}

impl ListingStyle {
    /// エンドポイント URL から一覧の形を決める
    pub fn for_endpoint(endpoint_url: &str) -> Self {
        if endpoint_url.starts_with(LOCAL_PREFIX) || local_server_pattern().is_match(endpoint_url) {
            Self::Tags
        } else {
            Self::Models
        }
    }
}

/// API キーが必要なエンドポイントか（ローカル推論サーバ形では不要）
pub fn requires_api_key(endpoint_url: &str) -> bool {
    !local_server_pattern().is_match(endpoint_url)
}

/// 発行すべき一覧リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub style: ListingStyle,
    pub url: String,
    /// Authorization: Bearer に載せるトークン（Tags 形では常に None）
    pub bearer: Option<String>,
}

impl ListingRequest {
    pub fn plan(endpoint_url: &str, api_key: &str) -> Self {
        let base = endpoint_url.trim_end_matches('/');
        match ListingStyle::for_endpoint(endpoint_url) {
            ListingStyle::Tags => Self {
                style: ListingStyle::Tags,
                url: format!("{}/api/tags", base),
                bearer: None,
            },
            ListingStyle::Models => Self {
                style: ListingStyle::Models,
                url: format!("{}/models", base),
                bearer: Some(api_key.trim())
                    .filter(|k| !k.is_empty())
                    .map(str::to_string),
            },
        }
    }

    /// 応答 JSON からモデル ID を取り出し、辞書順に並べる
    pub fn extract_ids(&self, body: &Value) -> Vec<String> {
        let (key, field) = match self.style {
            ListingStyle::Tags => ("models", "name"),
            ListingStyle::Models => ("data", "id"),
        };
        let mut ids: Vec<String> = body[key]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|m| m[field].as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        ids.sort();
        ids
    }
}
