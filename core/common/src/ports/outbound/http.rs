//! HTTP GET（JSON 応答）Outbound ポート
//!
//! モデル一覧の取得に使う。テストではリクエストを記録するスタブに差し替える。

use crate::error::Error;
use serde_json::Value;
use std::time::Duration;

/// JSON を返す GET を発行する能力
pub trait HttpGetJson: Send + Sync {
    /// `bearer` があれば `Authorization: Bearer <token>` を付ける。
    /// 通信失敗・エラーステータス・JSON 不正はすべて Err（Error::Discovery）。
    fn get_json(&self, url: &str, bearer: Option<&str>, timeout: Duration) -> Result<Value, Error>;
}
