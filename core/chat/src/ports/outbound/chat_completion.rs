//! チャット補完（ストリーミング）Outbound ポート
//!
//! テストでは StubCompletion で差し替え可能。

use common::error::Error;
use common::llm::{ChatRequest, DeltaStream};

/// リクエストを送って断片ストリームを受け取る能力
pub trait ChatCompletion: Send + Sync {
    /// 接続先は呼び出しごとに渡す（設定は操作のたびに読み直すため）。
    /// `api_key` が空なら認証ヘッダを付けない。
    fn open_stream(
        &self,
        endpoint_url: &str,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<Box<dyn DeltaStream>, Error>;
}
