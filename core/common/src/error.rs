//! エラーハンドリング
//!
//! 失敗の種類（探索・永続化・ストリーム・不変条件違反など）を 1 つの enum で表し、
//! CLI はここから終了コードを決める。

/// エラー型
///
/// 各バリアントはメッセージ文字列のみを持つ。呼び出し側は `with_context` で文脈を足す。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 引数不正（使い方の誤り）
    #[error("{0}")]
    InvalidArgument(String),
    /// モデル一覧の取得失敗（空リスト扱いで継続する）
    #[error("Could not fetch models: {0}")]
    Discovery(String),
    /// 設定・チャット索引・メッセージログの読み書き失敗
    #[error("{0}")]
    Persistence(String),
    /// ストリーミング中の通信・プロバイダ側の失敗
    #[error("{0}")]
    Stream(String),
    /// 呼び出し規約違反（正しく使われていれば起きない）
    #[error("Invariant violation: {0}")]
    Invariant(String),
    /// 環境変数からの解決失敗
    #[error("{0}")]
    Env(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// I/O 由来の永続化エラー
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// JSON の読み書きに失敗した永続化エラー
    pub fn json(msg: impl Into<String>) -> Self {
        Self::Persistence(format!("JSON error: {}", msg.into()))
    }

    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// メッセージ本体（Display の接頭辞を含まない）
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(m)
            | Self::Discovery(m)
            | Self::Persistence(m)
            | Self::Stream(m)
            | Self::Invariant(m)
            | Self::Env(m) => m,
        }
    }

    /// 種別を保ったままメッセージの先頭に文脈を付ける
    pub fn with_context(self, ctx: impl AsRef<str>) -> Self {
        let ctx = ctx.as_ref();
        let wrap = |m: String| format!("{}: {}", ctx, m);
        match self {
            Self::InvalidArgument(m) => Self::InvalidArgument(wrap(m)),
            Self::Discovery(m) => Self::Discovery(wrap(m)),
            Self::Persistence(m) => Self::Persistence(wrap(m)),
            Self::Stream(m) => Self::Stream(wrap(m)),
            Self::Invariant(m) => Self::Invariant(wrap(m)),
            Self::Env(m) => Self::Env(wrap(m)),
        }
    }

    /// 使い方の誤りか（CLI が usage を表示するかの判定）
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// sysexits.h に合わせた終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Discovery(_) => 69,
            Self::Stream(_) => 69,
            Self::Invariant(_) => 70,
            Self::Persistence(_) => 74,
            Self::Env(_) => 78,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::invalid_argument("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 64);
        assert!(err.is_usage());

        let err = Error::invariant("test");
        assert_eq!(err.exit_code(), 70);
        assert!(!err.is_usage());
    }

    #[test]
    fn test_discovery_display_has_prefix() {
        let err = Error::discovery("connection refused");
        assert_eq!(err.to_string(), "Could not fetch models: connection refused");
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn test_with_context_keeps_kind() {
        let err = Error::io_msg("disk full").with_context("save index");
        assert!(matches!(err, Error::Persistence(ref m) if m == "save index: disk full"));
        assert_eq!(err.exit_code(), 74);
    }
}
