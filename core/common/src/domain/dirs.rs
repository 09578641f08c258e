//! 実行時ディレクトリ（CHAT_HOME / XDG 解決結果）
//!
//! EnvResolver::resolve_dirs() で取得し、設定・チャット・ログのパス計算に使う。

use super::HomeDir;
use std::path::PathBuf;

const SETTINGS_FILENAME: &str = "settings.json";
const LOG_FILENAME: &str = "chat.jsonl";

/// ホーム配下の各種パス
#[derive(Debug, Clone)]
pub struct Dirs {
    pub home: HomeDir,
}

impl Dirs {
    pub fn new(home: HomeDir) -> Self {
        Self { home }
    }

    /// 設定ファイル（settings.json）
    pub fn settings_path(&self) -> PathBuf {
        self.home.join(SETTINGS_FILENAME)
    }

    /// チャット索引とメッセージログの格納ディレクトリ
    pub fn chats_dir(&self) -> PathBuf {
        self.home.join("chats")
    }

    /// ログ格納ディレクトリ
    pub fn logs_dir(&self) -> PathBuf {
        self.home.join("logs")
    }

    /// 構造化ログ（JSONL）のファイルパス
    pub fn log_path(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_layout() {
        let dirs = Dirs::new(HomeDir::new("/tmp/llm-chat"));
        assert_eq!(dirs.settings_path(), PathBuf::from("/tmp/llm-chat/settings.json"));
        assert_eq!(dirs.chats_dir(), PathBuf::from("/tmp/llm-chat/chats"));
        assert_eq!(dirs.log_path(), PathBuf::from("/tmp/llm-chat/logs/chat.jsonl"));
    }
}
