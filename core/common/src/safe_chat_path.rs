//! チャット ID → ファイル名の検証（パストラバーサル対策）
//!
//! ID は索引ファイル由来の文字列なので、join する前に単一のパス成分であることを確かめる。

use std::path::{Path, PathBuf};

/// チャット索引ファイル名（メッセージログと同じディレクトリに置く）
pub const INDEX_FILENAME: &str = "index.json";

const LOG_SUFFIX: &str = ".json";

/// パス区切りを含まず単一成分か（`.` / `..` も禁止）
fn is_safe_basename_component(s: &str) -> bool {
    if s.is_empty() || s == "." || s == ".." {
        return false;
    }
    !s.contains('/') && !s.contains('\\') && !s.contains('\0')
}

/// チャット ID として許可するか。
/// 単一成分で、先頭が `.` でなく、索引ファイルと衝突しないこと。
pub fn is_safe_chat_id(id: &str) -> bool {
    if !is_safe_basename_component(id) || id.starts_with('.') {
        return false;
    }
    format!("{}{}", id, LOG_SUFFIX) != INDEX_FILENAME
}

/// `chats_dir` 配下のメッセージログのパス。ID が安全でなければ None。
pub fn chat_log_path(chats_dir: &Path, id: &str) -> Option<PathBuf> {
    if !is_safe_chat_id(id) {
        return None;
    }
    Some(chats_dir.join(format!("{}{}", id, LOG_SUFFIX)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_chat_id_accepts_valid() {
        assert!(is_safe_chat_id("chat_1"));
        assert!(is_safe_chat_id("chat_42"));
        assert!(is_safe_chat_id("3f2a-uuid-like"));
    }

    #[test]
    fn test_is_safe_chat_id_rejects_traversal() {
        assert!(!is_safe_chat_id(""));
        assert!(!is_safe_chat_id("."));
        assert!(!is_safe_chat_id(".."));
        assert!(!is_safe_chat_id("../etc/passwd"));
        assert!(!is_safe_chat_id("a/b"));
        assert!(!is_safe_chat_id("a\\b"));
        assert!(!is_safe_chat_id(".hidden"));
    }

    #[test]
    fn test_index_name_is_reserved() {
        assert!(!is_safe_chat_id("index"));
    }

    #[test]
    fn test_chat_log_path() {
        let dir = Path::new("/data/chats");
        assert_eq!(
            chat_log_path(dir, "chat_1"),
            Some(PathBuf::from("/data/chats/chat_1.json"))
        );
        assert_eq!(chat_log_path(dir, "../x"), None);
    }
}
