//! 端末向けの表示（履歴・一覧・ストリーム出力）

use crate::domain::ChatIndex;
use common::msg::{Message, Role};
use std::io::Write;

/// 応答を短縮表示するときの語数
pub const PREVIEW_WORDS: usize = 50;

/// 先頭 `words` 語に縮める。縮めたら末尾に " ..." を付ける
pub fn shorten(text: &str, words: usize) -> String {
    let mut iter = text.split_whitespace();
    let head: Vec<&str> = iter.by_ref().take(words).collect();
    if iter.next().is_none() {
        return text.to_string();
    }
    format!("{} ...", head.join(" "))
}

/// 履歴をインデックス付きで並べる。`full` でなければ assistant の応答を短縮する
pub fn format_history(messages: &[Message], full: bool) -> String {
    let mut s = String::new();
    for (i, m) in messages.iter().enumerate() {
        let body = match m.role {
            Role::Assistant if !full => shorten(&m.content, PREVIEW_WORDS),
            _ => m.content.clone(),
        };
        s.push_str(&format!("[{}] {}: {}\n", i, m.role.as_str(), body));
    }
    s
}

pub fn format_chat_list(index: &ChatIndex) -> String {
    if index.is_empty() {
        return "(no chats)\n".to_string();
    }
    index
        .iter()
        .map(|e| format!("{}\t{}\n", &*e.id, e.title))
        .collect()
}

/// 全文を受け取り、まだ出していない末尾だけを書き出す
#[derive(Debug, Default)]
pub struct StreamPrinter {
    printed: usize,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, out: &mut dyn Write, text: &str) {
        if let Some(rest) = text.get(self.printed..) {
            let _ = out.write_all(rest.as_bytes());
            let _ = out.flush();
            self.printed = text.len();
        }
    }

    /// 最終本文（失敗注記を含む）の残りを出して改行する
    pub fn finish(&mut self, out: &mut dyn Write, final_text: &str) -> std::io::Result<()> {
        self.update(out, final_text);
        writeln!(out)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::domain::ChatId;
    use crate::domain::ChatIndexEntry;

    #[test]
    fn test_shorten_keeps_short_text() {
        assert_eq!(shorten("a b c", 3), "a b c");
        assert_eq!(shorten("a b c d", 3), "a b c ...");
    }

    #[test]
    fn test_format_history_shortens_answers_only() {
        let long = (0..60).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let messages = vec![Message::user(long.clone()), Message::assistant(long.clone())];
        let short = format_history(&messages, false);
        let lines: Vec<&str> = short.lines().collect();
        assert_eq!(lines[0], format!("[0] user: {}", long));
        assert!(lines[1].starts_with("[1] assistant: w0 "));
        assert!(lines[1].ends_with("w49 ..."));
        let full = format_history(&messages, true);
        assert!(full.lines().nth(1).unwrap().ends_with("w59"));
    }

    #[test]
    fn test_format_chat_list() {
        let mut index = ChatIndex::default();
        index.prepend(ChatIndexEntry::new(ChatId::new("chat_1"), "first"));
        index.prepend(ChatIndexEntry::new(ChatId::new("chat_2"), "second"));
        assert_eq!(format_chat_list(&index), "chat_2\tsecond\nchat_1\tfirst\n");
        assert_eq!(format_chat_list(&ChatIndex::default()), "(no chats)\n");
    }

    #[test]
    fn test_stream_printer_writes_suffixes() {
        let mut out = Vec::new();
        let mut p = StreamPrinter::new();
        p.update(&mut out, "Hel");
        p.update(&mut out, "Hello");
        p.finish(&mut out, "Hello\n\n<Request failed: boom>").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Hello\n\n<Request failed: boom>\n"
        );
    }
}
