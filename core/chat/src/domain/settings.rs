//! 接続設定（エンドポイント・API キー・全体の system 指示）

use common::msg::Message;
use serde::{Deserialize, Serialize};

/// プロセス全体で 1 つの設定
///
/// 旧形式の `base_url` / `api_key` も読み込める。新旧が両方あれば新しい名前を優先する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SettingsFile")]
pub struct Settings {
    #[serde(rename = "endpointURL")]
    pub endpoint_url: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[serde(rename = "systemInstructions")]
    pub system_instructions: String,
    /// 最後に選んだモデル
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// settings.json の読み込み形（新旧の名前を別々に受ける）
#[derive(Deserialize)]
struct SettingsFile {
    #[serde(rename = "endpointURL", default)]
    endpoint_url: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(rename = "apiKey", default)]
    api_key: Option<String>,
    #[serde(rename = "api_key", default)]
    legacy_api_key: Option<String>,
    #[serde(rename = "systemInstructions", default)]
    system_instructions: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

impl From<SettingsFile> for Settings {
    fn from(f: SettingsFile) -> Self {
        Self {
            endpoint_url: f.endpoint_url.or(f.base_url).unwrap_or_default(),
            api_key: f.api_key.or(f.legacy_api_key).unwrap_or_default(),
            system_instructions: f.system_instructions.unwrap_or_default(),
            model: f.model,
        }
    }
}

impl Settings {
    /// 送信時に先頭へ差し込む system メッセージ（空白のみなら None）
    pub fn system_message(&self) -> Option<Message> {
        if self.system_instructions.trim().is_empty() {
            None
        } else {
            Some(Message::system(self.system_instructions.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let s = Settings::default();
        assert_eq!(s.endpoint_url, "");
        assert_eq!(s.api_key, "");
        assert_eq!(s.system_instructions, "");
        assert!(s.system_message().is_none());
    }

    #[test]
    fn test_wire_names() {
        let s = Settings {
            endpoint_url: "http://localhost:11434".to_string(),
            api_key: String::new(),
            system_instructions: "Be brief.".to_string(),
            model: None,
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["endpointURL"], "http://localhost:11434");
        assert_eq!(v["systemInstructions"], "Be brief.");
        assert!(v.get("model").is_none());
    }

    #[test]
    fn test_legacy_names_are_accepted() {
        let s: Settings =
            serde_json::from_str(r#"{"base_url":"https://api.example.com/v1","api_key":"sk-1"}"#)
                .unwrap();
        assert_eq!(s.endpoint_url, "https://api.example.com/v1");
        assert_eq!(s.api_key, "sk-1");
        assert_eq!(s.system_instructions, "");
    }

    #[test]
    fn test_new_names_win_over_legacy_names() {
        let s: Settings = serde_json::from_str(
            r#"{"endpointURL":"https://a/v1","apiKey":"sk-new","systemInstructions":"Be brief.",
                "base_url":"https://old","api_key":"sk-old"}"#,
        )
        .unwrap();
        assert_eq!(s.endpoint_url, "https://a/v1");
        assert_eq!(s.api_key, "sk-new");
        assert_eq!(s.system_instructions, "Be brief.");
    }

    #[test]
    fn test_blank_system_instructions_are_not_sent() {
        let s = Settings {
            system_instructions: "  \n ".to_string(),
            ..Default::default()
        };
        assert!(s.system_message().is_none());
    }
}
