//! 設定の読み込みと部分更新

use crate::domain::Settings;
use crate::ports::outbound::SettingsStore;
use common::error::Error;
use common::ports::outbound::{now_iso8601, Log, LogLevel, LogRecord};
use std::sync::Arc;

/// 指定された項目だけを書き換える更新（None は現状維持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub endpoint_url: Option<String>,
    pub api_key: Option<String>,
    pub system_instructions: Option<String>,
    pub model: Option<String>,
}

impl SettingsUpdate {
    fn apply_to(self, settings: &mut Settings) {
        if let Some(v) = self.endpoint_url {
            settings.endpoint_url = v;
        }
        if let Some(v) = self.api_key {
            settings.api_key = v;
        }
        if let Some(v) = self.system_instructions {
            settings.system_instructions = v;
        }
        if let Some(v) = self.model {
            settings.model = Some(v);
        }
    }
}

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    log: Arc<dyn Log>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>, log: Arc<dyn Log>) -> Self {
        Self { store, log }
    }

    /// 保存済みの設定を読み直す
    pub fn load(&self) -> Settings {
        self.store.load()
    }

    /// 読み直した設定に update を重ねて保存し、保存後の設定を返す
    pub fn update(&self, update: SettingsUpdate) -> Result<Settings, Error> {
        let mut settings = self.store.load();
        update.apply_to(&mut settings);
        self.store.save(&settings)?;
        let _ = self.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "settings saved".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("settings".to_string()),
            fields: None,
        });
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MemorySettingsStore;
    use common::adapter::NoopLog;

    #[test]
    fn test_update_keeps_unspecified_fields() {
        let store = Arc::new(MemorySettingsStore::new(Settings {
            endpoint_url: "https://api.example.com/v1".to_string(),
            api_key: "sk-old".to_string(),
            system_instructions: "Be brief.".to_string(),
            model: None,
        }));
        let service = SettingsService::new(store.clone(), Arc::new(NoopLog));
        let saved = service
            .update(SettingsUpdate {
                api_key: Some("sk-new".to_string()),
                model: Some("gpt-4o".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(saved.endpoint_url, "https://api.example.com/v1");
        assert_eq!(saved.api_key, "sk-new");
        assert_eq!(saved.system_instructions, "Be brief.");
        assert_eq!(store.load(), saved);
    }

    #[test]
    fn test_empty_string_clears_field() {
        let store = Arc::new(MemorySettingsStore::new(Settings {
            api_key: "sk-old".to_string(),
            ..Default::default()
        }));
        let service = SettingsService::new(store, Arc::new(NoopLog));
        let saved = service
            .update(SettingsUpdate {
                api_key: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(saved.api_key, "");
        assert_eq!(service.load(), saved);
    }
}
