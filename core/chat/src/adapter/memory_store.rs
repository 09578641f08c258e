//! テスト用: メモリ上の ChatStore / SettingsStore と、記録するだけの HttpGetJson

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use common::domain::ChatId;
    use common::error::Error;
    use common::msg::Message;
    use common::ports::outbound::HttpGetJson;
    use serde_json::Value;

    use crate::domain::{ChatIndex, Settings};
    use crate::ports::outbound::{ChatStore, SettingsStore};

    /// 操作の順序を記録する ChatStore
    #[derive(Default)]
    pub struct MemoryChatStore {
        index: Mutex<ChatIndex>,
        logs: Mutex<HashMap<ChatId, Vec<Message>>>,
        ops: Mutex<Vec<String>>,
        pub fail_save_index: AtomicBool,
        pub fail_save_log: AtomicBool,
        pub fail_load_index: AtomicBool,
    }

    impl MemoryChatStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// "save_index" / "save_log:<id>" / "delete_log:<id>" の列
        pub fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }

        pub fn index(&self) -> ChatIndex {
            self.index.lock().unwrap().clone()
        }

        pub fn log(&self, id: &str) -> Option<Vec<Message>> {
            self.logs.lock().unwrap().get(&ChatId::new(id)).cloned()
        }

        pub fn has_log(&self, id: &str) -> bool {
            self.logs.lock().unwrap().contains_key(&ChatId::new(id))
        }

        fn record(&self, op: String) {
            self.ops.lock().unwrap().push(op);
        }
    }

    impl ChatStore for MemoryChatStore {
        fn load_index(&self) -> Result<ChatIndex, Error> {
            if self.fail_load_index.load(Ordering::SeqCst) {
                return Err(Error::io_msg("index unreadable"));
            }
            Ok(self.index())
        }

        fn save_index(&self, index: &ChatIndex) -> Result<(), Error> {
            if self.fail_save_index.load(Ordering::SeqCst) {
                return Err(Error::io_msg("disk full"));
            }
            self.record("save_index".to_string());
            *self.index.lock().unwrap() = index.clone();
            Ok(())
        }

        fn load_log(&self, id: &ChatId) -> Result<Vec<Message>, Error> {
            Ok(self.logs.lock().unwrap().get(id).cloned().unwrap_or_default())
        }

        fn save_log(&self, id: &ChatId, log: &[Message]) -> Result<(), Error> {
            if self.fail_save_log.load(Ordering::SeqCst) {
                return Err(Error::io_msg("disk full"));
            }
            self.record(format!("save_log:{}", id));
            self.logs.lock().unwrap().insert(id.clone(), log.to_vec());
            Ok(())
        }

        fn delete_log(&self, id: &ChatId) -> Result<(), Error> {
            self.record(format!("delete_log:{}", id));
            self.logs.lock().unwrap().remove(id);
            Ok(())
        }
    }

    /// メモリ上の SettingsStore
    #[derive(Default)]
    pub struct MemorySettingsStore {
        settings: Mutex<Settings>,
    }

    impl MemorySettingsStore {
        pub fn new(settings: Settings) -> Self {
            Self {
                settings: Mutex::new(settings),
            }
        }
    }

    impl SettingsStore for MemorySettingsStore {
        fn load(&self) -> Settings {
            self.settings.lock().unwrap().clone()
        }

        fn save(&self, settings: &Settings) -> Result<(), Error> {
            *self.settings.lock().unwrap() = settings.clone();
            Ok(())
        }
    }

    /// 発行された GET（URL・Bearer・タイムアウト）
    #[derive(Debug, Clone, PartialEq)]
    pub struct SentGet {
        pub url: String,
        pub bearer: Option<String>,
        pub timeout: Duration,
    }

    /// 固定の応答を返し、発行された GET を記録する HttpGetJson
    pub struct RecordingHttp {
        response: Result<Value, Error>,
        sent: Mutex<Vec<SentGet>>,
    }

    impl RecordingHttp {
        pub fn new(response: Result<Value, Error>) -> Self {
            Self {
                response,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn sent(&self) -> Vec<SentGet> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl HttpGetJson for RecordingHttp {
        fn get_json(&self, url: &str, bearer: Option<&str>, timeout: Duration) -> Result<Value, Error> {
            self.sent.lock().unwrap().push(SentGet {
                url: url.to_string(),
                bearer: bearer.map(str::to_string),
                timeout,
            });
            self.response.clone()
        }
    }
}

#[cfg(test)]
pub use memory::{MemoryChatStore, MemorySettingsStore, RecordingHttp};
