//! settings.json で設定を保存・読み込みするアダプタ

use crate::domain::Settings;
use crate::ports::outbound::SettingsStore;
use common::error::Error;
use common::ports::outbound::{now_iso8601, FileSystem, Log, LogLevel, LogRecord};
use std::path::PathBuf;
use std::sync::Arc;

/// settings.json（整形 JSON）で Settings を保存する実装
pub struct FileSettingsStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    log: Arc<dyn Log>,
}

impl FileSettingsStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>, log: Arc<dyn Log>) -> Self {
        Self {
            fs,
            path: path.into(),
            log,
        }
    }

    fn try_load(&self) -> Result<Option<Settings>, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let s = self.fs.read_to_string(&self.path)?;
        let settings = serde_json::from_str(&s)
            .map_err(|e| Error::json(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(settings))
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        match self.try_load() {
            Ok(s) => s.unwrap_or_default(),
            Err(e) => {
                let _ = self.log.log(&LogRecord {
                    ts: now_iso8601(),
                    level: LogLevel::Warn,
                    message: format!("Failed to load settings, using defaults: {}", e),
                    layer: Some("adapter".to_string()),
                    kind: Some("error".to_string()),
                    fields: None,
                });
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::json(e.to_string()))?;
        self.fs
            .write_atomic(&self.path, &json)
            .map_err(|e| e.with_context("Error saving settings"))
    }
}
