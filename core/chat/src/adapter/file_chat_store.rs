//! chats/ ディレクトリに索引とメッセージログを JSON で保存するアダプタ
//!
//! - chats/index.json: `{"chats":[{"id","title"}]}`
//! - chats/<id>.json: `[{"role","content"}, ...]`

use crate::domain::ChatIndex;
use crate::ports::outbound::ChatStore;
use common::domain::ChatId;
use common::error::Error;
use common::msg::Message;
use common::ports::outbound::FileSystem;
use common::safe_chat_path::{chat_log_path, INDEX_FILENAME};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ファイル単位で丸ごと読み書きする ChatStore 実装
pub struct FileChatStore {
    fs: Arc<dyn FileSystem>,
    chats_dir: PathBuf,
}

impl FileChatStore {
    pub fn new(fs: Arc<dyn FileSystem>, chats_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            chats_dir: chats_dir.into(),
        }
    }

    fn index_path(&self) -> PathBuf {
        self.chats_dir.join(INDEX_FILENAME)
    }

    fn log_path(&self, id: &ChatId) -> Result<PathBuf, Error> {
        chat_log_path(&self.chats_dir, id)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid chat id: {:?}", &**id)))
    }

    fn read_json<T: serde::de::DeserializeOwned + Default>(&self, path: &Path) -> Result<T, Error> {
        if !self.fs.exists(path) {
            return Ok(T::default());
        }
        let s = self.fs.read_to_string(path)?;
        serde_json::from_str(&s).map_err(|e| Error::json(format!("{}: {}", path.display(), e)))
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(value).map_err(|e| Error::json(e.to_string()))?;
        self.fs.write_atomic(path, &json)
    }
}

impl ChatStore for FileChatStore {
    fn load_index(&self) -> Result<ChatIndex, Error> {
        self.read_json(&self.index_path())
    }

    fn save_index(&self, index: &ChatIndex) -> Result<(), Error> {
        self.write_json(&self.index_path(), index)
    }

    fn load_log(&self, id: &ChatId) -> Result<Vec<Message>, Error> {
        let path = self.log_path(id)?;
        self.read_json(&path)
    }

    fn save_log(&self, id: &ChatId, log: &[Message]) -> Result<(), Error> {
        let path = self.log_path(id)?;
        self.write_json(&path, log)
    }

    fn delete_log(&self, id: &ChatId) -> Result<(), Error> {
        let path = self.log_path(id)?;
        if self.fs.exists(&path) {
            self.fs.remove_file(&path)?;
        }
        Ok(())
    }
}
