//! 設定保存 Outbound ポート

use crate::domain::Settings;
use common::error::Error;

/// 設定の保存先
pub trait SettingsStore: Send + Sync {
    /// 保存済みの設定。無い・読めない場合は既定値（失敗しない）
    fn load(&self) -> Settings;

    fn save(&self, settings: &Settings) -> Result<(), Error>;
}
