//! 環境変数解決 Outbound ポート
//!
//! ホームディレクトリを環境変数から解決する。
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::{Dirs, HomeDir};
use crate::error::Error;

/// 環境変数解決抽象（Outbound ポート）
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. CHAT_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/llm-chat
    /// 3. $HOME/.config/llm-chat
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    fn resolve_dirs(&self) -> Result<Dirs, Error> {
        Ok(Dirs::new(self.resolve_home_dir()?))
    }
}
