//! ユースケース: ポート越しに設定・モデル一覧・チャットを操作する

pub mod controller;
pub mod model_directory;
pub mod settings;
pub mod stream_session;

pub use controller::{ControllerDeps, SessionController};
pub use model_directory::ModelDirectory;
pub use settings::{SettingsService, SettingsUpdate};
pub use stream_session::{ExchangeContext, ExchangeReport, StreamingEngine};
