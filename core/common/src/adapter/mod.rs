//! アダプター（外界の I/O を trait で抽象化した標準実装）
//!
//! usecase は ports::outbound の trait 経由でのみファイル・環境変数・HTTP・ログに触れる。
//! ここには標準実装（Std*）を置き、テストではモックを注入する。

pub mod file_json_log;
pub mod reqwest_http;
pub mod std_env_resolver;
pub mod std_fs;

pub use crate::ports::outbound::FileSystem;
pub use file_json_log::{CompositeLog, FileJsonLog, NoopLog, StderrLog};
pub use reqwest_http::ReqwestHttp;
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
