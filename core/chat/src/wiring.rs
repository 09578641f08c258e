//! 配線: 標準アダプタでユースケースを組み立てる

use std::sync::Arc;

use common::adapter::{
    CompositeLog, FileJsonLog, FileSystem, ReqwestHttp, StdEnvResolver, StdFileSystem, StderrLog,
};
use common::domain::Dirs;
use common::error::Error;
use common::ports::outbound::{EnvResolver, Log};

use crate::adapter::{
    FileChatStore, FileSettingsStore, NoopInterruptChecker, OpenAiCompletion,
    SequentialChatIdGenerator, SigintChecker,
};
use crate::ports::outbound::{InterruptChecker, SettingsStore};
use crate::usecase::{ControllerDeps, ModelDirectory, SessionController, SettingsService, StreamingEngine};

/// 組み立て済みのユースケース一式
pub struct App {
    pub dirs: Dirs,
    pub settings: SettingsService,
    pub models: ModelDirectory,
    pub controller_deps: ControllerDeps,
    pub interrupt: Arc<dyn InterruptChecker>,
    pub logger: Arc<dyn Log>,
}

impl App {
    /// 起動ごとに新しいコントローラ（選択なし）を作る
    pub fn controller(&self) -> SessionController {
        SessionController::new(self.controller_deps.clone())
    }
}

/// 環境変数からホームを解決して配線する
pub fn wire_chat(verbose: bool) -> Result<App, Error> {
    let dirs = StdEnvResolver.resolve_dirs()?;
    Ok(wire_chat_at(dirs, verbose))
}

/// 指定のホームで配線する
pub fn wire_chat_at(dirs: Dirs, verbose: bool) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let file_log: Arc<dyn Log> = Arc::new(FileJsonLog::new(Arc::clone(&fs), dirs.log_path()));
    let logger: Arc<dyn Log> = if verbose {
        Arc::new(CompositeLog::new(vec![file_log, Arc::new(StderrLog)]))
    } else {
        file_log
    };

    let settings_store: Arc<dyn SettingsStore> = Arc::new(FileSettingsStore::new(
        Arc::clone(&fs),
        dirs.settings_path(),
        Arc::clone(&logger),
    ));
    let chat_store = Arc::new(FileChatStore::new(Arc::clone(&fs), dirs.chats_dir()));
    let engine = StreamingEngine::new(
        Arc::new(OpenAiCompletion::new()),
        chat_store.clone(),
        Arc::clone(&logger),
    );
    // ハンドラはプロセスで 1 回しか登録できない
    let interrupt: Arc<dyn InterruptChecker> = match SigintChecker::new() {
        Ok(c) => Arc::new(c),
        Err(_) => Arc::new(NoopInterruptChecker),
    };

    App {
        settings: SettingsService::new(Arc::clone(&settings_store), Arc::clone(&logger)),
        models: ModelDirectory::new(Arc::new(ReqwestHttp), Arc::clone(&logger)),
        controller_deps: ControllerDeps {
            store: chat_store,
            settings: settings_store,
            engine,
            id_gen: Arc::new(SequentialChatIdGenerator),
            log: Arc::clone(&logger),
        },
        interrupt,
        logger,
        dirs,
    }
}
