//! Ctrl+C（SIGINT）で中断フラグを立てる InterruptChecker 実装
//!
//! コンストラクタで ctrlc ハンドラを登録し、is_interrupted() でフラグを読む。

use crate::ports::outbound::InterruptChecker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 共有の中断フラグ。clone したものどうしは同じフラグを見る
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl InterruptChecker for CancelFlag {
    fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Ctrl+C を受けたらフラグを立てる実装
pub struct SigintChecker {
    flag: CancelFlag,
}

impl SigintChecker {
    /// 新しいチェッカーを作成し、SIGINT ハンドラを登録する。
    /// ハンドラはプロセスで 1 つだけ登録できる（2 回目は Err）。
    pub fn new() -> Result<Self, ctrlc::Error> {
        let flag = CancelFlag::new();
        let handler_flag = flag.clone();
        ctrlc::set_handler(move || handler_flag.cancel())?;
        Ok(Self { flag })
    }
}

impl InterruptChecker for SigintChecker {
    fn is_interrupted(&self) -> bool {
        self.flag.is_interrupted()
    }

    fn reset(&self) {
        self.flag.reset();
    }
}

/// 中断を検知しないスタブ（ハンドラ登録に失敗した場合や単発送信で使用）
pub struct NoopInterruptChecker;

impl InterruptChecker for NoopInterruptChecker {
    fn is_interrupted(&self) -> bool {
        false
    }

    fn reset(&self) {}
}
