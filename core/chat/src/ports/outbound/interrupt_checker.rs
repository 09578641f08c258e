//! Ctrl+C（SIGINT）等による中断を検知する Outbound ポート
//!
//! ストリーミング中にユーザーが中断した場合、それまでの断片で確定させて保存するために使用する。

/// 中断が要求されたかどうかを返す能力
///
/// エンジンは断片を 1 つ読む前に毎回 is_interrupted() を確認する。
pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;

    /// フラグを下ろす（交換の開始時に呼ぶ）
    fn reset(&self);
}
