//! # キャンセルシグナル
//!
//! 呼び出し単位のキャンセル要求を伝える協調的なフラグ。
//! Ctrl-C や出力先パイプの切断でホストがセットし、
//! ページングストリーマは次ページの取得前にこれを確認する。
//! 実行中のサービス呼び出しを強制中断することはしない。

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// キャンセルシグナル
///
/// クローンは同じフラグを共有する。呼び出しごとに新しく作成し、
/// 呼び出しをまたいで共有しない。
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャンセルを要求する（冪等）
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// キャンセルが要求されているか
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
