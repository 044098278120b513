//! # セッション（呼び出し履歴）
//!
//! ホストプロセスが所有し、コマンドレット呼び出しに明示的に渡すコンテキスト。
//! 直近の呼び出しと、その中で行われたサービス呼び出し（ページ取得）を記録する。
//!
//! ## 設計方針
//!
//! - **グローバル状態を持たない**: プロセス全体の可変状態ではなく、
//!   ホストが生成した [`Session`] を引数で受け渡す
//! - **上限付き**: 保持件数は `max_entries` で制限し、古い履歴から破棄する
//! - **時刻は [`Clock`] から取得**: テストで固定時刻を注入できる
//!
//! ## 使用例
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use awscmd_domain::{
//!     clock::SystemClock,
//!     pagination::NextToken,
//!     session::{InvocationOutcome, Session},
//! };
//!
//! let mut session = Session::new(10, Arc::new(SystemClock));
//! let mut record = session.begin("get-cw-alarm");
//! record.record_service_call(50, NextToken::new("t1"));
//! record.add_emitted(50);
//! session.finish(record, InvocationOutcome::Completed);
//!
//! assert_eq!(session.last_next_token().map(NextToken::as_str), Some("t1"));
//! ```

use std::{collections::VecDeque, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{clock::Clock, pagination::NextToken};

/// 履歴の既定保持件数
pub const DEFAULT_MAX_ENTRIES: usize = 10;

/// 呼び出しの結末
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// 全ページ（手動ページング時は 1 ページ）を出力して終了
    Completed,
    /// キャンセルシグナルにより途中で終了
    Cancelled,
    /// エラーで終了（出力済みのアイテムは取り消さない）
    Failed(String),
}

/// 1 回のサービス呼び出し（ページ取得）の記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCallRecord {
    /// 0 始まりのページ番号
    pub page_index: usize,
    /// そのページで返されたアイテム数（セレクタ適用後）
    pub item_count: usize,
    /// サーバーが返した継続トークン
    pub next_token: Option<NextToken>,
}

/// 1 回のコマンドレット呼び出しの記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationRecord {
    pub cmdlet:        String,
    pub started_at:    DateTime<Utc>,
    pub finished_at:   Option<DateTime<Utc>>,
    pub service_calls: Vec<ServiceCallRecord>,
    pub emitted_items: usize,
    pub outcome:       Option<InvocationOutcome>,
}

impl InvocationRecord {
    /// ページ取得を記録する
    pub fn record_service_call(&mut self, item_count: usize, next_token: Option<NextToken>) {
        let page_index = self.service_calls.len();
        self.service_calls.push(ServiceCallRecord {
            page_index,
            item_count,
            next_token,
        });
    }

    /// パイプラインに出力したアイテム数を加算する
    pub fn add_emitted(&mut self, count: usize) {
        self.emitted_items += count;
    }

    /// 最後のサービス呼び出しで返された継続トークン
    pub fn last_next_token(&self) -> Option<&NextToken> {
        self.service_calls
            .last()
            .and_then(|call| call.next_token.as_ref())
    }
}

/// セッション
///
/// プロセスごとに 1 つ作成し、各呼び出しに `&mut` で渡す。
pub struct Session {
    history:     VecDeque<InvocationRecord>,
    max_entries: usize,
    clock:       Arc<dyn Clock>,
}

impl Session {
    /// 新しいセッションを作成する
    ///
    /// `max_entries` が 0 の場合は履歴を保持しない。
    /// 上限は保持件数の制限にのみ使い、領域は追加のたびに確保する。
    pub fn new(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            history: VecDeque::new(),
            max_entries,
            clock,
        }
    }

    /// 呼び出しを開始する
    ///
    /// 返された記録は呼び出し側が更新し、[`finish`](Session::finish) で確定させる。
    pub fn begin(&self, cmdlet: impl Into<String>) -> InvocationRecord {
        InvocationRecord {
            cmdlet:        cmdlet.into(),
            started_at:    self.clock.now(),
            finished_at:   None,
            service_calls: Vec::new(),
            emitted_items: 0,
            outcome:       None,
        }
    }

    /// 呼び出しを確定し、履歴に追加する
    pub fn finish(&mut self, mut record: InvocationRecord, outcome: InvocationOutcome) {
        record.finished_at = Some(self.clock.now());
        record.outcome = Some(outcome);

        if self.max_entries == 0 {
            return;
        }
        while self.history.len() >= self.max_entries {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }

    /// 古い順に履歴を返す
    pub fn history(&self) -> impl Iterator<Item = &InvocationRecord> {
        self.history.iter()
    }

    /// 直近の呼び出し
    pub fn last(&self) -> Option<&InvocationRecord> {
        self.history.back()
    }

    /// 直近の呼び出しでサーバーが最後に返した継続トークン
    ///
    /// 手動ページングで次ページを取得する際の入力に使う。
    pub fn last_next_token(&self) -> Option<&NextToken> {
        self.last().and_then(InvocationRecord::last_next_token)
    }
}
