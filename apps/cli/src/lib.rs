//! # awscmd CLI
//!
//! AWS CloudWatch / WorkSpaces の API をコマンドレットとして呼び出し、
//! 結果を JSON のパイプラインとして出力する。
//!
//! ## 設計方針
//!
//! - **検証してから呼び出す**: 引数の組み合わせはサービス呼び出し前にすべて検証する
//! - **取得したものは取り消さない**: 途中のページで失敗しても、出力済みのアイテムは残す
//! - **履歴は明示的に渡す**: 呼び出し履歴は [`Session`] が保持し、グローバル状態は持たない
//!
//! ## モジュール構成
//!
//! - [`args`] - コマンドライン引数
//! - [`cmdlet`] - コマンドレットの実装
//! - [`selector`] - レスポンスから出力要素を選ぶ関数
//! - [`output`] - パイプライン出力
//! - [`config`] - 環境変数からの設定
//! - [`error`] - CLI エラー定義

pub mod args;
pub mod cmdlet;
pub mod config;
pub mod error;
pub mod output;
pub mod selector;

use std::io::Write;

use awscmd_domain::{
    cancellation::CancellationSignal,
    session::{InvocationOutcome, Session},
};
use awscmd_shared::{event_log::event, log_cmdlet_event};

use crate::{
    args::Command,
    cmdlet::{CmdletContext, ServiceClients},
    error::CliError,
};

/// コマンドレットを 1 回実行し、セッションに記録する
///
/// 検証エラーで終わった呼び出しも履歴に残す。
/// 確定した記録は JSON として debug レベルでログに出力する。
#[tracing::instrument(skip_all, fields(cmdlet = command.name()))]
pub async fn run(
    command: Command,
    clients: ServiceClients<'_>,
    session: &mut Session,
    out: &mut dyn Write,
    cancellation: CancellationSignal,
) -> Result<InvocationOutcome, CliError> {
    let cmdlet = command.name();
    let service = command.service();
    let mut record = session.begin(cmdlet);

    let result = {
        let mut ctx = CmdletContext {
            record: &mut record,
            out,
            cancellation: cancellation.clone(),
        };
        cmdlet::dispatch(command, clients, &mut ctx).await
    };

    let outcome = match &result {
        Ok(()) if cancellation.is_cancelled() => InvocationOutcome::Cancelled,
        Ok(()) => InvocationOutcome::Completed,
        Err(e) => InvocationOutcome::Failed(e.to_string()),
    };

    let page_count = record.service_calls.len();
    let item_count = record.emitted_items;
    match (&result, &outcome) {
        (Err(e), _) => log_cmdlet_event!(
            event.service = service,
            event.action = event::action::INVOCATION_FAILED,
            event.cmdlet = cmdlet,
            event.result = event::result::FAILURE,
            event.page_count = page_count,
            event.item_count = item_count,
            error.category = e.category(),
            error.kind = e.kind(),
            "コマンドレットが失敗しました"
        ),
        (Ok(()), InvocationOutcome::Cancelled) => log_cmdlet_event!(
            event.service = service,
            event.action = event::action::INVOCATION_CANCELLED,
            event.cmdlet = cmdlet,
            event.result = event::result::CANCELLED,
            event.page_count = page_count,
            event.item_count = item_count,
            "コマンドレットがキャンセルされました"
        ),
        (Ok(()), _) => log_cmdlet_event!(
            event.service = service,
            event.action = event::action::INVOCATION_COMPLETED,
            event.cmdlet = cmdlet,
            event.result = event::result::SUCCESS,
            event.page_count = page_count,
            event.item_count = item_count,
            "コマンドレットが完了しました"
        ),
    }

    session.finish(record, outcome.clone());
    if let Some(finished) = session.last() {
        match serde_json::to_string(finished) {
            Ok(json) => tracing::debug!(invocation = %json, "呼び出しを履歴に記録しました"),
            Err(e) => tracing::warn!(error = %e, "呼び出し履歴をシリアライズできませんでした"),
        }
    }
    result.map(|()| outcome)
}
