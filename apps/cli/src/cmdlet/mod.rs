//! # コマンドレット
//!
//! 引数を検証済みのフィルタに変換し、取得関数とセレクタを組み立てて
//! ページングストリーマを駆動する。
//!
//! ## 実行の流れ
//!
//! 1. 引数からフィルタ・ページサイズ・セレクタを作り、すべて検証する
//!    （ここで失敗した場合、サービスは一度も呼び出されない）
//! 2. フィルタをキャプチャした取得関数で [`paginate`] を呼ぶ
//! 3. ページごとにセッション記録を更新し、パイプラインに書き出す
//!
//! 取得に失敗した場合、それまでに書き出したアイテムはそのまま残る。

mod cloudwatch;
mod workspaces;

use std::{future::Future, io::Write};

use awscmd_domain::{
    DomainError,
    cancellation::CancellationSignal,
    pagination::{NextToken, PagedResponse, PagingMode},
    session::InvocationRecord,
    time_bound::TimeBoundInput,
};
use awscmd_infra::{CloudWatchClient, InfraError, WorkSpacesClient, paginator::paginate};
use awscmd_shared::PaginatedResponse;
use chrono::{DateTime, Utc};
use futures::{StreamExt, pin_mut};

use crate::{
    args::{Command, PagingArgs},
    error::CliError,
    output::{PipelineWriter, WriteStatus},
    selector::Selector,
};

/// コマンドレットが呼び出すサービスクライアント
#[derive(Clone, Copy)]
pub struct ServiceClients<'a> {
    pub cloudwatch: &'a dyn CloudWatchClient,
    pub workspaces: &'a dyn WorkSpacesClient,
}

/// 1 回の呼び出しの実行コンテキスト
pub struct CmdletContext<'a> {
    /// セッションに追加される呼び出し記録
    pub record:       &'a mut InvocationRecord,
    /// パイプラインの出力先
    pub out:          &'a mut dyn Write,
    pub cancellation: CancellationSignal,
}

/// サブコマンドに対応するコマンドレットを実行する
pub async fn dispatch(
    command: Command,
    clients: ServiceClients<'_>,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    match command {
        Command::GetCwAlarm(args) => cloudwatch::get_alarm(clients.cloudwatch, args, ctx).await,
        Command::GetCwMetricList(args) => {
            cloudwatch::get_metric_list(clients.cloudwatch, args, ctx).await
        }
        Command::GetCwDashboardList(args) => {
            cloudwatch::get_dashboard_list(clients.cloudwatch, args, ctx).await
        }
        Command::GetCwAnomalyDetector(args) => {
            cloudwatch::get_anomaly_detector(clients.cloudwatch, args, ctx).await
        }
        Command::GetCwAlarmHistory(args) => {
            cloudwatch::get_alarm_history(clients.cloudwatch, args, ctx).await
        }
        Command::GetCwMetricStatistic(args) => {
            cloudwatch::get_metric_statistic(clients.cloudwatch, args, ctx).await
        }
        Command::WriteCwMetricData(args) => {
            cloudwatch::write_metric_data(clients.cloudwatch, args, ctx).await
        }
        Command::SetCwAlarmState(args) => {
            cloudwatch::set_alarm_state(clients.cloudwatch, args, ctx).await
        }
        Command::GetWksWorkspace(args) => {
            workspaces::get_workspace(clients.workspaces, args, ctx).await
        }
        Command::GetWksWorkspaceDirectory(args) => {
            workspaces::get_workspace_directory(clients.workspaces, args, ctx).await
        }
        Command::GetWksWorkspaceBundle(args) => {
            workspaces::get_workspace_bundle(clients.workspaces, args, ctx).await
        }
    }
}

/// 一覧系コマンドレットの共通処理
///
/// 自動ページングではアイテムを 1 行ずつ、手動ページングではページを 1 行で書き出す。
async fn run_paginated<R, F, Fut>(
    ctx: &mut CmdletContext<'_>,
    paging: &PagingArgs,
    fetch: F,
    selector: Selector<R>,
) -> Result<(), CliError>
where
    R: PagedResponse,
    F: FnMut(Option<NextToken>) -> Fut,
    Fut: Future<Output = Result<R, InfraError>>,
{
    let options = paging.pagination_options(ctx.cancellation.clone())?;
    let mode = options.mode;

    let pages = paginate(options, fetch, selector);
    pin_mut!(pages);
    let mut writer = PipelineWriter::new(&mut *ctx.out, ctx.cancellation.clone());

    while let Some(page) = pages.next().await {
        let page = page?;
        ctx.record
            .record_service_call(page.items.len(), page.next_token.clone());

        match mode {
            PagingMode::Auto => {
                for item in &page.items {
                    if writer.write_item(item)? == WriteStatus::Closed {
                        break;
                    }
                    ctx.record.add_emitted(1);
                }
                writer.flush()?;
            }
            PagingMode::Manual => {
                let count = page.items.len();
                let envelope = PaginatedResponse {
                    data:       page.items,
                    next_token: page.next_token.map(NextToken::into_string),
                };
                if writer.write_page(&envelope)? == WriteStatus::Written {
                    ctx.record.add_emitted(count);
                }
            }
        }
    }
    Ok(())
}

/// 時刻パラメータの組を UTC に正規化する
///
/// 旧形式はホストのローカルタイムゾーンで解釈し、非推奨の警告を出す。
fn resolve_time(input: TimeBoundInput) -> Result<Option<DateTime<Utc>>, DomainError> {
    warn_legacy(&input);
    input.resolve()
}

/// 必須の時刻パラメータの組を UTC に正規化する
fn resolve_required_time(input: TimeBoundInput) -> Result<DateTime<Utc>, DomainError> {
    warn_legacy(&input);
    input.resolve_required()
}

fn warn_legacy(input: &TimeBoundInput) {
    if input.uses_legacy() {
        tracing::warn!(
            parameter = input.legacy_parameter,
            replacement = input.utc_parameter,
            "--{} は非推奨です。--{} を使用してください",
            input.legacy_parameter,
            input.utc_parameter
        );
    }
}
