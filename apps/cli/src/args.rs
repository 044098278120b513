//! # コマンドライン引数
//!
//! コマンドレットごとのサブコマンドと、全コマンドレット共通のオプションを定義する。
//! 値の組み合わせ（排他・必須）の検証はドメイン層で行い、ここでは書式のみを扱う。

use awscmd_domain::{
    DomainError,
    cancellation::CancellationSignal,
    cloudwatch::{AlarmState, AlarmType, DimensionFilter, HistoryItemType, ScanBy, Statistic},
    pagination::{EmitLimit, NextToken, PageSize, PageSizeBounds, PagingMode},
};
use awscmd_infra::{config::AwsClientConfig, paginator::PaginationOptions};
use awscmd_shared::event_log::event::service;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// AWS CloudWatch / WorkSpaces のコマンドレット
///
/// 一覧系コマンドレットは結果を 1 行 1 JSON で標準出力に書き出す。
/// `--no-auto-iteration` を指定すると 1 ページだけ取得し、
/// `{"data": [...], "next_token": ...}` の形で出力する。
#[derive(Parser, Debug)]
#[command(name = "awscmd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// 接続先の指定（全コマンドレット共通）
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// AWS リージョン（未指定なら AWS_REGION や共有設定ファイルから解決）
    #[arg(long, global = true, env = "AWSCMD_REGION")]
    pub region: Option<String>,

    /// 共有設定ファイルのプロファイル名
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// カスタムエンドポイント URL（LocalStack など）
    #[arg(long, global = true, env = "AWSCMD_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,
}

impl GlobalArgs {
    pub fn client_config(&self) -> AwsClientConfig {
        AwsClientConfig {
            region:       self.region.clone(),
            profile:      self.profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

/// ページングの指定（一覧系コマンドレット共通）
#[derive(Args, Debug, Clone, Default)]
pub struct PagingArgs {
    /// 1 ページだけ取得し、継続トークンとともに出力する
    #[arg(long)]
    pub no_auto_iteration: bool,

    /// 前回の出力で返された継続トークンから再開する
    #[arg(long)]
    pub next_token: Option<String>,

    /// 出力するアイテム数の上限（ページをまたいで数える）
    #[arg(long)]
    pub max_items: Option<usize>,

    /// 1 リクエストあたりの取得件数
    #[arg(long)]
    pub page_size: Option<i32>,

    /// 出力する要素（`*` でレスポンス全体）
    #[arg(long)]
    pub select: Option<String>,
}

impl PagingArgs {
    /// ストリーマの制御パラメータに変換する
    ///
    /// `--no-auto-iteration` と `--max-items` は併用できない。
    /// 切り詰めたアイテムは継続トークンから再開しても取得できないため。
    pub fn pagination_options(
        &self,
        cancellation: CancellationSignal,
    ) -> Result<PaginationOptions, DomainError> {
        if self.no_auto_iteration && self.max_items.is_some() {
            return Err(DomainError::MutuallyExclusive {
                first:  "no-auto-iteration",
                second: "max-items",
            });
        }
        Ok(PaginationOptions {
            mode: PagingMode::from_no_auto_iteration(self.no_auto_iteration),
            initial_token: self.next_token.clone().and_then(NextToken::new),
            emit_limit: self.max_items.map(EmitLimit::new).transpose()?,
            cancellation,
        })
    }

    /// ページサイズを検証する
    ///
    /// `bounds` が `None` のオペレーションでは `--page-size` を受け付けない。
    pub fn page_size(&self, bounds: Option<PageSizeBounds>) -> Result<Option<PageSize>, DomainError> {
        match (self.page_size, bounds) {
            (None, _) => Ok(None),
            (Some(value), Some(bounds)) => PageSize::new(value, bounds).map(Some),
            (Some(_), None) => Err(DomainError::Validation(
                "このコマンドレットは --page-size をサポートしていません".to_string(),
            )),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// アラームを取得する（DescribeAlarms）
    #[command(name = "get-cw-alarm")]
    GetCwAlarm(GetCwAlarmArgs),

    /// メトリクスの一覧を取得する（ListMetrics）
    #[command(name = "get-cw-metric-list")]
    GetCwMetricList(GetCwMetricListArgs),

    /// ダッシュボードの一覧を取得する（ListDashboards）
    #[command(name = "get-cw-dashboard-list")]
    GetCwDashboardList(GetCwDashboardListArgs),

    /// 異常検出器を取得する（DescribeAnomalyDetectors）
    #[command(name = "get-cw-anomaly-detector")]
    GetCwAnomalyDetector(GetCwAnomalyDetectorArgs),

    /// アラーム履歴を取得する（DescribeAlarmHistory）
    #[command(name = "get-cw-alarm-history")]
    GetCwAlarmHistory(GetCwAlarmHistoryArgs),

    /// メトリクスの統計値を取得する（GetMetricStatistics）
    #[command(name = "get-cw-metric-statistic")]
    GetCwMetricStatistic(GetCwMetricStatisticArgs),

    /// カスタムメトリクスを送信する（PutMetricData）
    #[command(name = "write-cw-metric-data")]
    WriteCwMetricData(WriteCwMetricDataArgs),

    /// アラームの状態を一時的に変更する（SetAlarmState）
    #[command(name = "set-cw-alarm-state")]
    SetCwAlarmState(SetCwAlarmStateArgs),

    /// WorkSpace を取得する（DescribeWorkspaces）
    #[command(name = "get-wks-workspace")]
    GetWksWorkspace(GetWksWorkspaceArgs),

    /// ディレクトリを取得する（DescribeWorkspaceDirectories）
    #[command(name = "get-wks-workspace-directory")]
    GetWksWorkspaceDirectory(GetWksWorkspaceDirectoryArgs),

    /// バンドルを取得する（DescribeWorkspaceBundles）
    #[command(name = "get-wks-workspace-bundle")]
    GetWksWorkspaceBundle(GetWksWorkspaceBundleArgs),
}

impl Command {
    /// コマンドレット名
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetCwAlarm(_) => "get-cw-alarm",
            Self::GetCwMetricList(_) => "get-cw-metric-list",
            Self::GetCwDashboardList(_) => "get-cw-dashboard-list",
            Self::GetCwAnomalyDetector(_) => "get-cw-anomaly-detector",
            Self::GetCwAlarmHistory(_) => "get-cw-alarm-history",
            Self::GetCwMetricStatistic(_) => "get-cw-metric-statistic",
            Self::WriteCwMetricData(_) => "write-cw-metric-data",
            Self::SetCwAlarmState(_) => "set-cw-alarm-state",
            Self::GetWksWorkspace(_) => "get-wks-workspace",
            Self::GetWksWorkspaceDirectory(_) => "get-wks-workspace-directory",
            Self::GetWksWorkspaceBundle(_) => "get-wks-workspace-bundle",
        }
    }

    /// 呼び出し先のサービス名
    pub fn service(&self) -> &'static str {
        match self {
            Self::GetWksWorkspace(_)
            | Self::GetWksWorkspaceDirectory(_)
            | Self::GetWksWorkspaceBundle(_) => service::WORKSPACES,
            _ => service::CLOUDWATCH,
        }
    }
}

// =========================================================================
// CloudWatch
// =========================================================================

#[derive(Args, Debug, Clone)]
pub struct GetCwAlarmArgs {
    /// アラーム名（複数指定可、最大 100）
    #[arg(long = "alarm-name")]
    pub alarm_names: Vec<String>,

    /// アラーム名の前方一致
    #[arg(long)]
    pub alarm_name_prefix: Option<String>,

    /// アラームの種類（MetricAlarm / CompositeAlarm）
    #[arg(long = "alarm-type")]
    pub alarm_types: Vec<AlarmType>,

    /// アラームの状態（OK / ALARM / INSUFFICIENT_DATA）
    #[arg(long)]
    pub state_value: Option<AlarmState>,

    /// アクション ARN の前方一致
    #[arg(long)]
    pub action_prefix: Option<String>,

    #[command(flatten)]
    pub paging: PagingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GetCwMetricListArgs {
    #[arg(long)]
    pub namespace: Option<String>,

    #[arg(long)]
    pub metric_name: Option<String>,

    /// `Name=Value` または `Name`（複数指定可、最大 10）
    #[arg(long = "dimension", value_parser = parse_dimension)]
    pub dimensions: Vec<DimensionFilter>,

    /// 直近 3 時間にデータがあったメトリクスのみ
    #[arg(long)]
    pub recently_active: bool,

    #[command(flatten)]
    pub paging: PagingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GetCwDashboardListArgs {
    #[arg(long)]
    pub dashboard_name_prefix: Option<String>,

    #[command(flatten)]
    pub paging: PagingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GetCwAnomalyDetectorArgs {
    #[arg(long)]
    pub namespace: Option<String>,

    #[arg(long)]
    pub metric_name: Option<String>,

    /// `Name=Value`（複数指定可）
    #[arg(long = "dimension", value_parser = parse_dimension)]
    pub dimensions: Vec<DimensionFilter>,

    #[command(flatten)]
    pub paging: PagingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GetCwAlarmHistoryArgs {
    #[arg(long)]
    pub alarm_name: Option<String>,

    #[arg(long = "alarm-type")]
    pub alarm_types: Vec<AlarmType>,

    /// ConfigurationUpdate / StateUpdate / Action
    #[arg(long)]
    pub history_item_type: Option<HistoryItemType>,

    /// 開始日時（ローカル時刻、非推奨: --utc-start-date を使用）
    #[arg(long, value_parser = parse_local_datetime)]
    pub start_date: Option<NaiveDateTime>,

    /// 終了日時（ローカル時刻、非推奨: --utc-end-date を使用）
    #[arg(long, value_parser = parse_local_datetime)]
    pub end_date: Option<NaiveDateTime>,

    /// 開始日時（UTC、RFC 3339）
    #[arg(long)]
    pub utc_start_date: Option<DateTime<Utc>>,

    /// 終了日時（UTC、RFC 3339）
    #[arg(long)]
    pub utc_end_date: Option<DateTime<Utc>>,

    /// TimestampDescending / TimestampAscending
    #[arg(long)]
    pub scan_by: Option<ScanBy>,

    #[command(flatten)]
    pub paging: PagingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GetCwMetricStatisticArgs {
    #[arg(long)]
    pub namespace: Option<String>,

    #[arg(long)]
    pub metric_name: Option<String>,

    /// `Name=Value`（複数指定可）
    #[arg(long = "dimension", value_parser = parse_dimension)]
    pub dimensions: Vec<DimensionFilter>,

    /// 開始時刻（ローカル時刻、非推奨: --utc-start-time を使用）
    #[arg(long, value_parser = parse_local_datetime)]
    pub start_time: Option<NaiveDateTime>,

    /// 終了時刻（ローカル時刻、非推奨: --utc-end-time を使用）
    #[arg(long, value_parser = parse_local_datetime)]
    pub end_time: Option<NaiveDateTime>,

    /// 開始時刻（UTC、RFC 3339）
    #[arg(long)]
    pub utc_start_time: Option<DateTime<Utc>>,

    /// 終了時刻（UTC、RFC 3339）
    #[arg(long)]
    pub utc_end_time: Option<DateTime<Utc>>,

    /// 集計期間（秒）
    #[arg(long)]
    pub period: Option<i32>,

    /// SampleCount / Average / Sum / Minimum / Maximum（複数指定可）
    #[arg(long = "statistic")]
    pub statistics: Vec<Statistic>,

    /// パーセンタイル統計（例: p99）
    #[arg(long = "extended-statistic")]
    pub extended_statistics: Vec<String>,

    #[arg(long)]
    pub unit: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct WriteCwMetricDataArgs {
    #[arg(long)]
    pub namespace: Option<String>,

    #[arg(long)]
    pub metric_name: Option<String>,

    #[arg(long)]
    pub value: Option<f64>,

    #[arg(long)]
    pub unit: Option<String>,

    /// `Name=Value`（複数指定可）
    #[arg(long = "dimension", value_parser = parse_dimension)]
    pub dimensions: Vec<DimensionFilter>,

    /// データポイントの時刻（UTC、省略時は受信時刻）
    #[arg(long)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Clone)]
pub struct SetCwAlarmStateArgs {
    #[arg(long)]
    pub alarm_name: Option<String>,

    #[arg(long)]
    pub state_value: Option<AlarmState>,

    #[arg(long)]
    pub state_reason: Option<String>,

    /// 理由の詳細（JSON 文字列）
    #[arg(long)]
    pub state_reason_data: Option<String>,
}

// =========================================================================
// WorkSpaces
// =========================================================================

#[derive(Args, Debug, Clone)]
pub struct GetWksWorkspaceArgs {
    /// WorkSpace ID（複数指定可、最大 25）
    #[arg(long = "workspace-id")]
    pub workspace_ids: Vec<String>,

    #[arg(long)]
    pub directory_id: Option<String>,

    /// ユーザー名（--directory-id が必要）
    #[arg(long)]
    pub user_name: Option<String>,

    #[arg(long)]
    pub bundle_id: Option<String>,

    #[command(flatten)]
    pub paging: PagingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GetWksWorkspaceDirectoryArgs {
    /// ディレクトリ ID（複数指定可、最大 25）
    #[arg(long = "directory-id")]
    pub directory_ids: Vec<String>,

    #[command(flatten)]
    pub paging: PagingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GetWksWorkspaceBundleArgs {
    /// バンドル ID（複数指定可、最大 25）
    #[arg(long = "bundle-id")]
    pub bundle_ids: Vec<String>,

    /// 所有者（`AMAZON` で AWS 提供のバンドル）
    #[arg(long)]
    pub owner: Option<String>,

    #[command(flatten)]
    pub paging: PagingArgs,
}

// =========================================================================
// 値パーサ
// =========================================================================

fn parse_dimension(s: &str) -> Result<DimensionFilter, String> {
    DimensionFilter::parse(s).map_err(|e| e.to_string())
}

/// タイムゾーンなしの日時をパースする
///
/// `2024-01-31T09:00:00`、`2024-01-31 09:00:00`、`2024-01-31`（0 時）を受け付ける。
pub fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| format!("日時の書式が不正です: {s:?}（例: 2024-01-31T09:00:00）"))
}
