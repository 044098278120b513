//! # セレクタ
//!
//! レスポンス全体からパイプラインに出力する要素を取り出す関数。
//! コマンドレットごとに既定のセレクタと、`--select` で選べる名前付きの候補を持つ。
//!
//! 名前と関数の対応は静的なテーブルで定義し、実行時の型情報は使わない。
//! `*` はどのコマンドレットでもレスポンス全体を 1 要素として出力する。

use awscmd_domain::{
    DomainError,
    cloudwatch::{
        DescribeAlarmHistoryResponse,
        DescribeAlarmsResponse,
        DescribeAnomalyDetectorsResponse,
        ListDashboardsResponse,
        ListMetricsResponse,
    },
    workspaces::{
        DescribeWorkspaceBundlesResponse,
        DescribeWorkspaceDirectoriesResponse,
        DescribeWorkspacesResponse,
    },
};
use awscmd_infra::InfraError;
use serde::Serialize;
use serde_json::Value;

/// レスポンスを出力要素の列に変換する関数
pub type Selector<R> = fn(R) -> Result<Vec<Value>, InfraError>;

/// レスポンス全体を選ぶセレクタ名
pub const WHOLE_RESPONSE: &str = "*";

/// 1 コマンドレット分のセレクタの集合
pub struct SelectorSet<R: 'static> {
    /// `--select` 未指定時に使う候補の名前
    pub default: &'static str,
    pub named:   &'static [(&'static str, Selector<R>)],
}

impl<R: Serialize + 'static> SelectorSet<R> {
    /// `--select` の値からセレクタを決める
    ///
    /// 名前の大文字小文字は区別しない。
    pub fn resolve(&self, name: Option<&str>) -> Result<Selector<R>, DomainError> {
        let name = name.unwrap_or(self.default);
        if name == WHOLE_RESPONSE {
            return Ok(whole::<R>);
        }

        self.named
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, selector)| *selector)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "--select の値 {name:?} は不正です（指定可能: {}）",
                    self.candidates().join(", ")
                ))
            })
    }

    fn candidates(&self) -> Vec<&'static str> {
        self.named
            .iter()
            .map(|(name, _)| *name)
            .chain(std::iter::once(WHOLE_RESPONSE))
            .collect()
    }
}

fn values<T: Serialize>(items: Vec<T>) -> Result<Vec<Value>, InfraError> {
    items
        .into_iter()
        .map(|item| serde_json::to_value(item).map_err(InfraError::from))
        .collect()
}

fn whole<R: Serialize>(response: R) -> Result<Vec<Value>, InfraError> {
    Ok(vec![serde_json::to_value(response)?])
}

// =========================================================================
// CloudWatch
// =========================================================================

pub const DESCRIBE_ALARMS: SelectorSet<DescribeAlarmsResponse> = SelectorSet {
    default: "MetricAlarms",
    named:   &[
        ("MetricAlarms", metric_alarms),
        ("CompositeAlarms", composite_alarms),
    ],
};

pub const LIST_METRICS: SelectorSet<ListMetricsResponse> = SelectorSet {
    default: "Metrics",
    named:   &[("Metrics", metrics)],
};

pub const LIST_DASHBOARDS: SelectorSet<ListDashboardsResponse> = SelectorSet {
    default: "DashboardEntries",
    named:   &[("DashboardEntries", dashboard_entries)],
};

pub const DESCRIBE_ANOMALY_DETECTORS: SelectorSet<DescribeAnomalyDetectorsResponse> =
    SelectorSet {
        default: "AnomalyDetectors",
        named:   &[("AnomalyDetectors", anomaly_detectors)],
    };

pub const DESCRIBE_ALARM_HISTORY: SelectorSet<DescribeAlarmHistoryResponse> = SelectorSet {
    default: "AlarmHistoryItems",
    named:   &[("AlarmHistoryItems", alarm_history_items)],
};

fn metric_alarms(response: DescribeAlarmsResponse) -> Result<Vec<Value>, InfraError> {
    values(response.metric_alarms)
}

fn composite_alarms(response: DescribeAlarmsResponse) -> Result<Vec<Value>, InfraError> {
    values(response.composite_alarms)
}

fn metrics(response: ListMetricsResponse) -> Result<Vec<Value>, InfraError> {
    values(response.metrics)
}

fn dashboard_entries(response: ListDashboardsResponse) -> Result<Vec<Value>, InfraError> {
    values(response.dashboard_entries)
}

fn anomaly_detectors(response: DescribeAnomalyDetectorsResponse) -> Result<Vec<Value>, InfraError> {
    values(response.anomaly_detectors)
}

fn alarm_history_items(response: DescribeAlarmHistoryResponse) -> Result<Vec<Value>, InfraError> {
    values(response.alarm_history_items)
}

// =========================================================================
// WorkSpaces
// =========================================================================

pub const DESCRIBE_WORKSPACES: SelectorSet<DescribeWorkspacesResponse> = SelectorSet {
    default: "Workspaces",
    named:   &[("Workspaces", workspaces)],
};

pub const DESCRIBE_WORKSPACE_DIRECTORIES: SelectorSet<DescribeWorkspaceDirectoriesResponse> =
    SelectorSet {
        default: "Directories",
        named:   &[("Directories", directories)],
    };

pub const DESCRIBE_WORKSPACE_BUNDLES: SelectorSet<DescribeWorkspaceBundlesResponse> =
    SelectorSet {
        default: "Bundles",
        named:   &[("Bundles", bundles)],
    };

fn workspaces(response: DescribeWorkspacesResponse) -> Result<Vec<Value>, InfraError> {
    values(response.workspaces)
}

fn directories(response: DescribeWorkspaceDirectoriesResponse) -> Result<Vec<Value>, InfraError> {
    values(response.directories)
}

fn bundles(response: DescribeWorkspaceBundlesResponse) -> Result<Vec<Value>, InfraError> {
    values(response.bundles)
}
