//! # CloudWatch
//!
//! CloudWatch のアラーム・メトリクス・ダッシュボード・異常検出器のモデルと、
//! 各オペレーションのフィルタ（リクエストパラメータ）を定義する。
//!
//! ## 設計方針
//!
//! - **モデルは出力専用**: パイプラインへ JSON として書き出すため `Serialize` を実装し、
//!   フィールド名はサービスの API と同じ PascalCase にする
//! - **フィルタはページ間で不変**: 継続トークン以外のパラメータはフィルタに閉じ込め、
//!   全ページの取得に同じ値を渡す
//! - **検証は `validate()`**: ネットワーク呼び出し前にホストが呼び出す

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    DomainError,
    error::{ensure_exclusive, ensure_max_len},
    pagination::{NextToken, PageSizeBounds, PagedResponse},
};

// =========================================================================
// 列挙型
// =========================================================================

/// アラームの状態
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AlarmState {
    Ok,
    Alarm,
    InsufficientData,
}

/// アラームの種類
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum AlarmType {
    MetricAlarm,
    CompositeAlarm,
}

/// アラーム履歴の種類
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum HistoryItemType {
    ConfigurationUpdate,
    StateUpdate,
    Action,
}

/// アラーム履歴の並び順
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ScanBy {
    TimestampDescending,
    TimestampAscending,
}

/// 統計の種類
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Statistic {
    SampleCount,
    Average,
    Sum,
    Minimum,
    Maximum,
}

// =========================================================================
// モデル
// =========================================================================

/// ディメンション
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub name:  String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name:  name.into(),
            value: value.into(),
        }
    }
}

/// ディメンションフィルタ（値を省略すると名前のみで一致）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionFilter {
    pub name:  String,
    pub value: Option<String>,
}

impl DimensionFilter {
    /// `Name=Value` または `Name` 形式の文字列をパースする
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
            None => (s.trim(), None),
        };
        if name.is_empty() {
            return Err(DomainError::Validation(format!(
                "ディメンション名が空です: {s:?}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            value,
        })
    }

    /// 値が必須の文脈で [`Dimension`] に変換する
    pub fn into_dimension(self) -> Result<Dimension, DomainError> {
        match self.value {
            Some(value) => Ok(Dimension::new(self.name, value)),
            None => Err(DomainError::Validation(format!(
                "ディメンション {} には値が必要です（Name=Value 形式で指定してください）",
                self.name
            ))),
        }
    }
}

/// メトリクスアラーム
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricAlarm {
    pub alarm_name:              Option<String>,
    pub alarm_arn:               Option<String>,
    pub alarm_description:       Option<String>,
    pub state_value:             Option<AlarmState>,
    pub state_reason:            Option<String>,
    pub namespace:               Option<String>,
    pub metric_name:             Option<String>,
    pub dimensions:              Vec<Dimension>,
    pub statistic:               Option<String>,
    pub threshold:               Option<f64>,
    pub comparison_operator:     Option<String>,
    pub evaluation_periods:      Option<i32>,
    pub period:                  Option<i32>,
    pub actions_enabled:         Option<bool>,
    pub state_updated_timestamp: Option<DateTime<Utc>>,
}

/// 複合アラーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompositeAlarm {
    pub alarm_name:              Option<String>,
    pub alarm_arn:               Option<String>,
    pub alarm_description:       Option<String>,
    pub alarm_rule:              Option<String>,
    pub state_value:             Option<AlarmState>,
    pub actions_enabled:         Option<bool>,
    pub state_updated_timestamp: Option<DateTime<Utc>>,
}

/// メトリクス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metric {
    pub namespace:   Option<String>,
    pub metric_name: Option<String>,
    pub dimensions:  Vec<Dimension>,
}

/// ダッシュボード一覧のエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DashboardEntry {
    pub dashboard_name: Option<String>,
    pub dashboard_arn:  Option<String>,
    pub last_modified:  Option<DateTime<Utc>>,
    pub size:           Option<i64>,
}

/// 異常検出器（単一メトリクス）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnomalyDetector {
    pub namespace:   Option<String>,
    pub metric_name: Option<String>,
    pub dimensions:  Vec<Dimension>,
    pub stat:        Option<String>,
    pub state_value: Option<String>,
}

/// アラーム履歴
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmHistoryItem {
    pub alarm_name:        Option<String>,
    pub alarm_type:        Option<AlarmType>,
    pub timestamp:         Option<DateTime<Utc>>,
    pub history_item_type: Option<HistoryItemType>,
    pub history_summary:   Option<String>,
    pub history_data:      Option<String>,
}

/// 統計値のデータポイント
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Datapoint {
    pub timestamp:    Option<DateTime<Utc>>,
    pub sample_count: Option<f64>,
    pub average:      Option<f64>,
    pub sum:          Option<f64>,
    pub minimum:      Option<f64>,
    pub maximum:      Option<f64>,
    pub unit:         Option<String>,
}

/// 送信するメトリクスデータ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDatum {
    pub metric_name: String,
    pub dimensions:  Vec<Dimension>,
    pub value:       f64,
    pub unit:        Option<String>,
    pub timestamp:   Option<DateTime<Utc>>,
}

// =========================================================================
// DescribeAlarms
// =========================================================================

/// DescribeAlarms のページサイズ（MaxRecords）
pub const DESCRIBE_ALARMS_PAGE_SIZE: PageSizeBounds = PageSizeBounds {
    parameter: "MaxRecords",
    min:       1,
    max:       100,
};

/// DescribeAlarms のフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeAlarmsFilter {
    pub alarm_names:       Vec<String>,
    pub alarm_name_prefix: Option<String>,
    pub alarm_types:       Vec<AlarmType>,
    pub state_value:       Option<AlarmState>,
    pub action_prefix:     Option<String>,
}

impl DescribeAlarmsFilter {
    /// アラーム名の完全一致と前方一致は排他
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_max_len(&self.alarm_names, 100, "alarm-name")?;
        ensure_exclusive(
            ("alarm-name", !self.alarm_names.is_empty()),
            ("alarm-name-prefix", self.alarm_name_prefix.is_some()),
        )
    }
}

/// DescribeAlarms のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeAlarmsResponse {
    pub metric_alarms:    Vec<MetricAlarm>,
    pub composite_alarms: Vec<CompositeAlarm>,
    pub next_token:       Option<NextToken>,
}

impl PagedResponse for DescribeAlarmsResponse {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

// =========================================================================
// ListMetrics
// =========================================================================

/// ListMetrics のフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMetricsFilter {
    pub namespace:       Option<String>,
    pub metric_name:     Option<String>,
    pub dimensions:      Vec<DimensionFilter>,
    /// 直近 3 時間にデータがあったメトリクスのみに絞る
    pub recently_active: bool,
}

impl ListMetricsFilter {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_max_len(&self.dimensions, 10, "dimension")
    }
}

/// ListMetrics のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListMetricsResponse {
    pub metrics:    Vec<Metric>,
    pub next_token: Option<NextToken>,
}

impl PagedResponse for ListMetricsResponse {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

// =========================================================================
// ListDashboards
// =========================================================================

/// ListDashboards のフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDashboardsFilter {
    pub dashboard_name_prefix: Option<String>,
}

/// ListDashboards のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListDashboardsResponse {
    pub dashboard_entries: Vec<DashboardEntry>,
    pub next_token:        Option<NextToken>,
}

impl PagedResponse for ListDashboardsResponse {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

// =========================================================================
// DescribeAnomalyDetectors
// =========================================================================

/// DescribeAnomalyDetectors のページサイズ（MaxResults）
pub const DESCRIBE_ANOMALY_DETECTORS_PAGE_SIZE: PageSizeBounds = PageSizeBounds {
    parameter: "MaxResults",
    min:       1,
    max:       100,
};

/// DescribeAnomalyDetectors のフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeAnomalyDetectorsFilter {
    pub namespace:   Option<String>,
    pub metric_name: Option<String>,
    pub dimensions:  Vec<Dimension>,
}

impl DescribeAnomalyDetectorsFilter {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_max_len(&self.dimensions, 30, "dimension")
    }
}

/// DescribeAnomalyDetectors のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeAnomalyDetectorsResponse {
    pub anomaly_detectors: Vec<AnomalyDetector>,
    pub next_token:        Option<NextToken>,
}

impl PagedResponse for DescribeAnomalyDetectorsResponse {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

// =========================================================================
// DescribeAlarmHistory
// =========================================================================

/// DescribeAlarmHistory のページサイズ（MaxRecords）
pub const DESCRIBE_ALARM_HISTORY_PAGE_SIZE: PageSizeBounds = PageSizeBounds {
    parameter: "MaxRecords",
    min:       1,
    max:       100,
};

/// DescribeAlarmHistory のフィルタ
///
/// 開始・終了日時は UTC に正規化済みの値を保持する
/// （旧形式からの変換は [`crate::time_bound`] で行う）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeAlarmHistoryFilter {
    pub alarm_name:        Option<String>,
    pub alarm_types:       Vec<AlarmType>,
    pub history_item_type: Option<HistoryItemType>,
    pub start_date:        Option<DateTime<Utc>>,
    pub end_date:          Option<DateTime<Utc>>,
    pub scan_by:           Option<ScanBy>,
}

impl DescribeAlarmHistoryFilter {
    pub fn validate(&self) -> Result<(), DomainError> {
        crate::time_bound::ensure_ordered(self.start_date, self.end_date)
    }
}

/// DescribeAlarmHistory のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeAlarmHistoryResponse {
    pub alarm_history_items: Vec<AlarmHistoryItem>,
    pub next_token:          Option<NextToken>,
}

impl PagedResponse for DescribeAlarmHistoryResponse {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

// =========================================================================
// GetMetricStatistics
// =========================================================================

/// GetMetricStatistics のリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMetricStatisticsRequest {
    pub namespace:           String,
    pub metric_name:         String,
    pub dimensions:          Vec<Dimension>,
    pub start_time:          DateTime<Utc>,
    pub end_time:            DateTime<Utc>,
    /// 集計期間（秒）
    pub period:              i32,
    pub statistics:          Vec<Statistic>,
    /// パーセンタイル統計（例: `p99`）
    pub extended_statistics: Vec<String>,
    pub unit:                Option<String>,
}

impl GetMetricStatisticsRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.namespace.trim().is_empty() {
            return Err(DomainError::MissingParameter("namespace"));
        }
        if self.metric_name.trim().is_empty() {
            return Err(DomainError::MissingParameter("metric-name"));
        }
        if self.period < 1 {
            return Err(DomainError::Validation(
                "--period は 1 秒以上である必要があります".to_string(),
            ));
        }
        if self.statistics.is_empty() && self.extended_statistics.is_empty() {
            return Err(DomainError::MissingParameter("statistic"));
        }
        ensure_max_len(&self.statistics, 5, "statistic")?;
        ensure_max_len(&self.extended_statistics, 10, "extended-statistic")?;
        ensure_max_len(&self.dimensions, 30, "dimension")?;
        crate::time_bound::ensure_ordered(Some(self.start_time), Some(self.end_time))
    }
}

/// GetMetricStatistics のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetMetricStatisticsResponse {
    pub label:      Option<String>,
    pub datapoints: Vec<Datapoint>,
}

// =========================================================================
// PutMetricData / SetAlarmState
// =========================================================================

/// PutMetricData のリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct PutMetricDataRequest {
    pub namespace:   String,
    pub metric_data: Vec<MetricDatum>,
}

impl PutMetricDataRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.namespace.trim().is_empty() {
            return Err(DomainError::MissingParameter("namespace"));
        }
        // AWS/ で始まる名前空間は AWS サービス専用
        if self.namespace.starts_with("AWS/") {
            return Err(DomainError::Validation(format!(
                "名前空間 {} は AWS 予約のため使用できません",
                self.namespace
            )));
        }
        if self.metric_data.is_empty() {
            return Err(DomainError::MissingParameter("metric-name"));
        }
        ensure_max_len(&self.metric_data, 1000, "metric-data")
    }
}

/// SetAlarmState のリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAlarmStateRequest {
    pub alarm_name:        String,
    pub state_value:       AlarmState,
    pub state_reason:      String,
    pub state_reason_data: Option<String>,
}

impl SetAlarmStateRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.alarm_name.trim().is_empty() {
            return Err(DomainError::MissingParameter("alarm-name"));
        }
        if self.state_reason.trim().is_empty() {
            return Err(DomainError::MissingParameter("state-reason"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn statistics_request() -> GetMetricStatisticsRequest {
        GetMetricStatisticsRequest {
            namespace:           "AWS/EC2".to_string(),
            metric_name:         "CPUUtilization".to_string(),
            dimensions:          vec![Dimension::new("InstanceId", "i-0123")],
            start_time:          Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_time:            Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
            period:              300,
            statistics:          vec![Statistic::Average],
            extended_statistics: vec![],
            unit:                None,
        }
    }

    #[rstest]
    #[case("OK", AlarmState::Ok)]
    #[case("alarm", AlarmState::Alarm)]
    #[case("INSUFFICIENT_DATA", AlarmState::InsufficientData)]
    fn test_alarm_stateは大文字小文字を区別せずパースできる(
        #[case] input: &str,
        #[case] expected: AlarmState,
    ) {
        assert_eq!(AlarmState::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_alarm_stateはapiと同じ表記で出力される() {
        assert_eq!(AlarmState::InsufficientData.to_string(), "INSUFFICIENT_DATA");
        assert_eq!(
            serde_json::to_value(AlarmState::Ok).unwrap(),
            serde_json::json!("OK")
        );
        assert_eq!(AlarmType::CompositeAlarm.as_ref(), "CompositeAlarm");
    }

    #[test]
    fn test_dimension_filterは名前のみと名前値の両方をパースできる() {
        assert_eq!(
            DimensionFilter::parse("InstanceId=i-1").unwrap(),
            DimensionFilter {
                name:  "InstanceId".to_string(),
                value: Some("i-1".to_string()),
            }
        );
        assert_eq!(DimensionFilter::parse("InstanceId").unwrap().value, None);
        assert!(DimensionFilter::parse("=x").is_err());
    }

    #[test]
    fn test_値のないdimension_filterはdimensionに変換できない() {
        let filter = DimensionFilter::parse("InstanceId").unwrap();
        assert!(filter.into_dimension().is_err());
    }

    #[test]
    fn test_describe_alarmsはアラーム名と前方一致を同時に指定できない() {
        let filter = DescribeAlarmsFilter {
            alarm_names: vec!["cpu-high".to_string()],
            alarm_name_prefix: Some("cpu".to_string()),
            ..Default::default()
        };

        assert_eq!(
            filter.validate(),
            Err(DomainError::MutuallyExclusive {
                first:  "alarm-name",
                second: "alarm-name-prefix",
            })
        );
    }

    #[test]
    fn test_list_metricsのディメンションは10件まで() {
        let filter = ListMetricsFilter {
            dimensions: (0..11)
                .map(|i| DimensionFilter::parse(&format!("d{i}")).unwrap())
                .collect(),
            ..Default::default()
        };

        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_get_metric_statisticsは統計の指定が必須() {
        let request = GetMetricStatisticsRequest {
            statistics: vec![],
            ..statistics_request()
        };

        assert_eq!(
            request.validate(),
            Err(DomainError::MissingParameter("statistic"))
        );
    }

    #[test]
    fn test_get_metric_statisticsは拡張統計のみでも有効() {
        let request = GetMetricStatisticsRequest {
            statistics: vec![],
            extended_statistics: vec!["p99".to_string()],
            ..statistics_request()
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_get_metric_statisticsは開始終了の逆転を拒否する() {
        let base = statistics_request();
        let request = GetMetricStatisticsRequest {
            start_time: base.end_time,
            end_time: base.start_time,
            ..base
        };

        assert!(matches!(request.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_put_metric_dataはaws予約名前空間を拒否する() {
        let request = PutMetricDataRequest {
            namespace:   "AWS/EC2".to_string(),
            metric_data: vec![MetricDatum {
                metric_name: "Custom".to_string(),
                dimensions:  vec![],
                value:       1.0,
                unit:        None,
                timestamp:   None,
            }],
        };

        assert!(matches!(request.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_set_alarm_stateは理由が必須() {
        let request = SetAlarmStateRequest {
            alarm_name:        "cpu-high".to_string(),
            state_value:       AlarmState::Alarm,
            state_reason:      " ".to_string(),
            state_reason_data: None,
        };

        assert_eq!(
            request.validate(),
            Err(DomainError::MissingParameter("state-reason"))
        );
    }

    #[test]
    fn test_レスポンスはpascal_caseでシリアライズされる() {
        let response = ListDashboardsResponse {
            dashboard_entries: vec![DashboardEntry {
                dashboard_name: Some("ops".to_string()),
                dashboard_arn:  None,
                last_modified:  None,
                size:           Some(42),
            }],
            next_token:        NextToken::new("n1"),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["DashboardEntries"][0]["DashboardName"], "ops");
        assert_eq!(json["DashboardEntries"][0]["Size"], 42);
        assert_eq!(json["NextToken"], "n1");
    }
}
