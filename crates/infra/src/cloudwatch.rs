//! # CloudWatch クライアント
//!
//! CloudWatch API のオペレーションを提供するクライアント。
//!
//! ## 設計方針
//!
//! - **トレイトで抽象化**: [`CloudWatchClient`] を介して呼び出し、テスト時はモックに差し替える
//! - **1 メソッド 1 ページ**: 一覧系メソッドは継続トークンを受け取り 1 ページだけ返す。
//!   ページングの制御は [`crate::paginator`] が行う
//! - **型変換はこのモジュールで完結**: SDK の型をドメインモデルに変換して返す

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudwatch::{
    Client,
    primitives::DateTime as SdkDateTime,
    types::{
        self as sdk,
        AlarmType as SdkAlarmType,
        HistoryItemType as SdkHistoryItemType,
        RecentlyActive,
        ScanBy as SdkScanBy,
        StandardUnit,
        StateValue,
        Statistic as SdkStatistic,
    },
};
use awscmd_domain::{
    cloudwatch::{
        AlarmHistoryItem,
        AnomalyDetector,
        CompositeAlarm,
        DashboardEntry,
        Datapoint,
        DescribeAlarmHistoryFilter,
        DescribeAlarmHistoryResponse,
        DescribeAlarmsFilter,
        DescribeAlarmsResponse,
        DescribeAnomalyDetectorsFilter,
        DescribeAnomalyDetectorsResponse,
        Dimension,
        DimensionFilter,
        GetMetricStatisticsRequest,
        GetMetricStatisticsResponse,
        ListDashboardsFilter,
        ListDashboardsResponse,
        ListMetricsFilter,
        ListMetricsResponse,
        Metric,
        MetricAlarm,
        MetricDatum,
        PutMetricDataRequest,
        SetAlarmStateRequest,
    },
    pagination::{NextToken, PageSize},
};
use chrono::{DateTime, Utc};

use crate::{InfraError, config::region_name};

const SERVICE: &str = "cloudwatch";

/// CloudWatch クライアントのインターフェース
#[async_trait]
pub trait CloudWatchClient: Send + Sync {
    /// アラームを 1 ページ取得する（DescribeAlarms）
    async fn describe_alarms(
        &self,
        filter: &DescribeAlarmsFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeAlarmsResponse, InfraError>;

    /// メトリクスを 1 ページ取得する（ListMetrics、1 ページ最大 500 件）
    async fn list_metrics(
        &self,
        filter: &ListMetricsFilter,
        next_token: Option<&NextToken>,
    ) -> Result<ListMetricsResponse, InfraError>;

    /// ダッシュボードを 1 ページ取得する（ListDashboards）
    async fn list_dashboards(
        &self,
        filter: &ListDashboardsFilter,
        next_token: Option<&NextToken>,
    ) -> Result<ListDashboardsResponse, InfraError>;

    /// 異常検出器を 1 ページ取得する（DescribeAnomalyDetectors）
    async fn describe_anomaly_detectors(
        &self,
        filter: &DescribeAnomalyDetectorsFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeAnomalyDetectorsResponse, InfraError>;

    /// アラーム履歴を 1 ページ取得する（DescribeAlarmHistory）
    async fn describe_alarm_history(
        &self,
        filter: &DescribeAlarmHistoryFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeAlarmHistoryResponse, InfraError>;

    /// 統計値を取得する（GetMetricStatistics、ページングなし）
    async fn get_metric_statistics(
        &self,
        request: &GetMetricStatisticsRequest,
    ) -> Result<GetMetricStatisticsResponse, InfraError>;

    /// カスタムメトリクスを送信する（PutMetricData）
    async fn put_metric_data(&self, request: &PutMetricDataRequest) -> Result<(), InfraError>;

    /// アラームの状態を一時的に変更する（SetAlarmState）
    async fn set_alarm_state(&self, request: &SetAlarmStateRequest) -> Result<(), InfraError>;
}

/// AWS CloudWatch クライアント
///
/// `aws-sdk-cloudwatch` を使用した [`CloudWatchClient`] の実装。
pub struct AwsCloudWatchClient {
    client: Client,
    region: String,
}

impl AwsCloudWatchClient {
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// 共有の SDK 設定から作成する
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(Client::new(sdk_config), region_name(sdk_config))
    }

    fn sdk_error<E>(&self, operation: &'static str, err: &E) -> InfraError
    where
        E: std::error::Error + 'static,
    {
        InfraError::from_sdk(SERVICE, operation, &self.region, err)
    }
}

#[async_trait]
impl CloudWatchClient for AwsCloudWatchClient {
    #[tracing::instrument(skip_all, level = "debug", fields(operation = "DescribeAlarms"))]
    async fn describe_alarms(
        &self,
        filter: &DescribeAlarmsFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeAlarmsResponse, InfraError> {
        let output = self
            .client
            .describe_alarms()
            .set_alarm_names(non_empty(&filter.alarm_names).map(<[_]>::to_vec))
            .set_alarm_name_prefix(filter.alarm_name_prefix.clone())
            .set_alarm_types(non_empty(&filter.alarm_types).map(|types| {
                types
                    .iter()
                    .map(|t| SdkAlarmType::from(t.as_ref()))
                    .collect()
            }))
            .set_state_value(filter.state_value.map(|s| StateValue::from(s.as_ref())))
            .set_action_prefix(filter.action_prefix.clone())
            .set_max_records(page_size.map(|p| p.as_i32()))
            .set_next_token(next_token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| self.sdk_error("DescribeAlarms", &e))?;

        Ok(DescribeAlarmsResponse {
            metric_alarms:    output
                .metric_alarms
                .unwrap_or_default()
                .into_iter()
                .map(metric_alarm_from_sdk)
                .collect(),
            composite_alarms: output
                .composite_alarms
                .unwrap_or_default()
                .into_iter()
                .map(composite_alarm_from_sdk)
                .collect(),
            next_token:       NextToken::from_response(output.next_token),
        })
    }

    #[tracing::instrument(skip_all, level = "debug", fields(operation = "ListMetrics"))]
    async fn list_metrics(
        &self,
        filter: &ListMetricsFilter,
        next_token: Option<&NextToken>,
    ) -> Result<ListMetricsResponse, InfraError> {
        let dimensions = non_empty(&filter.dimensions)
            .map(|dims| dims.iter().map(dimension_filter_to_sdk).collect());

        let mut request = self
            .client
            .list_metrics()
            .set_namespace(filter.namespace.clone())
            .set_metric_name(filter.metric_name.clone())
            .set_dimensions(dimensions)
            .set_next_token(next_token.map(|t| t.as_str().to_string()));
        if filter.recently_active {
            request = request.recently_active(RecentlyActive::Pt3H);
        }

        let output = request
            .send()
            .await
            .map_err(|e| self.sdk_error("ListMetrics", &e))?;

        Ok(ListMetricsResponse {
            metrics:    output
                .metrics
                .unwrap_or_default()
                .into_iter()
                .map(|m| Metric {
                    namespace:   m.namespace,
                    metric_name: m.metric_name,
                    dimensions:  dimensions_from_sdk(m.dimensions),
                })
                .collect(),
            next_token: NextToken::from_response(output.next_token),
        })
    }

    #[tracing::instrument(skip_all, level = "debug", fields(operation = "ListDashboards"))]
    async fn list_dashboards(
        &self,
        filter: &ListDashboardsFilter,
        next_token: Option<&NextToken>,
    ) -> Result<ListDashboardsResponse, InfraError> {
        let output = self
            .client
            .list_dashboards()
            .set_dashboard_name_prefix(filter.dashboard_name_prefix.clone())
            .set_next_token(next_token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| self.sdk_error("ListDashboards", &e))?;

        Ok(ListDashboardsResponse {
            dashboard_entries: output
                .dashboard_entries
                .unwrap_or_default()
                .into_iter()
                .map(|d| DashboardEntry {
                    dashboard_name: d.dashboard_name,
                    dashboard_arn:  d.dashboard_arn,
                    last_modified:  d.last_modified.as_ref().and_then(to_chrono),
                    size:           d.size,
                })
                .collect(),
            next_token:        NextToken::from_response(output.next_token),
        })
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(operation = "DescribeAnomalyDetectors")
    )]
    async fn describe_anomaly_detectors(
        &self,
        filter: &DescribeAnomalyDetectorsFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeAnomalyDetectorsResponse, InfraError> {
        let output = self
            .client
            .describe_anomaly_detectors()
            .set_namespace(filter.namespace.clone())
            .set_metric_name(filter.metric_name.clone())
            .set_dimensions(
                non_empty(&filter.dimensions)
                    .map(|dims| dims.iter().map(dimension_to_sdk).collect()),
            )
            .set_max_results(page_size.map(|p| p.as_i32()))
            .set_next_token(next_token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| self.sdk_error("DescribeAnomalyDetectors", &e))?;

        Ok(DescribeAnomalyDetectorsResponse {
            anomaly_detectors: output
                .anomaly_detectors
                .unwrap_or_default()
                .into_iter()
                .map(anomaly_detector_from_sdk)
                .collect(),
            next_token:        NextToken::from_response(output.next_token),
        })
    }

    #[tracing::instrument(skip_all, level = "debug", fields(operation = "DescribeAlarmHistory"))]
    async fn describe_alarm_history(
        &self,
        filter: &DescribeAlarmHistoryFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeAlarmHistoryResponse, InfraError> {
        let output = self
            .client
            .describe_alarm_history()
            .set_alarm_name(filter.alarm_name.clone())
            .set_alarm_types(non_empty(&filter.alarm_types).map(|types| {
                types
                    .iter()
                    .map(|t| SdkAlarmType::from(t.as_ref()))
                    .collect()
            }))
            .set_history_item_type(
                filter
                    .history_item_type
                    .map(|t| SdkHistoryItemType::from(t.as_ref())),
            )
            .set_start_date(filter.start_date.map(to_sdk_datetime))
            .set_end_date(filter.end_date.map(to_sdk_datetime))
            .set_scan_by(filter.scan_by.map(|s| SdkScanBy::from(s.as_ref())))
            .set_max_records(page_size.map(|p| p.as_i32()))
            .set_next_token(next_token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| self.sdk_error("DescribeAlarmHistory", &e))?;

        Ok(DescribeAlarmHistoryResponse {
            alarm_history_items: output
                .alarm_history_items
                .unwrap_or_default()
                .into_iter()
                .map(|h| AlarmHistoryItem {
                    alarm_name:        h.alarm_name,
                    alarm_type:        h.alarm_type.and_then(|t| t.as_str().parse().ok()),
                    timestamp:         h.timestamp.as_ref().and_then(to_chrono),
                    history_item_type: h
                        .history_item_type
                        .and_then(|t| t.as_str().parse().ok()),
                    history_summary:   h.history_summary,
                    history_data:      h.history_data,
                })
                .collect(),
            next_token:          NextToken::from_response(output.next_token),
        })
    }

    #[tracing::instrument(skip_all, level = "debug", fields(operation = "GetMetricStatistics"))]
    async fn get_metric_statistics(
        &self,
        request: &GetMetricStatisticsRequest,
    ) -> Result<GetMetricStatisticsResponse, InfraError> {
        let output = self
            .client
            .get_metric_statistics()
            .namespace(&request.namespace)
            .metric_name(&request.metric_name)
            .set_dimensions(
                non_empty(&request.dimensions)
                    .map(|dims| dims.iter().map(dimension_to_sdk).collect()),
            )
            .start_time(to_sdk_datetime(request.start_time))
            .end_time(to_sdk_datetime(request.end_time))
            .period(request.period)
            .set_statistics(non_empty(&request.statistics).map(|stats| {
                stats
                    .iter()
                    .map(|s| SdkStatistic::from(s.as_ref()))
                    .collect()
            }))
            .set_extended_statistics(non_empty(&request.extended_statistics).map(<[_]>::to_vec))
            .set_unit(request.unit.as_deref().map(StandardUnit::from))
            .send()
            .await
            .map_err(|e| self.sdk_error("GetMetricStatistics", &e))?;

        let mut datapoints: Vec<Datapoint> = output
            .datapoints
            .unwrap_or_default()
            .into_iter()
            .map(|d| Datapoint {
                timestamp:    d.timestamp.as_ref().and_then(to_chrono),
                sample_count: d.sample_count,
                average:      d.average,
                sum:          d.sum,
                minimum:      d.minimum,
                maximum:      d.maximum,
                unit:         d.unit.map(|u| u.as_str().to_string()),
            })
            .collect();
        // API はデータポイントの順序を保証しない
        datapoints.sort_by_key(|d| d.timestamp);

        Ok(GetMetricStatisticsResponse {
            label: output.label,
            datapoints,
        })
    }

    #[tracing::instrument(skip_all, level = "debug", fields(operation = "PutMetricData"))]
    async fn put_metric_data(&self, request: &PutMetricDataRequest) -> Result<(), InfraError> {
        let metric_data = request.metric_data.iter().map(metric_datum_to_sdk).collect();

        self.client
            .put_metric_data()
            .namespace(&request.namespace)
            .set_metric_data(Some(metric_data))
            .send()
            .await
            .map_err(|e| self.sdk_error("PutMetricData", &e))?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(operation = "SetAlarmState"))]
    async fn set_alarm_state(&self, request: &SetAlarmStateRequest) -> Result<(), InfraError> {
        self.client
            .set_alarm_state()
            .alarm_name(&request.alarm_name)
            .state_value(StateValue::from(request.state_value.as_ref()))
            .state_reason(&request.state_reason)
            .set_state_reason_data(request.state_reason_data.clone())
            .send()
            .await
            .map_err(|e| self.sdk_error("SetAlarmState", &e))?;

        Ok(())
    }
}

// ===== 型変換 =====

/// 空のリストはパラメータ未指定として扱う
fn non_empty<T>(values: &[T]) -> Option<&[T]> {
    (!values.is_empty()).then_some(values)
}

/// SDK の日時を chrono に変換する
pub(crate) fn to_chrono(t: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
}

fn to_sdk_datetime(t: DateTime<Utc>) -> SdkDateTime {
    SdkDateTime::from_secs_and_nanos(t.timestamp(), t.timestamp_subsec_nanos())
}

fn dimension_to_sdk(d: &Dimension) -> sdk::Dimension {
    sdk::Dimension::builder()
        .name(&d.name)
        .value(&d.value)
        .build()
}

fn dimension_filter_to_sdk(d: &DimensionFilter) -> sdk::DimensionFilter {
    sdk::DimensionFilter::builder()
        .name(&d.name)
        .set_value(d.value.clone())
        .build()
}

fn dimensions_from_sdk(dimensions: Option<Vec<sdk::Dimension>>) -> Vec<Dimension> {
    dimensions
        .unwrap_or_default()
        .into_iter()
        .map(|d| Dimension {
            name:  d.name.unwrap_or_default(),
            value: d.value.unwrap_or_default(),
        })
        .collect()
}

fn metric_datum_to_sdk(d: &MetricDatum) -> sdk::MetricDatum {
    sdk::MetricDatum::builder()
        .metric_name(&d.metric_name)
        .set_dimensions(
            non_empty(&d.dimensions).map(|dims| dims.iter().map(dimension_to_sdk).collect()),
        )
        .value(d.value)
        .set_unit(d.unit.as_deref().map(StandardUnit::from))
        .set_timestamp(d.timestamp.map(to_sdk_datetime))
        .build()
}

fn metric_alarm_from_sdk(a: sdk::MetricAlarm) -> MetricAlarm {
    MetricAlarm {
        alarm_name:              a.alarm_name,
        alarm_arn:               a.alarm_arn,
        alarm_description:       a.alarm_description,
        state_value:             a.state_value.and_then(|s| s.as_str().parse().ok()),
        state_reason:            a.state_reason,
        namespace:               a.namespace,
        metric_name:             a.metric_name,
        dimensions:              dimensions_from_sdk(a.dimensions),
        statistic:               a
            .statistic
            .map(|s| s.as_str().to_string())
            .or(a.extended_statistic),
        threshold:               a.threshold,
        comparison_operator:     a.comparison_operator.map(|c| c.as_str().to_string()),
        evaluation_periods:      a.evaluation_periods,
        period:                  a.period,
        actions_enabled:         a.actions_enabled,
        state_updated_timestamp: a.state_updated_timestamp.as_ref().and_then(to_chrono),
    }
}

fn composite_alarm_from_sdk(a: sdk::CompositeAlarm) -> CompositeAlarm {
    CompositeAlarm {
        alarm_name:              a.alarm_name,
        alarm_arn:               a.alarm_arn,
        alarm_description:       a.alarm_description,
        alarm_rule:              a.alarm_rule,
        state_value:             a.state_value.and_then(|s| s.as_str().parse().ok()),
        actions_enabled:         a.actions_enabled,
        state_updated_timestamp: a.state_updated_timestamp.as_ref().and_then(to_chrono),
    }
}

fn anomaly_detector_from_sdk(a: sdk::AnomalyDetector) -> AnomalyDetector {
    let single = a.single_metric_anomaly_detector;
    AnomalyDetector {
        namespace:   single.as_ref().and_then(|s| s.namespace.clone()),
        metric_name: single.as_ref().and_then(|s| s.metric_name.clone()),
        dimensions:  dimensions_from_sdk(single.as_ref().and_then(|s| s.dimensions.clone())),
        stat:        single.as_ref().and_then(|s| s.stat.clone()),
        state_value: a.state_value.map(|s| s.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_日時はナノ秒まで往復変換できる() {
        let original = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(123_000_000);

        let converted = to_chrono(&to_sdk_datetime(original));

        assert_eq!(converted, Some(original));
    }

    #[test]
    fn test_sdkのメトリクスアラームをドメインモデルに変換する() {
        let sdk_alarm = sdk::MetricAlarm::builder()
            .alarm_name("cpu-high")
            .state_value(StateValue::Alarm)
            .namespace("AWS/EC2")
            .metric_name("CPUUtilization")
            .dimensions(dimension_to_sdk(&Dimension::new("InstanceId", "i-1")))
            .statistic(SdkStatistic::Average)
            .threshold(80.0)
            .build();

        let alarm = metric_alarm_from_sdk(sdk_alarm);

        assert_eq!(alarm.alarm_name.as_deref(), Some("cpu-high"));
        assert_eq!(
            alarm.state_value,
            Some(awscmd_domain::cloudwatch::AlarmState::Alarm)
        );
        assert_eq!(alarm.statistic.as_deref(), Some("Average"));
        assert_eq!(alarm.dimensions, vec![Dimension::new("InstanceId", "i-1")]);
        assert_eq!(alarm.threshold, Some(80.0));
    }

    #[test]
    fn test_異常検出器は単一メトリクスの定義から変換する() {
        let sdk_detector = sdk::AnomalyDetector::builder()
            .single_metric_anomaly_detector(
                sdk::SingleMetricAnomalyDetector::builder()
                    .namespace("AWS/Lambda")
                    .metric_name("Duration")
                    .stat("Average")
                    .build(),
            )
            .build();

        let detector = anomaly_detector_from_sdk(sdk_detector);

        assert_eq!(detector.namespace.as_deref(), Some("AWS/Lambda"));
        assert_eq!(detector.metric_name.as_deref(), Some("Duration"));
        assert_eq!(detector.stat.as_deref(), Some("Average"));
        assert!(detector.dimensions.is_empty());
    }

    #[test]
    fn test_空のリストは未指定として扱う() {
        let empty: Vec<String> = vec![];

        assert_eq!(non_empty(&empty), None);
        assert_eq!(non_empty(&["a".to_string()]).map(<[_]>::len), Some(1));
    }
}
