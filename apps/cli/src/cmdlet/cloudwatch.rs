//! CloudWatch のコマンドレット

use awscmd_domain::{
    DomainError,
    cloudwatch::{
        DESCRIBE_ALARM_HISTORY_PAGE_SIZE,
        DESCRIBE_ALARMS_PAGE_SIZE,
        DESCRIBE_ANOMALY_DETECTORS_PAGE_SIZE,
        DescribeAlarmHistoryFilter,
        DescribeAlarmsFilter,
        DescribeAnomalyDetectorsFilter,
        Dimension,
        DimensionFilter,
        GetMetricStatisticsRequest,
        ListDashboardsFilter,
        ListMetricsFilter,
        MetricDatum,
        PutMetricDataRequest,
        SetAlarmStateRequest,
    },
    pagination::NextToken,
    time_bound::TimeBoundInput,
};
use awscmd_infra::CloudWatchClient;

use super::{CmdletContext, resolve_required_time, resolve_time, run_paginated};
use crate::{
    args::{
        GetCwAlarmArgs,
        GetCwAlarmHistoryArgs,
        GetCwAnomalyDetectorArgs,
        GetCwDashboardListArgs,
        GetCwMetricListArgs,
        GetCwMetricStatisticArgs,
        SetCwAlarmStateArgs,
        WriteCwMetricDataArgs,
    },
    error::CliError,
    output::PipelineWriter,
    selector,
};

fn into_dimensions(filters: Vec<DimensionFilter>) -> Result<Vec<Dimension>, DomainError> {
    filters
        .into_iter()
        .map(DimensionFilter::into_dimension)
        .collect()
}

/// get-cw-alarm
pub(super) async fn get_alarm(
    client: &dyn CloudWatchClient,
    args: GetCwAlarmArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let filter = DescribeAlarmsFilter {
        alarm_names:       args.alarm_names,
        alarm_name_prefix: args.alarm_name_prefix,
        alarm_types:       args.alarm_types,
        state_value:       args.state_value,
        action_prefix:     args.action_prefix,
    };
    filter.validate()?;
    let page_size = args.paging.page_size(Some(DESCRIBE_ALARMS_PAGE_SIZE))?;
    let selector = selector::DESCRIBE_ALARMS.resolve(args.paging.select.as_deref())?;

    let filter = &filter;
    run_paginated(
        ctx,
        &args.paging,
        move |token: Option<NextToken>| async move {
            client.describe_alarms(filter, page_size, token.as_ref()).await
        },
        selector,
    )
    .await
}

/// get-cw-metric-list
pub(super) async fn get_metric_list(
    client: &dyn CloudWatchClient,
    args: GetCwMetricListArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let filter = ListMetricsFilter {
        namespace:       args.namespace,
        metric_name:     args.metric_name,
        dimensions:      args.dimensions,
        recently_active: args.recently_active,
    };
    filter.validate()?;
    // ListMetrics はページサイズを受け付けない
    args.paging.page_size(None)?;
    let selector = selector::LIST_METRICS.resolve(args.paging.select.as_deref())?;

    let filter = &filter;
    run_paginated(
        ctx,
        &args.paging,
        move |token: Option<NextToken>| async move {
            client.list_metrics(filter, token.as_ref()).await
        },
        selector,
    )
    .await
}

/// get-cw-dashboard-list
pub(super) async fn get_dashboard_list(
    client: &dyn CloudWatchClient,
    args: GetCwDashboardListArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let filter = ListDashboardsFilter {
        dashboard_name_prefix: args.dashboard_name_prefix,
    };
    args.paging.page_size(None)?;
    let selector = selector::LIST_DASHBOARDS.resolve(args.paging.select.as_deref())?;

    let filter = &filter;
    run_paginated(
        ctx,
        &args.paging,
        move |token: Option<NextToken>| async move {
            client.list_dashboards(filter, token.as_ref()).await
        },
        selector,
    )
    .await
}

/// get-cw-anomaly-detector
pub(super) async fn get_anomaly_detector(
    client: &dyn CloudWatchClient,
    args: GetCwAnomalyDetectorArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let filter = DescribeAnomalyDetectorsFilter {
        namespace:   args.namespace,
        metric_name: args.metric_name,
        dimensions:  into_dimensions(args.dimensions)?,
    };
    filter.validate()?;
    let page_size = args
        .paging
        .page_size(Some(DESCRIBE_ANOMALY_DETECTORS_PAGE_SIZE))?;
    let selector = selector::DESCRIBE_ANOMALY_DETECTORS.resolve(args.paging.select.as_deref())?;

    let filter = &filter;
    run_paginated(
        ctx,
        &args.paging,
        move |token: Option<NextToken>| async move {
            client
                .describe_anomaly_detectors(filter, page_size, token.as_ref())
                .await
        },
        selector,
    )
    .await
}

/// get-cw-alarm-history
pub(super) async fn get_alarm_history(
    client: &dyn CloudWatchClient,
    args: GetCwAlarmHistoryArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let start_date = resolve_time(TimeBoundInput::new(
        "utc-start-date",
        "start-date",
        args.utc_start_date,
        args.start_date,
    ))?;
    let end_date = resolve_time(TimeBoundInput::new(
        "utc-end-date",
        "end-date",
        args.utc_end_date,
        args.end_date,
    ))?;
    let filter = DescribeAlarmHistoryFilter {
        alarm_name: args.alarm_name,
        alarm_types: args.alarm_types,
        history_item_type: args.history_item_type,
        start_date,
        end_date,
        scan_by: args.scan_by,
    };
    filter.validate()?;
    let page_size = args.paging.page_size(Some(DESCRIBE_ALARM_HISTORY_PAGE_SIZE))?;
    let selector = selector::DESCRIBE_ALARM_HISTORY.resolve(args.paging.select.as_deref())?;

    let filter = &filter;
    run_paginated(
        ctx,
        &args.paging,
        move |token: Option<NextToken>| async move {
            client
                .describe_alarm_history(filter, page_size, token.as_ref())
                .await
        },
        selector,
    )
    .await
}

/// get-cw-metric-statistic
///
/// 継続トークンを持たないため、レスポンス全体を 1 行で書き出す。
pub(super) async fn get_metric_statistic(
    client: &dyn CloudWatchClient,
    args: GetCwMetricStatisticArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let request = GetMetricStatisticsRequest {
        namespace:           args
            .namespace
            .ok_or(DomainError::MissingParameter("namespace"))?,
        metric_name:         args
            .metric_name
            .ok_or(DomainError::MissingParameter("metric-name"))?,
        dimensions:          into_dimensions(args.dimensions)?,
        start_time:          resolve_required_time(TimeBoundInput::new(
            "utc-start-time",
            "start-time",
            args.utc_start_time,
            args.start_time,
        ))?,
        end_time:            resolve_required_time(TimeBoundInput::new(
            "utc-end-time",
            "end-time",
            args.utc_end_time,
            args.end_time,
        ))?,
        period:              args.period.ok_or(DomainError::MissingParameter("period"))?,
        statistics:          args.statistics,
        extended_statistics: args.extended_statistics,
        unit:                args.unit,
    };
    request.validate()?;

    let response = client.get_metric_statistics(&request).await?;
    ctx.record
        .record_service_call(response.datapoints.len(), None);

    let mut writer = PipelineWriter::new(&mut *ctx.out, ctx.cancellation.clone());
    writer.write_item(&response)?;
    writer.flush()?;
    if !writer.is_closed() {
        ctx.record.add_emitted(1);
    }
    Ok(())
}

/// write-cw-metric-data
pub(super) async fn write_metric_data(
    client: &dyn CloudWatchClient,
    args: WriteCwMetricDataArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let datum = MetricDatum {
        metric_name: args
            .metric_name
            .ok_or(DomainError::MissingParameter("metric-name"))?,
        dimensions:  into_dimensions(args.dimensions)?,
        value:       args.value.ok_or(DomainError::MissingParameter("value"))?,
        unit:        args.unit,
        timestamp:   args.timestamp,
    };
    let request = PutMetricDataRequest {
        namespace:   args
            .namespace
            .ok_or(DomainError::MissingParameter("namespace"))?,
        metric_data: vec![datum],
    };
    request.validate()?;

    client.put_metric_data(&request).await?;
    ctx.record.record_service_call(0, None);
    tracing::info!(
        namespace = %request.namespace,
        count = request.metric_data.len(),
        "メトリクスデータを送信しました"
    );
    Ok(())
}

/// set-cw-alarm-state
pub(super) async fn set_alarm_state(
    client: &dyn CloudWatchClient,
    args: SetCwAlarmStateArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let request = SetAlarmStateRequest {
        alarm_name:        args
            .alarm_name
            .ok_or(DomainError::MissingParameter("alarm-name"))?,
        state_value:       args
            .state_value
            .ok_or(DomainError::MissingParameter("state-value"))?,
        state_reason:      args
            .state_reason
            .ok_or(DomainError::MissingParameter("state-reason"))?,
        state_reason_data: args.state_reason_data,
    };
    request.validate()?;
    if let Some(data) = request.state_reason_data.as_deref()
        && let Err(e) = serde_json::from_str::<serde_json::Value>(data)
    {
        return Err(DomainError::Validation(format!(
            "--state-reason-data は JSON である必要があります: {e}"
        ))
        .into());
    }

    client.set_alarm_state(&request).await?;
    ctx.record.record_service_call(0, None);
    tracing::info!(
        alarm_name = %request.alarm_name,
        state_value = %request.state_value,
        "アラームの状態を変更しました"
    );
    Ok(())
}
