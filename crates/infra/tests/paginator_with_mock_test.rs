//! モッククライアントとページングストリーマを組み合わせた統合テスト
//!
//! フィルタが全ページで同じ値のまま渡され、継続トークンだけが変わることを検証する。

use awscmd_domain::{
   cancellation::CancellationSignal,
   cloudwatch::{
      AlarmState,
      DescribeAlarmsFilter,
      DescribeAlarmsResponse,
      ListMetricsFilter,
      ListMetricsResponse,
      Metric,
      MetricAlarm,
   },
   pagination::{EmitLimit, NextToken, PageSize, PagingMode},
   workspaces::{
      DescribeWorkspacesFilter,
      DescribeWorkspacesResponse,
      WORKSPACES_PAGE_SIZE,
      Workspace,
   },
};
use awscmd_infra::{
   CloudWatchClient,
   InfraError,
   InfraErrorKind,
   WorkSpacesClient,
   mock::{MockCloudWatchClient, MockWorkSpacesClient},
   paginator::{PaginationOptions, items, paginate},
};
use futures::{StreamExt, TryStreamExt, pin_mut};
use pretty_assertions::assert_eq;

fn metric(name: &str) -> Metric {
   Metric {
      namespace:   Some("Custom/App".to_string()),
      metric_name: Some(name.to_string()),
      dimensions:  vec![],
   }
}

fn alarm(name: &str) -> MetricAlarm {
   MetricAlarm {
      alarm_name:              Some(name.to_string()),
      alarm_arn:               None,
      alarm_description:       None,
      state_value:             Some(AlarmState::Alarm),
      state_reason:            None,
      namespace:               None,
      metric_name:             None,
      dimensions:              vec![],
      statistic:               None,
      threshold:               None,
      comparison_operator:     None,
      evaluation_periods:      None,
      period:                  None,
      actions_enabled:         None,
      state_updated_timestamp: None,
   }
}

fn workspace(id: &str) -> Workspace {
   Workspace {
      workspace_id:  Some(id.to_string()),
      directory_id:  Some("d-123".to_string()),
      user_name:     None,
      ip_address:    None,
      state:         Some("AVAILABLE".to_string()),
      bundle_id:     None,
      computer_name: None,
   }
}

#[tokio::test]
async fn test_フィルタは全ページで変わらず継続トークンだけが変わる() {
   let client = MockCloudWatchClient::new();
   client.list_metrics.push_response(ListMetricsResponse {
      metrics:    vec![metric("a"), metric("b")],
      next_token: NextToken::new("t1"),
   });
   client.list_metrics.push_response(ListMetricsResponse {
      metrics:    vec![metric("c")],
      next_token: None,
   });
   let filter = ListMetricsFilter {
      namespace: Some("Custom/App".to_string()),
      recently_active: true,
      ..Default::default()
   };

   let cw: &dyn CloudWatchClient = &client;
   let filter_ref = &filter;
   let stream = items(paginate(
      PaginationOptions::default(),
      move |token: Option<NextToken>| async move {
         cw.list_metrics(filter_ref, token.as_ref()).await
      },
      |response: ListMetricsResponse| Ok(response.metrics),
   ));
   let names: Vec<_> = stream
      .map_ok(|m| m.metric_name.unwrap_or_default())
      .try_collect()
      .await
      .unwrap();

   assert_eq!(names, vec!["a", "b", "c"]);
   let requests = client.list_metrics.requests();
   assert_eq!(requests.len(), 2);
   assert!(requests.iter().all(|r| r.request == filter));
   assert_eq!(
      requests.iter().map(|r| r.next_token.clone()).collect::<Vec<_>>(),
      vec![None, Some("t1".to_string())]
   );
}

#[tokio::test]
async fn test_ページサイズは全リクエストに同じ値で渡される() {
   let client = MockWorkSpacesClient::new();
   client.describe_workspaces.push_response(DescribeWorkspacesResponse {
      workspaces: vec![workspace("ws-1")],
      next_token: NextToken::new("n1"),
   });
   client.describe_workspaces.push_response(DescribeWorkspacesResponse {
      workspaces: vec![workspace("ws-2")],
      next_token: None,
   });
   let filter = DescribeWorkspacesFilter {
      directory_id: Some("d-123".to_string()),
      ..Default::default()
   };
   let page_size = Some(PageSize::new(1, WORKSPACES_PAGE_SIZE).unwrap());

   let wks: &dyn WorkSpacesClient = &client;
   let filter_ref = &filter;
   let pages: Vec<_> = paginate(
      PaginationOptions::default(),
      move |token: Option<NextToken>| async move {
         wks.describe_workspaces(filter_ref, page_size, token.as_ref()).await
      },
      |response: DescribeWorkspacesResponse| Ok(response.workspaces),
   )
   .try_collect()
   .await
   .unwrap();

   assert_eq!(pages.len(), 2);
   assert!(
      client
         .describe_workspaces
         .requests()
         .iter()
         .all(|r| r.page_size == Some(1))
   );
}

#[tokio::test]
async fn test_2ページ目のサービスエラーは1ページ目の後に届く() {
   let client = MockCloudWatchClient::new();
   client.describe_alarms.push_response(DescribeAlarmsResponse {
      metric_alarms:    vec![alarm("cpu-high"), alarm("disk-full")],
      composite_alarms: vec![],
      next_token:       NextToken::new("p2"),
   });
   client
      .describe_alarms
      .push_error(InfraError::service("cloudwatch", "DescribeAlarms", "Throttling"));
   let filter = DescribeAlarmsFilter::default();

   let cw: &dyn CloudWatchClient = &client;
   let filter_ref = &filter;
   let stream = items(paginate(
      PaginationOptions::default(),
      move |token: Option<NextToken>| async move {
         cw.describe_alarms(filter_ref, None, token.as_ref()).await
      },
      |response: DescribeAlarmsResponse| Ok(response.metric_alarms),
   ));
   pin_mut!(stream);

   let first = stream.next().await.unwrap().unwrap();
   let second = stream.next().await.unwrap().unwrap();
   let third = stream.next().await.unwrap();

   assert_eq!(first.alarm_name.as_deref(), Some("cpu-high"));
   assert_eq!(second.alarm_name.as_deref(), Some("disk-full"));
   assert!(third.is_err());
   assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_手動ページングと出力上限の併用は取得前に拒否される() {
   let client = MockCloudWatchClient::new();
   client.list_metrics.push_response(ListMetricsResponse {
      metrics:    vec![metric("a"), metric("b"), metric("c")],
      next_token: NextToken::new("t1"),
   });
   let filter = ListMetricsFilter::default();
   let options = PaginationOptions {
      mode: PagingMode::Manual,
      emit_limit: Some(EmitLimit::new(2).unwrap()),
      cancellation: CancellationSignal::new(),
      initial_token: None,
   };

   let cw: &dyn CloudWatchClient = &client;
   let filter_ref = &filter;
   let result: Result<Vec<_>, _> = paginate(
      options,
      move |token: Option<NextToken>| async move {
         cw.list_metrics(filter_ref, token.as_ref()).await
      },
      |response: ListMetricsResponse| Ok(response.metrics),
   )
   .try_collect()
   .await;

   let err = result.unwrap_err();
   assert!(matches!(err.kind(), InfraErrorKind::InvalidInput(_)));
   assert_eq!(client.list_metrics.call_count(), 0);
}
