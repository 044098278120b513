//! # テスト用モッククライアント
//!
//! 台本（あらかじめ積んだ応答とエラー）を順に返すインメモリのモッククライアント。
//! 受け取ったフィルタと継続トークンを記録し、テストから検証できる。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! awscmd-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
   collections::VecDeque,
   sync::{Arc, Mutex},
};

use async_trait::async_trait;
use awscmd_domain::{
   cloudwatch::{
      DescribeAlarmHistoryFilter,
      DescribeAlarmHistoryResponse,
      DescribeAlarmsFilter,
      DescribeAlarmsResponse,
      DescribeAnomalyDetectorsFilter,
      DescribeAnomalyDetectorsResponse,
      GetMetricStatisticsRequest,
      GetMetricStatisticsResponse,
      ListDashboardsFilter,
      ListDashboardsResponse,
      ListMetricsFilter,
      ListMetricsResponse,
      PutMetricDataRequest,
      SetAlarmStateRequest,
   },
   pagination::{NextToken, PageSize},
   workspaces::{
      DescribeWorkspaceBundlesFilter,
      DescribeWorkspaceBundlesResponse,
      DescribeWorkspaceDirectoriesFilter,
      DescribeWorkspaceDirectoriesResponse,
      DescribeWorkspacesFilter,
      DescribeWorkspacesResponse,
   },
};

use crate::{cloudwatch::CloudWatchClient, error::InfraError, workspaces::WorkSpacesClient};

// ===== ScriptedOperation =====

/// モックが受け取ったリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest<Q> {
   pub request:    Q,
   pub page_size:  Option<i32>,
   pub next_token: Option<String>,
}

struct Script<Q, R> {
   responses: VecDeque<Result<R, InfraError>>,
   requests:  Vec<RecordedRequest<Q>>,
}

/// 1 オペレーション分の台本
///
/// 台本が尽きた後の呼び出しは `Unexpected` エラーになる。
pub struct ScriptedOperation<Q, R> {
   script: Arc<Mutex<Script<Q, R>>>,
}

impl<Q, R> Clone for ScriptedOperation<Q, R> {
   fn clone(&self) -> Self {
      Self {
         script: Arc::clone(&self.script),
      }
   }
}

impl<Q, R> Default for ScriptedOperation<Q, R> {
   fn default() -> Self {
      Self {
         script: Arc::new(Mutex::new(Script {
            responses: VecDeque::new(),
            requests:  Vec::new(),
         })),
      }
   }
}

impl<Q: Clone, R> ScriptedOperation<Q, R> {
   /// 次の応答を積む
   pub fn push_response(&self, response: R) {
      self.script.lock().unwrap().responses.push_back(Ok(response));
   }

   /// 次の応答としてエラーを積む
   pub fn push_error(&self, error: InfraError) {
      self.script.lock().unwrap().responses.push_back(Err(error));
   }

   /// 受け取ったリクエスト（古い順）
   pub fn requests(&self) -> Vec<RecordedRequest<Q>> {
      self.script.lock().unwrap().requests.clone()
   }

   /// 呼び出し回数
   pub fn call_count(&self) -> usize {
      self.script.lock().unwrap().requests.len()
   }

   fn call(
      &self,
      request: &Q,
      page_size: Option<PageSize>,
      next_token: Option<&NextToken>,
   ) -> Result<R, InfraError> {
      let mut script = self.script.lock().unwrap();
      script.requests.push(RecordedRequest {
         request:    request.clone(),
         page_size:  page_size.map(|p| p.as_i32()),
         next_token: next_token.map(|t| t.as_str().to_string()),
      });
      script
         .responses
         .pop_front()
         .unwrap_or_else(|| Err(InfraError::unexpected("モックの応答が残っていません")))
   }
}

// ===== MockCloudWatchClient =====

#[derive(Clone, Default)]
pub struct MockCloudWatchClient {
   pub describe_alarms:            ScriptedOperation<DescribeAlarmsFilter, DescribeAlarmsResponse>,
   pub list_metrics:               ScriptedOperation<ListMetricsFilter, ListMetricsResponse>,
   pub list_dashboards:            ScriptedOperation<ListDashboardsFilter, ListDashboardsResponse>,
   pub describe_anomaly_detectors:
      ScriptedOperation<DescribeAnomalyDetectorsFilter, DescribeAnomalyDetectorsResponse>,
   pub describe_alarm_history:
      ScriptedOperation<DescribeAlarmHistoryFilter, DescribeAlarmHistoryResponse>,
   pub get_metric_statistics:
      ScriptedOperation<GetMetricStatisticsRequest, GetMetricStatisticsResponse>,
   pub put_metric_data:            ScriptedOperation<PutMetricDataRequest, ()>,
   pub set_alarm_state:            ScriptedOperation<SetAlarmStateRequest, ()>,
}

impl MockCloudWatchClient {
   pub fn new() -> Self {
      Self::default()
   }
}

#[async_trait]
impl CloudWatchClient for MockCloudWatchClient {
   async fn describe_alarms(
      &self,
      filter: &DescribeAlarmsFilter,
      page_size: Option<PageSize>,
      next_token: Option<&NextToken>,
   ) -> Result<DescribeAlarmsResponse, InfraError> {
      self.describe_alarms.call(filter, page_size, next_token)
   }

   async fn list_metrics(
      &self,
      filter: &ListMetricsFilter,
      next_token: Option<&NextToken>,
   ) -> Result<ListMetricsResponse, InfraError> {
      self.list_metrics.call(filter, None, next_token)
   }

   async fn list_dashboards(
      &self,
      filter: &ListDashboardsFilter,
      next_token: Option<&NextToken>,
   ) -> Result<ListDashboardsResponse, InfraError> {
      self.list_dashboards.call(filter, None, next_token)
   }

   async fn describe_anomaly_detectors(
      &self,
      filter: &DescribeAnomalyDetectorsFilter,
      page_size: Option<PageSize>,
      next_token: Option<&NextToken>,
   ) -> Result<DescribeAnomalyDetectorsResponse, InfraError> {
      self.describe_anomaly_detectors
         .call(filter, page_size, next_token)
   }

   async fn describe_alarm_history(
      &self,
      filter: &DescribeAlarmHistoryFilter,
      page_size: Option<PageSize>,
      next_token: Option<&NextToken>,
   ) -> Result<DescribeAlarmHistoryResponse, InfraError> {
      self.describe_alarm_history.call(filter, page_size, next_token)
   }

   async fn get_metric_statistics(
      &self,
      request: &GetMetricStatisticsRequest,
   ) -> Result<GetMetricStatisticsResponse, InfraError> {
      self.get_metric_statistics.call(request, None, None)
   }

   async fn put_metric_data(&self, request: &PutMetricDataRequest) -> Result<(), InfraError> {
      self.put_metric_data.call(request, None, None)
   }

   async fn set_alarm_state(&self, request: &SetAlarmStateRequest) -> Result<(), InfraError> {
      self.set_alarm_state.call(request, None, None)
   }
}

// ===== MockWorkSpacesClient =====

#[derive(Clone, Default)]
pub struct MockWorkSpacesClient {
   pub describe_workspaces: ScriptedOperation<DescribeWorkspacesFilter, DescribeWorkspacesResponse>,
   pub describe_workspace_directories:
      ScriptedOperation<DescribeWorkspaceDirectoriesFilter, DescribeWorkspaceDirectoriesResponse>,
   pub describe_workspace_bundles:
      ScriptedOperation<DescribeWorkspaceBundlesFilter, DescribeWorkspaceBundlesResponse>,
}

impl MockWorkSpacesClient {
   pub fn new() -> Self {
      Self::default()
   }
}

#[async_trait]
impl WorkSpacesClient for MockWorkSpacesClient {
   async fn describe_workspaces(
      &self,
      filter: &DescribeWorkspacesFilter,
      page_size: Option<PageSize>,
      next_token: Option<&NextToken>,
   ) -> Result<DescribeWorkspacesResponse, InfraError> {
      self.describe_workspaces.call(filter, page_size, next_token)
   }

   async fn describe_workspace_directories(
      &self,
      filter: &DescribeWorkspaceDirectoriesFilter,
      page_size: Option<PageSize>,
      next_token: Option<&NextToken>,
   ) -> Result<DescribeWorkspaceDirectoriesResponse, InfraError> {
      self.describe_workspace_directories
         .call(filter, page_size, next_token)
   }

   async fn describe_workspace_bundles(
      &self,
      filter: &DescribeWorkspaceBundlesFilter,
      next_token: Option<&NextToken>,
   ) -> Result<DescribeWorkspaceBundlesResponse, InfraError> {
      self.describe_workspace_bundles.call(filter, None, next_token)
   }
}
