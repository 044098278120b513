//! # WorkSpaces クライアント
//!
//! WorkSpaces API の Describe 系オペレーションを提供するクライアント。
//! 一覧系メソッドは 1 ページだけ返し、ページングは [`crate::paginator`] が行う。

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_workspaces::{Client, types as sdk};
use awscmd_domain::{
    pagination::{NextToken, PageSize},
    workspaces::{
        DescribeWorkspaceBundlesFilter,
        DescribeWorkspaceBundlesResponse,
        DescribeWorkspaceDirectoriesFilter,
        DescribeWorkspaceDirectoriesResponse,
        DescribeWorkspacesFilter,
        DescribeWorkspacesResponse,
        Workspace,
        WorkspaceBundle,
        WorkspaceDirectory,
    },
};
use chrono::{DateTime, Utc};

use crate::{InfraError, config::region_name};

const SERVICE: &str = "workspaces";

/// WorkSpaces クライアントのインターフェース
#[async_trait]
pub trait WorkSpacesClient: Send + Sync {
    /// WorkSpace を 1 ページ取得する（DescribeWorkspaces）
    async fn describe_workspaces(
        &self,
        filter: &DescribeWorkspacesFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeWorkspacesResponse, InfraError>;

    /// ディレクトリを 1 ページ取得する（DescribeWorkspaceDirectories）
    async fn describe_workspace_directories(
        &self,
        filter: &DescribeWorkspaceDirectoriesFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeWorkspaceDirectoriesResponse, InfraError>;

    /// バンドルを 1 ページ取得する（DescribeWorkspaceBundles）
    async fn describe_workspace_bundles(
        &self,
        filter: &DescribeWorkspaceBundlesFilter,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeWorkspaceBundlesResponse, InfraError>;
}

/// AWS WorkSpaces クライアント
pub struct AwsWorkSpacesClient {
    client: Client,
    region: String,
}

impl AwsWorkSpacesClient {
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
}

#[async_trait]
impl WorkSpacesClient for AwsWorkSpacesClient {
    #[tracing::instrument(skip_all, level = "debug", fields(operation = "DescribeWorkspaces"))]
    async fn describe_workspaces(
        &self,
        filter: &DescribeWorkspacesFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeWorkspacesResponse, InfraError> {
        let output = self
            .client
            .describe_workspaces()
            .set_workspace_ids(ids(&filter.workspace_ids))
            .set_directory_id(filter.directory_id.clone())
            .set_user_name(filter.user_name.clone())
            .set_bundle_id(filter.bundle_id.clone())
            .set_limit(page_size.map(|p| p.as_i32()))
            .set_next_token(next_token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| {
                InfraError::from_sdk(SERVICE, "DescribeWorkspaces", &self.region, &e)
            })?;

        Ok(DescribeWorkspacesResponse {
            workspaces: output
                .workspaces
                .unwrap_or_default()
                .into_iter()
                .map(workspace_from_sdk)
                .collect(),
            next_token: NextToken::from_response(output.next_token),
        })
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(operation = "DescribeWorkspaceDirectories")
    )]
    async fn describe_workspace_directories(
        &self,
        filter: &DescribeWorkspaceDirectoriesFilter,
        page_size: Option<PageSize>,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeWorkspaceDirectoriesResponse, InfraError> {
        let output = self
            .client
            .describe_workspace_directories()
            .set_directory_ids(ids(&filter.directory_ids))
            .set_limit(page_size.map(|p| p.as_i32()))
            .set_next_token(next_token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| {
                InfraError::from_sdk(SERVICE, "DescribeWorkspaceDirectories", &self.region, &e)
            })?;

        Ok(DescribeWorkspaceDirectoriesResponse {
            directories: output
                .directories
                .unwrap_or_default()
                .into_iter()
                .map(|d| WorkspaceDirectory {
                    directory_id:      d.directory_id,
                    directory_name:    d.directory_name,
                    alias:             d.alias,
                    directory_type:    d.directory_type.map(|t| t.as_str().to_string()),
                    state:             d.state.map(|s| s.as_str().to_string()),
                    registration_code: d.registration_code,
                })
                .collect(),
            next_token:  NextToken::from_response(output.next_token),
        })
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(operation = "DescribeWorkspaceBundles")
    )]
    async fn describe_workspace_bundles(
        &self,
        filter: &DescribeWorkspaceBundlesFilter,
        next_token: Option<&NextToken>,
    ) -> Result<DescribeWorkspaceBundlesResponse, InfraError> {
        let output = self
            .client
            .describe_workspace_bundles()
            .set_bundle_ids(ids(&filter.bundle_ids))
            .set_owner(filter.owner.clone())
            .set_next_token(next_token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| {
                InfraError::from_sdk(SERVICE, "DescribeWorkspaceBundles", &self.region, &e)
            })?;

        Ok(DescribeWorkspaceBundlesResponse {
            bundles:    output
                .bundles
                .unwrap_or_default()
                .into_iter()
                .map(bundle_from_sdk)
                .collect(),
            next_token: NextToken::from_response(output.next_token),
        })
    }
}

// ===== 型変換 =====

fn ids(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

fn workspace_from_sdk(w: sdk::Workspace) -> Workspace {
    Workspace {
        workspace_id:  w.workspace_id,
        directory_id:  w.directory_id,
        user_name:     w.user_name,
        ip_address:    w.ip_address,
        state:         w.state.map(|s| s.as_str().to_string()),
        bundle_id:     w.bundle_id,
        computer_name: w.computer_name,
    }
}

fn bundle_from_sdk(b: sdk::WorkspaceBundle) -> WorkspaceBundle {
    WorkspaceBundle {
        bundle_id:         b.bundle_id,
        name:              b.name,
        owner:             b.owner,
        description:       b.description,
        compute_type:      b
            .compute_type
            .and_then(|c| c.name)
            .map(|n| n.as_str().to_string()),
        last_updated_time: b
            .last_updated_time
            .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos())),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sdkのworkspaceをドメインモデルに変換する() {
        let sdk_workspace = sdk::Workspace::builder()
            .workspace_id("ws-abc")
            .directory_id("d-123")
            .user_name("alice")
            .state(sdk::WorkspaceState::Available)
            .build();

        let workspace = workspace_from_sdk(sdk_workspace);

        assert_eq!(workspace.workspace_id.as_deref(), Some("ws-abc"));
        assert_eq!(workspace.state.as_deref(), Some("AVAILABLE"));
        assert_eq!(workspace.ip_address, None);
    }

    #[test]
    fn test_バンドルのコンピュートタイプは名前を取り出す() {
        let sdk_bundle = sdk::WorkspaceBundle::builder()
            .bundle_id("wsb-1")
            .owner("AMAZON")
            .compute_type(sdk::ComputeType::builder().name(sdk::Compute::Standard).build())
            .build();

        let bundle = bundle_from_sdk(sdk_bundle);

        assert_eq!(bundle.compute_type.as_deref(), Some("STANDARD"));
        assert_eq!(bundle.owner.as_deref(), Some("AMAZON"));
    }

    #[test]
    fn test_idが空ならパラメータを送らない() {
        assert_eq!(ids(&[]), None);
        assert_eq!(ids(&["ws-1".to_string()]), Some(vec!["ws-1".to_string()]));
    }
}
