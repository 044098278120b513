//! # WorkSpaces
//!
//! WorkSpaces の仮想デスクトップ・ディレクトリ・バンドルのモデルとフィルタ。
//!
//! ID 指定（`--workspace-id` など）と条件指定は排他で、ID は 1 リクエスト 25 件まで。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    DomainError,
    error::{ensure_exclusive, ensure_max_len},
    pagination::{NextToken, PageSizeBounds, PagedResponse},
};

/// DescribeWorkspaces / DescribeWorkspaceDirectories のページサイズ（Limit）
pub const WORKSPACES_PAGE_SIZE: PageSizeBounds = PageSizeBounds {
    parameter: "Limit",
    min:       1,
    max:       25,
};

const MAX_IDS: usize = 25;

/// WorkSpace（仮想デスクトップ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Workspace {
    pub workspace_id:  Option<String>,
    pub directory_id:  Option<String>,
    pub user_name:     Option<String>,
    pub ip_address:    Option<String>,
    pub state:         Option<String>,
    pub bundle_id:     Option<String>,
    pub computer_name: Option<String>,
}

/// WorkSpaces に登録されたディレクトリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkspaceDirectory {
    pub directory_id:      Option<String>,
    pub directory_name:    Option<String>,
    pub alias:             Option<String>,
    pub directory_type:    Option<String>,
    pub state:             Option<String>,
    pub registration_code: Option<String>,
}

/// バンドル（WorkSpace の構成テンプレート）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkspaceBundle {
    pub bundle_id:         Option<String>,
    pub name:              Option<String>,
    pub owner:             Option<String>,
    pub description:       Option<String>,
    pub compute_type:      Option<String>,
    pub last_updated_time: Option<DateTime<Utc>>,
}

// =========================================================================
// DescribeWorkspaces
// =========================================================================

/// DescribeWorkspaces のフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeWorkspacesFilter {
    pub workspace_ids: Vec<String>,
    pub directory_id:  Option<String>,
    pub user_name:     Option<String>,
    pub bundle_id:     Option<String>,
}

impl DescribeWorkspacesFilter {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_max_len(&self.workspace_ids, MAX_IDS, "workspace-id")?;

        let has_ids = !self.workspace_ids.is_empty();
        ensure_exclusive(("workspace-id", has_ids), ("directory-id", self.directory_id.is_some()))?;
        ensure_exclusive(("workspace-id", has_ids), ("user-name", self.user_name.is_some()))?;
        ensure_exclusive(("workspace-id", has_ids), ("bundle-id", self.bundle_id.is_some()))?;

        // ユーザー名はディレクトリ内でのみ一意
        if self.user_name.is_some() && self.directory_id.is_none() {
            return Err(DomainError::MissingParameter("directory-id"));
        }
        Ok(())
    }
}

/// DescribeWorkspaces のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeWorkspacesResponse {
    pub workspaces: Vec<Workspace>,
    pub next_token: Option<NextToken>,
}

impl PagedResponse for DescribeWorkspacesResponse {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

// =========================================================================
// DescribeWorkspaceDirectories
// =========================================================================

/// DescribeWorkspaceDirectories のフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeWorkspaceDirectoriesFilter {
    pub directory_ids: Vec<String>,
}

impl DescribeWorkspaceDirectoriesFilter {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_max_len(&self.directory_ids, MAX_IDS, "directory-id")
    }
}

/// DescribeWorkspaceDirectories のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeWorkspaceDirectoriesResponse {
    pub directories: Vec<WorkspaceDirectory>,
    pub next_token:  Option<NextToken>,
}

impl PagedResponse for DescribeWorkspaceDirectoriesResponse {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

// =========================================================================
// DescribeWorkspaceBundles
// =========================================================================

/// DescribeWorkspaceBundles のフィルタ
///
/// `owner` に `AMAZON` を指定すると AWS 提供のバンドル、
/// 未指定ならアカウント所有のバンドルを返す。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeWorkspaceBundlesFilter {
    pub bundle_ids: Vec<String>,
    pub owner:      Option<String>,
}

impl DescribeWorkspaceBundlesFilter {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_max_len(&self.bundle_ids, MAX_IDS, "bundle-id")?;
        ensure_exclusive(
            ("bundle-id", !self.bundle_ids.is_empty()),
            ("owner", self.owner.is_some()),
        )
    }
}

/// DescribeWorkspaceBundles のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeWorkspaceBundlesResponse {
    pub bundles:    Vec<WorkspaceBundle>,
    pub next_token: Option<NextToken>,
}

impl PagedResponse for DescribeWorkspaceBundlesResponse {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("ws-{i:08}")).collect()
    }

    #[rstest]
    #[case(25, true)]
    #[case(26, false)]
    fn test_workspace_idは25件まで(#[case] count: usize, #[case] ok: bool) {
        let filter = DescribeWorkspacesFilter {
            workspace_ids: ids(count),
            ..Default::default()
        };

        assert_eq!(filter.validate().is_ok(), ok);
    }

    #[test]
    fn test_workspace_idとdirectory_idは排他() {
        let filter = DescribeWorkspacesFilter {
            workspace_ids: ids(1),
            directory_id: Some("d-123".to_string()),
            ..Default::default()
        };

        assert_eq!(
            filter.validate(),
            Err(DomainError::MutuallyExclusive {
                first:  "workspace-id",
                second: "directory-id",
            })
        );
    }

    #[test]
    fn test_user_nameにはdirectory_idが必要() {
        let filter = DescribeWorkspacesFilter {
            user_name: Some("alice".to_string()),
            ..Default::default()
        };

        assert_eq!(
            filter.validate(),
            Err(DomainError::MissingParameter("directory-id"))
        );
    }

    #[test]
    fn test_directory_idとuser_nameの組み合わせは有効() {
        let filter = DescribeWorkspacesFilter {
            directory_id: Some("d-123".to_string()),
            user_name: Some("alice".to_string()),
            ..Default::default()
        };

        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_bundle_idとownerは排他() {
        let filter = DescribeWorkspaceBundlesFilter {
            bundle_ids: vec!["wsb-1".to_string()],
            owner:      Some("AMAZON".to_string()),
        };

        assert!(matches!(
            filter.validate(),
            Err(DomainError::MutuallyExclusive { .. })
        ));
    }

    #[test]
    fn test_directory_idは26件以上を拒否する() {
        let filter = DescribeWorkspaceDirectoriesFilter {
            directory_ids: ids(26),
        };

        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_workspaceはpascal_caseでシリアライズされる() {
        let workspace = Workspace {
            workspace_id:  Some("ws-1".to_string()),
            directory_id:  Some("d-1".to_string()),
            user_name:     Some("alice".to_string()),
            ip_address:    None,
            state:         Some("AVAILABLE".to_string()),
            bundle_id:     None,
            computer_name: None,
        };

        let json = serde_json::to_value(&workspace).unwrap();

        assert_eq!(json["WorkspaceId"], "ws-1");
        assert_eq!(json["State"], "AVAILABLE");
    }
}
