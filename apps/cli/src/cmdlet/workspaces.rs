//! WorkSpaces のコマンドレット

use awscmd_domain::{
    pagination::NextToken,
    workspaces::{
        DescribeWorkspaceBundlesFilter,
        DescribeWorkspaceDirectoriesFilter,
        DescribeWorkspacesFilter,
        WORKSPACES_PAGE_SIZE,
    },
};
use awscmd_infra::WorkSpacesClient;

use super::{CmdletContext, run_paginated};
use crate::{
    args::{GetWksWorkspaceArgs, GetWksWorkspaceBundleArgs, GetWksWorkspaceDirectoryArgs},
    error::CliError,
    selector,
};

/// get-wks-workspace
pub(super) async fn get_workspace(
    client: &dyn WorkSpacesClient,
    args: GetWksWorkspaceArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let filter = DescribeWorkspacesFilter {
        workspace_ids: args.workspace_ids,
        directory_id:  args.directory_id,
        user_name:     args.user_name,
        bundle_id:     args.bundle_id,
    };
    filter.validate()?;
    let page_size = args.paging.page_size(Some(WORKSPACES_PAGE_SIZE))?;
    let selector = selector::DESCRIBE_WORKSPACES.resolve(args.paging.select.as_deref())?;

    let filter = &filter;
    run_paginated(
        ctx,
        &args.paging,
        move |token: Option<NextToken>| async move {
            client
                .describe_workspaces(filter, page_size, token.as_ref())
                .await
        },
        selector,
    )
    .await
}

/// get-wks-workspace-directory
pub(super) async fn get_workspace_directory(
    client: &dyn WorkSpacesClient,
    args: GetWksWorkspaceDirectoryArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let filter = DescribeWorkspaceDirectoriesFilter {
        directory_ids: args.directory_ids,
    };
    filter.validate()?;
    let page_size = args.paging.page_size(Some(WORKSPACES_PAGE_SIZE))?;
    let selector =
        selector::DESCRIBE_WORKSPACE_DIRECTORIES.resolve(args.paging.select.as_deref())?;

    let filter = &filter;
    run_paginated(
        ctx,
        &args.paging,
        move |token: Option<NextToken>| async move {
            client
                .describe_workspace_directories(filter, page_size, token.as_ref())
                .await
        },
        selector,
    )
    .await
}

/// get-wks-workspace-bundle
pub(super) async fn get_workspace_bundle(
    client: &dyn WorkSpacesClient,
    args: GetWksWorkspaceBundleArgs,
    ctx: &mut CmdletContext<'_>,
) -> Result<(), CliError> {
    let filter = DescribeWorkspaceBundlesFilter {
        bundle_ids: args.bundle_ids,
        owner:      args.owner,
    };
    filter.validate()?;
    // DescribeWorkspaceBundles はページサイズを受け付けない
    args.paging.page_size(None)?;
    let selector = selector::DESCRIBE_WORKSPACE_BUNDLES.resolve(args.paging.select.as_deref())?;

    let filter = &filter;
    run_paginated(
        ctx,
        &args.paging,
        move |token: Option<NextToken>| async move {
            client.describe_workspace_bundles(filter, token.as_ref()).await
        },
        selector,
    )
    .await
}
