//! # ページングストリーマ
//!
//! 1 ページ取得関数とセレクタから、全ページの結果を遅延生成する [`Stream`] を作る。
//! すべての一覧系コマンドレットが共通で使う。
//!
//! ## 動作
//!
//! 1. キャンセルシグナルがセットされていれば、取得せずに正常終了する
//! 2. 現在の継続トークンで 1 ページ取得する
//! 3. レスポンスから次の継続トークンを読み、セレクタを適用してページを出力する
//! 4. 手動ページングなら 1 ページで終了する
//! 5. 出力件数の上限に達したら終了する（最後のページは残り件数で切り詰める）
//!
//! 手動ページングと出力上限は併用できない。切り詰めたアイテムは
//! 返された継続トークンから再開しても取得できないため、取得前にエラーにする。
//! 6. 次の継続トークンがあれば 1 に戻り、なければ終了する
//!
//! 取得に失敗した場合はエラーを最後の要素として出力する。
//! それまでに出力したページは取り消さない。リトライやキャッシュは行わない。
//!
//! ## 使用例
//!
//! ```rust
//! use awscmd_domain::pagination::{NextToken, Page};
//! use awscmd_infra::{InfraError, paginator::{PaginationOptions, paginate}};
//! use futures::{StreamExt, executor::block_on, pin_mut};
//!
//! block_on(async {
//!     let fetch = |token: Option<NextToken>| async move {
//!         let next = match token.as_ref().map(NextToken::as_str) {
//!             None => NextToken::new("p2"),
//!             Some(_) => None,
//!         };
//!         Ok::<_, InfraError>(Page::new(vec![1, 2], next))
//!     };
//!
//!     let stream = paginate(PaginationOptions::default(), fetch, |page: Page<i32>| Ok(page.items));
//!     pin_mut!(stream);
//!
//!     let mut total = 0;
//!     while let Some(page) = stream.next().await {
//!         total += page.unwrap().items.len();
//!     }
//!     assert_eq!(total, 4);
//! });
//! ```

use std::future::Future;

use async_stream::try_stream;
use awscmd_domain::{
    cancellation::CancellationSignal,
    pagination::{EmitLimit, NextToken, Page, PagedResponse, PagingMode},
};
use futures::{Stream, TryStreamExt, stream};

use crate::InfraError;

/// ページングの制御パラメータ
#[derive(Debug, Clone, Default)]
pub struct PaginationOptions {
    pub mode:          PagingMode,
    /// 最初のリクエストに渡す継続トークン（手動ページングの再開用）
    pub initial_token: Option<NextToken>,
    pub emit_limit:    Option<EmitLimit>,
    pub cancellation:  CancellationSignal,
}

/// 全ページの結果をページ単位で生成するストリームを作る
///
/// * `fetch` - 継続トークンを受け取り 1 ページ分のレスポンスを返す。
///   フィルタは呼び出し側がキャプチャし、全ページで同じ値を渡す
/// * `select` - レスポンスから出力するアイテムを取り出す。失敗はストリームの終端エラーになる
pub fn paginate<'a, R, O, F, Fut, S>(
    options: PaginationOptions,
    mut fetch: F,
    mut select: S,
) -> impl Stream<Item = Result<Page<O>, InfraError>> + 'a
where
    R: PagedResponse + 'a,
    O: 'a,
    F: FnMut(Option<NextToken>) -> Fut + 'a,
    Fut: Future<Output = Result<R, InfraError>> + 'a,
    S: FnMut(R) -> Result<Vec<O>, InfraError> + 'a,
{
    try_stream! {
        let PaginationOptions {
            mode,
            initial_token,
            emit_limit,
            cancellation,
        } = options;

        if mode == PagingMode::Manual && emit_limit.is_some() {
            Err::<(), _>(InfraError::invalid_input(
                "手動ページングでは出力上限を指定できません",
            ))?;
        }

        let mut token = initial_token;
        let mut remaining = emit_limit.map(|limit| limit.get());
        let mut page_index = 0_usize;

        loop {
            if cancellation.is_cancelled() {
                tracing::debug!(page_index, "キャンセルが要求されたためページングを終了します");
                break;
            }

            let response = fetch(token.take()).await?;
            let next_token = response.next_token().cloned();
            let mut items = select(response)?;

            if let Some(remaining) = remaining.as_mut() {
                items.truncate(*remaining);
                *remaining -= items.len();
            }
            let limit_reached = remaining == Some(0);

            tracing::debug!(
                page_index,
                item_count = items.len(),
                has_next_token = next_token.is_some(),
                "ページを取得しました"
            );

            yield Page::new(items, next_token.clone());
            page_index += 1;

            if mode == PagingMode::Manual || limit_reached {
                break;
            }
            match next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
    }
}

/// ページのストリームをアイテム単位に展開する
pub fn items<O, E>(
    pages: impl Stream<Item = Result<Page<O>, E>>,
) -> impl Stream<Item = Result<O, E>> {
    pages
        .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<O, E>)))
        .try_flatten()
}
