//! # ページネーションの値オブジェクト
//!
//! 一覧系・Describe 系オペレーションが共通で扱う値を定義する。
//!
//! ## 含まれる型
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`NextToken`] | サーバーが発行する不透明な継続トークン（空文字列は存在しない扱い） |
//! | [`Page`] | 1 ページ分のアイテムと次ページの継続トークン |
//! | [`PagingMode`] | 自動ページング / 手動ページング |
//! | [`EmitLimit`] | ページをまたいで出力するアイテム数の上限 |
//! | [`PageSize`] | 1 リクエストあたりの取得件数 |
//! | [`PagedResponse`] | 継続トークンを持つレスポンスの共通インターフェース |

use std::num::NonZeroUsize;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

// =========================================================================
// NextToken（継続トークン）
// =========================================================================

/// 継続トークン（値オブジェクト）
///
/// サーバーが前ページの応答で返し、呼び出し側がそのまま次のリクエストに渡す。
/// 中身の構造には一切依存しない。
///
/// # 不変条件
///
/// - 空文字列ではない（空文字列や未設定は「次ページなし」を意味する）
///
/// # 使用例
///
/// ```rust
/// use awscmd_domain::pagination::NextToken;
///
/// let token = NextToken::new("AAEC").unwrap();
/// assert_eq!(token.as_str(), "AAEC");
///
/// assert!(NextToken::from_response(Some(String::new())).is_none());
/// assert!(NextToken::from_response(None).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct NextToken(String);

impl NextToken {
    /// 文字列から継続トークンを作成する
    ///
    /// 空文字列の場合は `None` を返す。
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// SDK の応答フィールド（`Option<String>`）から変換する
    pub fn from_response(value: Option<String>) -> Option<Self> {
        value.and_then(Self::new)
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

// =========================================================================
// Page / PagedResponse
// =========================================================================

/// 継続トークンを持つレスポンス
///
/// ページングストリーマはこのトレイトを通じて次ページの有無を判定する。
pub trait PagedResponse {
    /// 次ページの継続トークン
    fn next_token(&self) -> Option<&NextToken>;
}

/// 1 ページ分の結果
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items:      Vec<T>,
    pub next_token: Option<NextToken>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<NextToken>) -> Self {
        Self { items, next_token }
    }
}

impl<T> PagedResponse for Page<T> {
    fn next_token(&self) -> Option<&NextToken> {
        self.next_token.as_ref()
    }
}

// =========================================================================
// PagingMode（ページングモード）
// =========================================================================

/// ページングモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingMode {
    /// 継続トークンが返らなくなるまで全ページを取得する
    #[default]
    Auto,
    /// 1 ページだけ取得し、継続トークンを呼び出し側に返す
    Manual,
}

impl PagingMode {
    /// `--no-auto-iteration` フラグから決定する
    pub fn from_no_auto_iteration(no_auto_iteration: bool) -> Self {
        if no_auto_iteration {
            Self::Manual
        } else {
            Self::Auto
        }
    }
}

// =========================================================================
// EmitLimit（出力件数上限）
// =========================================================================

/// ページをまたいだ出力件数の上限
///
/// 取得済みのアイテムを上限で打ち切る方式のみを採用し、
/// ページサイズを水増ししてリクエストすることはしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitLimit(NonZeroUsize);

impl EmitLimit {
    /// 上限を作成する
    ///
    /// # エラー
    ///
    /// 0 を指定した場合は `DomainError::Validation` を返す。
    pub fn new(value: usize) -> Result<Self, DomainError> {
        NonZeroUsize::new(value).map(Self).ok_or_else(|| {
            DomainError::Validation("--max-items は 1 以上である必要があります".to_string())
        })
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

// =========================================================================
// PageSize（ページサイズ）
// =========================================================================

/// オペレーションごとのページサイズの許容範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeBounds {
    /// リクエスト上のパラメータ名（`MaxRecords` など）
    pub parameter: &'static str,
    pub min:       i32,
    pub max:       i32,
}

/// 1 リクエストあたりの取得件数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(i32);

impl PageSize {
    /// 許容範囲を検証してページサイズを作成する
    pub fn new(value: i32, bounds: PageSizeBounds) -> Result<Self, DomainError> {
        if !(bounds.min..=bounds.max).contains(&value) {
            return Err(DomainError::Validation(format!(
                "--page-size（{}）は {} 以上 {} 以下である必要があります（指定: {value}）",
                bounds.parameter, bounds.min, bounds.max
            )));
        }
        Ok(Self(value))
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}
