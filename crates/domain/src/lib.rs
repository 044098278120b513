//! # awscmd ドメイン層
//!
//! コマンドレットが扱う値（フィルタ、レスポンス、ページ、継続トークン）と、
//! ネットワーク呼び出し前に行うパラメータ検証を定義する。
//!
//! ## 設計方針
//!
//! - **SDK 非依存**: AWS SDK の型はインフラ層で変換し、このクレートには持ち込まない
//! - **検証はローカルで完結**: 必須パラメータの欠落や排他パラメータの同時指定は
//!   サービス呼び出しの前に [`DomainError`] として検出する
//! - **状態は明示的に渡す**: 呼び出し履歴は [`session::Session`] として
//!   ホストプロセスが所有し、グローバル状態を持たない
//!
//! ## 依存関係の方向
//!
//! ```text
//! cli → infra → domain
//!  └──→ shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`pagination`] - 継続トークン、ページ、ページングモード
//! - [`cancellation`] - 呼び出し単位のキャンセルシグナル
//! - [`session`] - 呼び出し履歴を保持するセッション
//! - [`time_bound`] - 旧形式（ローカル時刻）と UTC 形式の二重パラメータの統合
//! - [`cloudwatch`] - CloudWatch のモデルとフィルタ
//! - [`workspaces`] - WorkSpaces のモデルとフィルタ
//!
//! ## 使用例
//!
//! ```rust
//! use awscmd_domain::{DomainError, pagination::NextToken};
//!
//! // 空文字列の継続トークンは「次ページなし」として扱う
//! assert!(NextToken::new("").is_none());
//!
//! let error = DomainError::MissingParameter("namespace");
//! assert_eq!(error.to_string(), "必須パラメータが指定されていません: --namespace");
//! ```

pub mod cancellation;
pub mod clock;
pub mod cloudwatch;
pub mod error;
pub mod pagination;
pub mod session;
pub mod time_bound;
pub mod workspaces;

pub use error::DomainError;
