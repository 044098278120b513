//! # awscmd インフラ層
//!
//! AWS サービスとの通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートは AWS SDK を隠蔽し、ドメイン層の型で入出力するクライアントを提供する。
//! リクエストの署名・リトライ・通信は SDK に任せ、このクレートは
//! 型変換とエラーの分類、ページングの制御だけを行う。
//!
//! ## 依存関係
//!
//! ```text
//! cli → infra → domain
//!  └──→ shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - SDK 設定（リージョン、プロファイル、エンドポイント）の読み込み
//! - [`cloudwatch`] - CloudWatch クライアント
//! - [`workspaces`] - WorkSpaces クライアント
//! - [`paginator`] - 継続トークンによるページングストリーマ
//! - [`error`] - インフラ層エラー定義
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use awscmd_infra::{
//!     cloudwatch::AwsCloudWatchClient,
//!     config::{AwsClientConfig, create_sdk_config},
//! };
//!
//! async fn setup() {
//!     let sdk_config = create_sdk_config(&AwsClientConfig {
//!         region: Some("ap-northeast-1".to_string()),
//!         ..Default::default()
//!     })
//!     .await;
//!     let cloudwatch = AwsCloudWatchClient::from_sdk_config(&sdk_config);
//! }
//! ```

pub mod cloudwatch;
pub mod config;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod paginator;
pub mod workspaces;

pub use cloudwatch::{AwsCloudWatchClient, CloudWatchClient};
pub use error::{InfraError, InfraErrorKind};
pub use workspaces::{AwsWorkSpacesClient, WorkSpacesClient};
