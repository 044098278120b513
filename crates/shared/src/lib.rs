//! # awscmd 共有ユーティリティ
//!
//! このクレートは、awscmd ワークスペース全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, cli）から依存される
//! - AWS サービス固有のロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える（tracing 系は `observability` feature の裏に置く）

pub mod error_record;
pub mod event_log;
pub mod observability;
pub mod paginated_response;

pub use error_record::ErrorRecord;
pub use paginated_response::PaginatedResponse;
