//! # コマンドレットイベントログの構造化ヘルパー
//!
//! `jq` で呼び出し履歴を調査できるよう、ログフィールドの命名規約と
//! ヘルパーマクロを提供する。
//!
//! ## コマンドレットイベント
//!
//! [`log_cmdlet_event!`] マクロで出力する。`event.kind = "cmdlet_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "cmdlet_event")'` でフィルタできる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.service`、`event.action`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// コマンドレットイベントを構造化ログとして出力する。
///
/// `event.kind = "cmdlet_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.service`: サービス名（[`event::service`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.cmdlet`: コマンドレット名
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.item_count`: 出力したアイテム数
/// - `event.page_count`: 取得したページ数
#[macro_export]
macro_rules! log_cmdlet_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "cmdlet_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// AWS サービス名
    pub mod service {
        pub const CLOUDWATCH: &str = "cloudwatch";
        pub const WORKSPACES: &str = "workspaces";
    }

    /// イベントアクション
    pub mod action {
        pub const INVOCATION_COMPLETED: &str = "invocation.completed";
        pub const INVOCATION_FAILED: &str = "invocation.failed";
        pub const INVOCATION_CANCELLED: &str = "invocation.cancelled";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
        pub const CANCELLED: &str = "cancelled";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// ローカルでのパラメータ検証
        pub const VALIDATION: &str = "validation";
        /// AWS サービス呼び出し
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// パイプライン出力
        pub const OUTPUT: &str = "output";
    }

    /// エラー種別
    pub mod kind {
        pub const SERVICE_CALL: &str = "service_call";
        pub const NAME_RESOLUTION: &str = "name_resolution";
        pub const INVALID_PARAMETER: &str = "invalid_parameter";
        pub const WRITE: &str = "write";
        pub const INTERNAL: &str = "internal";
    }
}
